//! Node configuration, populated from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

const DEFAULT_CRYPTO_TIMEOUT_MS: u64 = 10_000;

/// Runtime configuration for the studio node.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `STUDIO_BIND` | `0.0.0.0:5000` | TCP socket address to listen on |
/// | `STUDIO_STORAGE` | (absent = in-memory) | Path of the local storage file |
/// | `STUDIO_EXPORT_DIR` | (absent) | Directory exports are also written to |
/// | `STUDIO_CRYPTO_TIMEOUT_MS` | `10000` | Bound on a single key or signature operation |
/// | `STUDIO_COMPILE_LATENCY_MS` | `0` | Artificial delay for compile and simulate calls |
///
/// A malformed value is logged and replaced by its default.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// `None` keeps the active key pair in memory only.
    pub storage_path: Option<PathBuf>,

    /// `None` returns exports inline only.
    pub export_dir: Option<PathBuf>,

    pub crypto_timeout: Duration,

    pub compile_latency: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            storage_path: None,
            export_dir: None,
            crypto_timeout: Duration::from_millis(DEFAULT_CRYPTO_TIMEOUT_MS),
            compile_latency: Duration::ZERO,
        }
    }
}

impl NodeConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let bind_addr = parse_or(&lookup, "STUDIO_BIND", defaults.bind_addr);
        let crypto_timeout = parse_or(&lookup, "STUDIO_CRYPTO_TIMEOUT_MS", DEFAULT_CRYPTO_TIMEOUT_MS);
        let compile_latency = parse_or(&lookup, "STUDIO_COMPILE_LATENCY_MS", 0u64);

        Self {
            bind_addr,
            storage_path: non_empty(&lookup, "STUDIO_STORAGE").map(PathBuf::from),
            export_dir: non_empty(&lookup, "STUDIO_EXPORT_DIR").map(PathBuf::from),
            crypto_timeout: Duration::from_millis(crypto_timeout),
            compile_latency: Duration::from_millis(compile_latency),
        }
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match non_empty(lookup, key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw:?} is not valid, using {default}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> NodeConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        NodeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config, NodeConfig::default());
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:5000");
        assert_eq!(config.crypto_timeout, Duration::from_secs(10));
        assert!(config.storage_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("STUDIO_BIND", "127.0.0.1:8080"),
            ("STUDIO_STORAGE", "/var/lib/studio/storage.json"),
            ("STUDIO_EXPORT_DIR", "/tmp/exports"),
            ("STUDIO_CRYPTO_TIMEOUT_MS", "250"),
            ("STUDIO_COMPILE_LATENCY_MS", " 1500 "),
        ]);
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(
            config.storage_path,
            Some(PathBuf::from("/var/lib/studio/storage.json"))
        );
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));
        assert_eq!(config.crypto_timeout, Duration::from_millis(250));
        assert_eq!(config.compile_latency, Duration::from_millis(1500));
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = config(&[
            ("STUDIO_BIND", "not an address"),
            ("STUDIO_CRYPTO_TIMEOUT_MS", "-5"),
            ("STUDIO_STORAGE", "  "),
        ]);
        assert_eq!(config, NodeConfig::default());
    }
}
