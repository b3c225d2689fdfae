//! `studio-node`: the Anoma Studio API server.
//!
//! ```sh
//! # In-memory key storage on the default port:
//! studio-node
//!
//! # Persist the active key pair and mirror exports to disk:
//! STUDIO_STORAGE=./storage.json STUDIO_EXPORT_DIR=./exports studio-node
//! ```
//!
//! See [`studio_node::config::NodeConfig`] for every variable.

use studio_node::config::NodeConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("studio_node=info,tower_http=info")),
        )
        .init();

    tracing::info!("Anoma Studio node starting");
    let config = NodeConfig::from_env();
    studio_node::run_server(config).await
}
