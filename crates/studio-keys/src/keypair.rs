//! Key-pair records and their file format.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use studio_core::{Result, StudioError};

/// Algorithm tag prepended to public keys.
pub const PUBLIC_KEY_PREFIX: &str = "ed25519:";

/// Default filename for a saved key pair.
pub const KEYPAIR_FILENAME: &str = "anoma-keypair.json";

/// Message reported when an imported document is not a key pair.
pub const INVALID_FORMAT: &str = "Invalid key pair format";

/// An Ed25519 key pair in its exported string form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    /// `ed25519:` followed by the 32 raw public key bytes in hex.
    pub public_key: String,

    /// Hex of the PKCS#8 private key document.
    pub private_key: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl KeyPair {
    /// The public key without its algorithm prefix.
    pub fn public_key_hex(&self) -> &str {
        strip_prefix(&self.public_key)
    }

    /// Parse an exported key-pair file.
    ///
    /// Both `publicKey` and `privateKey` must be present and non-empty; any
    /// other field (such as `generated`) is ignored.
    pub fn import_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Shape {
            public_key: Option<String>,
            private_key: Option<String>,
        }

        let invalid = || StudioError::ImportFormat(INVALID_FORMAT.to_string());
        let shape: Shape = serde_json::from_str(json).map_err(|_| invalid())?;

        match (shape.public_key, shape.private_key) {
            (Some(public_key), Some(private_key))
                if !public_key.is_empty() && !private_key.is_empty() =>
            {
                Ok(Self {
                    public_key,
                    private_key,
                })
            }
            _ => Err(invalid()),
        }
    }

    /// The document written by a key-pair export, stamped with the current time.
    pub fn to_file(&self) -> KeyPairFile {
        KeyPairFile {
            public_key: self.public_key.clone(),
            private_key: self.private_key.clone(),
            generated: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// The exported key-pair document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairFile {
    pub public_key: String,
    pub private_key: String,

    /// ISO-8601 UTC time of export.
    pub generated: String,
}

impl KeyPairFile {
    /// Pretty JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Strip the `ed25519:` tag if present.
pub fn strip_prefix(public_key: &str) -> &str {
    public_key.strip_prefix(PUBLIC_KEY_PREFIX).unwrap_or(public_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KeyPair {
        KeyPair {
            public_key: format!("{}{}", PUBLIC_KEY_PREFIX, "ab".repeat(32)),
            private_key: "cd".repeat(48),
        }
    }

    #[test]
    fn test_import_ignores_generated() {
        let json = r#"{
            "publicKey": "ed25519:00",
            "privateKey": "11",
            "generated": "2024-01-01T00:00:00.000Z",
            "comment": "extra fields are fine"
        }"#;
        let kp = KeyPair::import_json(json).unwrap();
        assert_eq!(kp.public_key, "ed25519:00");
        assert_eq!(kp.private_key, "11");
    }

    #[test]
    fn test_import_requires_both_keys() {
        for json in [
            r#"{"publicKey": "ed25519:00"}"#,
            r#"{"privateKey": "11"}"#,
            r#"{"publicKey": "", "privateKey": "11"}"#,
            r#"{"publicKey": 5, "privateKey": "11"}"#,
            r#"[]"#,
            "not json",
        ] {
            let err = KeyPair::import_json(json).unwrap_err();
            assert_eq!(err, StudioError::ImportFormat(INVALID_FORMAT.to_string()), "{}", json);
            assert_eq!(err.to_string(), "Invalid key pair format");
        }
    }

    #[test]
    fn test_file_round_trip() {
        let kp = sample();
        let file = kp.to_file();
        assert!(file.generated.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&file.generated).is_ok());

        let json = file.to_pretty_json().unwrap();
        assert!(json.contains("\"publicKey\""));
        assert!(json.contains("\"generated\""));
        assert_eq!(KeyPair::import_json(&json).unwrap(), kp);
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&"cd".repeat(48)));
    }

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("ed25519:abcd"), "abcd");
        assert_eq!(strip_prefix("abcd"), "abcd");
        assert_eq!(sample().public_key_hex(), "ab".repeat(32));
    }
}
