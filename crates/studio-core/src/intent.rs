//! Intent types and builder for Anoma Studio.
//!
//! An Intent is a declaration of a desired state change on a resource. It is
//! constructed with a fresh nonce and timestamp, checked by [`Intent::validate`],
//! and then signed over its canonical serialization.

use std::collections::BTreeMap;

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::types::{IntentType, IntentTypeInfo, ValidationReport};

/// Resource schema targeted by the convenience constructors.
pub const HELLO_WORLD_RESOURCE: &str = "HelloWorldResource";

/// Owner used when no key pair has been loaded yet.
pub const UNKNOWN_OWNER: &str = "ed25519:unknown";

/// Number of random bytes in a nonce.
pub const NONCE_BYTES: usize = 16;

/// Intent parameters. Keys are kept sorted so serialization is stable.
pub type Parameters = BTreeMap<String, Value>;

/// A structured declaration of a desired state change.
///
/// Field order is the canonical serialization order and must not change:
/// `type, resource, parameters, nonce, timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// The intent type tag. A string so hand-written intents with unknown
    /// or empty types can still be validated.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Name of the resource schema the intent targets.
    #[serde(default)]
    pub resource: String,

    /// Type-specific parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Parameters>,

    /// 16 random bytes as 32 lowercase hex characters.
    #[serde(default)]
    pub nonce: String,

    /// Milliseconds since the Unix epoch at construction.
    #[serde(default)]
    pub timestamp: i64,
}

/// An intent paired with a signature over its canonical bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedIntent {
    /// The signed intent, embedded verbatim.
    pub intent: Intent,

    /// Hex-encoded Ed25519 signature.
    pub signature: String,

    /// Signer's public key, `ed25519:<hex>`.
    pub public_key: String,
}

/// Builder for creating Intents with a fluent API.
#[derive(Debug)]
pub struct IntentBuilder {
    kind: String,
    resource: String,
    parameters: Parameters,
}

impl IntentBuilder {
    /// Start an intent of the given type targeting `HelloWorldResource`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            resource: HELLO_WORLD_RESOURCE.to_string(),
            parameters: Parameters::new(),
        }
    }

    /// Set the target resource schema.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    /// Add a parameter.
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Build the Intent, attaching a fresh nonce and the current time.
    pub fn build(self) -> Intent {
        create_intent(self.kind, self.resource, self.parameters)
    }
}

/// Construct an intent. Always succeeds.
pub fn create_intent(
    kind: impl Into<String>,
    resource: impl Into<String>,
    parameters: Parameters,
) -> Intent {
    Intent {
        kind: kind.into(),
        resource: resource.into(),
        parameters: Some(parameters),
        nonce: generate_nonce(),
        timestamp: Utc::now().timestamp_millis(),
    }
}

/// `CreateResource` on `HelloWorldResource` with `{message, owner}`.
pub fn create_hello_world_intent(message: &str, owner: &str) -> Intent {
    IntentBuilder::new(IntentType::CreateResource.as_str())
        .parameter("message", message)
        .parameter("owner", owner)
        .build()
}

/// `UpdateResource` with `{resourceId, message}`.
pub fn create_update_intent(resource_id: &str, message: &str) -> Intent {
    IntentBuilder::new(IntentType::UpdateResource.as_str())
        .parameter("resourceId", resource_id)
        .parameter("message", message)
        .build()
}

/// `TransferResource` with `{resourceId, newOwner}`.
pub fn create_transfer_intent(resource_id: &str, new_owner: &str) -> Intent {
    IntentBuilder::new(IntentType::TransferResource.as_str())
        .parameter("resourceId", resource_id)
        .parameter("newOwner", new_owner)
        .build()
}

/// Structural validation of an intent. See [`Intent::validate`].
pub fn validate_intent(intent: &Intent) -> ValidationReport {
    intent.validate()
}

/// The four intent types with their labels and descriptions.
pub fn get_intent_types() -> Vec<IntentTypeInfo> {
    IntentType::ALL.iter().map(IntentType::info).collect()
}

/// Generate a nonce from the OS CSPRNG.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    crate::hex::encode(bytes)
}

impl Intent {
    /// Create a new IntentBuilder.
    pub fn builder(kind: impl Into<String>) -> IntentBuilder {
        IntentBuilder::new(kind)
    }

    /// Parse a hand-written intent. Missing fields are defaulted, never regenerated.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The parsed type tag, if it is one of the known types.
    pub fn intent_type(&self) -> Option<IntentType> {
        self.kind.parse().ok()
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.as_ref()?.get(name)
    }

    /// The bytes that are signed and verified.
    ///
    /// Compact JSON, fields in declaration order, parameter keys sorted.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// SHA-256 of the canonical bytes, hex-encoded. Used to refer to an intent in logs.
    pub fn content_hash(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_bytes()?);
        Ok(crate::hex::encode(hasher.finalize()))
    }

    /// Validate required fields for the declared type.
    ///
    /// All violations are reported, not just the first.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();

        if self.kind.trim().is_empty() {
            errors.push("Intent type is required".to_string());
        }

        if self.parameters.is_none() {
            errors.push("Intent parameters are required".to_string());
        }

        match self.intent_type() {
            Some(IntentType::CreateResource) => {
                if !self.has_parameter("message") {
                    errors.push("Message parameter is required for CreateResource".to_string());
                }
                if !self.has_parameter("owner") {
                    errors.push("Owner parameter is required for CreateResource".to_string());
                }
            }
            Some(IntentType::UpdateResource) | Some(IntentType::TransferResource) => {
                if !self.has_parameter("resourceId") {
                    errors.push(
                        "ResourceId parameter is required for this intent type".to_string(),
                    );
                }
            }
            // No rule for ConsumeResource or unknown types.
            _ => {}
        }

        ValidationReport::from_errors(errors)
    }

    fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some_and(is_present)
    }
}

/// Whether a parameter value counts as supplied.
///
/// Null, empty strings, `false` and zero are treated as missing.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::Array(_) | Value::Object(_) => true,
    }
}
