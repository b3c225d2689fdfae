//! Common types used across Anoma Studio.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kinds of intent the builder knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentType {
    /// Create a new resource.
    CreateResource,
    /// Update an existing resource's properties.
    UpdateResource,
    /// Transfer ownership of a resource.
    TransferResource,
    /// Consume a resource. Enumerated only: no constructor or validation rule.
    ConsumeResource,
}

impl IntentType {
    /// All intent types, in presentation order.
    pub const ALL: [IntentType; 4] = [
        IntentType::CreateResource,
        IntentType::UpdateResource,
        IntentType::TransferResource,
        IntentType::ConsumeResource,
    ];

    /// The wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentType::CreateResource => "CreateResource",
            IntentType::UpdateResource => "UpdateResource",
            IntentType::TransferResource => "TransferResource",
            IntentType::ConsumeResource => "ConsumeResource",
        }
    }

    /// Presentation metadata for this type.
    pub fn info(&self) -> IntentTypeInfo {
        let (label, description) = match self {
            IntentType::CreateResource => (
                "Create Resource",
                "Create a new resource on the Anoma network",
            ),
            IntentType::UpdateResource => (
                "Update Resource",
                "Update an existing resource's properties",
            ),
            IntentType::TransferResource => (
                "Transfer Resource",
                "Transfer ownership of a resource to another party",
            ),
            IntentType::ConsumeResource => (
                "Consume Resource",
                "Consume a resource to release its value",
            ),
        };

        IntentTypeInfo {
            value: self.as_str().to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

impl fmt::Display for IntentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown intent type: {}", s))
    }
}

/// Presentation entry for an intent type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentTypeInfo {
    pub value: String,
    pub label: String,
    pub description: String,
}

/// Outcome of structural intent validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True iff `errors` is empty.
    pub valid: bool,

    /// Every rule violation, in rule order.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Build a report from accumulated errors.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// The error surfaced to the user, if any.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Where an intent sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStage {
    /// Constructed but not yet checked.
    Draft,
    /// Passed structural validation.
    Validated,
    /// Signature attached.
    Signed,
    /// Written to an export sink.
    Exported,
}

impl IntentStage {
    /// Returns true if the intent can still be signed from this stage.
    pub fn can_sign(&self) -> bool {
        matches!(self, IntentStage::Validated)
    }

    /// Returns true if the intent carries a signature.
    pub fn is_signed(&self) -> bool {
        matches!(self, IntentStage::Signed | IntentStage::Exported)
    }
}
