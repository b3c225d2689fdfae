//! # Studio Core
//!
//! Core primitives and types for Anoma Studio.
//!
//! This crate provides the fundamental building blocks:
//! - [`Intent`] - Declaration of a desired state change on a resource
//! - [`SignedIntent`] - An intent with a signature and the signer's public key
//! - [`IntentExport`] - The exported document shape and the sinks that receive it
//! - [`StudioError`] - Error types

pub mod error;
pub mod export;
pub mod hex;
pub mod intent;
pub mod types;

// Re-exports for convenience
pub use error::{Result, StudioError};
pub use export::{export_intent, DirectorySink, ExportSink, ExportedFile, IntentExport, MemorySink};
pub use intent::{
    create_hello_world_intent, create_intent, create_transfer_intent, create_update_intent,
    get_intent_types, validate_intent, Intent, IntentBuilder, Parameters, SignedIntent,
};
pub use types::*;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Result, StudioError};
    pub use crate::export::{ExportSink, IntentExport};
    pub use crate::intent::{Intent, IntentBuilder, SignedIntent};
    pub use crate::types::{IntentType, ValidationReport};
}
