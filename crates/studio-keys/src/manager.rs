//! Key & signature manager.
//!
//! Wraps the synchronous primitives in [`crate::signing`] as awaitable tasks.
//! Each call runs on the blocking pool and is bounded by a timeout, so a stuck
//! provider surfaces as [`StudioError::Timeout`] instead of hanging the caller.

use std::time::Duration;

use studio_core::export::{ExportSink, JSON_MIME};
use studio_core::{Intent, Result, SignedIntent, StudioError};
use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::keypair::{KeyPair, KEYPAIR_FILENAME};
use crate::signing::{self, Verification};

/// Default bound on a single provider call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Generates keys, signs intents and verifies signatures.
///
/// Stateless apart from its configuration; safe to share and call concurrently.
#[derive(Debug, Clone)]
pub struct KeyManager {
    timeout: Duration,
}

impl Default for KeyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyManager {
    /// Create a manager with the default timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Generate a new Ed25519 key pair.
    pub async fn generate_key_pair(&self) -> Result<KeyPair> {
        let key_pair = self
            .run("generate key pair", signing::generate_key_pair)
            .await
            .inspect_err(|e| warn!("key generation failed: {}", e))?;
        info!(public_key = %key_pair.public_key, "generated key pair");
        Ok(key_pair)
    }

    /// Sign `intent` with a hex PKCS#8 private key. Returns the signature in hex.
    pub async fn sign_intent(&self, intent: &Intent, private_key_hex: &str) -> Result<String> {
        let intent = intent.clone();
        let private_key_hex = private_key_hex.to_string();
        self.run("sign intent", move || {
            signing::sign_intent(&intent, &private_key_hex)
        })
        .await
        .inspect_err(|e| warn!("signing failed: {}", e))
    }

    /// Check a signature. Never errors: anything unverifiable is `false`.
    pub async fn verify_signature(
        &self,
        intent: &Intent,
        signature_hex: &str,
        public_key: &str,
    ) -> bool {
        self.verify_detailed(intent, signature_hex, public_key)
            .await
            .is_valid()
    }

    /// Check a signature, keeping mismatch and malformed input apart.
    pub async fn verify_detailed(
        &self,
        intent: &Intent,
        signature_hex: &str,
        public_key: &str,
    ) -> Verification {
        let intent = intent.clone();
        let signature_hex = signature_hex.to_string();
        let public_key = public_key.to_string();

        let outcome = self
            .run("verify signature", move || {
                Ok(signing::verify_detailed(&intent, &signature_hex, &public_key))
            })
            .await
            .unwrap_or_else(|e| Verification::Malformed(e.to_string()));

        if !outcome.is_valid() {
            debug!(?outcome, "verification failed");
        }
        outcome
    }

    /// Validate, sign and pair an intent with the signer's public key.
    ///
    /// The intent is embedded verbatim; nothing is regenerated.
    pub async fn sign_and_wrap(&self, intent: &Intent, key_pair: &KeyPair) -> Result<SignedIntent> {
        let report = intent.validate();
        if !report.valid {
            return Err(StudioError::IntentInvalid {
                errors: report.errors,
            });
        }

        let signature = self.sign_intent(intent, &key_pair.private_key).await?;
        if let Ok(hash) = intent.content_hash() {
            info!(intent = %hash, kind = %intent.kind, "intent signed");
        }

        Ok(SignedIntent {
            intent: intent.clone(),
            signature,
            public_key: key_pair.public_key.clone(),
        })
    }

    /// Write `{publicKey, privateKey, generated}` to `sink`.
    pub fn save_key_pair(
        &self,
        sink: &dyn ExportSink,
        key_pair: &KeyPair,
        filename: Option<&str>,
    ) -> Result<String> {
        let body = key_pair.to_file().to_pretty_json()?;
        sink.deliver(filename.unwrap_or(KEYPAIR_FILENAME), JSON_MIME, body.as_bytes())
    }

    /// Put `text` on the clipboard. Provider errors reach the caller.
    pub async fn copy_to_clipboard(&self, clipboard: &dyn Clipboard, text: &str) -> Result<()> {
        clipboard.write_text(text).await
    }

    async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let task = tokio::task::spawn_blocking(f);
        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(StudioError::Internal(format!(
                "{} task failed: {}",
                operation, join_error
            ))),
            Err(_) => Err(StudioError::Timeout {
                duration_ms: self.timeout.as_millis() as u64,
                message: operation.to_string(),
            }),
        }
    }
}
