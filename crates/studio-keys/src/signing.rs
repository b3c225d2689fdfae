//! Ed25519 key generation, signing and verification over intents.
//!
//! Signatures cover [`Intent::canonical_bytes`], the compact JSON form with a
//! fixed field order. Private keys travel as hex PKCS#8 documents, public keys
//! as `ed25519:` + hex of the raw 32 bytes.

use ed25519_dalek::pkcs8::{DecodePrivateKey, EncodePrivateKey, KeypairBytes};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::Serialize;
use studio_core::{hex, Intent, Result, StudioError};

use crate::keypair::{strip_prefix, KeyPair, PUBLIC_KEY_PREFIX};

/// Result of checking a signature.
///
/// `verify_signature` collapses this to a bool; the split is kept for callers
/// that need to tell tampering from garbage input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Verification {
    /// The signature matches the intent and key.
    Valid,
    /// Well-formed inputs, but the signature does not match.
    Mismatch,
    /// The key, signature or intent could not be checked at all.
    Malformed(String),
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid)
    }
}

/// Generate a fresh key pair from OS randomness.
pub fn generate_key_pair() -> Result<KeyPair> {
    let signing_key = SigningKey::generate(&mut OsRng);
    let document = KeypairBytes {
        secret_key: signing_key.to_bytes(),
        public_key: None,
    }
    .to_pkcs8_der()
    .map_err(|e| StudioError::Provider(format!("Failed to generate key pair: {}", e)))?;

    Ok(KeyPair {
        public_key: format!(
            "{}{}",
            PUBLIC_KEY_PREFIX,
            hex::encode(signing_key.verifying_key().as_bytes())
        ),
        private_key: hex::encode(document.as_bytes()),
    })
}

/// Import a hex PKCS#8 private key.
pub fn import_private_key(private_key_hex: &str) -> Result<SigningKey> {
    let der = hex::decode(private_key_hex)?;
    SigningKey::from_pkcs8_der(&der)
        .map_err(|e| StudioError::Provider(format!("Failed to import private key: {}", e)))
}

/// Import an `ed25519:`-tagged (or bare) hex public key.
pub fn import_public_key(public_key: &str) -> Result<VerifyingKey> {
    let bytes: [u8; 32] = hex::decode_array(strip_prefix(public_key))?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| StudioError::Provider(format!("Failed to import public key: {}", e)))
}

/// Sign the canonical bytes of `intent`. Returns the 64-byte signature in hex.
pub fn sign_intent(intent: &Intent, private_key_hex: &str) -> Result<String> {
    let signing_key = import_private_key(private_key_hex).map_err(|e| match e {
        StudioError::Provider(msg) => StudioError::Provider(format!("Failed to sign intent: {}", msg)),
        other => other,
    })?;
    let payload = intent.canonical_bytes()?;
    let signature = signing_key.sign(&payload);
    Ok(hex::encode(signature.to_bytes()))
}

/// Check a signature, distinguishing mismatch from malformed input.
pub fn verify_detailed(intent: &Intent, signature_hex: &str, public_key: &str) -> Verification {
    let verifying_key = match import_public_key(public_key) {
        Ok(key) => key,
        Err(e) => return Verification::Malformed(format!("public key: {}", e)),
    };

    let payload = match intent.canonical_bytes() {
        Ok(bytes) => bytes,
        Err(e) => return Verification::Malformed(format!("intent: {}", e)),
    };

    let sig_bytes: [u8; 64] = match hex::decode_array(signature_hex) {
        Ok(bytes) => bytes,
        Err(e) => return Verification::Malformed(format!("signature: {}", e)),
    };
    let signature = Signature::from_bytes(&sig_bytes);

    match verifying_key.verify(&payload, &signature) {
        Ok(()) => Verification::Valid,
        Err(_) => Verification::Mismatch,
    }
}

/// Check a signature. Malformed input never errors; it reports `false`.
pub fn verify_signature(intent: &Intent, signature_hex: &str, public_key: &str) -> bool {
    verify_detailed(intent, signature_hex, public_key).is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_core::{create_hello_world_intent, create_transfer_intent, Parameters};

    const PKCS8_V1_PREFIX: &str = "302e020100300506032b657004220420";

    #[test]
    fn test_generated_key_shapes() {
        let kp = generate_key_pair().unwrap();
        assert!(kp.public_key.starts_with("ed25519:"));
        assert_eq!(kp.public_key_hex().len(), 64);
        assert_eq!(kp.private_key.len(), 96);
        assert!(kp.private_key.starts_with(PKCS8_V1_PREFIX));
    }

    #[test]
    fn test_private_key_matches_public_key() {
        let kp = generate_key_pair().unwrap();
        let signing_key = import_private_key(&kp.private_key).unwrap();
        assert_eq!(
            hex::encode(signing_key.verifying_key().as_bytes()),
            kp.public_key_hex()
        );
    }

    #[test]
    fn test_sign_then_verify() {
        let kp = generate_key_pair().unwrap();
        let intent = create_hello_world_intent("Hello, Anoma!", &kp.public_key);

        let signature = sign_intent(&intent, &kp.private_key).unwrap();
        assert_eq!(signature.len(), 128);
        assert!(verify_signature(&intent, &signature, &kp.public_key));
        assert_eq!(
            verify_detailed(&intent, &signature, &kp.public_key),
            Verification::Valid
        );
    }

    #[test]
    fn test_verify_accepts_bare_public_key() {
        let kp = generate_key_pair().unwrap();
        let intent = create_transfer_intent("resource_001", "ed25519:ff");
        let signature = sign_intent(&intent, &kp.private_key).unwrap();
        assert!(verify_signature(&intent, &signature, kp.public_key_hex()));
    }

    #[test]
    fn test_tampered_intent_fails() {
        let kp = generate_key_pair().unwrap();
        let intent = create_hello_world_intent("Hello, Anoma!", &kp.public_key);
        let signature = sign_intent(&intent, &kp.private_key).unwrap();

        let mut tampered = intent.clone();
        tampered
            .parameters
            .get_or_insert_with(Parameters::new)
            .insert("message".to_string(), "Goodbye".into());
        assert_eq!(
            verify_detailed(&tampered, &signature, &kp.public_key),
            Verification::Mismatch
        );

        let mut tampered = intent.clone();
        tampered.timestamp += 1;
        assert!(!verify_signature(&tampered, &signature, &kp.public_key));

        let mut tampered = intent;
        tampered.nonce = "00".repeat(16);
        assert!(!verify_signature(&tampered, &signature, &kp.public_key));
    }

    #[test]
    fn test_other_key_fails() {
        let signer = generate_key_pair().unwrap();
        let other = generate_key_pair().unwrap();
        let intent = create_hello_world_intent("hi", &signer.public_key);
        let signature = sign_intent(&intent, &signer.private_key).unwrap();
        assert!(!verify_signature(&intent, &signature, &other.public_key));
    }

    #[test]
    fn test_malformed_inputs_report_false() {
        let kp = generate_key_pair().unwrap();
        let intent = create_hello_world_intent("hi", &kp.public_key);
        let signature = sign_intent(&intent, &kp.private_key).unwrap();

        let cases = [
            (signature.as_str(), "ed25519:zz"),
            (signature.as_str(), "ed25519:abcd"),
            ("not-hex", kp.public_key.as_str()),
            ("abc", kp.public_key.as_str()),
            (&signature[..64], kp.public_key.as_str()),
        ];
        for (sig, key) in cases {
            assert!(!verify_signature(&intent, sig, key));
            assert!(matches!(
                verify_detailed(&intent, sig, key),
                Verification::Malformed(_)
            ));
        }
    }

    #[test]
    fn test_sign_rejects_bad_private_keys() {
        let intent = create_hello_world_intent("hi", "ed25519:00");

        let err = sign_intent(&intent, "xyz").unwrap_err();
        assert!(matches!(err, StudioError::MalformedHex(_)));

        let err = sign_intent(&intent, &"00".repeat(48)).unwrap_err();
        match err {
            StudioError::Provider(msg) => assert!(msg.starts_with("Failed to sign intent")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_signature_is_deterministic() {
        let kp = generate_key_pair().unwrap();
        let intent = create_hello_world_intent("hi", &kp.public_key);
        assert_eq!(
            sign_intent(&intent, &kp.private_key).unwrap(),
            sign_intent(&intent, &kp.private_key).unwrap()
        );
    }

    #[test]
    fn test_verification_serializes_with_status() {
        let value = serde_json::to_value(Verification::Malformed("bad".to_string())).unwrap();
        assert_eq!(value["status"], "malformed");
        assert_eq!(value["reason"], "bad");
        let value = serde_json::to_value(Verification::Valid).unwrap();
        assert_eq!(value["status"], "valid");
    }
}
