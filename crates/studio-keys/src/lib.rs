//! # Studio Keys
//!
//! Key pairs, intent signatures and the locally persisted active key.

pub mod active;
pub mod clipboard;
pub mod keypair;
pub mod manager;
pub mod signing;
pub mod storage;

pub use active::{ActiveKeyPair, STORAGE_KEY};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use keypair::{KeyPair, KeyPairFile, KEYPAIR_FILENAME, PUBLIC_KEY_PREFIX};
pub use manager::KeyManager;
pub use signing::Verification;
pub use storage::{FileStorage, InMemoryStorage, LocalStorage};
