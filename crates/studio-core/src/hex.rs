//! Hex codec used for keys, signatures and nonces.
//!
//! Encoding is lowercase with two characters per byte and no separators.
//! Decoding is strict: odd lengths and non-hex characters are errors.

use crate::error::{Result, StudioError};

/// Encode bytes as lowercase hex.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    ::hex::encode(bytes)
}

/// Decode a hex string, rejecting malformed input.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    ::hex::decode(input).map_err(|e| StudioError::MalformedHex(e.to_string()))
}

/// Decode a hex string into a fixed-size array.
pub fn decode_array<const N: usize>(input: &str) -> Result<[u8; N]> {
    let bytes = decode(input)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        StudioError::MalformedHex(format!("expected {} bytes, got {}", N, len))
    })
}
