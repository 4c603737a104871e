//! Hex transport codec for binary envelope fields.

use crate::error::CodecError;

/// Encode bytes as lowercase hex, no prefix.
pub fn encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex, tolerating the `0x` prefix chain tooling puts on values.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    let stripped = text.strip_prefix("0x").unwrap_or(text);
    Ok(hex::decode(stripped)?)
}

/// Decode into a fixed-width array; a length mismatch is an error.
pub fn decode_fixed<const N: usize>(text: &str) -> Result<[u8; N], CodecError> {
    let bytes = decode(text)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CodecError::InvalidLength { expected: N, actual })
}
