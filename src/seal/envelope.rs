use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{CryptoError, Error};

use super::Key;

/// AEAD nonce length (ChaCha20-Poly1305, RFC 8439).
pub const NONCE_LEN: usize = 12;

/// AEAD authentication tag overhead added to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Encrypted envelope as embedded in artifact metadata. Binary fields are
/// hex-encoded for transport; `key_id` names the key generation that sealed
/// the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedBox {
    pub key_id: u8,
    pub nonce: String,
    pub data: String,
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
pub(crate) fn seal(key: &Key, key_id: u8, plaintext: &[u8]) -> Result<SealedBox, Error> {
    let cipher = ChaCha20Poly1305::new_from_slice(key.as_bytes()).expect("key length is 32");
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::SealFailed)?;
    Ok(SealedBox {
        key_id,
        nonce: codec::encode(&nonce),
        data: codec::encode(&ciphertext),
    })
}

/// Decrypt a sealed envelope. Fails closed: a tampered nonce or ciphertext
/// yields an error, never partial plaintext.
pub(crate) fn open(key: &Key, sealed: &SealedBox) -> Result<Vec<u8>, Error> {
    let nonce: [u8; NONCE_LEN] = codec::decode_fixed(&sealed.nonce)?;
    let ciphertext = codec::decode(&sealed.data)?;
    let cipher = ChaCha20Poly1305::new_from_slice(key.as_bytes()).expect("key length is 32");
    let plaintext = cipher
        .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
        .map_err(|_| CryptoError::OpenFailed)?;
    Ok(plaintext)
}
