pub mod client;

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use sha2::{Digest, Sha256};

use crate::chain::{Address, BlockHeader};

/// Fixed measurement identifier bound into every quote.
///
/// Real deployments would replace this with the platform's enclave
/// measurement; the registry only requires that the quote bind a known
/// measurement to the registration digest.
pub const MEASUREMENT_ID: [u8; 32] = *b"lockbox-mock-measurement-v1.0\0\0\0";

/// Registrations and the tokens minted from them are valid for one hour.
pub const TOKEN_VALIDITY_SECS: u64 = 3600;

/// Time-bounded registration bound into an attestation quote.
///
/// `base_block_number`/`base_block_hash` reference the block immediately
/// preceding the chain head at registration time — never the head itself,
/// which could still be displaced by a reorganization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub base_block_hash: [u8; 32],
    pub base_block_number: u64,
    pub expiry: u64,
    /// Identity bound into the attestation. This wallet never signs a
    /// transaction; the gas wallet funds all writes.
    pub registrant: Address,
    pub token_expiry: u64,
}

impl Registration {
    /// Build a registration anchored at `base`, expiring one hour from `now`.
    /// `expiry` and `token_expiry` are always equal.
    pub fn new(base: &BlockHeader, registrant: Address, now: u64) -> Self {
        let expiry = now + TOKEN_VALIDITY_SECS;
        Self {
            base_block_hash: base.hash,
            base_block_number: base.number,
            expiry,
            registrant,
            token_expiry: expiry,
        }
    }

    /// Deterministic wire encoding: fixed-width fields, big-endian integers.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(32 + 8 + 8 + 20 + 8);
        buf.put_slice(&self.base_block_hash);
        buf.put_u64(self.base_block_number);
        buf.put_u64(self.expiry);
        buf.put_slice(self.registrant.as_bytes());
        buf.put_u64(self.token_expiry);
        buf.freeze()
    }

    /// SHA-256 digest of the wire encoding; quotes bind to this.
    pub fn digest(&self) -> [u8; 32] {
        Sha256::digest(self.encode()).into()
    }
}

/// Mock attestation evidence: the fixed measurement identifier followed by
/// the registration digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote(Bytes);

impl Quote {
    pub fn for_registration(registration: &Registration) -> Self {
        let mut buf = BytesMut::with_capacity(64);
        buf.put_slice(&MEASUREMENT_ID);
        buf.put_slice(&registration.digest());
        Self(buf.freeze())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Verifier-issued trusted-computing-base identifier; the lookup key in the
/// lockbox registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TcbId(pub [u8; 32]);

impl fmt::Debug for TcbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TcbId(0x{})", hex::encode(self.0))
    }
}

impl fmt::Display for TcbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
