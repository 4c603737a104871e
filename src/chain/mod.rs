pub mod confirm;
pub mod signer;

use std::fmt;

use async_trait::async_trait;

use crate::attestation::{Quote, Registration, TcbId};
use crate::error::ChainError;

use self::signer::CallEnvelope;

/// 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Block selector for read calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Latest,
    Number(u64),
}

/// Number and hash of a block, as returned by the chain reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub number: u64,
    pub hash: [u8; 32],
}

/// Execution outcome recorded in a transaction receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Succeeded,
    Reverted,
}

/// Post-inclusion transaction receipt with its decoded log entries.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub status: TxStatus,
    pub block_number: u64,
    pub events: Vec<RegistryEvent>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == TxStatus::Succeeded
    }
}

/// Structured decode of a registry log entry. Entries the core does not
/// understand decode as `Other` and are skipped during scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// Emitted by the attestation registry once a quote/registration pair is
    /// verified; carries the issued TCB id.
    Attested { tcb_id: TcbId },
    Other,
}

/// Read access to chain blocks, for head and head-1 lookups and for the
/// confirmation poll.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn block(&self, tag: BlockTag) -> Result<BlockHeader, ChainError>;
}

/// Write access to the attestation registry.
///
/// Implementations wait for transaction inclusion; the receipt they return is
/// post-inclusion, with log entries already decoded.
#[async_trait]
pub trait AttestationRegistry: Send + Sync {
    async fn submit_attestation(
        &self,
        quote: &Quote,
        registration: &Registration,
        envelope: &CallEnvelope,
    ) -> Result<TxReceipt, ChainError>;
}

/// Access to the lockbox key registry. An all-zero value from `key` is the
/// registry's "absent" sentinel.
#[async_trait]
pub trait LockboxRegistry: Send + Sync {
    async fn key(&self, tcb: &TcbId) -> Result<[u8; 32], ChainError>;

    async fn create_key(
        &self,
        tcb: &TcbId,
        randomness: [u8; 32],
        envelope: &CallEnvelope,
    ) -> Result<TxReceipt, ChainError>;
}
