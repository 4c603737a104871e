/// Errors from the hex transport codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid field length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors from the chain boundary: reads, transaction submission, and the
/// confirmation wait.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("chain rpc failure: {0}")]
    Rpc(String),

    #[error("head block {head} has no parent to anchor a registration")]
    NoParentBlock { head: u64 },

    #[error("transaction reverted in block {block}")]
    TransactionReverted { block: u64 },

    #[error("block {block} unconfirmed after {polls} polls")]
    ConfirmationTimeout { block: u64, polls: u32 },
}

/// Errors from the attestation handshake.
#[derive(Debug, thiserror::Error)]
pub enum AttestError {
    #[error("could not retrieve attestation id: no Attested event in receipt")]
    MissingAttestedEvent,
}

/// Errors from the lockbox key registry.
#[derive(Debug, thiserror::Error)]
pub enum LockboxError {
    #[error("lockbox key still absent after creation")]
    AbsentAfterCreate,
}

/// Errors from cipher selection and the AEAD envelope.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("unknown key id: {0}")]
    UnknownKeyId(u8),

    #[error("AEAD encryption failed")]
    SealFailed,

    #[error("AEAD decryption failed: envelope is invalid or tampered")]
    OpenFailed,
}

/// Errors from artifact-metadata seed handling.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("sealed seed is not a decimal integer")]
    MalformedSeed,

    #[error("artifact metadata: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Attestation(#[from] AttestError),

    #[error(transparent)]
    Lockbox(#[from] LockboxError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
