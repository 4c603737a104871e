//! Attestation-derived key management and sealed metadata envelopes over an
//! on-chain lockbox registry.
//!
//! The derivation chain: [`CipherService`] resolves a key through the
//! [`cache::MemoCache`] and, on first use, the [`Attestor`] handshake —
//! registration anchored one block behind the head, a quote binding the fixed
//! measurement to the registration digest, the `Attested` event yielding a
//! TCB id — then the [`LockboxResolver`] reads or creates the key bound to
//! that id. Every write settles behind a one-confirmation wait before its
//! result is used. Resolved keys are memoized for the life of the process.

pub mod artifact;
pub mod attestation;
pub mod cache;
pub mod chain;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod lockbox;
pub mod seal;

// Re-export key types at crate root for convenience.
pub use error::{Error, Result};
pub use seal::{
    AttestedDeriver, CipherService, Key, KeyDeriver, SealedBox, LATEST_KEY_ID, TEST_KEY_ID,
};
pub use artifact::SeedField;
pub use attestation::{client::Attestor, Quote, Registration, TcbId};
pub use chain::{Address, AttestationRegistry, ChainReader, LockboxRegistry};
pub use clock::{Clock, SystemClock};
pub use config::LockboxConfig;
pub use lockbox::LockboxResolver;
