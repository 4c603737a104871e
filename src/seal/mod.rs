pub mod envelope;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::attestation::client::Attestor;
use crate::cache::MemoCache;
use crate::chain::signer::EnvelopeSigner;
use crate::chain::{Address, AttestationRegistry, ChainReader, LockboxRegistry};
use crate::clock::Clock;
use crate::config::LockboxConfig;
use crate::error::{CryptoError, Error};
use crate::lockbox::LockboxResolver;

pub use envelope::{SealedBox, NONCE_LEN, TAG_LEN};

/// Key id of the fixed well-known test key. Never touches the network.
pub const TEST_KEY_ID: u8 = 0;

/// Key id of the current production key, derived through attestation.
pub const LATEST_KEY_ID: u8 = 1;

/// The well-known key behind `TEST_KEY_ID`, for non-production artifacts.
const TEST_KEY: [u8; 32] = [0x2A; 32];

/// Raw symmetric key material, sized to the AEAD. Zeroized on drop; `Debug`
/// never prints the bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Key([u8; 32]);

impl Key {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Key {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Key(..)")
    }
}

/// Produces the key bytes behind `LATEST_KEY_ID`. The production
/// implementation is [`AttestedDeriver`]; tests substitute counting fakes.
#[async_trait]
pub trait KeyDeriver: Send + Sync {
    async fn derive(&self) -> Result<Key, Error>;
}

/// Attestation-backed derivation: one attest cycle, then the lockbox lookup.
pub struct AttestedDeriver {
    attestor: Attestor,
    lockbox: LockboxResolver,
}

impl AttestedDeriver {
    pub fn new(attestor: Attestor, lockbox: LockboxResolver) -> Self {
        Self { attestor, lockbox }
    }

    /// Wire the full production chain from its collaborators and config.
    pub fn from_parts(
        chain: Arc<dyn ChainReader>,
        attestation_registry: Arc<dyn AttestationRegistry>,
        lockbox_registry: Arc<dyn LockboxRegistry>,
        signer: Arc<dyn EnvelopeSigner>,
        registrant: Address,
        clock: Arc<dyn Clock>,
        config: LockboxConfig,
    ) -> Self {
        let confirm = config.confirm;
        let attestor = Attestor::new(
            chain.clone(),
            attestation_registry,
            signer.clone(),
            registrant,
            clock.clone(),
            confirm.clone(),
            config.attest_gas_limit,
        );
        let lockbox = LockboxResolver::new(
            chain,
            lockbox_registry,
            signer,
            clock,
            confirm,
            config.create_key_gas_limit,
        );
        Self { attestor, lockbox }
    }
}

#[async_trait]
impl KeyDeriver for AttestedDeriver {
    async fn derive(&self) -> Result<Key, Error> {
        let tcb_id = self.attestor.attest().await?;
        self.lockbox.get_or_create_key(&tcb_id).await
    }
}

/// Facade over key resolution and the sealed-envelope operations.
///
/// The first `encrypt`/`decrypt` touching `LATEST_KEY_ID` runs the full
/// attestation and lockbox chain (transaction submissions, multi-second
/// confirmation waits); the resolved key is memoized for the life of the
/// process, so every later call is near-instant. A failed derivation is not
/// cached — the next caller retries.
pub struct CipherService {
    deriver: Arc<dyn KeyDeriver>,
    keys: MemoCache<u8, Key>,
}

impl CipherService {
    pub fn new(deriver: Arc<dyn KeyDeriver>) -> Self {
        Self {
            deriver,
            keys: MemoCache::new(),
        }
    }

    async fn key_for(&self, key_id: u8) -> Result<Key, Error> {
        match key_id {
            TEST_KEY_ID => Ok(Key::from(TEST_KEY)),
            LATEST_KEY_ID => {
                self.keys
                    .get_or_try_init(key_id, || async { self.deriver.derive().await })
                    .await
            }
            other => Err(CryptoError::UnknownKeyId(other).into()),
        }
    }

    /// Encrypt `plaintext` under the latest key generation.
    pub async fn encrypt(&self, plaintext: &[u8]) -> Result<SealedBox, Error> {
        self.encrypt_with(LATEST_KEY_ID, plaintext).await
    }

    /// Encrypt under an explicit key generation.
    pub async fn encrypt_with(&self, key_id: u8, plaintext: &[u8]) -> Result<SealedBox, Error> {
        let key = self.key_for(key_id).await?;
        envelope::seal(&key, key_id, plaintext)
    }

    /// Decrypt a sealed envelope with the key generation it names.
    ///
    /// An unknown key id fails before any network activity; a tampered
    /// envelope fails closed with no partial plaintext.
    pub async fn decrypt(&self, sealed: &SealedBox) -> Result<Vec<u8>, Error> {
        let key = self.key_for(sealed.key_id).await?;
        envelope::open(&key, sealed)
    }
}
