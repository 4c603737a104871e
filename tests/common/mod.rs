//! Shared in-memory chain and clock for the integration suites.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use lockbox_seal::attestation::{Quote, Registration, TcbId};
use lockbox_seal::chain::signer::{CallEnvelope, GasWallet};
use lockbox_seal::chain::{
    Address, AttestationRegistry, BlockHeader, BlockTag, ChainReader, LockboxRegistry,
    RegistryEvent, TxReceipt, TxStatus,
};
use lockbox_seal::clock::Clock;
use lockbox_seal::error::ChainError;
use lockbox_seal::{AttestedDeriver, CipherService, LockboxConfig};

/// In-memory chain plus both registries. Write calls include their
/// transaction in a fresh block that becomes the head, so confirmation waits
/// genuinely block until [`TestClock::sleep`] mines the next block.
pub struct MockChain {
    state: Mutex<State>,
    pub head_reads: AtomicU32,
    pub attest_calls: AtomicU32,
    pub key_reads: AtomicU32,
    pub create_calls: AtomicU32,
}

struct State {
    head: u64,
    keys: HashMap<TcbId, [u8; 32]>,
    next_tcb: u64,
    fail_attest: bool,
    omit_event: bool,
}

fn block_hash(number: u64) -> [u8; 32] {
    Sha256::digest(number.to_be_bytes()).into()
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                head: 100,
                keys: HashMap::new(),
                next_tcb: 0,
                fail_attest: false,
                omit_event: false,
            }),
            head_reads: AtomicU32::new(0),
            attest_calls: AtomicU32::new(0),
            key_reads: AtomicU32::new(0),
            create_calls: AtomicU32::new(0),
        })
    }

    pub fn mine(&self) {
        self.state.lock().unwrap().head += 1;
    }

    pub fn set_fail_attest(&self, fail: bool) {
        self.state.lock().unwrap().fail_attest = fail;
    }

    pub fn set_omit_event(&self, omit: bool) {
        self.state.lock().unwrap().omit_event = omit;
    }

    pub fn network_calls(&self) -> u32 {
        self.head_reads.load(Ordering::SeqCst)
            + self.attest_calls.load(Ordering::SeqCst)
            + self.key_reads.load(Ordering::SeqCst)
            + self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn block(&self, tag: BlockTag) -> Result<BlockHeader, ChainError> {
        let state = self.state.lock().unwrap();
        let number = match tag {
            BlockTag::Latest => {
                self.head_reads.fetch_add(1, Ordering::SeqCst);
                state.head
            }
            BlockTag::Number(n) if n <= state.head => n,
            BlockTag::Number(n) => {
                return Err(ChainError::Rpc(format!("no block {n}")));
            }
        };
        Ok(BlockHeader {
            number,
            hash: block_hash(number),
        })
    }
}

#[async_trait]
impl AttestationRegistry for MockChain {
    async fn submit_attestation(
        &self,
        quote: &Quote,
        registration: &Registration,
        _envelope: &CallEnvelope,
    ) -> Result<TxReceipt, ChainError> {
        self.attest_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();

        if registration.base_block_number + 1 != state.head {
            return Err(ChainError::Rpc("registration not anchored at head - 1".into()));
        }
        if quote.as_bytes()[32..] != registration.digest()[..] {
            return Err(ChainError::Rpc("quote does not bind registration".into()));
        }

        state.head += 1;
        if state.fail_attest {
            return Ok(TxReceipt {
                status: TxStatus::Reverted,
                block_number: state.head,
                events: Vec::new(),
            });
        }

        state.next_tcb += 1;
        let mut id = [0u8; 32];
        id[..8].copy_from_slice(&state.next_tcb.to_be_bytes());
        let events = if state.omit_event {
            vec![RegistryEvent::Other]
        } else {
            vec![
                RegistryEvent::Other,
                RegistryEvent::Attested {
                    tcb_id: TcbId(id),
                },
            ]
        };
        Ok(TxReceipt {
            status: TxStatus::Succeeded,
            block_number: state.head,
            events,
        })
    }
}

#[async_trait]
impl LockboxRegistry for MockChain {
    async fn key(&self, tcb: &TcbId) -> Result<[u8; 32], ChainError> {
        self.key_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        Ok(state.keys.get(tcb).copied().unwrap_or([0u8; 32]))
    }

    async fn create_key(
        &self,
        tcb: &TcbId,
        randomness: [u8; 32],
        _envelope: &CallEnvelope,
    ) -> Result<TxReceipt, ChainError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        state.head += 1;

        // First write wins; repeat creations are no-ops.
        if !state.keys.contains_key(tcb) {
            let mut hasher = Sha256::new();
            hasher.update(tcb.0);
            hasher.update(randomness);
            state.keys.insert(*tcb, hasher.finalize().into());
        }
        Ok(TxReceipt {
            status: TxStatus::Succeeded,
            block_number: state.head,
            events: Vec::new(),
        })
    }
}

/// Mines one block per sleep, so every confirmation wait costs exactly one
/// sleep cycle.
pub struct TestClock {
    chain: Arc<MockChain>,
    pub sleeps: AtomicU32,
}

impl TestClock {
    pub fn new(chain: Arc<MockChain>) -> Arc<Self> {
        Arc::new(Self {
            chain,
            sleeps: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl Clock for TestClock {
    fn unix_now(&self) -> u64 {
        1_700_000_000
    }

    async fn sleep(&self, _duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.chain.mine();
    }
}

pub const GAS_WALLET: Address = Address::new([0xAA; 20]);
pub const REGISTRANT: Address = Address::new([0xBB; 20]);

/// Wire a `CipherService` over the mock chain.
pub fn build_service(chain: &Arc<MockChain>) -> (CipherService, Arc<TestClock>) {
    let clock = TestClock::new(chain.clone());
    let deriver = AttestedDeriver::from_parts(
        chain.clone(),
        chain.clone(),
        chain.clone(),
        Arc::new(GasWallet::new(GAS_WALLET)),
        REGISTRANT,
        clock.clone(),
        LockboxConfig::default(),
    );
    (CipherService::new(Arc::new(deriver)), clock)
}
