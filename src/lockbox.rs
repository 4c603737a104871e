//! Lockbox key resolution: read the key bound to a TCB id, creating it first
//! when the registry reports it absent.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::attestation::TcbId;
use crate::chain::confirm::{await_confirmation, ConfirmPolicy};
use crate::chain::signer::EnvelopeSigner;
use crate::chain::{ChainReader, LockboxRegistry};
use crate::clock::Clock;
use crate::error::{ChainError, Error, LockboxError};
use crate::seal::Key;

/// The registry's "absent" sentinel.
const ABSENT: [u8; 32] = [0u8; 32];

pub struct LockboxResolver {
    chain: Arc<dyn ChainReader>,
    registry: Arc<dyn LockboxRegistry>,
    signer: Arc<dyn EnvelopeSigner>,
    clock: Arc<dyn Clock>,
    confirm: ConfirmPolicy,
    gas_limit: u64,
}

impl LockboxResolver {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        registry: Arc<dyn LockboxRegistry>,
        signer: Arc<dyn EnvelopeSigner>,
        clock: Arc<dyn Clock>,
        confirm: ConfirmPolicy,
        gas_limit: u64,
    ) -> Self {
        Self {
            chain,
            registry,
            signer,
            clock,
            confirm,
            gas_limit,
        }
    }

    /// Read the key bound to `tcb`, submitting a create transaction first if
    /// the registry reports it absent.
    ///
    /// Creation is not atomic across processes: two resolvers may both
    /// observe the absent sentinel and both submit. The registry makes
    /// creation idempotent (first write wins), so the final read reflects
    /// the converged key either way.
    pub async fn get_or_create_key(&self, tcb: &TcbId) -> Result<Key, Error> {
        let existing = self.registry.key(tcb).await?;
        if existing != ABSENT {
            tracing::debug!(tcb_id = %tcb, "lockbox key already present");
            return Ok(Key::from(existing));
        }

        let mut randomness = [0u8; 32];
        OsRng.fill_bytes(&mut randomness);

        tracing::info!(tcb_id = %tcb, "creating lockbox key");
        let receipt = self
            .registry
            .create_key(tcb, randomness, &self.signer.envelope(self.gas_limit))
            .await?;
        if !receipt.succeeded() {
            return Err(ChainError::TransactionReverted {
                block: receipt.block_number,
            }
            .into());
        }
        await_confirmation(
            self.chain.as_ref(),
            receipt.block_number,
            &self.confirm,
            self.clock.as_ref(),
        )
        .await?;

        let created = self.registry.key(tcb).await?;
        if created == ABSENT {
            return Err(LockboxError::AbsentAfterCreate.into());
        }
        Ok(Key::from(created))
    }
}
