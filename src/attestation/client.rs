use std::sync::Arc;

use crate::chain::confirm::{await_confirmation, ConfirmPolicy};
use crate::chain::signer::EnvelopeSigner;
use crate::chain::{Address, AttestationRegistry, BlockTag, ChainReader, RegistryEvent};
use crate::clock::Clock;
use crate::error::{AttestError, ChainError, Error};

use super::{Quote, Registration, TcbId};

/// Drives one attestation cycle against the on-chain registry.
pub struct Attestor {
    chain: Arc<dyn ChainReader>,
    registry: Arc<dyn AttestationRegistry>,
    signer: Arc<dyn EnvelopeSigner>,
    registrant: Address,
    clock: Arc<dyn Clock>,
    confirm: ConfirmPolicy,
    gas_limit: u64,
}

impl Attestor {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        registry: Arc<dyn AttestationRegistry>,
        signer: Arc<dyn EnvelopeSigner>,
        registrant: Address,
        clock: Arc<dyn Clock>,
        confirm: ConfirmPolicy,
        gas_limit: u64,
    ) -> Self {
        Self {
            chain,
            registry,
            signer,
            registrant,
            clock,
            confirm,
            gas_limit,
        }
    }

    /// Run a full attestation cycle and return the verifier-issued TCB id.
    ///
    /// The registration anchors at head − 1, the quote binds the fixed
    /// measurement to the registration digest, and the resulting `Attested`
    /// event carries the id. The confirmation wait runs after the event is
    /// extracted and before returning: callers must never act on a TCB id
    /// whose attesting block could still be displaced.
    pub async fn attest(&self) -> Result<TcbId, Error> {
        let head = self.chain.block(BlockTag::Latest).await?;
        let base_number = head
            .number
            .checked_sub(1)
            .ok_or(ChainError::NoParentBlock { head: head.number })?;
        let base = self.chain.block(BlockTag::Number(base_number)).await?;

        let registration = Registration::new(&base, self.registrant, self.clock.unix_now());
        let quote = Quote::for_registration(&registration);

        tracing::debug!(
            base_block = base.number,
            registrant = %self.registrant,
            "submitting attestation"
        );
        let receipt = self
            .registry
            .submit_attestation(&quote, &registration, &self.signer.envelope(self.gas_limit))
            .await?;
        if !receipt.succeeded() {
            return Err(ChainError::TransactionReverted {
                block: receipt.block_number,
            }
            .into());
        }

        let tcb_id = receipt
            .events
            .iter()
            .find_map(|event| match event {
                RegistryEvent::Attested { tcb_id } => Some(*tcb_id),
                RegistryEvent::Other => None,
            })
            .ok_or(AttestError::MissingAttestedEvent)?;

        await_confirmation(
            self.chain.as_ref(),
            receipt.block_number,
            &self.confirm,
            self.clock.as_ref(),
        )
        .await?;

        tracing::info!(%tcb_id, block = receipt.block_number, "attestation confirmed");
        Ok(tcb_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::signer::{CallEnvelope, GasWallet};
    use crate::chain::{BlockHeader, TxReceipt, TxStatus};

    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    struct FixedChain {
        head: u64,
    }

    #[async_trait]
    impl ChainReader for FixedChain {
        async fn block(&self, tag: BlockTag) -> Result<BlockHeader, ChainError> {
            let number = match tag {
                BlockTag::Latest => self.head,
                BlockTag::Number(n) => n,
            };
            let mut hash = [0u8; 32];
            hash[..8].copy_from_slice(&number.to_be_bytes());
            Ok(BlockHeader { number, hash })
        }
    }

    /// Captures the submitted registration; head moves past the attesting
    /// block immediately so no confirmation sleep is needed.
    struct CapturingRegistry {
        seen: Mutex<Option<(Vec<u8>, Registration, CallEnvelope)>>,
        head: u64,
    }

    #[async_trait]
    impl AttestationRegistry for CapturingRegistry {
        async fn submit_attestation(
            &self,
            quote: &Quote,
            registration: &Registration,
            envelope: &CallEnvelope,
        ) -> Result<TxReceipt, ChainError> {
            *self.seen.lock().unwrap() =
                Some((quote.as_bytes().to_vec(), registration.clone(), *envelope));
            Ok(TxReceipt {
                status: TxStatus::Succeeded,
                block_number: self.head - 1,
                events: vec![RegistryEvent::Attested {
                    tcb_id: TcbId([0x77; 32]),
                }],
            })
        }
    }

    struct StoppedClock;

    #[async_trait]
    impl Clock for StoppedClock {
        fn unix_now(&self) -> u64 {
            5_000
        }

        async fn sleep(&self, _duration: Duration) {}
    }

    fn attestor(chain: Arc<FixedChain>, registry: Arc<CapturingRegistry>) -> Attestor {
        Attestor::new(
            chain,
            registry,
            Arc::new(GasWallet::new(Address::new([9u8; 20]))),
            Address::new([1u8; 20]),
            Arc::new(StoppedClock),
            ConfirmPolicy::default(),
            750_000,
        )
    }

    #[tokio::test]
    async fn anchors_at_parent_of_head_and_stamps_envelope() {
        let chain = Arc::new(FixedChain { head: 50 });
        let registry = Arc::new(CapturingRegistry {
            seen: Mutex::new(None),
            head: 50,
        });

        let tcb_id = attestor(chain, registry.clone()).attest().await.unwrap();
        assert_eq!(tcb_id, TcbId([0x77; 32]));

        let (quote, registration, envelope) = registry.seen.lock().unwrap().take().unwrap();
        assert_eq!(registration.base_block_number, 49);
        assert_eq!(registration.expiry, 5_000 + super::super::TOKEN_VALIDITY_SECS);
        assert_eq!(&quote[32..], &registration.digest());
        assert_eq!(envelope.from, Address::new([9u8; 20]));
        assert_eq!(envelope.gas_limit, 750_000);
    }

    #[tokio::test]
    async fn genesis_head_has_no_anchor() {
        let chain = Arc::new(FixedChain { head: 0 });
        let registry = Arc::new(CapturingRegistry {
            seen: Mutex::new(None),
            head: 0,
        });

        let result = attestor(chain, registry).attest().await;
        assert!(matches!(
            result,
            Err(Error::Chain(ChainError::NoParentBlock { head: 0 }))
        ));
    }
}
