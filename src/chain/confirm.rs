//! Confirmation wait: block until the chain has moved past a given block.

use std::time::Duration;

use crate::clock::Clock;
use crate::error::ChainError;

use super::{BlockTag, ChainReader};

/// Poll cadence for the confirmation wait. The interval is constant; there is
/// no backoff.
#[derive(Debug, Clone)]
pub struct ConfirmPolicy {
    pub poll_interval: Duration,
    /// Maximum number of sleep cycles before giving up. `None` waits for
    /// chain progress indefinitely.
    pub max_polls: Option<u32>,
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            max_polls: None,
        }
    }
}

/// Outcome of one head poll against the reference block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wait {
    Waiting,
    Confirmed,
}

fn classify(head: u64, reference: u64) -> Wait {
    if head == reference {
        Wait::Waiting
    } else {
        Wait::Confirmed
    }
}

/// Block until the chain head's number differs from `block_number`, i.e. at
/// least one further block has been observed since the one of interest.
///
/// One-confirmation finality: a transaction is treated as settled once its
/// containing block is no longer the head.
pub async fn await_confirmation(
    reader: &dyn ChainReader,
    block_number: u64,
    policy: &ConfirmPolicy,
    clock: &dyn Clock,
) -> Result<(), ChainError> {
    let mut polls = 0u32;
    loop {
        let head = reader.block(BlockTag::Latest).await?;
        match classify(head.number, block_number) {
            Wait::Confirmed => {
                tracing::debug!(reference = block_number, head = head.number, "block confirmed");
                return Ok(());
            }
            Wait::Waiting => {
                if let Some(max) = policy.max_polls {
                    if polls >= max {
                        return Err(ChainError::ConfirmationTimeout {
                            block: block_number,
                            polls,
                        });
                    }
                }
                tracing::trace!(reference = block_number, polls, "head unchanged, waiting");
                clock.sleep(policy.poll_interval).await;
                polls += 1;
            }
        }
    }
}
