use std::time::Duration;

use crate::chain::confirm::ConfirmPolicy;
use crate::error::Error;

/// Default gas ceiling for attestation transactions.
pub const DEFAULT_ATTEST_GAS_LIMIT: u64 = 1_000_000;

/// Default gas ceiling for lockbox key creation.
pub const DEFAULT_CREATE_KEY_GAS_LIMIT: u64 = 500_000;

/// Configuration for the attestation and lockbox protocol clients.
#[derive(Debug, Clone)]
pub struct LockboxConfig {
    /// Gas ceiling for the attest write call.
    pub attest_gas_limit: u64,

    /// Gas ceiling for the create-key write call.
    pub create_key_gas_limit: u64,

    /// Poll cadence for confirmation waits.
    pub confirm: ConfirmPolicy,
}

impl Default for LockboxConfig {
    fn default() -> Self {
        Self {
            attest_gas_limit: DEFAULT_ATTEST_GAS_LIMIT,
            create_key_gas_limit: DEFAULT_CREATE_KEY_GAS_LIMIT,
            confirm: ConfirmPolicy::default(),
        }
    }
}

impl LockboxConfig {
    /// Create a builder for constructing a `LockboxConfig`.
    pub fn builder() -> LockboxConfigBuilder {
        LockboxConfigBuilder::default()
    }
}

/// Builder for [`LockboxConfig`].
#[derive(Debug, Clone)]
pub struct LockboxConfigBuilder {
    attest_gas_limit: u64,
    create_key_gas_limit: u64,
    poll_interval: Duration,
    max_polls: Option<u32>,
}

impl Default for LockboxConfigBuilder {
    fn default() -> Self {
        let defaults = LockboxConfig::default();
        Self {
            attest_gas_limit: defaults.attest_gas_limit,
            create_key_gas_limit: defaults.create_key_gas_limit,
            poll_interval: defaults.confirm.poll_interval,
            max_polls: defaults.confirm.max_polls,
        }
    }
}

impl LockboxConfigBuilder {
    pub fn attest_gas_limit(mut self, limit: u64) -> Self {
        self.attest_gas_limit = limit;
        self
    }

    pub fn create_key_gas_limit(mut self, limit: u64) -> Self {
        self.create_key_gas_limit = limit;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn max_polls(mut self, max: u32) -> Self {
        self.max_polls = Some(max);
        self
    }

    /// Build the `LockboxConfig`, validating that all values are sensible.
    pub fn build(self) -> Result<LockboxConfig, Error> {
        if self.attest_gas_limit == 0 || self.create_key_gas_limit == 0 {
            return Err(Error::InvalidConfig("gas limits must be > 0".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig("poll_interval must be > 0".into()));
        }
        Ok(LockboxConfig {
            attest_gas_limit: self.attest_gas_limit,
            create_key_gas_limit: self.create_key_gas_limit,
            confirm: ConfirmPolicy {
                poll_interval: self.poll_interval,
                max_polls: self.max_polls,
            },
        })
    }
}
