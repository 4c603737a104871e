use super::Address;

/// Submission envelope stamped onto every outbound write call: the funding
/// identity and the gas ceiling for this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallEnvelope {
    pub from: Address,
    pub gas_limit: u64,
}

/// Capability that wraps outbound write calls with the envelope the target
/// chain runtime requires. Composed into the protocol clients explicitly so
/// runtime-specific layers (e.g. calldata encryption on confidential chains)
/// slot in behind one seam.
pub trait EnvelopeSigner: Send + Sync {
    /// Address transactions are sent from.
    fn address(&self) -> Address;

    /// Stamp an envelope for a write call with the given gas ceiling.
    fn envelope(&self, gas_limit: u64) -> CallEnvelope;
}

/// The gas wallet: funds and signs every write transaction. The registrant
/// identity bound into registrations is a separate wallet that never signs.
pub struct GasWallet {
    address: Address,
}

impl GasWallet {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl EnvelopeSigner for GasWallet {
    fn address(&self) -> Address {
        self.address
    }

    fn envelope(&self, gas_limit: u64) -> CallEnvelope {
        CallEnvelope {
            from: self.address,
            gas_limit,
        }
    }
}
