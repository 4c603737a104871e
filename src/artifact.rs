//! Seed handling for artifact metadata files.
//!
//! Generated artifacts embed their seed in metadata JSON. Legacy artifacts
//! carry the integer in the clear; current ones carry a sealed envelope.
//! Produced metadata always carries the sealed form.

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, Error};
use crate::seal::{CipherService, SealedBox};

/// The `seed` field of artifact metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedField {
    Plain(u64),
    Sealed(SealedBox),
}

impl SeedField {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json).map_err(ArtifactError::Json)?)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self).map_err(ArtifactError::Json)?)
    }
}

impl CipherService {
    /// Seal a seed for embedding in produced artifact metadata.
    ///
    /// The plaintext is the seed's decimal string form, so artifacts remain
    /// readable by tooling in other languages.
    pub async fn seal_seed(&self, seed: u64) -> Result<SeedField, Error> {
        let sealed = self.encrypt(seed.to_string().as_bytes()).await?;
        Ok(SeedField::Sealed(sealed))
    }

    /// Recover the seed from consumed artifact metadata, decrypting when the
    /// field carries a sealed envelope.
    pub async fn open_seed(&self, field: &SeedField) -> Result<u64, Error> {
        match field {
            SeedField::Plain(seed) => Ok(*seed),
            SeedField::Sealed(sealed) => {
                let plaintext = self.decrypt(sealed).await?;
                let text =
                    String::from_utf8(plaintext).map_err(|_| ArtifactError::MalformedSeed)?;
                let seed = text.parse().map_err(|_| ArtifactError::MalformedSeed)?;
                Ok(seed)
            }
        }
    }
}
