//! Seed generation and Waves address derivation.
//!
//! This module provides:
//! - Random seed phrases from OS entropy
//! - Waves keypair and address derivation
//! - The [`KeyDeriver`] seam the search workers are written against

mod address;
mod hash;
mod keypair;
mod seed;

pub use address::{Address, Network, ADDRESS_BYTES, ADDRESS_CHARS};
pub use hash::{blake2b256, keccak256, secure_hash, sha256};
pub use keypair::Keypair;
pub use seed::{Seed, SEED_ENTROPY_BYTES};

/// Errors raised while producing a seed or deriving its address.
#[derive(Debug, thiserror::Error)]
pub enum DeriveError {
    #[error("entropy source failed: {0}")]
    Entropy(String),

    #[error("could not encode seed phrase: {0}")]
    Phrase(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// A seed and the address derived from it. Owned by a single worker.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub seed: Seed,
    pub address: String,
}

/// Source of random seeds and the seed to address mapping.
///
/// `random_seed` must be cryptographically strong. `address_from_seed` must
/// be deterministic: the same seed and network always give the same address.
pub trait KeyDeriver: Send + Sync {
    fn random_seed(&self) -> Result<Seed, DeriveError>;

    fn address_from_seed(&self, seed: &Seed, network: Network) -> Result<String, DeriveError>;

    /// Draws a new seed and derives its address.
    fn candidate(&self, network: Network) -> Result<Candidate, DeriveError> {
        let seed = self.random_seed()?;
        let address = self.address_from_seed(&seed, network)?;
        Ok(Candidate { seed, address })
    }
}

/// [`KeyDeriver`] for Waves accounts: 15-word phrases, Curve25519 keys,
/// base58 addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavesDeriver;

impl WavesDeriver {
    pub fn new() -> Self {
        Self
    }
}

impl KeyDeriver for WavesDeriver {
    fn random_seed(&self) -> Result<Seed, DeriveError> {
        Seed::generate()
    }

    #[inline]
    fn address_from_seed(&self, seed: &Seed, network: Network) -> Result<String, DeriveError> {
        Ok(Keypair::from_seed(seed).address(network).to_base58())
    }
}
