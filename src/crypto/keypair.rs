//! Waves keypair derivation.

use std::fmt;

use curve25519_dalek::montgomery::MontgomeryPoint;

use super::hash::{secure_hash, sha256};
use super::{Address, Network, Seed};

/// A Curve25519 keypair derived from a seed phrase.
#[derive(Clone)]
pub struct Keypair {
    /// Clamped private scalar (32 bytes)
    private_key: [u8; 32],
    /// Montgomery-form public key (32 bytes)
    public_key: [u8; 32],
}

impl Keypair {
    /// Derives the keypair for the first account (nonce 0) of a seed.
    pub fn from_seed(seed: &Seed) -> Self {
        Self::from_seed_with_nonce(seed, 0)
    }

    /// Derives the keypair for an account nonce of a seed.
    ///
    /// Process:
    /// 1. account seed = secure_hash(nonce as big-endian u32 || phrase bytes)
    /// 2. private key = sha256(account seed), clamped for Curve25519
    /// 3. public key = private key * basepoint (X25519)
    pub fn from_seed_with_nonce(seed: &Seed, nonce: u32) -> Self {
        let mut input = Vec::with_capacity(4 + seed.as_bytes().len());
        input.extend_from_slice(&nonce.to_be_bytes());
        input.extend_from_slice(seed.as_bytes());

        let account_seed = secure_hash(&input);
        Self::from_private_key(sha256(&account_seed))
    }

    /// Builds a keypair from raw private key bytes, clamping them first.
    pub fn from_private_key(mut private_key: [u8; 32]) -> Self {
        private_key[0] &= 248;
        private_key[31] &= 127;
        private_key[31] |= 64;

        let public_key = MontgomeryPoint::mul_base_clamped(private_key).to_bytes();

        Self {
            private_key,
            public_key,
        }
    }

    /// Returns the clamped private key bytes.
    pub fn private_key_bytes(&self) -> &[u8; 32] {
        &self.private_key
    }

    #[inline]
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Returns the address of this keypair on the given network.
    #[inline]
    pub fn address(&self, network: Network) -> Address {
        Address::from_public_key(&self.public_key, network)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &bs58::encode(self.public_key).into_string())
            .finish_non_exhaustive()
    }
}
