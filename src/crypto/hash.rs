//! Hash functions used by Waves key and address derivation.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use sha2::Sha256;
use tiny_keccak::{Hasher, Keccak};

type Blake2b256 = Blake2b<U32>;

/// BLAKE2b with a 256-bit digest.
pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak-256 (the original Keccak padding, not SHA3-256).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);

    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);
    hash
}

/// SHA-256
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// The Waves "secure hash": Keccak-256 over BLAKE2b-256.
#[inline]
pub fn secure_hash(data: &[u8]) -> [u8; 32] {
    keccak256(&blake2b256(data))
}
