//! Secret seed phrases.

use std::fmt;

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;

use super::DeriveError;

/// Entropy behind a generated phrase: 160 bits, which encodes to 15 words.
pub const SEED_ENTROPY_BYTES: usize = 20;

/// A secret seed phrase.
///
/// `Debug` never prints the phrase. Use [`Seed::phrase`] when the secret
/// really has to leave the process (writing the result file, or reporting a
/// result that could not be written).
#[derive(Clone, PartialEq, Eq)]
pub struct Seed(String);

impl Seed {
    /// Generates a fresh 15-word English phrase from OS entropy.
    pub fn generate() -> Result<Self, DeriveError> {
        let mut entropy = [0u8; SEED_ENTROPY_BYTES];
        OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|e| DeriveError::Entropy(e.to_string()))?;
        Self::from_entropy(&entropy)
    }

    /// Encodes raw entropy as an English BIP-39 phrase.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self, DeriveError> {
        let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)
            .map_err(|e| DeriveError::Phrase(e.to_string()))?;
        Ok(Self(mnemonic.to_string()))
    }

    /// Wraps an existing phrase. Waves accepts any string as a seed.
    pub fn from_phrase(phrase: impl Into<String>) -> Self {
        Self(phrase.into())
    }

    /// Returns the secret phrase.
    pub fn phrase(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}
