//! Pattern matching implementation.

use std::fmt;

use crate::crypto::{Network, ADDRESS_CHARS};

/// Characters that can appear in a base58 address.
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Distinct symbols left once base58 is folded to lower case.
const FOLDED_ALPHABET_SIZE: u64 = 35;

/// Where in the address the pattern must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Match at the beginning of the address
    Prefix,
    /// Match at the end of the address
    Suffix,
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorKind::Prefix => write!(f, "prefix"),
            AnchorKind::Suffix => write!(f, "suffix"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is {len} characters, an address only has {max}")]
    TooLong { len: usize, max: usize },

    #[error("'{0}' never appears in a base58 address")]
    InvalidCharacter(char),

    #[error("every {network} address starts with {lead}")]
    UnreachablePrefix { network: Network, lead: String },
}

/// A normalized pattern bound to one anchor kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// The pattern string (lower-cased unless exact)
    pattern: String,
    anchor: AnchorKind,
    /// Whether matching is case sensitive
    exact: bool,
}

impl Pattern {
    /// Creates a new pattern. Without `exact` the pattern is lower-cased here,
    /// once, so matching only has to fold the candidate address.
    pub fn new(pattern: impl Into<String>, anchor: AnchorKind, exact: bool) -> Self {
        let pattern = pattern.into();
        let pattern = if exact {
            pattern
        } else {
            pattern.to_lowercase()
        };

        Self {
            pattern,
            anchor,
            exact,
        }
    }

    /// Returns the normalized pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn anchor(&self) -> AnchorKind {
        self.anchor
    }

    /// An empty pattern disables its anchor kind rather than matching
    /// everything.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Checks that the pattern can occur in some address on `network`:
    /// base58 characters only, no longer than an address, and for a prefix,
    /// consistent with the characters every address on the network starts
    /// with.
    pub fn validate(&self, network: Network) -> Result<(), PatternError> {
        let len = self.pattern.chars().count();
        if len > ADDRESS_CHARS {
            return Err(PatternError::TooLong {
                len,
                max: ADDRESS_CHARS,
            });
        }

        let folded = BASE58_ALPHABET.to_lowercase();
        let alphabet = if self.exact {
            BASE58_ALPHABET
        } else {
            folded.as_str()
        };

        if let Some(c) = self.pattern.chars().find(|c| !alphabet.contains(*c)) {
            return Err(PatternError::InvalidCharacter(c));
        }

        if self.anchor == AnchorKind::Prefix {
            let lead = network.address_lead();
            let expected = if self.exact {
                lead.clone()
            } else {
                lead.to_lowercase()
            };
            if !self.pattern.chars().zip(expected.chars()).all(|(a, b)| a == b) {
                return Err(PatternError::UnreachablePrefix { network, lead });
            }
        }

        Ok(())
    }

    /// Matches an address against this pattern.
    #[inline]
    pub fn matches(&self, address: &str) -> bool {
        if self.exact {
            self.is_anchored_in(address)
        } else {
            self.is_anchored_in(&address.to_lowercase())
        }
    }

    #[inline]
    fn is_anchored_in(&self, address: &str) -> bool {
        match self.anchor {
            AnchorKind::Prefix => address.starts_with(&self.pattern),
            AnchorKind::Suffix => address.ends_with(&self.pattern),
        }
    }

    /// Returns the estimated number of candidates needed to find a match.
    ///
    /// Each position is one of 58 symbols, or one of 35 once case is
    /// ignored. Fixed leading characters (`3P` on mainnet) make some prefixes
    /// easier or impossible; this estimate ignores that.
    pub fn estimated_difficulty(&self) -> u64 {
        let base = if self.exact {
            BASE58_ALPHABET.len() as u64
        } else {
            FOLDED_ALPHABET_SIZE
        };
        base.saturating_pow(self.pattern.chars().count() as u32)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        match self.estimated_difficulty() {
            0..=10_000 => "Very Easy (< 1 second)".into(),
            10_001..=1_000_000 => "Easy (seconds)".into(),
            1_000_001..=100_000_000 => "Medium (minutes)".into(),
            100_000_001..=10_000_000_000 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}
