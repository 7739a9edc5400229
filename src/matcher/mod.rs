//! Pattern matching for Waves addresses.
//!
//! Supports two anchors, each searched independently:
//! - Prefix: Match at the start of the address
//! - Suffix: Match at the end of the address

mod pattern;

pub use pattern::{AnchorKind, Pattern, PatternError, BASE58_ALPHABET};
