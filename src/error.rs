//! Errors that end a search instance.

use std::io;

use crate::crypto::DeriveError;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The seed source or address derivation failed. Fatal to the instance.
    #[error("key derivation failed: {0}")]
    Derivation(#[from] DeriveError),

    /// A match was claimed but could not be written. The seed is carried
    /// here so it can still be shown to the operator.
    #[error("could not save seed for {address}: {source} (seed: {seed})")]
    Persist {
        address: String,
        seed: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),
}
