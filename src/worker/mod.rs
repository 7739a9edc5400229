//! Worker pool for parallel vanity seed search.
//!
//! This module provides:
//! - [`StopSignal`], the broadcast stop flag with a single-winner claim
//! - [`SearchWorker`], the per-thread derive/match/claim/persist loop
//! - [`WorkerPool`], the threads of one search instance and their outcome

mod pool;
mod search;
mod signal;

pub use pool::{SearchOutcome, SearchReport, WorkerPool, WorkerReport};
pub use search::{MatchResult, SearchWorker, WorkerExit, WorkerStats};
pub use signal::StopSignal;
