//! # waves_vanity
//!
//! Multi-threaded Waves vanity address seed generator.
//!
//! ## Architecture
//!
//! - `crypto`: Seed generation and address derivation
//! - `matcher`: Prefix and suffix patterns
//! - `worker`: Stop signal, search loop and worker pool
//! - `orchestrator`: One independent search per anchor kind
//! - `sink`: Writing discovered seeds to disk
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod error;
pub mod matcher;
pub mod orchestrator;
pub mod sink;
pub mod worker;

pub use config::{Config, SearchConfig};
pub use crypto::{Candidate, KeyDeriver, Network, Seed, WavesDeriver};
pub use error::SearchError;
pub use matcher::{AnchorKind, Pattern};
pub use orchestrator::Orchestrator;
pub use sink::{FileSink, ResultSink};
pub use worker::{MatchResult, SearchOutcome, SearchReport, StopSignal, WorkerPool};
