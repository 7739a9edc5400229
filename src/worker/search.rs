//! The per-thread search loop.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::SearchConfig;
use crate::crypto::{KeyDeriver, Seed};
use crate::error::SearchError;
use crate::sink::ResultSink;

use super::StopSignal;

/// Candidates tested between flushes to the shared counter.
const STATS_BATCH: u64 = 256;

/// A seed whose address matched, held by the worker that won the claim.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub seed: Seed,
    pub address: String,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

/// How a worker's loop ended without error.
#[derive(Debug)]
pub enum WorkerExit {
    /// This worker claimed the match and persisted it.
    Won { result: MatchResult, path: PathBuf },
    /// This worker matched too, but another worker had already claimed.
    Lost,
    /// The signal was already set when polled.
    Cancelled,
}

/// Statistics shared by the workers of one pool.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total candidates tested
    pub candidates_tested: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total candidates tested.
    pub fn total_candidates(&self) -> u64 {
        self.candidates_tested.load(Ordering::Relaxed)
    }
}

/// A worker that derives candidates and tests them until its search ends.
pub struct SearchWorker {
    id: usize,
    config: Arc<SearchConfig>,
    deriver: Arc<dyn KeyDeriver>,
    sink: Arc<dyn ResultSink>,
    signal: Arc<StopSignal>,
    stats: Arc<WorkerStats>,
}

impl SearchWorker {
    pub fn new(
        id: usize,
        config: Arc<SearchConfig>,
        deriver: Arc<dyn KeyDeriver>,
        sink: Arc<dyn ResultSink>,
        signal: Arc<StopSignal>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            config,
            deriver,
            sink,
            signal,
            stats,
        }
    }

    /// Runs the worker loop.
    ///
    /// Each iteration polls the stop signal, derives one candidate and tests
    /// it. A match is only written after winning [`StopSignal::try_claim`];
    /// a worker that loses the claim drops its match. Derivation and
    /// persistence errors end the loop.
    pub fn run(&self) -> Result<WorkerExit, SearchError> {
        let mut pending = 0u64;
        let exit = self.search(&mut pending);
        self.stats
            .candidates_tested
            .fetch_add(pending, Ordering::Relaxed);
        exit
    }

    fn search(&self, pending: &mut u64) -> Result<WorkerExit, SearchError> {
        let network = self.config.network();

        loop {
            if self.signal.is_cancelled() {
                return Ok(WorkerExit::Cancelled);
            }

            let candidate = self.deriver.candidate(network)?;

            *pending += 1;
            if *pending == STATS_BATCH {
                self.stats
                    .candidates_tested
                    .fetch_add(STATS_BATCH, Ordering::Relaxed);
                *pending = 0;
            }

            if !self.config.matches(&candidate.address) {
                continue;
            }

            if !self.signal.try_claim() {
                debug!(
                    worker = self.id,
                    address = %candidate.address,
                    "match discarded, search already claimed"
                );
                return Ok(WorkerExit::Lost);
            }

            let result = MatchResult {
                seed: candidate.seed,
                address: candidate.address,
                worker_id: self.id,
            };
            info!(worker = self.id, address = %result.address, "claimed match");

            return match self.sink.persist(&result) {
                Ok(path) => Ok(WorkerExit::Won { result, path }),
                Err(source) => {
                    error!(
                        worker = self.id,
                        address = %result.address,
                        seed = %result.seed.phrase(),
                        error = %source,
                        "could not save matching seed, record it now"
                    );
                    Err(SearchError::Persist {
                        address: result.address,
                        seed: result.seed.phrase().to_owned(),
                        source,
                    })
                }
            };
        }
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}
