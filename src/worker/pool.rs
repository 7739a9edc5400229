//! Worker pool management.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::crypto::KeyDeriver;
use crate::error::SearchError;
use crate::matcher::AnchorKind;
use crate::sink::ResultSink;

use super::search::{MatchResult, SearchWorker, WorkerExit, WorkerStats};
use super::StopSignal;

/// Sent by each worker thread when its loop ends.
#[derive(Debug)]
pub struct WorkerReport {
    /// Index of the pool the worker belongs to
    pub pool: usize,
    pub worker_id: usize,
    pub outcome: Result<WorkerExit, SearchError>,
}

/// How a search instance ended.
#[derive(Debug)]
pub enum SearchOutcome {
    /// A match was claimed and written to `path`.
    Found { result: MatchResult, path: PathBuf },
    /// Cancelled before any match was claimed.
    Interrupted,
    /// The instance stopped on an error.
    Failed(SearchError),
}

/// Final account of one search instance.
#[derive(Debug)]
pub struct SearchReport {
    pub anchor: AnchorKind,
    pub pattern: String,
    pub outcome: SearchOutcome,
    pub candidates_tested: u64,
    pub elapsed: Duration,
}

impl SearchReport {
    pub fn is_found(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Found { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Failed(_))
    }

    /// Returns the average generation rate (candidates per second).
    pub fn candidates_per_second(&self) -> f64 {
        per_second(self.candidates_tested, self.elapsed)
    }
}

fn per_second(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

/// The workers of one search instance: one anchor kind, one stop signal.
pub struct WorkerPool {
    config: Arc<SearchConfig>,
    signal: Arc<StopSignal>,
    stats: Arc<WorkerStats>,
    /// Worker thread handles, paired with worker IDs
    handles: Vec<(usize, JoinHandle<()>)>,
    found: Option<(MatchResult, PathBuf)>,
    failure: Option<SearchError>,
    start_time: Instant,
}

impl WorkerPool {
    /// Spawns `config.parallelism()` workers. Each sends a [`WorkerReport`]
    /// tagged with `index` on `report_tx` when it exits.
    ///
    /// If a thread cannot be spawned the signal is cancelled so the workers
    /// already running wind down, and the error becomes the pool's outcome.
    pub fn spawn(
        index: usize,
        config: Arc<SearchConfig>,
        signal: Arc<StopSignal>,
        deriver: Arc<dyn KeyDeriver>,
        sink: Arc<dyn ResultSink>,
        report_tx: &Sender<WorkerReport>,
    ) -> Self {
        let anchor = config.anchor();
        let stats = Arc::new(WorkerStats::new());
        let mut handles = Vec::with_capacity(config.parallelism());
        let mut failure = None;

        for id in 0..config.parallelism() {
            let worker = SearchWorker::new(
                id,
                config.clone(),
                deriver.clone(),
                sink.clone(),
                signal.clone(),
                stats.clone(),
            );
            let report_tx = report_tx.clone();

            let spawned = thread::Builder::new()
                .name(format!("vanity-{}-{}", anchor, id))
                .spawn(move || {
                    let outcome = worker.run();
                    let _ = report_tx.send(WorkerReport {
                        pool: index,
                        worker_id: worker.id(),
                        outcome,
                    });
                });

            match spawned {
                Ok(handle) => handles.push((id, handle)),
                Err(e) => {
                    warn!(%anchor, worker = id, error = %e, "failed to spawn worker, halting search");
                    signal.cancel();
                    failure = Some(SearchError::Spawn(e));
                    break;
                }
            }
        }

        debug!(%anchor, workers = handles.len(), "worker pool started");

        Self {
            config,
            signal,
            stats,
            handles,
            found: None,
            failure,
            start_time: Instant::now(),
        }
    }

    /// Folds one worker's exit into the pool's outcome.
    pub fn record(&mut self, worker_id: usize, outcome: Result<WorkerExit, SearchError>) {
        let anchor = self.anchor();

        match outcome {
            Ok(WorkerExit::Won { result, path }) => {
                info!(%anchor, worker = worker_id, address = %result.address, path = %path.display(), "match saved");
                self.found = Some((result, path));
            }
            Ok(WorkerExit::Lost) | Ok(WorkerExit::Cancelled) => {
                debug!(%anchor, worker = worker_id, "worker stopped");
            }
            Err(err @ SearchError::Derivation(_)) => {
                // Fatal to the whole instance, not just this worker.
                if self.signal.cancel() {
                    warn!(%anchor, worker = worker_id, error = %err, "derivation failed, halting search");
                }
                self.record_failure(worker_id, err);
            }
            Err(err) => self.record_failure(worker_id, err),
        }
    }

    fn record_failure(&mut self, worker_id: usize, err: SearchError) {
        if self.failure.is_none() {
            self.failure = Some(err);
        } else {
            debug!(anchor = %self.anchor(), worker = worker_id, error = %err, "additional worker failure");
        }
    }

    /// Logs the current candidate count and rate.
    pub fn log_progress(&self) {
        if self.handles.is_empty() {
            return;
        }
        let tested = self.total_candidates();
        let rate = per_second(tested, self.start_time.elapsed());
        info!(
            anchor = %self.anchor(),
            pattern = self.config.pattern().pattern(),
            tested,
            rate = %format!("{:.0}/s", rate),
            "searching"
        );
    }

    /// Waits for every worker thread and summarizes the search.
    pub fn join(mut self) -> SearchReport {
        for (id, handle) in std::mem::take(&mut self.handles) {
            if handle.join().is_err() {
                self.signal.cancel();
                self.record_failure(id, SearchError::WorkerPanicked(id));
            }
        }

        let outcome = match (self.found.take(), self.failure.take()) {
            (Some((result, path)), _) => SearchOutcome::Found { result, path },
            (None, Some(err)) => SearchOutcome::Failed(err),
            (None, None) => SearchOutcome::Interrupted,
        };

        SearchReport {
            anchor: self.config.anchor(),
            pattern: self.config.pattern().pattern().to_owned(),
            outcome,
            candidates_tested: self.stats.total_candidates(),
            elapsed: self.start_time.elapsed(),
        }
    }

    pub fn anchor(&self) -> AnchorKind {
        self.config.anchor()
    }

    /// Returns the total candidates tested across all workers.
    pub fn total_candidates(&self) -> u64 {
        self.stats.total_candidates()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.signal.cancel();
        // Wait for workers to finish if they haven't been joined
        for (_, handle) in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    use crossbeam_channel::unbounded;

    use crate::crypto::{DeriveError, Network, Seed};
    use crate::matcher::Pattern;

    struct PanickingDeriver;

    impl KeyDeriver for PanickingDeriver {
        fn random_seed(&self) -> Result<Seed, DeriveError> {
            panic!("entropy source exploded")
        }

        fn address_from_seed(&self, _: &Seed, _: Network) -> Result<String, DeriveError> {
            unreachable!()
        }
    }

    struct NoSink;

    impl ResultSink for NoSink {
        fn persist(&self, _: &MatchResult) -> io::Result<PathBuf> {
            unreachable!()
        }
    }

    fn make_report(candidates_tested: u64, elapsed: Duration) -> SearchReport {
        SearchReport {
            anchor: AnchorKind::Prefix,
            pattern: "3pabc".into(),
            outcome: SearchOutcome::Interrupted,
            candidates_tested,
            elapsed,
        }
    }

    #[test]
    fn test_candidates_per_second() {
        assert_eq!(make_report(100, Duration::from_secs(2)).candidates_per_second(), 50.0);
        assert_eq!(make_report(100, Duration::ZERO).candidates_per_second(), 0.0);
    }

    #[test]
    fn test_worker_panic_fails_the_instance() {
        let config = Arc::new(SearchConfig::new(
            Pattern::new("3PABC", AnchorKind::Prefix, false),
            2,
            Network::Mainnet,
        ));
        let signal = Arc::new(StopSignal::new());
        let (report_tx, report_rx) = unbounded();

        let mut pool = WorkerPool::spawn(
            0,
            config,
            signal.clone(),
            Arc::new(PanickingDeriver),
            Arc::new(NoSink),
            &report_tx,
        );
        drop(report_tx);

        // Panicking workers drop their sender without reporting.
        for report in report_rx.iter() {
            pool.record(report.worker_id, report.outcome);
        }

        let report = pool.join();
        assert!(matches!(
            report.outcome,
            SearchOutcome::Failed(SearchError::WorkerPanicked(_))
        ));
        assert!(signal.is_cancelled());
    }
}
