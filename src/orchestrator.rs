//! Runs one independent search instance per active anchor kind.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, RecvTimeoutError};
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::crypto::KeyDeriver;
use crate::sink::ResultSink;
use crate::worker::{SearchReport, StopSignal, WorkerPool};

const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// A configured search that has not been started yet.
struct SearchInstance {
    config: Arc<SearchConfig>,
    signal: Arc<StopSignal>,
}

/// Owns the search instances, spawns their pools and joins them.
///
/// Instances share nothing mutable: each has its own config, stop signal and
/// workers. The deriver and sink are stateless capabilities shared by all.
pub struct Orchestrator {
    instances: Vec<SearchInstance>,
    deriver: Arc<dyn KeyDeriver>,
    sink: Arc<dyn ResultSink>,
    report_interval: Duration,
}

impl Orchestrator {
    pub fn new(
        configs: Vec<SearchConfig>,
        deriver: Arc<dyn KeyDeriver>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        let instances = configs
            .into_iter()
            .map(|config| SearchInstance {
                config: Arc::new(config),
                signal: Arc::new(StopSignal::new()),
            })
            .collect();

        Self {
            instances,
            deriver,
            sink,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }

    /// Sets how often progress is logged while searching.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Returns the stop signal of every instance, e.g. for a Ctrl-C handler.
    pub fn stop_signals(&self) -> Vec<Arc<StopSignal>> {
        self.instances.iter().map(|i| i.signal.clone()).collect()
    }

    /// Runs every instance to completion and returns one report per
    /// instance, in configuration order.
    ///
    /// Returns only after every worker thread has exited. With no instances
    /// nothing is spawned and this returns immediately.
    pub fn run(self) -> Vec<SearchReport> {
        if self.instances.is_empty() {
            debug!("no search patterns configured");
            return Vec::new();
        }

        let (report_tx, report_rx) = unbounded();

        let mut pools: Vec<WorkerPool> = self
            .instances
            .iter()
            .enumerate()
            .map(|(index, instance)| {
                info!(
                    anchor = %instance.config.anchor(),
                    pattern = instance.config.pattern().pattern(),
                    workers = instance.config.parallelism(),
                    "starting search"
                );
                WorkerPool::spawn(
                    index,
                    instance.config.clone(),
                    instance.signal.clone(),
                    self.deriver.clone(),
                    self.sink.clone(),
                    &report_tx,
                )
            })
            .collect();

        // Workers hold the remaining senders; the channel disconnects once
        // the last one has exited.
        drop(report_tx);

        loop {
            match report_rx.recv_timeout(self.report_interval) {
                Ok(report) => pools[report.pool].record(report.worker_id, report.outcome),
                Err(RecvTimeoutError::Timeout) => {
                    for pool in &pools {
                        pool.log_progress();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        pools.into_iter().map(WorkerPool::join).collect()
    }
}
