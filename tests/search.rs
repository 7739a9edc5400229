//! End-to-end searches against scripted key derivers.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use waves_vanity::crypto::DeriveError;
use waves_vanity::{
    AnchorKind, Config, FileSink, KeyDeriver, MatchResult, Network, Orchestrator, Pattern,
    ResultSink, SearchConfig, SearchError, SearchOutcome, Seed,
};

/// Cycles through a fixed list of seeds and maps each to a fixed address.
struct StubDeriver {
    seeds: Vec<&'static str>,
    addresses: HashMap<&'static str, &'static str>,
    next: AtomicUsize,
}

impl StubDeriver {
    fn new(pairs: &[(&'static str, &'static str)]) -> Self {
        Self {
            seeds: pairs.iter().map(|(seed, _)| *seed).collect(),
            addresses: pairs.iter().copied().collect(),
            next: AtomicUsize::new(0),
        }
    }

    fn abc() -> Self {
        Self::new(&[("a", "3PQAAA"), ("b", "3PABCDE"), ("c", "3PQQQQ")])
    }
}

impl KeyDeriver for StubDeriver {
    fn random_seed(&self) -> Result<Seed, DeriveError> {
        let i = self.next.fetch_add(1, Ordering::Relaxed) % self.seeds.len();
        Ok(Seed::from_phrase(self.seeds[i]))
    }

    fn address_from_seed(&self, seed: &Seed, _: Network) -> Result<String, DeriveError> {
        self.addresses
            .get(seed.phrase())
            .map(|address| address.to_string())
            .ok_or_else(|| DeriveError::InvalidAddress(seed.phrase().to_string()))
    }
}

struct BrokenDeriver;

impl KeyDeriver for BrokenDeriver {
    fn random_seed(&self) -> Result<Seed, DeriveError> {
        Err(DeriveError::Entropy("entropy pool unavailable".into()))
    }

    fn address_from_seed(&self, _: &Seed, _: Network) -> Result<String, DeriveError> {
        Err(DeriveError::InvalidAddress("unreachable".into()))
    }
}

/// Fails on mainnet, derives a fixed testnet address otherwise.
struct MainnetDownDeriver;

impl KeyDeriver for MainnetDownDeriver {
    fn random_seed(&self) -> Result<Seed, DeriveError> {
        Ok(Seed::from_phrase("x"))
    }

    fn address_from_seed(&self, _: &Seed, network: Network) -> Result<String, DeriveError> {
        match network {
            Network::Mainnet => Err(DeriveError::InvalidAddress("node unreachable".into())),
            _ => Ok("3MXYZQQQ".to_string()),
        }
    }
}

/// Wraps a sink and counts how often it is called.
struct CountingSink<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S: ResultSink> ResultSink for CountingSink<S> {
    fn persist(&self, result: &MatchResult) -> io::Result<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.persist(result)
    }
}

fn search(pattern: &str, anchor: AnchorKind, exact: bool, parallelism: usize) -> SearchConfig {
    SearchConfig::new(Pattern::new(pattern, anchor, exact), parallelism, Network::Mainnet)
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn prefix_search_writes_exactly_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(CountingSink {
        inner: FileSink::new(dir.path()),
        calls: AtomicUsize::new(0),
    });

    let orchestrator = Orchestrator::new(
        vec![search("3PABC", AnchorKind::Prefix, false, 4)],
        Arc::new(StubDeriver::abc()),
        sink.clone(),
    );
    let reports = orchestrator.run();

    assert_eq!(reports.len(), 1);
    match &reports[0].outcome {
        SearchOutcome::Found { result, path } => {
            assert_eq!(result.address, "3PABCDE");
            assert_eq!(result.seed.phrase(), "b");
            assert_eq!(path, &dir.path().join("3PABCDE.txt"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    assert_eq!(files_in(dir.path()), vec!["3PABCDE.txt"]);
    assert_eq!(
        fs::read_to_string(dir.path().join("3PABCDE.txt")).unwrap(),
        "b"
    );
}

#[test]
fn prefix_and_suffix_run_independently() {
    let dir = tempfile::tempdir().unwrap();

    let orchestrator = Orchestrator::new(
        vec![
            search("3PABC", AnchorKind::Prefix, false, 2),
            search("QQQ", AnchorKind::Suffix, true, 2),
        ],
        Arc::new(StubDeriver::abc()),
        Arc::new(FileSink::new(dir.path())),
    );
    let signals = orchestrator.stop_signals();
    let reports = orchestrator.run();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].anchor, AnchorKind::Prefix);
    assert_eq!(reports[1].anchor, AnchorKind::Suffix);
    assert!(reports.iter().all(|r| r.is_found()));
    assert!(signals.iter().all(|s| s.is_cancelled()));

    assert_eq!(files_in(dir.path()), vec!["3PABCDE.txt", "3PQQQQ.txt"]);
    assert_eq!(fs::read_to_string(dir.path().join("3PQQQQ.txt")).unwrap(), "c");
}

#[test]
fn exact_mode_respects_case() {
    let dir = tempfile::tempdir().unwrap();

    let deriver = StubDeriver::new(&[("lower", "3Pabcde"), ("upper", "3PABCDE")]);
    let orchestrator = Orchestrator::new(
        vec![search("3PABC", AnchorKind::Prefix, true, 3)],
        Arc::new(deriver),
        Arc::new(FileSink::new(dir.path())),
    );
    let reports = orchestrator.run();

    assert!(reports[0].is_found());
    assert_eq!(files_in(dir.path()), vec!["3PABCDE.txt"]);
    assert_eq!(
        fs::read_to_string(dir.path().join("3PABCDE.txt")).unwrap(),
        "upper"
    );
}

#[test]
fn empty_patterns_spawn_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().to_string_lossy().into_owned();

    let config =
        Config::try_parse_from(["waves_vanity", "-p", "", "-s", "", "-o", out_dir.as_str()])
            .unwrap();
    assert!(config.validate().is_ok());

    let searches = config.search_configs();
    assert!(searches.is_empty());

    let orchestrator = Orchestrator::new(
        searches,
        Arc::new(BrokenDeriver),
        Arc::new(FileSink::new(&config.out_dir)),
    );
    assert!(orchestrator.run().is_empty());
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn derivation_failure_halts_the_search() {
    let dir = tempfile::tempdir().unwrap();

    let orchestrator = Orchestrator::new(
        vec![search("3PABC", AnchorKind::Prefix, false, 4)],
        Arc::new(BrokenDeriver),
        Arc::new(FileSink::new(dir.path())),
    )
    .with_report_interval(Duration::from_millis(10));
    let signals = orchestrator.stop_signals();
    let reports = orchestrator.run();

    assert_eq!(reports.len(), 1);
    assert!(matches!(
        reports[0].outcome,
        SearchOutcome::Failed(SearchError::Derivation(_))
    ));
    assert!(signals[0].is_cancelled());
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn persistence_failure_reports_the_seed() {
    let dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(CountingSink {
        inner: FileSink::new(dir.path().join("does-not-exist")),
        calls: AtomicUsize::new(0),
    });

    let orchestrator = Orchestrator::new(
        vec![search("3PABC", AnchorKind::Prefix, false, 4)],
        Arc::new(StubDeriver::abc()),
        sink.clone(),
    );
    let reports = orchestrator.run();

    match &reports[0].outcome {
        SearchOutcome::Failed(SearchError::Persist { address, seed, .. }) => {
            assert_eq!(address, "3PABCDE");
            assert_eq!(seed, "b");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(reports[0].is_failure());
    assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn derivation_failure_leaves_other_anchor_running() {
    let dir = tempfile::tempdir().unwrap();

    let orchestrator = Orchestrator::new(
        vec![
            search("3PABC", AnchorKind::Prefix, false, 2),
            SearchConfig::new(
                Pattern::new("QQQ", AnchorKind::Suffix, true),
                2,
                Network::Testnet,
            ),
        ],
        Arc::new(MainnetDownDeriver),
        Arc::new(FileSink::new(dir.path())),
    )
    .with_report_interval(Duration::from_millis(10));
    let signals = orchestrator.stop_signals();
    let reports = orchestrator.run();

    assert_eq!(reports.len(), 2);
    assert!(matches!(
        reports[0].outcome,
        SearchOutcome::Failed(SearchError::Derivation(_))
    ));
    match &reports[1].outcome {
        SearchOutcome::Found { result, path } => {
            assert_eq!(result.address, "3MXYZQQQ");
            assert_eq!(path, &dir.path().join("3MXYZQQQ.txt"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(signals.iter().all(|s| s.is_cancelled()));

    assert_eq!(files_in(dir.path()), vec!["3MXYZQQQ.txt"]);
    assert_eq!(fs::read_to_string(dir.path().join("3MXYZQQQ.txt")).unwrap(), "x");
}

#[test]
fn persistence_failure_leaves_other_anchor_running() {
    let dir = tempfile::tempdir().unwrap();
    // An earlier secret under the prefix match's name must not be replaced.
    fs::write(dir.path().join("3PABCDE.txt"), "earlier").unwrap();

    let orchestrator = Orchestrator::new(
        vec![
            search("3PABC", AnchorKind::Prefix, false, 2),
            search("QQQ", AnchorKind::Suffix, true, 2),
        ],
        Arc::new(StubDeriver::abc()),
        Arc::new(FileSink::new(dir.path())),
    );
    let reports = orchestrator.run();

    assert_eq!(reports.len(), 2);
    match &reports[0].outcome {
        SearchOutcome::Failed(SearchError::Persist {
            address,
            seed,
            source,
        }) => {
            assert_eq!(address, "3PABCDE");
            assert_eq!(seed, "b");
            assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(reports[1].is_found());

    assert_eq!(files_in(dir.path()), vec!["3PABCDE.txt", "3PQQQQ.txt"]);
    assert_eq!(
        fs::read_to_string(dir.path().join("3PABCDE.txt")).unwrap(),
        "earlier"
    );
    assert_eq!(fs::read_to_string(dir.path().join("3PQQQQ.txt")).unwrap(), "c");
}
