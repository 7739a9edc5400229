//! Waves Vanity Seed Generator CLI
//!
//! Usage:
//!   waves_vanity -p 3PWave            # Find an address starting with "3PWave"
//!   waves_vanity -s cafe --par 8      # Find an address ending with "cafe"
//!   waves_vanity -p 3PAbc -s xyz      # Run a prefix and a suffix search side by side

use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use waves_vanity::{
    Config, FileSink, Orchestrator, SearchError, SearchOutcome, SearchReport, StopSignal,
    WavesDeriver,
};

fn main() {
    init_tracing();

    let config = Config::parse();

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let searches = config.search_configs();

    // Print startup info
    println!("Waves Vanity Seed Generator");
    println!("===========================");
    for search in &searches {
        let pattern = search.pattern();
        println!("Search:     {} {}", search.anchor(), pattern.pattern());
        println!("Difficulty: {}", pattern.difficulty_description());
    }
    if searches.is_empty() {
        println!("Search:     none (no prefix or suffix given)");
    }
    println!("Workers:    {} per search", config.worker_count());
    println!("Exact:      {}", config.exact);
    println!("Network:    {}", config.network);
    println!("Output:     {}", config.out_dir.display());
    println!();

    let orchestrator = Orchestrator::new(
        searches,
        Arc::new(WavesDeriver::new()),
        Arc::new(FileSink::new(config.out_dir.clone())),
    )
    .with_report_interval(config.report_interval());

    let signals = orchestrator.stop_signals();
    if !signals.is_empty() {
        ctrlc_handler(signals);
        println!("Searching... (Press Ctrl+C to stop)\n");
    }

    let reports = orchestrator.run();

    let mut failed = false;
    for report in &reports {
        print_report(report);
        failed |= report.is_failure();
    }

    println!("terminated");

    if failed {
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &SearchReport) {
    println!("=== {} {} ===", report.anchor, report.pattern);
    match &report.outcome {
        SearchOutcome::Found { result, path } => {
            println!("Address:    {}", result.address);
            println!("Seed file:  {}", path.display());
            println!("Worker:     {}", result.worker_id);
        }
        SearchOutcome::Interrupted => println!("Stopped by user."),
        SearchOutcome::Failed(SearchError::Persist {
            address,
            seed,
            source,
        }) => {
            eprintln!("Could not save the seed for {}: {}", address, source);
            eprintln!("Address:    {}", address);
            eprintln!("Seed:       {}", seed);
        }
        SearchOutcome::Failed(e) => eprintln!("Search failed: {}", e),
    }
    println!(
        "Tested {} candidates in {:.2}s ({}/s)",
        format_number(report.candidates_tested),
        report.elapsed.as_secs_f64(),
        format_number(report.candidates_per_second() as u64)
    );
    println!();
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn ctrlc_handler(signals: Vec<Arc<StopSignal>>) {
    let result = ctrlc::set_handler(move || {
        for signal in &signals {
            signal.cancel();
        }
    });

    if let Err(e) = result {
        warn!(error = %e, "could not install Ctrl-C handler");
    }
}
