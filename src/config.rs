//! Runtime configuration for the vanity seed generator.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::crypto::Network;
use crate::matcher::{AnchorKind, Pattern, PatternError};

/// Waves Vanity Seed Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Case sensitive matching
    #[arg(long, default_value = "false")]
    pub exact: bool,

    /// Worker threads per pattern (default: number of CPU cores)
    #[arg(long = "par")]
    pub parallelism: Option<usize>,

    /// Prefix the address must start with (empty disables the prefix search)
    #[arg(short = 'p', long = "prefix", default_value = "")]
    pub prefix: String,

    /// Suffix the address must end with (empty disables the suffix search)
    #[arg(short = 's', long = "suffix", default_value = "")]
    pub suffix: String,

    /// Directory the `<address>.txt` seed files are written to
    #[arg(short = 'o', long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Network to derive addresses for: mainnet, testnet or stagenet
    #[arg(short = 'n', long, default_value = "mainnet")]
    pub network: Network,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,
}

impl Config {
    /// Returns the number of workers per pattern, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.parallelism.unwrap_or_else(num_cpus::get)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count() == 0 {
            return Err(ConfigError::NoWorkers);
        }

        if self.report_interval == 0 {
            return Err(ConfigError::ReportInterval);
        }

        for pattern in self.patterns() {
            pattern
                .validate(self.network)
                .map_err(|source| ConfigError::InvalidPattern {
                    anchor: pattern.anchor(),
                    source,
                })?;
        }

        Ok(())
    }

    /// Builds one immutable [`SearchConfig`] per anchor kind that has a
    /// non-empty pattern, prefix first.
    pub fn search_configs(&self) -> Vec<SearchConfig> {
        let parallelism = self.worker_count();
        self.patterns()
            .map(|pattern| SearchConfig::new(pattern, parallelism, self.network))
            .collect()
    }

    fn patterns(&self) -> impl Iterator<Item = Pattern> + '_ {
        [
            (AnchorKind::Prefix, &self.prefix),
            (AnchorKind::Suffix, &self.suffix),
        ]
        .into_iter()
        .map(|(anchor, raw)| Pattern::new(raw.as_str(), anchor, self.exact))
        .filter(|pattern| !pattern.is_empty())
    }
}

/// Settings of one search instance. Shared read-only by its workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pattern: Pattern,
    parallelism: usize,
    network: Network,
}

impl SearchConfig {
    pub fn new(pattern: Pattern, parallelism: usize, network: Network) -> Self {
        Self {
            pattern,
            parallelism,
            network,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn anchor(&self) -> AnchorKind {
        self.pattern.anchor()
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Returns true if `address` satisfies this search's pattern.
    #[inline]
    pub fn matches(&self, address: &str) -> bool {
        self.pattern.matches(address)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {anchor} pattern: {source}")]
    InvalidPattern {
        anchor: AnchorKind,
        #[source]
        source: PatternError,
    },

    #[error("--par must be at least 1")]
    NoWorkers,

    #[error("--report-interval must be at least 1 second")]
    ReportInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config(prefix: &str, suffix: &str) -> Config {
        Config {
            exact: false,
            parallelism: Some(4),
            prefix: prefix.into(),
            suffix: suffix.into(),
            out_dir: PathBuf::from("."),
            network: Network::Mainnet,
            report_interval: 5,
        }
    }

    #[test]
    fn test_cli_defaults() {
        let config = Config::try_parse_from(["waves_vanity"]).unwrap();
        assert!(!config.exact);
        assert_eq!(config.worker_count(), num_cpus::get());
        assert!(config.prefix.is_empty());
        assert!(config.suffix.is_empty());
        assert_eq!(config.network, Network::Mainnet);
    }

    #[test]
    fn test_cli_flags() {
        let config = Config::try_parse_from([
            "waves_vanity", "--exact", "--par", "2", "-p", "3PWav", "-s", "es", "-n", "testnet",
        ])
        .unwrap();
        assert!(config.exact);
        assert_eq!(config.worker_count(), 2);
        assert_eq!(config.prefix, "3PWav");
        assert_eq!(config.suffix, "es");
        assert_eq!(config.network, Network::Testnet);
    }

    #[test]
    fn test_empty_patterns_produce_no_searches() {
        let config = make_test_config("", "");
        assert!(config.validate().is_ok());
        assert!(config.search_configs().is_empty());
    }

    #[test]
    fn test_each_anchor_gets_its_own_config() {
        let config = make_test_config("3PAbc", "XyZ");
        let searches = config.search_configs();
        assert_eq!(searches.len(), 2);

        assert_eq!(searches[0].anchor(), AnchorKind::Prefix);
        assert_eq!(searches[0].pattern().pattern(), "3pabc");
        assert_eq!(searches[1].anchor(), AnchorKind::Suffix);
        assert_eq!(searches[1].pattern().pattern(), "xyz");
        assert!(searches.iter().all(|s| s.parallelism() == 4));
    }

    #[test]
    fn test_suffix_only() {
        let searches = make_test_config("", "Wave").search_configs();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].anchor(), AnchorKind::Suffix);
    }

    #[test]
    fn test_invalid_pattern() {
        let config = make_test_config("3P0", "");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern {
                anchor: AnchorKind::Prefix,
                ..
            })
        ));
    }

    #[test]
    fn test_prefix_outside_network_rejected() {
        let mut config = make_test_config("abc", "");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPattern {
                source: PatternError::UnreachablePrefix { .. },
                ..
            })
        ));

        config.prefix = "3n".into();
        assert!(config.validate().is_err());
        config.network = Network::Testnet;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = make_test_config("3P", "");
        config.parallelism = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::NoWorkers)));
    }
}
