//! Runtime configuration for the vanity address generator.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::crypto::ADDRESS_STR_LEN;
use crate::matcher::{find_invalid_char, Pattern};
use crate::worker::PROGRESS_INTERVAL;

/// Characters available to a pattern: everything but the leading `T`.
const MAX_PATTERN_LEN: usize = ADDRESS_STR_LEN - 1;

/// TRON Vanity Address Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Characters that must follow the leading "T" (Base58, case sensitive)
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Characters the address must end with (Base58, case sensitive)
    #[arg(short, long, default_value = "")]
    pub suffix: String,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Stop after finding N addresses (0 = run forever)
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,

    /// File that found keys and run summaries are appended to
    #[arg(short, long, default_value = "found_addresses.txt")]
    pub output: PathBuf,

    /// Feed workers from a batch key producer instead of per-attempt OS entropy
    #[arg(long, default_value = "false")]
    pub hybrid: bool,

    /// Keys per batch in hybrid mode
    #[arg(long, default_value = "65536")]
    pub batch_size: usize,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, part) in [("Prefix", &self.prefix), ("Suffix", &self.suffix)] {
            if let Some(c) = find_invalid_char(part) {
                return Err(ConfigError::InvalidPattern(format!(
                    "{} contains '{}', which never appears in an address (Base58 excludes 0, O, I, l)",
                    name, c
                )));
            }
        }

        if self.prefix.len() > MAX_PATTERN_LEN {
            return Err(ConfigError::InvalidPattern(format!(
                "Prefix cannot be longer than {} characters",
                MAX_PATTERN_LEN
            )));
        }

        if self.prefix.len() + self.suffix.len() > MAX_PATTERN_LEN {
            return Err(ConfigError::InvalidPattern(format!(
                "Combined prefix + suffix cannot be longer than {} characters",
                MAX_PATTERN_LEN
            )));
        }

        if self.report_interval == 0 {
            return Err(ConfigError::InvalidValue(
                "Report interval must be at least 1 second".into(),
            ));
        }

        if self.hybrid && self.batch_size == 0 {
            return Err(ConfigError::InvalidValue("Batch size must be positive".into()));
        }

        Ok(())
    }

    /// Builds the search parameters from validated CLI arguments.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            pattern: Pattern::new(self.prefix.clone(), self.suffix.clone()),
            target_count: self.count,
            workers: self.worker_count(),
            report_interval: Duration::from_secs(self.report_interval),
            progress_interval: PROGRESS_INTERVAL,
            output: self.output.clone(),
            feed: if self.hybrid {
                KeyFeed::Batch {
                    batch_size: self.batch_size,
                }
            } else {
                KeyFeed::Os
            },
        }
    }
}

/// Where workers get candidate keys from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFeed {
    /// Each worker draws keys from the OS CSPRNG
    Os,
    /// A producer thread fills batches that workers consume
    Batch { batch_size: usize },
}

impl fmt::Display for KeyFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyFeed::Os => write!(f, "cpu"),
            KeyFeed::Batch { batch_size } => write!(f, "hybrid, batch {}", batch_size),
        }
    }
}

/// Validated parameters of one search run.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub pattern: Pattern,
    /// Matches to find before stopping (0 = unlimited)
    pub target_count: usize,
    pub workers: usize,
    pub report_interval: Duration,
    /// Attempts between progress events of a single worker
    pub progress_interval: u64,
    /// Append-only result file
    pub output: PathBuf,
    pub feed: KeyFeed,
}

impl SearchConfig {
    /// Defaults for everything but the pattern: one match, one worker per core.
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            target_count: 1,
            workers: num_cpus::get().max(1),
            report_interval: Duration::from_secs(5),
            progress_interval: PROGRESS_INTERVAL,
            output: PathBuf::from("found_addresses.txt"),
            feed: KeyFeed::Os,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config(prefix: &str, suffix: &str) -> Config {
        Config {
            prefix: prefix.into(),
            suffix: suffix.into(),
            workers: None,
            count: 1,
            report_interval: 5,
            output: PathBuf::from("found_addresses.txt"),
            hybrid: false,
            batch_size: 65536,
        }
    }

    #[test]
    fn test_valid_pattern() {
        assert!(make_test_config("MGf", "fqq").validate().is_ok());
        assert!(make_test_config("", "").validate().is_ok());
    }

    #[test]
    fn test_invalid_characters() {
        assert!(make_test_config("M0f", "").validate().is_err());
        assert!(make_test_config("", "qqI").validate().is_err());
    }

    #[test]
    fn test_length_limits() {
        let long = "a".repeat(MAX_PATTERN_LEN);
        assert!(make_test_config(&long, "").validate().is_ok());
        assert!(make_test_config(&format!("{}a", long), "").validate().is_err());
        assert!(make_test_config(&long, "b").validate().is_err());
    }

    #[test]
    fn test_zero_report_interval() {
        let mut config = make_test_config("A", "");
        config.report_interval = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_cli_parsing() {
        let config = Config::parse_from([
            "tron_vanity", "-p", "MGf", "-s", "fqq", "-n", "2", "-w", "3", "--hybrid",
        ]);
        let search = config.search_config();
        assert_eq!(search.pattern, Pattern::new("MGf", "fqq"));
        assert_eq!(search.target_count, 2);
        assert_eq!(search.workers, 3);
        assert_eq!(search.feed, KeyFeed::Batch { batch_size: 65536 });
        assert_eq!(search.report_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["tron_vanity"]);
        assert_eq!(config.prefix, "");
        assert_eq!(config.count, 1);
        assert_eq!(config.search_config().feed, KeyFeed::Os);
        assert!(config.worker_count() >= 1);
    }
}
