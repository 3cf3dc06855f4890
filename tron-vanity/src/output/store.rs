//! Append-only result file.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::coordinator::{RunSnapshot, RunSummary};
use crate::worker::FoundEvent;

use super::format::{format_count, format_elapsed};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR_WIDTH: usize = 50;

/// Appends found keys and run summaries to a text file.
///
/// Every record is written with a single `write_all` on a freshly opened
/// append-mode handle, then flushed and synced.
#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one match, preceded by run statistics when `header` is given.
    pub fn append_match(&self, found: &FoundEvent, header: Option<&RunSnapshot>) -> io::Result<()> {
        self.append(&format_match(found, header))
    }

    /// Appends the end-of-run summary.
    pub fn append_summary(&self, summary: &RunSummary) -> io::Result<()> {
        self.append(&format_summary(summary))
    }

    fn append(&self, record: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(record.as_bytes())?;
        file.flush()?;
        file.sync_data()
    }
}

fn separator(c: char) -> String {
    std::iter::repeat(c).take(SEPARATOR_WIDTH).collect()
}

/// Renders a match record.
pub fn format_match(found: &FoundEvent, header: Option<&RunSnapshot>) -> String {
    let mut out = String::new();

    if let Some(stats) = header {
        let _ = writeln!(out, "{}", separator('#'));
        let _ = writeln!(out, "Time: {}", stats.timestamp.format(TIMESTAMP_FORMAT));
        let _ = writeln!(out, "Pattern: {}", stats.pattern);
        let _ = writeln!(out, "Elapsed: {}", format_elapsed(stats.elapsed));
        let _ = writeln!(out, "Total attempts: {}", format_count(stats.total_attempts));
        let _ = writeln!(out, "Average rate: {}/s", format_count(stats.average_rate as u64));
        let _ = writeln!(out, "Found: {}", stats.found_count);
        let _ = writeln!(out, "{}", separator('-'));
    }

    let _ = writeln!(out, "Address: {}", found.address);
    let _ = writeln!(out, "Private Key: {}", found.private_key);
    let _ = writeln!(out, "Time: {}", chrono::Local::now().format(TIMESTAMP_FORMAT));
    let _ = writeln!(out, "{}", separator('='));
    out.push('\n');
    out
}

/// Renders the console banner printed for the `index`-th match.
pub fn format_match_banner(found: &FoundEvent, index: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Match #{} ===", index);
    let _ = writeln!(out, "Address:     {}", found.address);
    let _ = writeln!(out, "Private Key: {}", found.private_key);
    let _ = writeln!(out, "Worker:      {}", found.worker_id);
    let _ = writeln!(out, "Attempts:    {}", format_count(found.attempts));
    out
}

/// Renders the end-of-run record.
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", separator('*'));
    let _ = writeln!(out, "Search {}", summary.outcome);
    let _ = writeln!(out, "Pattern: {}", summary.pattern);
    let _ = writeln!(out, "Elapsed: {}", format_elapsed(summary.elapsed));
    let _ = writeln!(out, "Total attempts: {}", format_count(summary.total_attempts));
    let _ = writeln!(out, "Found: {}", summary.found_count);
    let _ = writeln!(out, "Average rate: {}/s", format_count(summary.average_rate as u64));
    let _ = writeln!(out, "Started: {}", summary.started_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(out, "Ended: {}", summary.ended_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(out, "{}", separator('*'));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Local;

    use super::*;
    use crate::coordinator::RunOutcome;

    fn found() -> FoundEvent {
        FoundEvent {
            address: "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC".into(),
            private_key: "0000000000000000000000000000000000000000000000000000000000000001".into(),
            attempts: 12,
            worker_id: 1,
        }
    }

    fn snapshot() -> RunSnapshot {
        RunSnapshot {
            timestamp: Local::now(),
            pattern: "TMVQ".into(),
            elapsed: Duration::from_secs(65),
            total_attempts: 1_234_567,
            average_rate: 18_993.3,
            found_count: 1,
        }
    }

    #[test]
    fn test_match_record_layout() {
        let record = format_match(&found(), None);
        let lines: Vec<&str> = record.lines().collect();
        assert_eq!(lines[0], "Address: TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC");
        assert_eq!(
            lines[1],
            "Private Key: 0000000000000000000000000000000000000000000000000000000000000001"
        );
        assert!(lines[2].starts_with("Time: "));
        assert_eq!(lines[3], "=".repeat(50));
    }

    #[test]
    fn test_match_record_with_header() {
        let record = format_match(&found(), Some(&snapshot()));
        assert!(record.contains("Pattern: TMVQ\n"));
        assert!(record.contains("Elapsed: 00:01:05\n"));
        assert!(record.contains("Total attempts: 1,234,567\n"));
        assert!(record.contains("Average rate: 18,993/s\n"));
        assert!(record.contains("Found: 1\n"));
        let header_end = record.find("Address: ").unwrap();
        assert!(record[..header_end].contains("Pattern: "));
    }

    #[test]
    fn test_match_banner() {
        let banner = format_match_banner(&found(), 3);
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines[0], "=== Match #3 ===");
        assert_eq!(lines[1], "Address:     TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC");
        assert!(lines[2].ends_with("0000000000000000000000000000000000000000000000000000000000000001"));
        assert_eq!(lines[3], "Worker:      1");
        assert_eq!(lines[4], "Attempts:    12");
    }

    #[test]
    fn test_summary_record() {
        let summary = RunSummary {
            outcome: RunOutcome::Completed,
            pattern: "TABC...xyz".into(),
            elapsed: Duration::from_secs(3600),
            total_attempts: 17_500,
            found_count: 2,
            average_rate: 4.86,
            started_at: Local::now(),
            ended_at: Local::now(),
        };
        let record = format_summary(&summary);
        assert!(record.contains("Search completed\n"));
        assert!(record.contains("Pattern: TABC...xyz\n"));
        assert!(record.contains("Elapsed: 01:00:00\n"));
        assert!(record.contains("Total attempts: 17,500\n"));
        assert!(record.contains("Found: 2\n"));
        assert!(record.contains("Started: "));
        assert!(record.contains("Ended: "));
    }

    #[test]
    fn test_appends_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("found.txt"));

        log.append_match(&found(), None).unwrap();
        log.append_match(&found(), None).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.matches("Address: ").count(), 2);
        assert!(contents.ends_with("\n\n"));
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("missing").join("found.txt"));
        assert!(log.append_match(&found(), None).is_err());
    }
}
