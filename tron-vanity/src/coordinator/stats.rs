//! Aggregate search statistics owned by the coordinator.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::worker::WorkerEvent;

/// Running totals across all workers.
///
/// Only the coordinator holds this value; workers never see it.
#[derive(Debug, Clone)]
pub struct AggregateStats {
    total_attempts: u64,
    found_count: usize,
    started_at: DateTime<Local>,
    start: Instant,
}

impl AggregateStats {
    pub fn new() -> Self {
        Self {
            total_attempts: 0,
            found_count: 0,
            started_at: Local::now(),
            start: Instant::now(),
        }
    }

    /// Folds one worker event into the totals.
    pub fn apply(&mut self, event: &WorkerEvent) {
        self.total_attempts = self.total_attempts.saturating_add(event.attempts());
        if matches!(event, WorkerEvent::Found(_)) {
            self.found_count += 1;
        }
    }

    pub fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    pub fn found_count(&self) -> usize {
        self.found_count
    }

    /// Wall-clock start of the run.
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Attempts per second over the whole run.
    pub fn average_rate(&self) -> f64 {
        rate(self.total_attempts, self.elapsed())
    }

    /// Point-in-time view used for the run-statistics header of a result record.
    pub fn snapshot(&self, pattern: &str) -> RunSnapshot {
        RunSnapshot {
            timestamp: Local::now(),
            pattern: pattern.to_owned(),
            elapsed: self.elapsed(),
            total_attempts: self.total_attempts,
            average_rate: self.average_rate(),
            found_count: self.found_count,
        }
    }
}

impl Default for AggregateStats {
    fn default() -> Self {
        Self::new()
    }
}

/// `attempts / elapsed`, or 0 before any time has passed.
fn rate(attempts: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        attempts as f64 / secs
    } else {
        0.0
    }
}

/// Computes the rate between consecutive progress ticks.
#[derive(Debug, Clone)]
pub struct RateMeter {
    last_tick: Instant,
    last_attempts: u64,
}

impl RateMeter {
    pub fn new(now: Instant) -> Self {
        Self {
            last_tick: now,
            last_attempts: 0,
        }
    }

    /// Returns attempts per second since the previous tick and starts a new interval.
    pub fn tick(&mut self, now: Instant, total_attempts: u64) -> f64 {
        let delta = total_attempts.saturating_sub(self.last_attempts);
        let instant = rate(delta, now.saturating_duration_since(self.last_tick));
        self.last_tick = now;
        self.last_attempts = total_attempts;
        instant
    }
}

/// Statistics attached to the record of the match that completes a run.
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub timestamp: DateTime<Local>,
    pub pattern: String,
    pub elapsed: Duration,
    pub total_attempts: u64,
    pub average_rate: f64,
    pub found_count: usize,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The target number of matches was found
    Completed,
    /// The operator interrupted the run, or every worker exited
    Interrupted,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed => write!(f, "completed"),
            RunOutcome::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Final statistics of a run, written once as the end-of-run record.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub pattern: String,
    pub elapsed: Duration,
    pub total_attempts: u64,
    pub found_count: usize,
    pub average_rate: f64,
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
}

impl RunSummary {
    pub fn new(outcome: RunOutcome, pattern: &str, stats: &AggregateStats) -> Self {
        Self {
            outcome,
            pattern: pattern.to_owned(),
            elapsed: stats.elapsed(),
            total_attempts: stats.total_attempts(),
            found_count: stats.found_count(),
            average_rate: stats.average_rate(),
            started_at: stats.started_at(),
            ended_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::FoundEvent;

    fn found(attempts: u64) -> WorkerEvent {
        WorkerEvent::Found(FoundEvent {
            address: "TMVQGm1qAQYVdetCeGRRkTWYYrLXuHK2HC".into(),
            private_key: "01".into(),
            attempts,
            worker_id: 0,
        })
    }

    #[test]
    fn test_progress_events_sum() {
        let mut stats = AggregateStats::new();
        for attempts in [10_000, 5_000, 2_500] {
            stats.apply(&WorkerEvent::Progress { attempts });
        }
        assert_eq!(stats.total_attempts(), 17_500);
        assert_eq!(stats.found_count(), 0);
    }

    #[test]
    fn test_found_events_count_and_add_attempts() {
        let mut stats = AggregateStats::new();
        stats.apply(&WorkerEvent::Progress { attempts: 100 });
        stats.apply(&found(7));
        stats.apply(&found(3));
        assert_eq!(stats.total_attempts(), 110);
        assert_eq!(stats.found_count(), 2);
    }

    #[test]
    fn test_total_never_decreases() {
        let mut stats = AggregateStats::new();
        let mut last = 0;
        for event in [
            WorkerEvent::Progress { attempts: 0 },
            found(1),
            WorkerEvent::Progress { attempts: u64::MAX },
            WorkerEvent::Progress { attempts: 5 },
        ] {
            stats.apply(&event);
            assert!(stats.total_attempts() >= last);
            last = stats.total_attempts();
        }
        assert_eq!(last, u64::MAX);
    }

    #[test]
    fn test_rate_meter() {
        let start = Instant::now();
        let mut meter = RateMeter::new(start);
        let rate = meter.tick(start + Duration::from_secs(2), 1_000);
        assert!((rate - 500.0).abs() < 1e-9);

        let rate = meter.tick(start + Duration::from_secs(4), 5_000);
        assert!((rate - 2_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_rate_meter_zero_interval() {
        let start = Instant::now();
        let mut meter = RateMeter::new(start);
        assert_eq!(meter.tick(start, 10), 0.0);
    }

    #[test]
    fn test_summary_copies_totals() {
        let mut stats = AggregateStats::new();
        stats.apply(&found(42));
        let summary = RunSummary::new(RunOutcome::Interrupted, "TABC", &stats);
        assert_eq!(summary.total_attempts, 42);
        assert_eq!(summary.found_count, 1);
        assert_eq!(summary.outcome.to_string(), "interrupted");
        assert!(summary.ended_at >= summary.started_at);
    }
}
