//! Search coordination.
//!
//! The [`Coordinator`] owns the worker pool, the aggregate statistics and the
//! result file. Workers only send events; every counter update and every file
//! write happens on the coordinator's thread, one event at a time.

mod stats;

pub use stats::{AggregateStats, RateMeter, RunOutcome, RunSnapshot, RunSummary};

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{select, tick, Receiver};

use crate::config::SearchConfig;
use crate::output::{format_count, format_elapsed, format_match_banner, ResultLog};
use crate::worker::{FoundEvent, WorkerEvent, WorkerPool};

/// Longest time an interrupt can go unnoticed while no events arrive.
const INTERRUPT_POLL: Duration = Duration::from_millis(200);

/// Errors that end a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("failed to write results to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lifecycle of a coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Running,
    Stopping(RunOutcome),
    Terminated,
}

/// Drives a search: spawns workers, aggregates their events, persists matches
/// and decides when to stop.
pub struct Coordinator {
    config: SearchConfig,
    store: ResultLog,
    stats: AggregateStats,
    state: CoordinatorState,
    /// Set externally (Ctrl-C) to request an interrupted stop
    interrupt: Arc<AtomicBool>,
    /// Pattern in display form, as written to records
    pattern_label: String,
}

impl Coordinator {
    pub fn new(config: SearchConfig, interrupt: Arc<AtomicBool>) -> Self {
        let store = ResultLog::new(config.output.clone());
        let pattern_label = config.pattern.to_string();
        Self {
            config,
            store,
            stats: AggregateStats::new(),
            state: CoordinatorState::Idle,
            interrupt,
            pattern_label,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    /// Runs a complete search and returns its summary.
    ///
    /// Workers are stopped and joined after the summary record is written. A
    /// failure to write a record is fatal and is returned as an error.
    pub fn run(mut self) -> Result<RunSummary, SearchError> {
        let pool = WorkerPool::new(&self.config);
        log::info!(
            "searching for {} with {} workers ({})",
            self.pattern_label,
            pool.num_workers(),
            self.config.feed
        );

        let result = self.run_with_events(pool.events());
        pool.join();
        result
    }

    /// Runs the event loop over `events` until the run stops, then writes the summary.
    pub fn run_with_events(
        &mut self,
        events: &Receiver<WorkerEvent>,
    ) -> Result<RunSummary, SearchError> {
        self.stats = AggregateStats::new();
        self.state = CoordinatorState::Running;

        let outcome = self.drive(events)?;
        self.finish(outcome)
    }

    fn drive(&mut self, events: &Receiver<WorkerEvent>) -> Result<RunOutcome, SearchError> {
        let ticker = tick(self.config.report_interval);
        let mut meter = RateMeter::new(Instant::now());

        loop {
            if let CoordinatorState::Stopping(outcome) = self.state {
                self.persist_queued(events)?;
                return Ok(outcome);
            }

            if self.interrupt.load(Ordering::Relaxed) {
                log::info!("interrupted, stopping");
                self.state = CoordinatorState::Stopping(RunOutcome::Interrupted);
                continue;
            }

            select! {
                recv(events) -> msg => match msg {
                    Ok(event) => self.handle_event(event)?,
                    Err(_) => {
                        log::warn!("all workers have exited, stopping");
                        self.state = CoordinatorState::Stopping(RunOutcome::Interrupted);
                    }
                },
                recv(ticker) -> now => {
                    let now = now.unwrap_or_else(|_| Instant::now());
                    self.report_progress(&mut meter, now);
                }
                default(INTERRUPT_POLL) => {}
            }
        }
    }

    /// Applies one worker event.
    ///
    /// A match is persisted before anything else. Events arriving after the
    /// coordinator left `Running` are ignored.
    pub fn handle_event(&mut self, event: WorkerEvent) -> Result<(), SearchError> {
        if self.state != CoordinatorState::Running {
            return Ok(());
        }

        self.stats.apply(&event);

        let WorkerEvent::Found(found) = event else {
            return Ok(());
        };

        let target = self.config.target_count;
        let completes = target > 0 && self.stats.found_count() >= target;
        let header = completes.then(|| self.stats.snapshot(&self.pattern_label));

        self.persist_match(&found, header.as_ref())?;

        println!("{}", format_match_banner(&found, self.stats.found_count()));
        log::info!(
            "match #{} from worker {}: {}",
            self.stats.found_count(),
            found.worker_id,
            found.address
        );

        if completes {
            log::info!("target of {} reached", target);
            self.state = CoordinatorState::Stopping(RunOutcome::Completed);
        }
        Ok(())
    }

    /// Persists the matches already queued when the run stops.
    ///
    /// They are written as plain records and do not count toward the totals.
    /// Only the events queued at this moment are taken, as workers keep sending
    /// until the pool is joined.
    fn persist_queued(&self, events: &Receiver<WorkerEvent>) -> Result<(), SearchError> {
        for _ in 0..events.len() {
            let Ok(event) = events.try_recv() else {
                break;
            };
            if let WorkerEvent::Found(found) = event {
                self.persist_match(&found, None)?;
                log::info!(
                    "saved match queued at stop from worker {}: {} (private key {})",
                    found.worker_id,
                    found.address,
                    found.private_key
                );
            }
        }
        Ok(())
    }

    fn persist_match(
        &self,
        found: &FoundEvent,
        header: Option<&RunSnapshot>,
    ) -> Result<(), SearchError> {
        self.store
            .append_match(found, header)
            .map_err(|source| SearchError::Persist {
                path: self.store.path().to_path_buf(),
                source,
            })
    }

    fn report_progress(&self, meter: &mut RateMeter, now: Instant) {
        let total = self.stats.total_attempts();
        let instant_rate = meter.tick(now, total);
        log::info!(
            "elapsed {} | searched {} | now {}/s | avg {}/s | found {}",
            format_elapsed(self.stats.elapsed()),
            format_count(total),
            format_count(instant_rate as u64),
            format_count(self.stats.average_rate() as u64),
            self.stats.found_count()
        );
    }

    /// Writes the single end-of-run record and terminates.
    fn finish(&mut self, outcome: RunOutcome) -> Result<RunSummary, SearchError> {
        let summary = RunSummary::new(outcome, &self.pattern_label, &self.stats);
        self.store
            .append_summary(&summary)
            .map_err(|source| SearchError::Persist {
                path: self.store.path().to_path_buf(),
                source,
            })?;
        self.state = CoordinatorState::Terminated;
        Ok(summary)
    }
}
