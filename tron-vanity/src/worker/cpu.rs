//! CPU-based worker for vanity address generation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{SendTimeoutError, Sender};

use crate::crypto::AddressDeriver;
use crate::matcher::Pattern;

use super::event::{FoundEvent, WorkerEvent};
use super::source::KeySource;

/// Attempts between two progress events of a worker that finds nothing.
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// How long a send may block on a full event channel before the stop flag is rechecked.
const SEND_POLL: Duration = Duration::from_millis(100);

/// A worker that derives addresses from candidate keys and tests them.
pub struct CpuWorker<S> {
    /// Worker ID
    id: usize,
    /// The pattern to match against
    pattern: Pattern,
    /// Where candidate keys come from
    source: S,
    deriver: AddressDeriver,
    /// Channel to the coordinator
    event_tx: Sender<WorkerEvent>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    progress_interval: u64,
}

impl<S: KeySource> CpuWorker<S> {
    pub fn new(
        id: usize,
        pattern: Pattern,
        source: S,
        event_tx: Sender<WorkerEvent>,
        stop_flag: Arc<AtomicBool>,
    ) -> Self {
        Self {
            id,
            pattern,
            source,
            deriver: AddressDeriver::new(),
            event_tx,
            stop_flag,
            progress_interval: PROGRESS_INTERVAL,
        }
    }

    /// Overrides the number of attempts between progress events.
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Runs the worker loop.
    ///
    /// Keeps testing candidates until:
    /// - The stop flag is set (checked before every attempt)
    /// - The key source is exhausted
    /// - The coordinator hangs up
    ///
    /// Attempts not yet reported are flushed as a final progress event.
    pub fn run(mut self) {
        let mut attempts: u64 = 0;

        while !self.stop_flag.load(Ordering::Relaxed) {
            let Some(secret_key) = self.source.next_key() else {
                break;
            };
            let Ok(address) = self.deriver.derive_base58(&secret_key) else {
                continue;
            };
            attempts += 1;

            let event = if self.pattern.matches(&address).is_match() {
                WorkerEvent::Found(FoundEvent {
                    address,
                    private_key: hex::encode(secret_key),
                    attempts,
                    worker_id: self.id,
                })
            } else if attempts >= self.progress_interval {
                WorkerEvent::Progress { attempts }
            } else {
                continue;
            };

            attempts = 0;
            if !self.send(event) {
                log::debug!("worker {}: coordinator gone", self.id);
                return;
            }
        }

        if attempts > 0 {
            self.send(WorkerEvent::Progress { attempts });
        }
        log::debug!("worker {} stopped", self.id);
    }

    /// Delivers `event`, waiting while the channel is full.
    ///
    /// Returns false if the coordinator hung up, or if the stop flag was set while
    /// waiting. A match that cannot be delivered is logged so its key survives.
    fn send(&self, mut event: WorkerEvent) -> bool {
        loop {
            match self.event_tx.send_timeout(event, SEND_POLL) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(unsent)) => {
                    if self.stop_flag.load(Ordering::Relaxed) {
                        Self::log_undelivered(&unsent);
                        return false;
                    }
                    event = unsent;
                }
                Err(SendTimeoutError::Disconnected(unsent)) => {
                    Self::log_undelivered(&unsent);
                    return false;
                }
            }
        }
    }

    fn log_undelivered(event: &WorkerEvent) {
        if let WorkerEvent::Found(found) = event {
            log::warn!(
                "undelivered match from worker {}: {} (private key {})",
                found.worker_id,
                found.address,
                found.private_key
            );
        }
    }
}
