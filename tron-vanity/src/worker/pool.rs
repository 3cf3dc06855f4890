//! Worker pool management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::config::{KeyFeed, SearchConfig};
use crate::matcher::Pattern;

use super::cpu::CpuWorker;
use super::event::WorkerEvent;
use super::source::{BatchKeySource, BatchProducer, KeySource, OsKeySource};

/// Batches buffered between the producer and the workers in hybrid mode.
const BATCH_QUEUE_DEPTH: usize = 10;

/// Events buffered between the workers and the coordinator.
const EVENT_QUEUE_DEPTH: usize = 100;

/// Manages a pool of workers for parallel vanity address generation.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Worker (and producer) thread handles, taken on join
    handles: Option<Vec<JoinHandle<()>>>,
    /// Events from all workers
    event_rx: Receiver<WorkerEvent>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Spawns one worker per configured processing unit.
    pub fn new(config: &SearchConfig) -> Self {
        let (event_tx, event_rx) = bounded(EVENT_QUEUE_DEPTH);
        let stop_flag = Arc::new(AtomicBool::new(false));

        let handles = match config.feed {
            KeyFeed::Os => Self::spawn_workers(config, |_| OsKeySource, event_tx, &stop_flag),
            KeyFeed::Batch { batch_size } => {
                let (batch_tx, batch_rx) = bounded(BATCH_QUEUE_DEPTH);
                let producer = BatchProducer::new(batch_size, batch_tx, stop_flag.clone());
                let producer_handle = thread::Builder::new()
                    .name("vanity-producer".into())
                    .spawn(move || producer.run())
                    .expect("Failed to spawn producer thread");

                let mut handles = Self::spawn_workers(
                    config,
                    |_| BatchKeySource::new(batch_rx.clone()),
                    event_tx,
                    &stop_flag,
                );
                handles.push(producer_handle);
                handles
            }
        };

        log::debug!("spawned {} workers ({})", config.workers, config.feed);

        Self {
            num_workers: config.workers,
            handles: Some(handles),
            event_rx,
            stop_flag,
        }
    }

    /// Spawns worker threads, each with its own key source.
    fn spawn_workers<S, F>(
        config: &SearchConfig,
        make_source: F,
        event_tx: Sender<WorkerEvent>,
        stop_flag: &Arc<AtomicBool>,
    ) -> Vec<JoinHandle<()>>
    where
        S: KeySource + 'static,
        F: Fn(usize) -> S,
    {
        (0..config.workers)
            .map(|id| {
                let pattern: Pattern = config.pattern.clone();
                let source = make_source(id);
                let event_tx = event_tx.clone();
                let stop_flag = stop_flag.clone();
                let progress_interval = config.progress_interval;

                thread::Builder::new()
                    .name(format!("vanity-worker-{}", id))
                    .spawn(move || {
                        CpuWorker::new(id, pattern, source, event_tx, stop_flag)
                            .with_progress_interval(progress_interval)
                            .run();
                    })
                    .expect("Failed to spawn worker thread")
            })
            .collect()
    }

    /// Receiver of worker events. Disconnects once every worker has exited.
    pub fn events(&self) -> &Receiver<WorkerEvent> {
        &self.event_rx
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Stops and waits for all workers to complete.
    pub fn join(mut self) {
        self.join_all();
    }

    fn join_all(&mut self) {
        self.stop();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                if handle.join().is_err() {
                    log::warn!("a worker thread panicked");
                }
            }
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.join_all();
    }
}
