//! Worker pool for parallel vanity address generation.
//!
//! This module provides:
//! - CPU workers that derive and test candidate addresses
//! - Pluggable key sources (OS entropy, or batches from an external producer)
//! - The event stream workers use to report matches and progress

mod cpu;
mod event;
mod pool;
mod source;

pub use cpu::{CpuWorker, PROGRESS_INTERVAL};
pub use event::{FoundEvent, WorkerEvent};
pub use pool::WorkerPool;
pub use source::{BatchKeySource, BatchProducer, KeyBatch, KeySource, OsKeySource};
