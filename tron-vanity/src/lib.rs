//! # tron_vanity
//!
//! High-performance TRON vanity address generator.
//!
//! ## Architecture
//!
//! - `crypto`: Key generation and address derivation
//! - `matcher`: Prefix/suffix pattern matching
//! - `worker`: Parallel workers, key sources and the worker pool
//! - `coordinator`: Event aggregation, stop conditions and progress reports
//! - `output`: The append-only result file
//! - `config`: Runtime configuration

pub mod config;
pub mod coordinator;
pub mod crypto;
pub mod matcher;
pub mod output;
pub mod worker;

pub use config::{Config, KeyFeed, SearchConfig};
pub use coordinator::{Coordinator, CoordinatorState, RunOutcome, RunSummary, SearchError};
pub use crypto::{AddressDeriver, Keypair, TronAddress};
pub use matcher::{MatchResult, Pattern};
pub use worker::{FoundEvent, WorkerEvent, WorkerPool};
