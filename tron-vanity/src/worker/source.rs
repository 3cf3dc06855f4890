//! Candidate private key sources.
//!
//! A worker pulls candidates from a [`KeySource`]. The CPU path draws each key
//! from the OS CSPRNG. The batch path consumes raw candidates produced elsewhere
//! (an accelerator, or the CPU [`BatchProducer`] stand-in) and reports results
//! exactly like the CPU path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, SendTimeoutError, Sender};
use rand::RngCore;
use rayon::prelude::*;

use crate::crypto::{generate_private_key, is_valid_scalar};

/// A batch of raw 32-byte candidates.
pub type KeyBatch = Vec<[u8; 32]>;

/// Produces candidate private keys for a worker.
pub trait KeySource: Send {
    /// Returns the next valid private key, or `None` once the source is exhausted.
    fn next_key(&mut self) -> Option<[u8; 32]>;
}

/// Draws every key from the operating system's CSPRNG with rejection sampling.
#[derive(Debug, Default)]
pub struct OsKeySource;

impl KeySource for OsKeySource {
    #[inline]
    fn next_key(&mut self) -> Option<[u8; 32]> {
        Some(generate_private_key(&mut rand::rngs::OsRng))
    }
}

/// Consumes batches of raw candidates from a channel.
///
/// Candidates that are not valid scalars are dropped here, so they never count as attempts.
pub struct BatchKeySource {
    batches: Receiver<KeyBatch>,
    current: KeyBatch,
}

impl BatchKeySource {
    pub fn new(batches: Receiver<KeyBatch>) -> Self {
        Self {
            batches,
            current: Vec::new(),
        }
    }
}

impl KeySource for BatchKeySource {
    fn next_key(&mut self) -> Option<[u8; 32]> {
        loop {
            while let Some(candidate) = self.current.pop() {
                if is_valid_scalar(&candidate) {
                    return Some(candidate);
                }
            }
            // Blocks until the producer sends more or hangs up.
            self.current = self.batches.recv().ok()?;
        }
    }
}

/// Fills batches of random candidates on the CPU and feeds them to [`BatchKeySource`]s.
pub struct BatchProducer {
    batch_size: usize,
    batch_tx: Sender<KeyBatch>,
    stop_flag: Arc<AtomicBool>,
}

impl BatchProducer {
    /// How long a blocked send waits before re-checking the stop flag.
    const SEND_POLL: Duration = Duration::from_millis(100);

    pub fn new(batch_size: usize, batch_tx: Sender<KeyBatch>, stop_flag: Arc<AtomicBool>) -> Self {
        Self {
            batch_size,
            batch_tx,
            stop_flag,
        }
    }

    /// Fills one batch with random bytes, in parallel.
    pub fn fill_batch(&self) -> KeyBatch {
        let mut batch = vec![[0u8; 32]; self.batch_size];
        batch
            .par_iter_mut()
            .for_each_init(rand::thread_rng, |rng, candidate| rng.fill_bytes(candidate));
        batch
    }

    /// Produces batches until stopped or until every consumer is gone.
    ///
    /// Dropping the producer closes the channel, which lets consumers drain and exit.
    pub fn run(self) {
        'produce: while !self.stop_flag.load(Ordering::Relaxed) {
            let mut batch = self.fill_batch();
            loop {
                match self.batch_tx.send_timeout(batch, Self::SEND_POLL) {
                    Ok(()) => break,
                    Err(SendTimeoutError::Timeout(unsent)) => {
                        if self.stop_flag.load(Ordering::Relaxed) {
                            break 'produce;
                        }
                        batch = unsent;
                    }
                    Err(SendTimeoutError::Disconnected(_)) => break 'produce,
                }
            }
        }
        log::debug!("batch producer stopped");
    }
}
