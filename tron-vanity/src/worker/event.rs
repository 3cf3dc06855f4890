//! Messages sent from workers to the coordinator.

/// A matching address found by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundEvent {
    /// The Base58Check address (`T...`)
    pub address: String,
    /// The private key (hex encoded, no 0x prefix)
    pub private_key: String,
    /// Attempts made by the worker since its previous report, this one included
    pub attempts: u64,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

/// Event emitted by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// A match, carrying the attempts counted since the worker's last report.
    Found(FoundEvent),
    /// Periodic attempt count from a worker that has not found anything since its last report.
    Progress { attempts: u64 },
}

impl WorkerEvent {
    /// Attempts carried by this event.
    pub fn attempts(&self) -> u64 {
        match self {
            WorkerEvent::Found(found) => found.attempts,
            WorkerEvent::Progress { attempts } => *attempts,
        }
    }
}
