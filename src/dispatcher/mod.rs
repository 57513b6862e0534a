//! Dispatcher Module
//!
//! Pool of worker threads applying queued commands to the shared store.
//!
//! ## Concurrency Model
//! - N workers compete for payloads on one [`Inbound`] stream; each payload is
//!   handled by exactly one worker
//! - No ordering between payloads taken by different workers
//! - All workers apply to one [`SharedStore`]; every store operation is
//!   mutually exclusive, and a listing holds the lock until its last entry
//! - Workers block only while waiting for the next payload
//!
//! ## Failure Policy
//! - Undecodable messages are logged and dropped (no retry, no dead letter)
//! - Sink write failures are logged; the store change stands
//! - Nothing aborts the worker loop; workers exit when the stream closes

mod apply;
mod worker;

pub use apply::{apply, Outcome};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{RelayError, Result};
use crate::sink::OutputSink;
use crate::store::SharedStore;
use crate::transport::Inbound;
use worker::Worker;

/// Message counters shared by all workers
#[derive(Debug, Default)]
pub struct DispatchStats {
    received: AtomicU64,
    applied: AtomicU64,
    dropped: AtomicU64,
    not_found: AtomicU64,
    sink_errors: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Payloads taken off the queue
    pub received: u64,

    /// Commands decoded and applied to the store
    pub applied: u64,

    /// Payloads dropped because they did not decode
    pub dropped: u64,

    /// GetItem commands for keys that were not live
    pub not_found: u64,

    /// Applied commands whose output could not be written
    pub sink_errors: u64,
}

impl DispatchStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            applied: self.applied.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            sink_errors: self.sink_errors.load(Ordering::Relaxed),
        }
    }

    fn record_received(&self) {
        self.received.fetch_add(1, Ordering::Relaxed);
    }

    fn record_applied(&self) {
        self.applied.fetch_add(1, Ordering::Relaxed);
    }

    fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    fn record_sink_error(&self) {
        self.sink_errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// Running worker pool
pub struct Dispatcher {
    workers: Vec<JoinHandle<()>>,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    /// Spawn `workers` threads consuming `inbound`
    pub fn start(
        workers: usize,
        store: Arc<SharedStore>,
        sink: Arc<dyn OutputSink>,
        inbound: Inbound,
    ) -> Result<Self> {
        if workers == 0 {
            return Err(RelayError::Config(
                "worker count must be a positive integer".to_string(),
            ));
        }

        let stats = Arc::new(DispatchStats::default());
        let mut handles = Vec::with_capacity(workers);

        for id in 0..workers {
            let worker = Worker {
                id,
                store: Arc::clone(&store),
                sink: Arc::clone(&sink),
                inbound: inbound.clone(),
                stats: Arc::clone(&stats),
            };

            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || worker.run())?;
            handles.push(handle);
        }

        tracing::info!("Dispatcher started with {} workers", workers);

        Ok(Self {
            workers: handles,
            stats,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Current message counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Wait for every worker to drain the closed queue
    ///
    /// Only returns once all publishers feeding the queue are gone.
    pub fn join(self) -> StatsSnapshot {
        for (id, handle) in self.workers.into_iter().enumerate() {
            if handle.join().is_err() {
                tracing::error!("Worker {} panicked", id);
            }
        }

        let stats = self.stats.snapshot();
        tracing::info!(
            received = stats.received,
            applied = stats.applied,
            dropped = stats.dropped,
            "Dispatcher stopped"
        );
        stats
    }
}
