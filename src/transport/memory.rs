//! In-process queue
//!
//! Unbounded multi-producer, multi-consumer channel.

use bytes::Bytes;
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use super::Publisher;
use crate::error::{RelayError, Result};

/// Competing-consumers queue of opaque payloads
///
/// The queue holds one publisher of its own; consumers only observe the end of
/// the stream once the queue and every [`QueuePublisher`] have been dropped.
pub struct MemoryQueue {
    tx: Sender<Bytes>,
    rx: Receiver<Bytes>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { tx, rx }
    }

    /// A new publishing handle
    pub fn publisher(&self) -> QueuePublisher {
        QueuePublisher {
            tx: self.tx.clone(),
        }
    }

    /// A new consuming handle; payloads are split between all handles
    pub fn subscribe(&self) -> Inbound {
        Inbound {
            rx: self.rx.clone(),
        }
    }

    /// Payloads published but not yet taken
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for MemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Publishing side of a [`MemoryQueue`]
#[derive(Clone)]
pub struct QueuePublisher {
    tx: Sender<Bytes>,
}

impl Publisher for QueuePublisher {
    fn publish(&self, payload: Bytes) -> Result<()> {
        self.tx
            .send(payload)
            .map_err(|_| RelayError::Transport("queue has no consumers left".to_string()))
    }
}

/// Consuming side of a [`MemoryQueue`]
#[derive(Clone)]
pub struct Inbound {
    rx: Receiver<Bytes>,
}

impl Inbound {
    /// Block until the next payload arrives
    ///
    /// Returns `None` once the queue is closed and drained.
    pub fn recv(&self) -> Option<Bytes> {
        self.rx.recv().ok()
    }

    /// Like [`recv`](Self::recv) but gives up after `timeout`
    ///
    /// `Ok(None)` means the timeout elapsed; an error means the queue is
    /// closed and drained.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<Bytes>> {
        match self.rx.recv_timeout(timeout) {
            Ok(payload) => Ok(Some(payload)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                Err(RelayError::Transport("queue closed".to_string()))
            }
        }
    }

    /// Blocking iterator over payloads until the queue is closed and drained
    pub fn iter(&self) -> impl Iterator<Item = Bytes> + '_ {
        self.rx.iter()
    }
}
