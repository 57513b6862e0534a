//! Transport Module
//!
//! Moves opaque envelope bytes from producers to dispatcher workers.
//!
//! ## Architecture
//! ```text
//!  relaykv-cli ──TcpPublisher──► QueueListener ──┐
//!                                                ▼
//!                      MemoryQueue (competing consumers)
//!                        │        │        │
//!                     worker-0 worker-1 worker-N
//! ```
//!
//! - Each payload is delivered to exactly one consumer
//! - No ordering guarantee between payloads taken by different consumers
//! - Consumers see the end of the stream once every publisher is gone

mod listener;
mod memory;
mod tcp;

pub use listener::{QueueListener, ShutdownHandle};
pub use memory::{Inbound, MemoryQueue, QueuePublisher};
pub use tcp::TcpPublisher;

use bytes::Bytes;

use crate::error::Result;

/// Hands serialized envelopes to a queue
pub trait Publisher: Send + Sync {
    /// Publish one payload
    ///
    /// Failures are [`RelayError::Transport`](crate::RelayError::Transport).
    fn publish(&self, payload: Bytes) -> Result<()>;
}

impl<P: Publisher + ?Sized> Publisher for &P {
    fn publish(&self, payload: Bytes) -> Result<()> {
        (**self).publish(payload)
    }
}
