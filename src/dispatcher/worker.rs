//! Dispatcher worker
//!
//! One thread of the pool: take a payload, decode, apply, repeat.

use std::sync::Arc;

use super::{apply, DispatchStats, Outcome};
use crate::protocol::decode_command;
use crate::sink::OutputSink;
use crate::store::SharedStore;
use crate::transport::Inbound;

pub(super) struct Worker {
    pub(super) id: usize,
    pub(super) store: Arc<SharedStore>,
    pub(super) sink: Arc<dyn OutputSink>,
    pub(super) inbound: Inbound,
    pub(super) stats: Arc<DispatchStats>,
}

impl Worker {
    /// Consume payloads until the queue is closed and drained
    pub(super) fn run(self) {
        tracing::debug!(worker = self.id, "Worker started");

        for payload in self.inbound.iter() {
            self.process(&payload);
        }

        tracing::debug!(worker = self.id, "Queue closed, worker exiting");
    }

    /// Handle one message; never fails the loop
    fn process(&self, payload: &[u8]) {
        self.stats.record_received();

        // Decoding works on the payload slice alone, nothing is carried over
        // between messages or shared with other workers
        let command = match decode_command(payload) {
            Ok(command) => command,
            Err(e) => {
                tracing::error!(worker = self.id, "Dropping message: {}", e);
                self.stats.record_dropped();
                return;
            }
        };

        tracing::trace!(worker = self.id, "Applying {:?}", command);

        match apply(&self.store, self.sink.as_ref(), command) {
            Ok(Outcome::NotFound) => {
                self.stats.record_applied();
                self.stats.record_not_found();
            }
            Ok(_) => self.stats.record_applied(),
            Err(e) => {
                tracing::error!(worker = self.id, "{}", e);
                self.stats.record_applied();
                self.stats.record_sink_error();
            }
        }
    }
}
