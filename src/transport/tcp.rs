//! TCP publisher
//!
//! Producer side of the TCP transport: one connection, one frame per payload.

use std::io::BufWriter;
use std::net::TcpStream;

use bytes::Bytes;
use parking_lot::Mutex;

use super::Publisher;
use crate::error::{RelayError, Result};
use crate::protocol::write_frame;

/// Publishes envelopes to a [`QueueListener`](super::QueueListener)
pub struct TcpPublisher {
    writer: Mutex<BufWriter<TcpStream>>,

    /// Server address for diagnostics
    peer_addr: String,
}

impl TcpPublisher {
    /// Connect to the server's ingress address
    pub fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| RelayError::Transport(format!("failed to connect to {}: {}", addr, e)))?;

        // Disable Nagle's algorithm, commands are tiny
        stream.set_nodelay(true)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| addr.to_string());

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            writer: Mutex::new(BufWriter::new(stream)),
            peer_addr,
        })
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl Publisher for TcpPublisher {
    fn publish(&self, payload: Bytes) -> Result<()> {
        let mut writer = self.writer.lock();
        write_frame(&mut *writer, &payload).map_err(|e| match e {
            RelayError::Io(io) => {
                RelayError::Transport(format!("failed to publish to {}: {}", self.peer_addr, io))
            }
            other => other,
        })
    }
}
