//! TCP ingress
//!
//! Accepts producer connections and forwards every frame onto the queue.

use std::collections::HashMap;
use std::io::{BufReader, ErrorKind};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use super::{Publisher, QueuePublisher};
use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::protocol::read_frame;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Signals a running [`QueueListener`] to stop
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Open producer connections, keyed by connection id
type ConnectionRegistry = Arc<Mutex<HashMap<u64, TcpStream>>>;

/// TCP server feeding a [`MemoryQueue`](super::MemoryQueue)
///
/// ## Threads
/// - The caller's thread runs the accept loop ([`run`](Self::run))
/// - One handler thread per producer connection
///
/// On shutdown the accept loop stops, open connections are closed, and
/// handler threads are joined, dropping their publishers.
pub struct QueueListener {
    listener: TcpListener,
    publisher: QueuePublisher,
    max_connections: usize,
    read_timeout_ms: u64,
    shutdown: ShutdownHandle,
    connections: ConnectionRegistry,
    next_id: AtomicU64,
}

impl QueueListener {
    /// Bind the listen address from `config`
    pub fn bind(config: &Config, publisher: QueuePublisher) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            RelayError::Transport(format!("failed to bind {}: {}", config.listen_addr, e))
        })?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            listener,
            publisher,
            max_connections: config.max_connections,
            read_timeout_ms: config.read_timeout_ms,
            shutdown: ShutdownHandle::default(),
            connections: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that stops [`run`](Self::run) from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Accept connections until shut down (blocking)
    pub fn run(self) -> Result<()> {
        let addr = self.local_addr()?;
        tracing::info!("Accepting producers on {}", addr);

        let mut handlers: Vec<JoinHandle<()>> = Vec::new();

        let result = loop {
            if self.shutdown.is_shutdown() {
                break Ok(());
            }

            match self.listener.accept() {
                Ok((stream, peer)) => {
                    handlers.retain(|h| !h.is_finished());
                    if self.connections.lock().len() >= self.max_connections {
                        tracing::warn!(
                            "Rejecting {}: {} connections already open",
                            peer,
                            self.max_connections
                        );
                        let _ = stream.shutdown(Shutdown::Both);
                        continue;
                    }
                    match self.spawn_handler(stream, peer) {
                        Ok(handle) => handlers.push(handle),
                        Err(e) => tracing::warn!("Failed to set up connection from {}: {}", peer, e),
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    break Err(RelayError::Transport(format!("accept failed on {}: {}", addr, e)));
                }
            }
        };

        self.close_connections(handlers);
        tracing::info!("Listener on {} stopped", addr);
        result
    }

    /// Register the connection and start its handler thread
    fn spawn_handler(&self, stream: TcpStream, peer: SocketAddr) -> Result<JoinHandle<()>> {
        stream.set_nonblocking(false)?;
        stream.set_nodelay(true)?;
        if self.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(self.read_timeout_ms)))?;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.connections.lock().insert(id, stream.try_clone()?);

        let mut connection = ProducerConnection {
            reader: BufReader::new(stream),
            publisher: self.publisher.clone(),
            peer_addr: peer.to_string(),
        };
        let connections = Arc::clone(&self.connections);

        let handle = thread::Builder::new()
            .name(format!("ingress-{}", id))
            .spawn(move || {
                match connection.handle() {
                    Ok(count) => tracing::debug!(
                        "Producer {} closed after {} messages",
                        connection.peer_addr,
                        count
                    ),
                    Err(e) => tracing::warn!("Producer {} dropped: {}", connection.peer_addr, e),
                }
                connections.lock().remove(&id);
            })?;

        Ok(handle)
    }

    /// Close every open producer connection and wait for the handlers
    fn close_connections(&self, handlers: Vec<JoinHandle<()>>) {
        for stream in self.connections.lock().values() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        for handle in handlers {
            if handle.join().is_err() {
                tracing::error!("Connection handler panicked");
            }
        }
    }
}

/// Handles a single producer connection
struct ProducerConnection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// Where frames go
    publisher: QueuePublisher,

    /// Peer address for logging
    peer_addr: String,
}

impl ProducerConnection {
    /// Forward frames until the producer disconnects
    ///
    /// Returns the number of payloads published.
    fn handle(&mut self) -> Result<u64> {
        tracing::debug!("Producer connected from {}", self.peer_addr);
        let mut published = 0;

        loop {
            let payload = match read_frame(&mut self.reader) {
                Ok(payload) => payload,
                Err(RelayError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Producer {} disconnected ({:?})", self.peer_addr, e.kind());
                    return Ok(published);
                }
                Err(e) => {
                    // Framing is lost after a bad header; close the stream
                    tracing::error!("Bad frame from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            tracing::trace!("Received {} bytes from {}", payload.len(), self.peer_addr);
            self.publisher.publish(payload)?;
            published += 1;
        }
    }
}

/// Read errors that just mean the producer went away or idled out
fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::WouldBlock
            | ErrorKind::TimedOut
    )
}
