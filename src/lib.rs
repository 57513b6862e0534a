//! # RelayKV
//!
//! An in-memory key-value store driven by commands from a message queue:
//! - Insertion-ordered map with O(1) get/put/remove
//! - Add/Get/Remove/List commands in a two-level bincode envelope
//! - Pool of worker threads competing for queued commands
//! - TCP ingress for producers, file or stdout output sink
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Producer (relaykv-cli)                    │
//! │             CommandRequest → Command → Envelope             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  TCP frames
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │           QueueListener → MemoryQueue (unbounded)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  competing consumers
//!          ┌────────────┼────────────┐
//!          ▼            ▼            ▼
//!   ┌──────────┐  ┌──────────┐  ┌──────────┐
//!   │ worker-0 │  │ worker-1 │  │ worker-N │
//!   └────┬─────┘  └────┬─────┘  └────┬─────┘
//!        └─────────────┼─────────────┘
//!                      ▼
//!             ┌─────────────────┐        ┌──────────────┐
//!             │   SharedStore   │ ─────► │  OutputSink  │
//!             │ (Mutex, ordered)│        │ (file/stdout)│
//!             └─────────────────┘        └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod protocol;
pub mod producer;
pub mod transport;
pub mod sink;
pub mod dispatcher;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RelayError, Result};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use producer::{CommandRequest, Producer};
pub use store::{OrderedStore, SharedStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of RelayKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
