//! Envelope definition
//!
//! Outer wrapper published on the queue.

use serde::{Deserialize, Serialize};

use super::CommandKind;

/// Kind tag plus the serialized command payload
///
/// The payload is decoded in a second step once the kind is known, see
/// [`decode_payload`](super::decode_payload).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub kind: CommandKind,
    pub payload: Vec<u8>,
}
