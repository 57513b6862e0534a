//! Protocol codec
//!
//! Encoding and decoding functions for envelopes and stream frames.
//!
//! ## Envelope Encoding
//!
//! Both levels use bincode with varint integers, little endian, a size limit of
//! [`MAX_PAYLOAD_SIZE`] and trailing bytes rejected:
//!
//! ```text
//! Envelope:  kind (varint) │ payload_len (varint) │ payload
//! AddItem:   key_len │ key │ value_len │ value
//! GetItem:   key_len │ key
//! RemoveItem:key_len │ key
//! GetAllItems: (empty)
//! ```
//!
//! ## Frame Format (TCP transport)
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Len (4)  │ CRC (4)  │       Envelope bytes        │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! Every function here is a pure function of its input, so workers can call
//! them concurrently without sharing any decode state.

use std::io::{Read, Write};

use bincode::Options;
use bytes::{Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{AddItem, Command, CommandKind, Envelope, GetAllItems, GetItem, RemoveItem};
use crate::error::{RelayError, Result};

/// Frame header size: 4 bytes length + 4 bytes CRC32
pub const FRAME_HEADER_SIZE: usize = 8;

/// Maximum envelope size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_PAYLOAD_SIZE as u64)
}

fn serialize<T: Serialize>(value: &T, what: &str) -> Result<Vec<u8>> {
    wire_options()
        .serialize(value)
        .map_err(|e| RelayError::Encode(format!("{}: {}", what, e)))
}

fn deserialize<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T> {
    wire_options()
        .deserialize(bytes)
        .map_err(|e| RelayError::Decode(format!("{}: {}", what, e)))
}

// =============================================================================
// Envelope Encoding/Decoding
// =============================================================================

/// Serialize the command payload only
pub fn encode_payload(command: &Command) -> Result<Vec<u8>> {
    match command {
        Command::AddItem(item) => serialize(item, "AddItem"),
        Command::GetItem(item) => serialize(item, "GetItem"),
        Command::RemoveItem(item) => serialize(item, "RemoveItem"),
        Command::GetAllItems(item) => serialize(item, "GetAllItems"),
    }
}

/// Encode a command into envelope bytes
///
/// Deterministic: the same command always produces the same bytes.
pub fn encode_envelope(command: &Command) -> Result<Vec<u8>> {
    let envelope = Envelope {
        kind: command.kind(),
        payload: encode_payload(command)?,
    };
    serialize(&envelope, "envelope")
}

/// Decode the outer envelope
///
/// Truncated, malformed or oversized input yields [`RelayError::Decode`].
pub fn decode_envelope(bytes: &[u8]) -> Result<Envelope> {
    if bytes.is_empty() {
        return Err(RelayError::Decode("envelope: empty message".to_string()));
    }
    deserialize(bytes, "envelope")
}

/// Decode a payload into the command variant named by `kind`
pub fn decode_payload(kind: CommandKind, payload: &[u8]) -> Result<Command> {
    match kind {
        CommandKind::Add => deserialize::<AddItem>(payload, "AddItem").map(Command::AddItem),
        CommandKind::Get => deserialize::<GetItem>(payload, "GetItem").map(Command::GetItem),
        CommandKind::Remove => {
            deserialize::<RemoveItem>(payload, "RemoveItem").map(Command::RemoveItem)
        }
        CommandKind::List => {
            deserialize::<GetAllItems>(payload, "GetAllItems").map(Command::GetAllItems)
        }
    }
}

/// Decode both levels in one call
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let envelope = decode_envelope(bytes)?;
    decode_payload(envelope.kind, &envelope.payload)
}

// =============================================================================
// Stream Framing
// =============================================================================

/// Wrap envelope bytes in a frame
///
/// Format: len (4, BE) + crc32 (4, BE) + envelope
pub fn encode_frame(envelope: &[u8]) -> Result<Vec<u8>> {
    if envelope.len() > MAX_PAYLOAD_SIZE as usize {
        return Err(RelayError::Encode(format!(
            "Frame too large: {} bytes (max {})",
            envelope.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + envelope.len());
    frame.extend_from_slice(&(envelope.len() as u32).to_be_bytes());
    frame.extend_from_slice(&crc32fast::hash(envelope).to_be_bytes());
    frame.extend_from_slice(envelope);
    Ok(frame)
}

/// Write one frame to a stream
pub fn write_frame<W: Write>(writer: &mut W, envelope: &[u8]) -> Result<()> {
    let frame = encode_frame(envelope)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Read one frame from a stream
///
/// Blocks until a complete frame is received. A clean end of stream surfaces
/// as [`RelayError::Io`] with `UnexpectedEof`; a bad length or checksum as
/// [`RelayError::Decode`].
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Bytes> {
    let mut header = [0u8; FRAME_HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    let expected_crc = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);

    if len > MAX_PAYLOAD_SIZE {
        return Err(RelayError::Decode(format!(
            "Frame too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut body = BytesMut::zeroed(len as usize);
    reader.read_exact(&mut body)?;

    let actual_crc = crc32fast::hash(&body);
    if actual_crc != expected_crc {
        return Err(RelayError::Decode(format!(
            "Frame checksum mismatch: expected {:08x}, got {:08x}",
            expected_crc, actual_crc
        )));
    }

    Ok(body.freeze())
}
