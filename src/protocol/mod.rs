//! Protocol Module
//!
//! Defines the commands producers publish and how they travel on the queue.
//!
//! ## Two-Level Envelope
//!
//! ```text
//! Envelope   { kind: ADD | GET | REMOVE | LIST, payload: bytes }
//! AddItem    { key, value }
//! GetItem    { key }
//! RemoveItem { key }
//! GetAllItems{}
//! ```
//!
//! The envelope is decoded first; its `kind` selects the payload type for the
//! second stage.

mod codec;
mod command;
mod envelope;

pub use codec::{
    decode_command, decode_envelope, decode_payload, encode_envelope, encode_frame,
    encode_payload, read_frame, write_frame, FRAME_HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
pub use command::{AddItem, Command, CommandKind, GetAllItems, GetItem, RemoveItem};
pub use envelope::Envelope;
