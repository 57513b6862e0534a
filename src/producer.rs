//! Producer
//!
//! Builds commands from user input and publishes them.
//!
//! Validation happens here, before anything touches the transport:
//! - add: key and value, both non-empty
//! - get / remove: non-empty key
//! - list: no parameters (any given are ignored)

use bytes::Bytes;

use crate::error::{RelayError, Result};
use crate::protocol::{encode_envelope, Command, CommandKind};
use crate::transport::Publisher;

/// Unvalidated producer input: an action selector plus optional parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub kind: CommandKind,
    pub key: Option<String>,
    pub value: Option<String>,
}

impl CommandRequest {
    pub fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            key: None,
            value: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Validate and turn into a command
    ///
    /// Missing or empty required parameters give [`RelayError::Construction`].
    pub fn build(self) -> Result<Command> {
        match self.kind {
            CommandKind::Add => {
                let (key, value) = match (non_empty(self.key), non_empty(self.value)) {
                    (Some(key), Some(value)) => (key, value),
                    _ => {
                        return Err(RelayError::Construction(
                            "this action requires both key and value parameter".to_string(),
                        ))
                    }
                };
                Ok(Command::add(key, value))
            }
            CommandKind::Get => Ok(Command::get(required_key(self.key)?)),
            CommandKind::Remove => Ok(Command::remove(required_key(self.key)?)),
            CommandKind::List => Ok(Command::list()),
        }
    }
}

fn non_empty(param: Option<String>) -> Option<String> {
    param.filter(|s| !s.is_empty())
}

fn required_key(key: Option<String>) -> Result<String> {
    non_empty(key)
        .ok_or_else(|| RelayError::Construction("this action requires key parameter".to_string()))
}

/// Encodes commands and hands them to a [`Publisher`]
pub struct Producer<P> {
    publisher: P,
}

impl<P: Publisher> Producer<P> {
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }

    /// Encode and publish one command
    pub fn submit(&self, command: &Command) -> Result<()> {
        let envelope = encode_envelope(command)?;
        tracing::debug!(
            kind = %command.kind(),
            bytes = envelope.len(),
            "Publishing command"
        );
        self.publisher.publish(Bytes::from(envelope))
    }

    /// Validate a request, then publish it
    ///
    /// Invalid requests are rejected without calling the publisher.
    pub fn submit_request(&self, request: CommandRequest) -> Result<Command> {
        let command = request.build()?;
        self.submit(&command)?;
        Ok(command)
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn into_inner(self) -> P {
        self.publisher
    }
}
