//! Producer Tests
//!
//! Tests verify:
//! - Construction-time validation per action
//! - Invalid requests never reach the publisher
//! - Published bytes decode back to the command

use bytes::Bytes;
use parking_lot::Mutex;
use relaykv::protocol::{decode_command, Command, CommandKind};
use relaykv::transport::{MemoryQueue, Publisher};
use relaykv::{CommandRequest, Producer, RelayError, Result};

/// Publisher that records every payload
#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<Bytes>>,
}

impl Publisher for RecordingPublisher {
    fn publish(&self, payload: Bytes) -> Result<()> {
        self.published.lock().push(payload);
        Ok(())
    }
}

/// Publisher whose transport is down
struct BrokenPublisher;

impl Publisher for BrokenPublisher {
    fn publish(&self, _payload: Bytes) -> Result<()> {
        Err(RelayError::Transport("connection refused".to_string()))
    }
}

fn is_construction_error<T: std::fmt::Debug>(result: &Result<T>) -> bool {
    matches!(result, Err(RelayError::Construction(_)))
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_add_requires_key_and_value() {
    let ok = CommandRequest::new(CommandKind::Add).key("k").value("v").build();
    assert_eq!(ok.unwrap(), Command::add("k", "v"));

    assert!(is_construction_error(
        &CommandRequest::new(CommandKind::Add).key("k").build()
    ));
    assert!(is_construction_error(
        &CommandRequest::new(CommandKind::Add).value("v").build()
    ));
    assert!(is_construction_error(&CommandRequest::new(CommandKind::Add).build()));
}

#[test]
fn test_empty_strings_count_as_missing() {
    assert!(is_construction_error(
        &CommandRequest::new(CommandKind::Add).key("").value("v").build()
    ));
    assert!(is_construction_error(
        &CommandRequest::new(CommandKind::Add).key("k").value("").build()
    ));
    assert!(is_construction_error(
        &CommandRequest::new(CommandKind::Get).key("").build()
    ));
    assert!(is_construction_error(
        &CommandRequest::new(CommandKind::Remove).key("").build()
    ));
}

#[test]
fn test_get_and_remove_require_key() {
    assert_eq!(
        CommandRequest::new(CommandKind::Get).key("k").build().unwrap(),
        Command::get("k")
    );
    assert_eq!(
        CommandRequest::new(CommandKind::Remove).key("k").build().unwrap(),
        Command::remove("k")
    );

    assert!(is_construction_error(&CommandRequest::new(CommandKind::Get).build()));
    assert!(is_construction_error(&CommandRequest::new(CommandKind::Remove).build()));
}

#[test]
fn test_get_ignores_value() {
    let command = CommandRequest::new(CommandKind::Get)
        .key("k")
        .value("ignored")
        .build()
        .unwrap();
    assert_eq!(command, Command::get("k"));
}

#[test]
fn test_list_takes_no_parameters() {
    assert_eq!(
        CommandRequest::new(CommandKind::List).build().unwrap(),
        Command::list()
    );
    assert_eq!(
        CommandRequest::new(CommandKind::List).key("x").value("y").build().unwrap(),
        Command::list()
    );
}

#[test]
fn test_action_selector_parses() {
    let kind: CommandKind = "remove".parse().unwrap();
    assert_eq!(kind, CommandKind::Remove);
    assert!("purge".parse::<CommandKind>().is_err());
}

// =============================================================================
// Publishing Tests
// =============================================================================

#[test]
fn test_submit_publishes_decodable_envelope() {
    let producer = Producer::new(RecordingPublisher::default());

    producer.submit(&Command::add("k", "v")).unwrap();
    producer.submit(&Command::list()).unwrap();

    let published = producer.publisher().published.lock();
    assert_eq!(published.len(), 2);
    assert_eq!(decode_command(&published[0]).unwrap(), Command::add("k", "v"));
    assert_eq!(decode_command(&published[1]).unwrap(), Command::list());
}

#[test]
fn test_invalid_request_is_not_published() {
    let producer = Producer::new(RecordingPublisher::default());

    let result = producer.submit_request(CommandRequest::new(CommandKind::Add).key("k"));

    assert!(is_construction_error(&result));
    assert!(producer.into_inner().published.lock().is_empty());
}

#[test]
fn test_submit_request_returns_command() {
    let producer = Producer::new(RecordingPublisher::default());

    let command = producer
        .submit_request(CommandRequest::new(CommandKind::Get).key("k"))
        .unwrap();

    assert_eq!(command, Command::get("k"));
    assert_eq!(producer.publisher().published.lock().len(), 1);
}

#[test]
fn test_transport_failure_is_reported() {
    let producer = Producer::new(BrokenPublisher);

    let result = producer.submit(&Command::list());

    assert!(matches!(result, Err(RelayError::Transport(_))));
    assert!(!result.unwrap_err().is_recoverable());
}

#[test]
fn test_submit_into_memory_queue() {
    let queue = MemoryQueue::new();
    let inbound = queue.subscribe();
    let producer = Producer::new(queue.publisher());

    producer.submit(&Command::remove("gone")).unwrap();

    let payload = inbound.recv().unwrap();
    assert_eq!(decode_command(&payload).unwrap(), Command::remove("gone"));
}
