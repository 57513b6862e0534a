//! Command application
//!
//! What each command does to the store and the output sink.

use crate::error::{RelayError, Result};
use crate::protocol::Command;
use crate::sink::OutputSink;
use crate::store::SharedStore;

/// Result of applying one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// AddItem stored the value; `replaced` if the key was already live
    Added { replaced: bool },

    /// GetItem found the key and wrote it to the sink
    Found,

    /// GetItem on a key that is not live (not an error)
    NotFound,

    /// RemoveItem ran; `existed` if the key was live
    Removed { existed: bool },

    /// GetAllItems wrote this many entries
    Listed { entries: usize },
}

/// Apply one command to the store
///
/// - AddItem: put, no output
/// - GetItem: one sink write if present
/// - RemoveItem: remove, no output
/// - GetAllItems: one sink write per entry, front to back, with the store
///   locked for the whole traversal
///
/// Returns [`RelayError::Sink`] if any sink write failed; the store change (if
/// any) has still been applied.
pub fn apply(store: &SharedStore, sink: &dyn OutputSink, command: Command) -> Result<Outcome> {
    match command {
        Command::AddItem(item) => {
            tracing::debug!("Adding item, key: {} value: {}", item.key, item.value);
            let replaced = store.put(item.key, item.value).is_some();
            Ok(Outcome::Added { replaced })
        }
        Command::GetItem(item) => match store.get(&item.key) {
            Some(value) => {
                tracing::debug!("Getting item, key: {} value: {}", item.key, value);
                sink.write_entry(&item.key, &value)?;
                Ok(Outcome::Found)
            }
            None => {
                tracing::debug!("Item with key: {} not found", item.key);
                Ok(Outcome::NotFound)
            }
        },
        Command::RemoveItem(item) => {
            tracing::debug!("Deleting item with key: {}", item.key);
            let existed = store.remove(&item.key).is_some();
            Ok(Outcome::Removed { existed })
        }
        Command::GetAllItems(_) => {
            let mut first_error: Option<RelayError> = None;
            let mut failed = 0usize;

            let entries = store.for_each_in_order(|entry| {
                tracing::debug!("Listing item, key: {} value: {}", entry.key(), entry.value());
                if let Err(e) = sink.write_entry(entry.key(), entry.value()) {
                    failed += 1;
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            });

            match first_error {
                Some(e) => Err(RelayError::Sink(format!(
                    "{} of {} listed entries not written: {}",
                    failed, entries, e
                ))),
                None => Ok(Outcome::Listed { entries }),
            }
        }
    }
}
