//! Command definitions
//!
//! The closed set of commands a producer can publish.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// Command kinds, carried as the envelope tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    Add,
    Get,
    Remove,
    List,
}

impl CommandKind {
    /// Name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Add => "add",
            CommandKind::Get => "get",
            CommandKind::Remove => "remove",
            CommandKind::List => "list",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(CommandKind::Add),
            "get" => Ok(CommandKind::Get),
            "remove" => Ok(CommandKind::Remove),
            "list" => Ok(CommandKind::List),
            other => Err(RelayError::Construction(format!(
                "unknown action '{}', expected one of: add, get, remove, list",
                other
            ))),
        }
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Insert or update a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub key: String,
    pub value: String,
}

/// Look up a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetItem {
    pub key: String,
}

/// Delete a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub key: String,
}

/// List every entry in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetAllItems {}

/// A decoded command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddItem(AddItem),
    GetItem(GetItem),
    RemoveItem(RemoveItem),
    GetAllItems(GetAllItems),
}

impl Command {
    pub fn add(key: impl Into<String>, value: impl Into<String>) -> Self {
        Command::AddItem(AddItem {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn get(key: impl Into<String>) -> Self {
        Command::GetItem(GetItem { key: key.into() })
    }

    pub fn remove(key: impl Into<String>) -> Self {
        Command::RemoveItem(RemoveItem { key: key.into() })
    }

    pub fn list() -> Self {
        Command::GetAllItems(GetAllItems {})
    }

    /// Get the command kind
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::AddItem(_) => CommandKind::Add,
            Command::GetItem(_) => CommandKind::Get,
            Command::RemoveItem(_) => CommandKind::Remove,
            Command::GetAllItems(_) => CommandKind::List,
        }
    }

    /// The key this command targets, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Command::AddItem(item) => Some(&item.key),
            Command::GetItem(item) => Some(&item.key),
            Command::RemoveItem(item) => Some(&item.key),
            Command::GetAllItems(_) => None,
        }
    }
}
