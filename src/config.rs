//! Configuration for RelayKV
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{RelayError, Result};

/// Main configuration for a RelayKV consumer
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// TCP address producers publish to
    pub listen_addr: String,

    /// Max concurrent producer connections
    pub max_connections: usize,

    /// Producer connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Dispatcher Configuration
    // -------------------------------------------------------------------------
    /// Number of worker threads applying commands
    pub workers: usize,

    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// Where command results are written
    pub output: OutputTarget,

    /// Log debug information (commands applied, keys not found)
    pub debug: bool,
}

/// Destination of command results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Append to a file, creating it if needed
    File(PathBuf),

    /// Write to standard output
    Stdout,
}

impl OutputTarget {
    /// Parse a command-line value, where `-` means stdout
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(arg))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5672".to_string(),
            max_connections: 1024,
            read_timeout_ms: 0,
            workers: 4,
            output: OutputTarget::File(PathBuf::from("output.txt")),
            debug: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check values that would leave the consumer unable to run
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(RelayError::Config(
                "worker count must be a positive integer".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(RelayError::Config(
                "max connections must be a positive integer".to_string(),
            ));
        }
        if self.listen_addr.is_empty() {
            return Err(RelayError::Config("listen address is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent producer connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the worker pool size
    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count;
        self
    }

    /// Set the output destination
    pub fn output(mut self, target: OutputTarget) -> Self {
        self.config.output = target;
        self
    }

    /// Enable or disable debug logging
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
