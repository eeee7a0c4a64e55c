//! Error types for lz-monitor

use thiserror::Error;

use crate::event::EventType;

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors that can occur in the monitor
///
/// Only `Monitor::init` hands these back to the host. Inside the capture
/// pipeline they are caught per handler and logged.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A required option was empty or missing
    #[error("Missing required option: {0}")]
    MissingOption(&'static str),

    /// An option had the wrong shape at bind time
    #[error("Option `{name}` expects {expected}, got {actual}")]
    InvalidOption {
        name: String,
        expected: &'static str,
        actual: String,
    },

    /// A registered plugin failed
    #[error("Plugin error: {0}")]
    Plugin(String),

    /// A handler panicked while processing an event
    #[error("Handler for `{0}` panicked")]
    HandlerPanicked(EventType),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
