//! Error handling for live-scope
//!
//! This module defines the error taxonomy and a Result alias for use
//! throughout the application. None of these errors is fatal to a running
//! session: transport errors collapse the connection to `Disconnected`,
//! payload errors become diagnostics, and configuration errors are rejected
//! before they reach the sample buffer.

use thiserror::Error;

/// Main error type for live-scope operations
#[derive(Error, Debug)]
pub enum ScopeError {
    /// A window capacity of zero was requested
    #[error("Invalid capacity: {0} (must be at least 1)")]
    InvalidCapacity(usize),

    /// The connection could not be opened or failed while open
    #[error("Transport error: {0}")]
    Transport(String),

    /// Errors raised by the WebSocket client
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// An inbound message could not be parsed
    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The server reported an error in the `error` field of a message
    #[error("Server error: {0}")]
    ServerError(String),

    /// The `value` field was not a number
    #[error("Non-numeric sample rejected: {0}")]
    InvalidSample(String),

    /// A sample was NaN or infinite
    #[error("Non-finite sample rejected: {0}")]
    NonFiniteSample(f64),

    /// The configured page URL cannot be turned into a WebSocket endpoint
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// Errors related to configuration loading
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ScopeError>,
    },
}

impl ScopeError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ScopeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error belongs to the transport class
    pub fn is_transport(&self) -> bool {
        match self {
            ScopeError::Transport(_) | ScopeError::WebSocket(_) => true,
            ScopeError::WithContext { source, .. } => source.is_transport(),
            _ => false,
        }
    }
}

/// Result type alias for live-scope operations
pub type Result<T> = std::result::Result<T, ScopeError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
