//! Core data types for live-scope
//!
//! This module contains the small value types shared between the sample
//! buffer, the autoscale engine, the connection manager and the frontend.
//!
//! # Main Types
//!
//! - [`ConnectionState`] - Lifecycle state of the single live connection
//! - [`DisplayBounds`] - Vertical axis limits handed to the chart
//! - [`ControlState`] - Which connection controls are currently enabled
//! - [`Diagnostic`] - A surfaced, non-fatal error with its arrival time

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Default lower vertical bound
pub const DEFAULT_Y_MIN: f64 = -5.0;

/// Default upper vertical bound
pub const DEFAULT_Y_MAX: f64 = 5.0;

/// Lifecycle state of the live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection handle exists
    #[default]
    Disconnected,
    /// A connection was requested and the open acknowledgment is pending
    Connecting,
    /// The connection is open and delivering messages
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting..."),
            ConnectionState::Connected => write!(f, "Connected"),
        }
    }
}

/// Vertical axis limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for DisplayBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_Y_MIN,
            max: DEFAULT_Y_MAX,
        }
    }
}

impl DisplayBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Distance between the two limits
    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint between the two limits
    #[inline]
    pub fn center(&self) -> f64 {
        (self.max + self.min) / 2.0
    }
}

/// Enabled/disabled state of the connect and disconnect controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub connect_enabled: bool,
    pub disconnect_enabled: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl ControlState {
    /// Controls while no connection is open
    pub fn disconnected() -> Self {
        Self {
            connect_enabled: true,
            disconnect_enabled: false,
        }
    }

    /// Controls while a connection is open
    pub fn connected() -> Self {
        Self {
            connect_enabled: false,
            disconnect_enabled: true,
        }
    }

    /// Controls while waiting for the open acknowledgment
    pub fn pending() -> Self {
        Self {
            connect_enabled: false,
            disconnect_enabled: false,
        }
    }
}

/// Category of a surfaced diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The connection failed to open, errored, or closed unexpectedly
    Transport,
    /// A message could not be parsed or carried an unusable value
    Payload,
    /// The server sent an `error` field
    Server,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::Transport => write!(f, "transport"),
            DiagnosticKind::Payload => write!(f, "payload"),
            DiagnosticKind::Server => write!(f, "server"),
        }
    }
}

/// A non-fatal error surfaced to the user
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub at: DateTime<Local>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.at.format("%H:%M:%S"),
            self.kind,
            self.message
        )
    }
}
