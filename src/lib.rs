//! # Live Scope: real-time sample viewer
//!
//! A desktop client that connects to a WebSocket endpoint, receives a stream
//! of scalar samples as JSON, and draws the most recent window of them as a
//! line chart.
//!
//! ## Architecture
//!
//! - **Session**: the single owner of display state, mutated only on the UI thread
//! - **Connection**: a state machine plus a WebSocket transport running on its own thread
//! - **Frontend**: eframe/egui with egui_plot for the chart
//! - **Communication**: crossbeam channel from the transport thread to the UI
//!
//! ## Configuration
//!
//! Startup settings are read from `live-scope.toml` in the working directory,
//! or from the platform config directory:
//!
//! - **Linux**: `~/.config/live-scope/config.toml`
//! - **macOS**: `~/Library/Application Support/live-scope/config.toml`
//! - **Windows**: `%APPDATA%\live-scope\config.toml`
//!
//! ## Example
//!
//! ```ignore
//! use live_scope::{connection::WebSocketTransport, AppConfig, ControlAction, Session};
//!
//! let mut session = Session::new(&AppConfig::default())?;
//! let transport = WebSocketTransport::new();
//!
//! session.apply(ControlAction::Connect, &transport);
//! loop {
//!     session.pump();
//!     let frame = session.chart_frame();
//!     // draw `frame`
//! }
//! ```

pub mod autoscale;
pub mod buffer;
pub mod chart;
pub mod config;
pub mod connection;
pub mod controls;
pub mod error;
pub mod frontend;
pub mod protocol;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use autoscale::Autoscaler;
pub use buffer::SampleBuffer;
pub use chart::ChartFrame;
pub use config::AppConfig;
pub use connection::{ConnectionEvent, ConnectionId, Transport, TransportEvent};
pub use controls::ControlAction;
pub use error::{Result, ScopeError};
pub use frontend::ScopeApp;
pub use session::Session;
pub use types::{ConnectionState, ControlState, DisplayBounds};
