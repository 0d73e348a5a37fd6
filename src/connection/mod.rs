//! Connection lifecycle
//!
//! The [`ConnectionManager`] owns the single live connection and turns the
//! transport's lifecycle events into state, control and buffer updates.
//! Transports run wherever they like (the WebSocket one uses its own thread)
//! and report back through a crossbeam channel; the manager is only ever
//! touched from the thread that drains that channel.
//!
//! # State machine
//!
//! ```text
//!   Disconnected --connect()--> Connecting --Opened--> Connected
//!        ^                          |                      |
//!        +------- Closed / Error ---+----------------------+
//! ```
//!
//! `disconnect()` only *requests* a close; the transition back to
//! `Disconnected` happens when the transport reports `Closed`.
//!
//! Every opened connection gets a fresh [`ConnectionId`]. Events carrying an
//! id other than the current handle's are leftovers from a discarded
//! connection and are dropped.

pub mod websocket;

pub use websocket::{install_tls_provider, WebSocketTransport};

use crate::buffer::SampleBuffer;
use crate::error::{Result, ResultExt, ScopeError};
use crate::protocol::InboundMessage;
use crate::types::{ConnectionState, ControlState};
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Identifies one opened connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle event reported by a transport
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The open handshake completed
    Opened,
    /// A text frame arrived
    Message(String),
    /// The connection failed or broke
    Error(String),
    /// The connection is gone
    Closed { reason: Option<String> },
}

/// A transport event tagged with the connection it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionEvent {
    pub id: ConnectionId,
    pub event: TransportEvent,
}

impl ConnectionEvent {
    pub fn new(id: ConnectionId, event: TransportEvent) -> Self {
        Self { id, event }
    }
}

/// Live side of an opened connection
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionHandle: Send {
    fn id(&self) -> ConnectionId;

    /// Whether the open handshake completed and no close has been seen
    fn is_open(&self) -> bool;

    /// Ask the transport to close. The `Closed` event follows asynchronously.
    fn close(&mut self);
}

/// Something that can open a connection to a URL
#[cfg_attr(test, mockall::automock)]
pub trait Transport {
    /// Start opening `url`. Lifecycle events for it go to `events`.
    fn open(
        &self,
        url: &str,
        id: ConnectionId,
        events: Sender<ConnectionEvent>,
    ) -> Result<Box<dyn ConnectionHandle>>;
}

/// Result of dispatching one inbound message
#[derive(Debug, Default)]
pub struct MessageOutcome {
    /// Sample pushed into the buffer, if any
    pub pushed: Option<f64>,
    /// Payload problems and server-reported errors to surface
    pub errors: Vec<ScopeError>,
}

/// Owner of the single live connection
pub struct ConnectionManager {
    state: ConnectionState,
    controls: ControlState,
    handle: Option<Box<dyn ConnectionHandle>>,
    next_id: u64,
    event_tx: Sender<ConnectionEvent>,
    event_rx: Receiver<ConnectionEvent>,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("state", &self.state)
            .field("controls", &self.controls)
            .field("handle", &self.current_id())
            .finish()
    }
}

impl ConnectionManager {
    pub fn new() -> Self {
        let (event_tx, event_rx) = unbounded();
        Self {
            state: ConnectionState::Disconnected,
            controls: ControlState::disconnected(),
            handle: None,
            next_id: 1,
            event_tx,
            event_rx,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    /// Id of the connection currently held, if any
    pub fn current_id(&self) -> Option<ConnectionId> {
        self.handle.as_ref().map(|h| h.id())
    }

    /// Sender transports report into. Exposed for injecting synthetic events.
    pub fn event_sender(&self) -> Sender<ConnectionEvent> {
        self.event_tx.clone()
    }

    /// Take every pending event, in arrival order
    pub fn drain_events(&self) -> Vec<ConnectionEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Open a connection to `url`.
    ///
    /// Only valid while disconnected; otherwise nothing happens and
    /// `Ok(false)` is returned. If the transport refuses to start, the
    /// manager falls back to `Disconnected` and the error is returned.
    pub fn connect(&mut self, transport: &dyn Transport, url: &str) -> Result<bool> {
        if self.state != ConnectionState::Disconnected {
            tracing::debug!("connect ignored while {}", self.state);
            return Ok(false);
        }

        let id = ConnectionId(self.next_id);
        self.next_id += 1;
        self.state = ConnectionState::Connecting;
        self.controls = ControlState::pending();
        tracing::info!("Connecting {} to {}", id, url);

        match transport
            .open(url, id, self.event_tx.clone())
            .with_context(|| format!("Failed to open {}", url))
        {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(true)
            }
            Err(e) => {
                self.to_disconnected();
                Err(e)
            }
        }
    }

    /// Request a close of the open connection.
    ///
    /// Returns whether a close was requested. The state does not change here.
    pub fn disconnect(&mut self) -> bool {
        match self.handle.as_mut() {
            Some(handle) if handle.is_open() => {
                tracing::info!("Closing connection {}", handle.id());
                handle.close();
                true
            }
            _ => {
                tracing::debug!("disconnect ignored: no open connection");
                false
            }
        }
    }

    fn is_current(&self, id: ConnectionId) -> bool {
        if self.current_id() == Some(id) {
            true
        } else {
            tracing::trace!("Dropping event from stale connection {}", id);
            false
        }
    }

    /// Open acknowledgment. Returns whether it applied.
    pub fn on_open(&mut self, id: ConnectionId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        tracing::info!("Connection {} established", id);
        self.state = ConnectionState::Connected;
        self.controls = ControlState::connected();
        true
    }

    /// Decode one text frame and push its sample into `buffer`
    pub fn on_message(
        &mut self,
        id: ConnectionId,
        text: &str,
        buffer: &mut SampleBuffer,
    ) -> MessageOutcome {
        let mut outcome = MessageOutcome::default();
        if !self.is_current(id) {
            return outcome;
        }

        let message = match InboundMessage::decode(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Failed to process message: {}", e);
                outcome.errors.push(e);
                return outcome;
            }
        };

        match message.sample() {
            Some(Ok(value)) => {
                tracing::trace!("sample {}", value);
                buffer.push(value);
                outcome.pushed = Some(value);
            }
            Some(Err(e)) => {
                tracing::warn!("{}", e);
                outcome.errors.push(e);
            }
            None => {}
        }

        if let Some(error) = message.error {
            tracing::warn!("Server error: {}", error);
            outcome.errors.push(ScopeError::ServerError(error));
        }

        outcome
    }

    /// Transport error. Collapses to `Disconnected`. Returns whether it applied.
    pub fn on_error(&mut self, id: ConnectionId, error: &str) -> bool {
        if !self.is_current(id) {
            return false;
        }
        tracing::warn!("Connection {} error: {}", id, error);
        self.to_disconnected();
        true
    }

    /// Close notification. Returns whether it applied.
    pub fn on_close(&mut self, id: ConnectionId, reason: Option<&str>) -> bool {
        if !self.is_current(id) {
            return false;
        }
        match reason {
            Some(reason) if !reason.is_empty() => {
                tracing::info!("Connection {} closed: {}", id, reason)
            }
            _ => tracing::info!("Connection {} closed", id),
        }
        self.to_disconnected();
        true
    }

    fn to_disconnected(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.controls = ControlState::disconnected();
        self.handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_handle(id: ConnectionId, expect_close: usize) -> MockConnectionHandle {
        let mut handle = MockConnectionHandle::new();
        handle.expect_id().return_const(id);
        handle.expect_is_open().return_const(true);
        handle.expect_close().times(expect_close).return_const(());
        handle
    }

    fn accepting_transport(expect_close: usize) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_open()
            .times(1)
            .returning(move |_, id, _| {
                Ok(Box::new(open_handle(id, expect_close)) as Box<dyn ConnectionHandle>)
            });
        transport
    }

    #[test]
    fn test_initial_state() {
        let manager = ConnectionManager::new();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert_eq!(manager.controls(), ControlState::disconnected());
        assert!(manager.current_id().is_none());
    }

    #[test]
    fn test_connect_then_open() {
        let transport = accepting_transport(0);
        let mut manager = ConnectionManager::new();

        assert!(manager.connect(&transport, "ws://localhost/ws").unwrap());
        assert_eq!(manager.state(), ConnectionState::Connecting);
        assert_eq!(manager.controls(), ControlState::pending());

        let id = manager.current_id().unwrap();
        assert!(manager.on_open(id));
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(manager.controls(), ControlState::connected());
    }

    #[test]
    fn test_connect_while_connected_is_noop() {
        // times(1) on open() fails the test if a second connection is opened
        let transport = accepting_transport(0);
        let mut manager = ConnectionManager::new();
        manager.connect(&transport, "ws://localhost/ws").unwrap();
        let id = manager.current_id().unwrap();
        manager.on_open(id);

        assert!(!manager.connect(&transport, "ws://localhost/ws").unwrap());
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(manager.current_id(), Some(id));
    }

    #[test]
    fn test_open_failure_returns_to_disconnected() {
        let mut transport = MockTransport::new();
        transport
            .expect_open()
            .returning(|_, _, _| Err(ScopeError::Transport("connection refused".into())));

        let mut manager = ConnectionManager::new();
        let err = manager.connect(&transport, "ws://localhost/ws").unwrap_err();
        assert!(err.is_transport());
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert_eq!(manager.controls(), ControlState::disconnected());
    }

    #[test]
    fn test_disconnect_requests_close_without_transition() {
        let transport = accepting_transport(1);
        let mut manager = ConnectionManager::new();
        manager.connect(&transport, "ws://localhost/ws").unwrap();
        let id = manager.current_id().unwrap();
        manager.on_open(id);

        assert!(manager.disconnect());
        assert_eq!(manager.state(), ConnectionState::Connected);

        assert!(manager.on_close(id, Some("client request")));
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(manager.current_id().is_none());
    }

    #[test]
    fn test_disconnect_while_disconnected_is_noop() {
        let mut manager = ConnectionManager::new();
        assert!(!manager.disconnect());
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_error_collapses_and_stale_close_ignored() {
        let transport = accepting_transport(0);
        let mut manager = ConnectionManager::new();
        manager.connect(&transport, "ws://localhost/ws").unwrap();
        let id = manager.current_id().unwrap();
        manager.on_open(id);

        assert!(manager.on_error(id, "broken pipe"));
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(!manager.on_close(id, None));
    }

    #[test]
    fn test_message_dispatch() {
        let transport = accepting_transport(0);
        let mut manager = ConnectionManager::new();
        let mut buffer = SampleBuffer::default();
        manager.connect(&transport, "ws://localhost/ws").unwrap();
        let id = manager.current_id().unwrap();
        manager.on_open(id);

        let outcome = manager.on_message(id, r#"{"value": 1.5}"#, &mut buffer);
        assert_eq!(outcome.pushed, Some(1.5));
        assert!(outcome.errors.is_empty());

        let outcome = manager.on_message(id, r#"{"error": "bad input"}"#, &mut buffer);
        assert!(outcome.pushed.is_none());
        assert!(matches!(outcome.errors.as_slice(), [ScopeError::ServerError(_)]));

        let outcome = manager.on_message(id, "{{garbage", &mut buffer);
        assert!(matches!(outcome.errors.as_slice(), [ScopeError::Payload(_)]));

        assert_eq!(buffer.snapshot(), vec![1.5]);
        assert_eq!(manager.state(), ConnectionState::Connected);
    }

    #[test]
    fn test_message_with_value_and_error() {
        let transport = accepting_transport(0);
        let mut manager = ConnectionManager::new();
        let mut buffer = SampleBuffer::default();
        manager.connect(&transport, "ws://localhost/ws").unwrap();
        let id = manager.current_id().unwrap();

        let outcome = manager.on_message(id, r#"{"value": 2, "error": "late"}"#, &mut buffer);
        assert_eq!(outcome.pushed, Some(2.0));
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn test_stale_message_ignored() {
        let mut manager = ConnectionManager::new();
        let mut buffer = SampleBuffer::default();
        let outcome = manager.on_message(ConnectionId(42), r#"{"value": 1}"#, &mut buffer);
        assert!(outcome.pushed.is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_drain_preserves_order() {
        let manager = ConnectionManager::new();
        let tx = manager.event_sender();
        let id = ConnectionId(1);
        tx.send(ConnectionEvent::new(id, TransportEvent::Opened)).unwrap();
        tx.send(ConnectionEvent::new(id, TransportEvent::Message("a".into()))).unwrap();
        tx.send(ConnectionEvent::new(id, TransportEvent::Message("b".into()))).unwrap();

        let events = manager.drain_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event, TransportEvent::Opened);
        assert_eq!(events[2].event, TransportEvent::Message("b".into()));
        assert!(manager.drain_events().is_empty());
    }
}
