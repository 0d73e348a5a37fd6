//! Mock construction helpers

use crossbeam_channel::Sender;
use live_scope::connection::ConnectionHandle;
use live_scope::{ConnectionEvent, ConnectionId, Result, ScopeError, Transport, TransportEvent};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A connection opened through [`FakeTransport`]
#[derive(Clone)]
pub struct FakeConnection {
    pub url: String,
    pub id: ConnectionId,
    pub events: Sender<ConnectionEvent>,
    pub open: Arc<AtomicBool>,
    pub closes: Arc<AtomicUsize>,
}

impl FakeConnection {
    /// Deliver a lifecycle event as the transport thread would
    pub fn emit(&self, event: TransportEvent) {
        self.events
            .send(ConnectionEvent::new(self.id, event))
            .expect("session event channel should be open");
    }

    /// Complete the handshake
    pub fn accept(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.emit(TransportEvent::Opened);
    }

    pub fn message(&self, text: &str) {
        self.emit(TransportEvent::Message(text.to_string()));
    }

    /// Drop the connection from the remote side
    pub fn fail(&self, error: &str) {
        self.open.store(false, Ordering::SeqCst);
        self.emit(TransportEvent::Error(error.to_string()));
        self.emit(TransportEvent::Closed { reason: None });
    }

    /// Finish a close, as after the closing handshake
    pub fn closed(&self, reason: Option<&str>) {
        self.open.store(false, Ordering::SeqCst);
        self.emit(TransportEvent::Closed {
            reason: reason.map(str::to_string),
        });
    }

    pub fn close_requests(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

struct FakeHandle {
    id: ConnectionId,
    open: Arc<AtomicBool>,
    closes: Arc<AtomicUsize>,
}

impl ConnectionHandle for FakeHandle {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Transport that records every open and lets the test drive events
#[derive(Default)]
pub struct FakeTransport {
    connections: Mutex<Vec<FakeConnection>>,
    refuse: AtomicBool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent opens fail synchronously
    pub fn refuse_opens(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub fn open_count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }

    /// Most recently opened connection
    pub fn last(&self) -> FakeConnection {
        self.connections
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no connection has been opened")
    }
}

impl Transport for FakeTransport {
    fn open(
        &self,
        url: &str,
        id: ConnectionId,
        events: Sender<ConnectionEvent>,
    ) -> Result<Box<dyn ConnectionHandle>> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(ScopeError::Transport("connection refused".into()));
        }

        let connection = FakeConnection {
            url: url.to_string(),
            id,
            events,
            open: Arc::new(AtomicBool::new(false)),
            closes: Arc::new(AtomicUsize::new(0)),
        };
        let handle = FakeHandle {
            id,
            open: connection.open.clone(),
            closes: connection.closes.clone(),
        };
        self.connections.lock().unwrap().push(connection);
        Ok(Box::new(handle))
    }
}
