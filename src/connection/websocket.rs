//! WebSocket transport
//!
//! Each connection runs on its own thread with a current-thread tokio
//! runtime driving `tokio-tungstenite`. The thread never touches session
//! state: it only forwards lifecycle events, in arrival order, to the
//! channel handed over by the [`ConnectionManager`](super::ConnectionManager).
//!
//! Closing is requested through the handle. Dropping the handle has the
//! same effect, so a discarded connection never lingers.

use super::{ConnectionEvent, ConnectionHandle, ConnectionId, Transport, TransportEvent};
use crate::error::{Result, ScopeError};
use crossbeam_channel::Sender;
use futures_util::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Callback run after each forwarded event, e.g. to wake the UI
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Install the process-wide rustls crypto provider used for `wss://`.
///
/// Safe to call more than once.
pub fn install_tls_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }
}

/// Opens WebSocket connections on background threads
#[derive(Clone, Default)]
pub struct WebSocketTransport {
    waker: Option<Waker>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `waker` every time an event is forwarded
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }
}

impl Transport for WebSocketTransport {
    fn open(
        &self,
        url: &str,
        id: ConnectionId,
        events: Sender<ConnectionEvent>,
    ) -> Result<Box<dyn ConnectionHandle>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (close_tx, close_rx) = unbounded_channel();
        let open = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            id,
            url: url.to_string(),
            events,
            waker: self.waker.clone(),
            open: open.clone(),
        };

        std::thread::Builder::new()
            .name(format!("ws-connection-{}", id.0))
            .spawn(move || runtime.block_on(worker.run(close_rx)))
            .map_err(|e| ScopeError::Transport(format!("failed to spawn connection thread: {}", e)))?;

        Ok(Box::new(WebSocketHandle { id, open, close_tx }))
    }
}

/// Handle to a connection running on a worker thread
pub struct WebSocketHandle {
    id: ConnectionId,
    open: Arc<AtomicBool>,
    close_tx: UnboundedSender<()>,
}

impl ConnectionHandle for WebSocketHandle {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn close(&mut self) {
        // The worker may already be gone; nothing left to close then.
        let _ = self.close_tx.send(());
    }
}

struct Worker {
    id: ConnectionId,
    url: String,
    events: Sender<ConnectionEvent>,
    waker: Option<Waker>,
    open: Arc<AtomicBool>,
}

impl Worker {
    /// Forward an event. Returns false once nobody is listening.
    fn emit(&self, event: TransportEvent) -> bool {
        let delivered = self
            .events
            .send(ConnectionEvent::new(self.id, event))
            .is_ok();
        if let Some(waker) = &self.waker {
            waker();
        }
        delivered
    }

    async fn run(self, mut close_rx: UnboundedReceiver<()>) {
        let (mut ws, _) = match connect_async(self.url.as_str()).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("WebSocket connect to {} failed: {}", self.url, e);
                self.emit(TransportEvent::Error(e.to_string()));
                self.emit(TransportEvent::Closed { reason: None });
                return;
            }
        };

        self.open.store(true, Ordering::Release);
        if !self.emit(TransportEvent::Opened) {
            let _ = ws.close(None).await;
            return;
        }

        let mut closing = false;
        let mut reason = None;

        loop {
            tokio::select! {
                _ = close_rx.recv(), if !closing => {
                    closing = true;
                    if let Err(e) = ws.close(None).await {
                        tracing::debug!("close handshake failed: {}", e);
                        break;
                    }
                }
                frame = ws.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        if !self.emit(TransportEvent::Message(text.to_string())) {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => {
                            if !self.emit(TransportEvent::Message(text)) {
                                break;
                            }
                        }
                        Err(_) => tracing::debug!("ignoring non-UTF-8 binary frame"),
                    },
                    Some(Ok(Message::Close(frame))) => {
                        reason = frame.map(|f| f.reason.to_string());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        if !closing {
                            self.open.store(false, Ordering::Release);
                            self.emit(TransportEvent::Error(e.to_string()));
                        }
                        break;
                    }
                    None => break,
                },
            }
        }

        self.open.store(false, Ordering::Release);
        self.emit(TransportEvent::Closed { reason });
        tracing::debug!("connection {} worker finished", self.id);
    }
}
