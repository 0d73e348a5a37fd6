//! Scripted WebSocket server for end-to-end transport tests

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::thread::JoinHandle;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

/// One thing the server does, in order
#[derive(Debug, Clone)]
pub enum ServerStep {
    /// Send a text frame
    Send(String),
    /// Start the closing handshake with an optional reason
    Close(Option<String>),
    /// Keep reading until the client closes
    AwaitClientClose,
}

/// A server accepting exactly one connection on a loopback port
pub struct ScriptedServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ScriptedServer {
    pub fn spawn(script: Vec<ServerStep>) -> Self {
        let (addr_tx, addr_rx) = std::sync::mpsc::channel();

        let handle = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                addr_tx.send(listener.local_addr().unwrap()).unwrap();

                let (stream, _) = listener.accept().await.unwrap();
                let mut ws = accept_async(stream).await.unwrap();

                for step in script {
                    match step {
                        ServerStep::Send(text) => {
                            ws.send(Message::Text(text)).await.unwrap();
                        }
                        ServerStep::Close(reason) => {
                            let frame = reason.map(|reason| CloseFrame {
                                code: CloseCode::Normal,
                                reason: reason.into(),
                            });
                            let _ = ws.close(frame).await;
                            while let Some(Ok(_)) = ws.next().await {}
                        }
                        ServerStep::AwaitClientClose => {
                            while let Some(Ok(_)) = ws.next().await {}
                        }
                    }
                }
            });
        });

        let addr = addr_rx.recv().unwrap();
        Self { addr, handle }
    }

    /// Page URL whose derived endpoint points at this server
    pub fn page_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn join(self) {
        self.handle.join().unwrap();
    }
}
