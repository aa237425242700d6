//! WebSocket listener built on `tokio-tungstenite`.

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// An accepted WebSocket stream.
pub type WsStream = WebSocketStream<TcpStream>;

/// Opaque identifier for a connection, for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listen socket failed.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The WebSocket upgrade handshake failed.
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tokio_tungstenite::tungstenite::Error),
}

/// Listens for and upgrades incoming WebSocket connections.
pub struct WsListener {
    listener: TcpListener,
}

impl WsListener {
    /// Binds a listener to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await.map_err(TransportError::Bind)?;
        tracing::info!(addr, "WebSocket listener bound");
        Ok(Self { listener })
    }

    /// The address the listener is actually bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for the next connection and completes the WebSocket upgrade.
    pub async fn accept(&self) -> Result<(ConnectionId, SocketAddr, WsStream), TransportError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::Accept)?;

        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(TransportError::Handshake)?;

        let id = ConnectionId(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, "accepted WebSocket connection");
        Ok((id, addr, ws))
    }
}
