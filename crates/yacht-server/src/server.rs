//! `YachtServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → rooms. Each accepted
//! connection runs in its own task; each room runs in its own actor task.

use std::sync::Arc;

use tokio::sync::Mutex;

use yacht_protocol::JsonCodec;
use yacht_room::{RoomConfig, RoomRegistry};

use crate::ServerError;
use crate::handler::handle_connection;
use crate::transport::WsListener;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) rooms: Mutex<RoomRegistry>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Yacht Dice server.
pub struct YachtServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl YachtServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the capacity configuration applied to new rooms.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the listener and builds the server.
    pub async fn build(self) -> Result<YachtServer, ServerError> {
        let listener = WsListener::bind(&self.bind_addr).await?;
        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomRegistry::with_config(self.room_config)),
            codec: JsonCodec,
        });
        Ok(YachtServer { listener, state })
    }
}

impl Default for YachtServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Yacht Dice game server.
pub struct YachtServer {
    listener: WsListener,
    state: Arc<ServerState>,
}

impl YachtServer {
    pub fn builder() -> YachtServerBuilder {
        YachtServerBuilder::new()
    }

    /// The address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop until the process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("yacht dice server running");

        loop {
            match self.listener.accept().await {
                Ok((conn_id, _addr, ws)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn_id, ws, state).await {
                            tracing::debug!(%conn_id, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
