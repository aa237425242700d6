//! WebSocket server for Yacht Dice.
//!
//! Accepts connections, performs the hello handshake, and routes lobby
//! operations and game actions to `yacht-room`. Build one with
//! [`YachtServer::builder`]:
//!
//! ```rust,no_run
//! use yacht_server::YachtServer;
//!
//! # async fn run() -> Result<(), yacht_server::ServerError> {
//! let server = YachtServer::builder().bind("0.0.0.0:8080").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;
mod transport;

pub use error::ServerError;
pub use server::{YachtServer, YachtServerBuilder};
pub use transport::{ConnectionId, TransportError, WsListener, WsStream};
