//! `ParlorServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → session → lobby.

use std::sync::Arc;

use parlor_lobby::Lobby;
use parlor_protocol::JsonCodec;
use parlor_session::SessionManager;
use parlor_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::ParlorError;

/// Shared server state handed to each connection task.
///
/// The lobby mutex serializes every room mutation; the session mutex
/// guards the delivery channels. They are never held at the same time.
pub(crate) struct ServerState {
    pub(crate) sessions: Mutex<SessionManager>,
    pub(crate) lobby: Mutex<Lobby>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Parlor server.
pub struct ParlorServerBuilder {
    bind_addr: String,
}

impl ParlorServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and assembles the server.
    pub async fn build(self) -> Result<ParlorServer, ParlorError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionManager::new()),
            lobby: Mutex::new(Lobby::new()),
            codec: JsonCodec,
        });
        Ok(ParlorServer { transport, state })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Parlor server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParlorServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl ParlorServer {
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the accept loop, spawning a handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), ParlorError> {
        tracing::info!("parlor server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
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
