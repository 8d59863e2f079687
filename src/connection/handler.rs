// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a client connection.

use super::guard::ConnectionGuard;
use crate::core::handler::{RouteResponse, Router};
use crate::core::metrics;
use crate::core::protocol::{Command, LineCodec, Reply};
use crate::core::state::ServerState;
use crate::core::MinesweeperError;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// The next step for the connection's main loop to take.
enum NextAction {
    Continue,
    ExitLoop,
}

/// Manages one client: greets it, then serves one command per input line
/// until `bye`, a bomb, EOF, an I/O error or server shutdown.
pub struct ConnectionHandler<S> {
    framed: Framed<S, LineCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    router: Router,
    shutdown_rx: broadcast::Receiver<()>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new `ConnectionHandler`.
    pub fn new(
        socket: S,
        addr: SocketAddr,
        state: Arc<ServerState>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            framed: Framed::new(socket, LineCodec::new()),
            addr,
            router: Router::new(state.clone(), addr),
            state,
            shutdown_rx,
        }
    }

    /// The main event loop for the connection. The player slot is held by a
    /// guard for the whole call, so it is released on every exit path.
    pub async fn run(&mut self) -> Result<(), MinesweeperError> {
        let guard = ConnectionGuard::new(self.state.clone(), self.addr);
        self.framed
            .send(Reply::Welcome {
                players: guard.players_at_join(),
            })
            .await?;

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Connection handler for {} received shutdown signal.", self.addr);
                    break;
                }
                result = self.framed.next() => {
                    match result {
                        Some(Ok(line)) => match self.process_line(&line).await? {
                            NextAction::Continue => {}
                            NextAction::ExitLoop => {
                                if let Err(e) = self.framed.close().await {
                                    debug!("Error closing connection to {}: {}", self.addr, e);
                                }
                                break;
                            }
                        },
                        Some(Err(e)) => {
                            if e.is_normal_disconnect() {
                                debug!("Connection from {} closed by peer: {}", self.addr, e);
                            } else {
                                warn!("Connection error for {}: {}", self.addr, e);
                            }
                            break;
                        }
                        None => {
                            debug!("Connection from {} closed by peer.", self.addr);
                            break;
                        }
                    }
                }
            }
        }

        drop(guard);
        Ok(())
    }

    /// Parses one line, executes it and writes the reply. Unrecognized lines
    /// get no reply at all.
    async fn process_line(&mut self, line: &str) -> Result<NextAction, MinesweeperError> {
        debug!("Received line from {}: {:?}", self.addr, line);
        let Some(command) = Command::parse(line) else {
            debug!("Ignoring unrecognized line from {}.", self.addr);
            metrics::UNRECOGNIZED_LINES_TOTAL.inc();
            return Ok(NextAction::Continue);
        };

        match self.router.route(command) {
            RouteResponse::Reply(reply) => {
                self.framed.send(reply).await?;
                Ok(NextAction::Continue)
            }
            RouteResponse::Final(reply) => {
                debug!("Sending final reply to {}: {}", self.addr, reply);
                self.framed.send(reply).await?;
                Ok(NextAction::ExitLoop)
            }
        }
    }
}
