// src/connection/guard.rs

//! Defines `ConnectionGuard`, an RAII guard for the player-count slot a
//! connection holds.

use crate::core::metrics;
use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Registers a player on creation and unregisters them exactly once when
/// dropped, whichever way the connection handler exits.
pub struct ConnectionGuard {
    state: Arc<ServerState>,
    addr: SocketAddr,
    players_at_join: usize,
}

impl ConnectionGuard {
    /// Increments the shared player count.
    pub fn new(state: Arc<ServerState>, addr: SocketAddr) -> Self {
        let players_at_join = state.players.join();
        metrics::CONNECTED_PLAYERS.inc();
        info!(
            "Player {} joined; {} player(s) connected.",
            addr, players_at_join
        );
        Self {
            state,
            addr,
            players_at_join,
        }
    }

    /// The player count right after this player joined, themselves included.
    pub fn players_at_join(&self) -> usize {
        self.players_at_join
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let remaining = self.state.players.leave();
        metrics::CONNECTED_PLAYERS.dec();
        info!(
            "Player {} left; {} player(s) connected.",
            self.addr, remaining
        );
    }
}
