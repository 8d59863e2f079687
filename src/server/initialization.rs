// src/server/initialization.rs

//! Builds the shared state and binds the listening socket.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::board::Board;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Semaphore, broadcast};
use tokio::task::JoinSet;
use tracing::info;

/// Initializes all server components with a board generated from `config.board`.
pub async fn setup(config: Config) -> Result<ServerContext> {
    log_startup_info(&config);
    bind(ServerState::initialize(config)).await
}

/// Initializes all server components around a prebuilt board.
pub async fn setup_with_board(config: Config, board: Board) -> Result<ServerContext> {
    log_startup_info(&config);
    bind(ServerState::with_board(config, board)).await
}

async fn bind(state: ServerState) -> Result<ServerContext> {
    let (shutdown_tx, _) = broadcast::channel(1);

    let listener = TcpListener::bind((state.config.host.as_str(), state.config.port))
        .await
        .with_context(|| {
            format!(
                "Failed to bind {}:{}",
                state.config.host, state.config.port
            )
        })?;
    info!(
        "Minesweeper server listening on {}",
        listener.local_addr()?
    );
    let connection_permits = Arc::new(Semaphore::new(state.config.max_clients));

    Ok(ServerContext {
        state: Arc::new(state),
        listener,
        shutdown_tx,
        background_tasks: JoinSet::new(),
        connection_permits,
    })
}

/// Logs key configuration parameters at startup.
fn log_startup_info(config: &Config) {
    info!(
        "Board: {0}x{0}, bomb probability {1:.2}.",
        config.board.size, config.board.bomb_probability
    );
    info!("Accepting at most {} concurrent players.", config.max_clients);
}
