// src/core/state/core.rs

//! Defines the central `ServerState` struct, holding all shared server-wide state.

use super::players::PlayerCounter;
use super::stats::StatsState;
use crate::config::Config;
use crate::core::board::Board;
use tracing::info;

/// The central struct holding all shared, server-wide state.
/// This struct is wrapped in an `Arc` and handed to every connection handler;
/// the board and the player counter are the only mutable parts.
#[derive(Debug)]
pub struct ServerState {
    /// The server configuration, fixed for the lifetime of the process.
    pub config: Config,
    /// The single shared board every connection plays on.
    pub board: Board,
    /// The number of currently connected players.
    pub players: PlayerCounter,
    /// Server-wide counters.
    pub stats: StatsState,
}

impl ServerState {
    /// Creates the state with a freshly generated board from `config.board`.
    pub fn initialize(config: Config) -> Self {
        let board = Board::from_config(&config.board);
        match config.board.seed {
            Some(seed) => info!(
                "Generated {0}x{0} board with seed {seed}.",
                config.board.size
            ),
            None => info!("Generated random {0}x{0} board.", config.board.size),
        }
        Self::with_board(config, board)
    }

    /// Creates the state around an already-built board.
    pub fn with_board(config: Config, board: Board) -> Self {
        Self {
            config,
            board,
            players: PlayerCounter::new(),
            stats: StatsState::new(),
        }
    }
}
