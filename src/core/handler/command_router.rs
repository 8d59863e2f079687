// src/core/handler/command_router.rs

//! Routes parsed commands to the shared board and decides the reply.

use crate::core::board::DigResult;
use crate::core::metrics;
use crate::core::protocol::{Command, Reply};
use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span};

/// What the `ConnectionHandler` should do with a routed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResponse {
    /// Send the reply and keep serving.
    Reply(Reply),
    /// Send the reply, then close the connection.
    Final(Reply),
}

/// Executes commands for one client against the shared state.
pub struct Router {
    state: Arc<ServerState>,
    addr: SocketAddr,
}

impl Router {
    pub fn new(state: Arc<ServerState>, addr: SocketAddr) -> Self {
        Self { state, addr }
    }

    /// Executes a command. A mutation and the render sent back for it happen
    /// under one board lock, so the reply shows exactly the state this
    /// command produced.
    pub fn route(&self, command: Command) -> RouteResponse {
        let span = info_span!(
            "command",
            name = %command.name(),
            client.addr = %self.addr,
        );
        let _entered = span.enter();

        let start_time = Instant::now();
        self.state.stats.increment_total_commands();
        metrics::COMMANDS_PROCESSED_TOTAL
            .with_label_values(&[command.name()])
            .inc();

        let board = &self.state.board;
        let response = match command {
            Command::Look => RouteResponse::Reply(Reply::Board(board.render())),
            Command::Help => RouteResponse::Reply(Reply::Help),
            Command::Bye => RouteResponse::Final(Reply::Bye),
            Command::Dig { x, y } => match board.dig_and_render(x, y) {
                (DigResult::Bomb, _) => {
                    info!("Player at {} dug a bomb at ({}, {}).", self.addr, x, y);
                    self.state.stats.increment_total_detonations();
                    metrics::BOMBS_DETONATED_TOTAL.inc();
                    metrics::SQUARES_REVEALED_TOTAL.inc();
                    RouteResponse::Final(Reply::Boom)
                }
                (DigResult::Revealed { squares }, render) => {
                    debug!("Dig at ({}, {}) revealed {} squares.", x, y, squares);
                    metrics::SQUARES_REVEALED_TOTAL.inc_by(squares as f64);
                    RouteResponse::Reply(Reply::Board(render))
                }
                (DigResult::Unchanged, render) => RouteResponse::Reply(Reply::Board(render)),
            },
            Command::Flag { x, y } => {
                let (_, render) = board.flag_and_render(x, y);
                RouteResponse::Reply(Reply::Board(render))
            }
            Command::Deflag { x, y } => {
                let (_, render) = board.deflag_and_render(x, y);
                RouteResponse::Reply(Reply::Board(render))
            }
        };

        metrics::COMMAND_LATENCY_SECONDS.observe(start_time.elapsed().as_secs_f64());
        response
    }
}
