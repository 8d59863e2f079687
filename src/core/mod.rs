// src/core/mod.rs

//! The central module containing the game rules, the wire protocol and the
//! shared server state.

pub mod board;
pub mod errors;
pub mod handler;
pub mod metrics;
pub mod protocol;
pub mod state;

pub use board::Board;
pub use errors::MinesweeperError;
pub use protocol::Command;
