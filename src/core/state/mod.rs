// src/core/state/mod.rs

//! Defines the central `ServerState` struct and its components.

mod core;
mod players;
mod stats;

pub use self::core::ServerState;
pub use players::PlayerCounter;
pub use stats::StatsState;
