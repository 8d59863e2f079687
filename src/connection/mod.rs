// src/connection/mod.rs

//! Manages the lifecycle of a single client TCP connection: greeting, line
//! parsing, command routing and player-count bookkeeping.

mod guard;
mod handler;

pub use guard::ConnectionGuard;
pub use handler::ConnectionHandler;
