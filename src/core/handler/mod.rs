// src/core/handler/mod.rs

//! Command execution against the shared server state.

pub mod command_router;

pub use command_router::{RouteResponse, Router};
