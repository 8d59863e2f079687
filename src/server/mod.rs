// src/server/mod.rs

use crate::config::Config;
use anyhow::Result;

mod connection_loop;
mod context;
mod initialization;
mod metrics_server;
mod spawner;

pub use context::ServerContext;
pub use initialization::{setup, setup_with_board};

/// The main server startup function, orchestrating all setup phases.
pub async fn run(config: Config) -> Result<()> {
    let server_context = setup(config).await?;
    serve(server_context).await
}

/// Runs an already initialized server until shutdown.
pub async fn serve(mut server_context: ServerContext) -> Result<()> {
    spawner::spawn_all(&mut server_context)?;
    connection_loop::run(server_context).await
}
