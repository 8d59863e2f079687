// src/main.rs

//! The main entry point for the Minesweeper server application.

use anyhow::Result;
use minesweeper::config::Config;
use minesweeper::server;
use std::env;
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    run_app().await
}

/// Returns the value following `flag`, parsed as `T`. Exits the process on a
/// missing or malformed value.
fn flag_value<T: FromStr>(args: &[String], flag: &str) -> Option<T> {
    let index = args.iter().position(|arg| arg == flag)?;
    let Some(raw) = args.get(index + 1) else {
        eprintln!("{flag} flag requires a value");
        std::process::exit(1);
    };
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            eprintln!("Invalid value for {flag}: {raw}");
            std::process::exit(1);
        }
    }
}

async fn run_app() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("Minesweeper server version {VERSION}");
        return Ok(());
    }

    // An explicit --config path must exist; without one, config.toml is
    // optional.
    let config_path: Option<String> = flag_value(&args, "--config");
    let mut config = match Config::load(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            std::process::exit(1);
        }
    };

    if let Some(port) = flag_value::<u16>(&args, "--port") {
        config.port = port;
    }
    if let Some(size) = flag_value::<usize>(&args, "--size") {
        config.board.size = size;
    }
    if let Some(seed) = flag_value::<u64>(&args, "--seed") {
        config.board.seed = Some(seed);
    }
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // RUST_LOG takes precedence over the configured level.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true),
        )
        .init();

    if let Err(e) = server::run(config).await {
        error!("Server runtime error: {:#}", e);
        return Err(e);
    }

    Ok(())
}
