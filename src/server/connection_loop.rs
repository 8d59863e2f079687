// src/server/connection_loop.rs

//! Contains the main server loop for accepting connections and handling graceful shutdown.

use super::context::ServerContext;
use crate::connection::ConnectionHandler;
use crate::core::metrics;
use anyhow::{Context, anyhow};
use std::io;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// How long connected clients get to wind down after the shutdown broadcast.
const CLIENT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);
const BACKGROUND_TASK_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause before accepting again after the process ran out of a resource.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

// Linux errno values for process or system resource exhaustion.
const ENOMEM: i32 = 12;
const ENFILE: i32 = 23;
const EMFILE: i32 = 24;
const ENOBUFS: i32 = 105;

/// Accept errors caused by running out of file descriptors, buffers or memory.
/// They clear up as connections close, so the loop backs off and retries.
pub(crate) fn is_resource_exhaustion(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::OutOfMemory
        || matches!(e.raw_os_error(), Some(ENOMEM | ENFILE | EMFILE | ENOBUFS))
}

/// Accept errors that do not mean the listener itself is broken.
pub(crate) fn is_transient_accept_error(e: &io::Error) -> bool {
    is_resource_exhaustion(e)
        || matches!(
            e.kind(),
            io::ErrorKind::ConnectionAborted
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionRefused
                | io::ErrorKind::Interrupted
                | io::ErrorKind::WouldBlock
        )
}

/// The main server loop that accepts connections and handles graceful shutdown.
/// Returns an error only when the listening socket itself fails.
pub async fn run(mut ctx: ServerContext) -> anyhow::Result<()> {
    let mut client_tasks = JoinSet::new();
    let mut fatal: Option<anyhow::Error> = None;

    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to register SIGINT handler")?;
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to register SIGTERM handler")?;
    let mut shutdown_rx = ctx.shutdown_tx.subscribe();

    loop {
        tokio::select! {
            biased;

            _ = sigint.recv() => {
                info!("SIGINT received, initiating graceful shutdown.");
                break;
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, initiating graceful shutdown.");
                break;
            }
            _ = shutdown_rx.recv() => {
                info!("Shutdown requested, initiating graceful shutdown.");
                break;
            }

            Some(res) = ctx.background_tasks.join_next() => {
                match res {
                    Ok(Ok(())) => warn!("A background task finished unexpectedly without an error."),
                    Ok(Err(e)) => { error!("CRITICAL: Background task failed: {}. Shutting down.", e); break; }
                    Err(e) => { error!("CRITICAL: Background task panicked: {e:?}. Shutting down."); break; }
                }
            },

            res = ctx.listener.accept() => {
                match res {
                    Ok((socket, addr)) => {
                        ctx.state.stats.increment_total_connections();
                        metrics::CONNECTIONS_RECEIVED_TOTAL.inc();

                        let Ok(permit) = ctx.connection_permits.clone().try_acquire_owned() else {
                            warn!(
                                "Rejecting connection from {}: max_clients ({}) reached.",
                                addr, ctx.state.config.max_clients
                            );
                            metrics::CONNECTIONS_REJECTED_TOTAL.inc();
                            drop(socket);
                            continue;
                        };
                        info!("Accepted new connection from: {}", addr);

                        let state_clone = ctx.state.clone();
                        let shutdown_rx = ctx.shutdown_tx.subscribe();
                        client_tasks.spawn(async move {
                            let mut handler = ConnectionHandler::new(socket, addr, state_clone, shutdown_rx);
                            match handler.run().await {
                                Ok(()) => {}
                                Err(e) if e.is_normal_disconnect() => {
                                    debug!("Connection from {} dropped while replying: {}", addr, e);
                                }
                                Err(e) => {
                                    warn!("Connection from {} terminated unexpectedly: {}", addr, e);
                                }
                            }
                            drop(permit);
                        });
                    }
                    Err(e) if is_resource_exhaustion(&e) => {
                        warn!("Failed to accept connection: {}. Retrying in {:?}.", e, ACCEPT_BACKOFF);
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                    Err(e) if is_transient_accept_error(&e) => {
                        warn!("Failed to accept a pending connection: {}", e);
                    }
                    Err(e) => {
                        error!("Listening socket failed: {}", e);
                        fatal = Some(anyhow!(e).context("Listening socket failed"));
                        break;
                    }
                }
            },

            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res {
                    if e.is_panic() {
                        error!("A client handler panicked: {e:?}");
                    }
                }
            },
        }
    }

    info!("Shutting down. Sending signal to all tasks.");
    if ctx.shutdown_tx.send(()).is_err() {
        warn!("No tasks were listening for the shutdown signal.");
    }

    if tokio::time::timeout(CLIENT_DRAIN_TIMEOUT, async {
        while client_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for clients to disconnect; aborting the rest.");
        client_tasks.shutdown().await;
    }
    info!("All client connections closed.");

    info!("Waiting for background tasks to finish...");
    if tokio::time::timeout(BACKGROUND_TASK_TIMEOUT, async {
        while ctx.background_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for background tasks to finish cleanly.");
    };

    let stats = &ctx.state.stats;
    info!(
        "Server shutdown complete. {} connections, {} commands, {} detonations.",
        stats.get_total_connections(),
        stats.get_total_commands(),
        stats.get_total_detonations()
    );

    match fatal {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
