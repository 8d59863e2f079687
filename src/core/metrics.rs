// src/core/metrics.rs

//! Defines and registers Prometheus metrics for server monitoring.
//!
//! This module uses `lazy_static` to ensure that metrics are registered only once
//! globally for the entire application lifecycle.

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, TextEncoder, register_counter, register_counter_vec,
    register_gauge, register_histogram,
};

lazy_static! {
    // --- Gauges ---
    /// The number of players currently connected.
    pub static ref CONNECTED_PLAYERS: Gauge =
        register_gauge!("minesweeper_connected_players", "Number of currently connected players.").unwrap();

    // --- Counters ---
    /// The total number of connections accepted since startup.
    pub static ref CONNECTIONS_RECEIVED_TOTAL: Counter =
        register_counter!("minesweeper_connections_received_total", "Total number of connections received.").unwrap();
    /// Connections closed immediately because `max_clients` was reached.
    pub static ref CONNECTIONS_REJECTED_TOTAL: Counter =
        register_counter!("minesweeper_connections_rejected_total", "Total number of connections rejected at the client limit.").unwrap();
    /// Recognized commands executed, labeled by keyword.
    pub static ref COMMANDS_PROCESSED_TOTAL: CounterVec =
        register_counter_vec!("minesweeper_commands_processed_total", "Total number of commands processed, labeled by command.", &["command"]).unwrap();
    /// Input lines that matched no command and were ignored.
    pub static ref UNRECOGNIZED_LINES_TOTAL: Counter =
        register_counter!("minesweeper_unrecognized_lines_total", "Total number of ignored input lines.").unwrap();
    pub static ref BOMBS_DETONATED_TOTAL: Counter =
        register_counter!("minesweeper_bombs_detonated_total", "Total number of bombs dug up.").unwrap();
    /// Squares dug, including every square of a flood fill.
    pub static ref SQUARES_REVEALED_TOTAL: Counter =
        register_counter!("minesweeper_squares_revealed_total", "Total number of squares dug.").unwrap();

    // --- Histograms ---
    pub static ref COMMAND_LATENCY_SECONDS: Histogram =
        register_histogram!("minesweeper_command_latency_seconds", "Latency of command processing in seconds.").unwrap();
}

/// Gathers all registered metrics and encodes them in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
