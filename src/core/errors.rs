// src/core/errors.rs

//! Defines the primary error type for the game server.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all failures surfaced by the board,
/// the wire codec and the connection handler.
#[derive(Error, Debug, Clone)]
pub enum MinesweeperError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Coordinate ({x}, {y}) is outside the {size}x{size} board")]
    OutOfBounds { x: usize, y: usize, size: usize },

    #[error("Line exceeds the maximum length of {limit} bytes")]
    LineTooLong { limit: usize },

    #[error("Invalid board layout: {0}")]
    InvalidLayout(String),
}

impl PartialEq for MinesweeperError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (MinesweeperError::Io(e1), MinesweeperError::Io(e2)) => e1.kind() == e2.kind(),
            (
                MinesweeperError::OutOfBounds {
                    x: x1,
                    y: y1,
                    size: s1,
                },
                MinesweeperError::OutOfBounds {
                    x: x2,
                    y: y2,
                    size: s2,
                },
            ) => x1 == x2 && y1 == y2 && s1 == s2,
            (
                MinesweeperError::LineTooLong { limit: l1 },
                MinesweeperError::LineTooLong { limit: l2 },
            ) => l1 == l2,
            (MinesweeperError::InvalidLayout(s1), MinesweeperError::InvalidLayout(s2)) => s1 == s2,
            _ => false,
        }
    }
}

impl MinesweeperError {
    /// True for I/O failures that just mean the peer went away.
    pub fn is_normal_disconnect(&self) -> bool {
        matches!(self, MinesweeperError::Io(arc_err) if matches!(
            arc_err.kind(),
            std::io::ErrorKind::ConnectionReset
                | std::io::ErrorKind::BrokenPipe
                | std::io::ErrorKind::UnexpectedEof
                | std::io::ErrorKind::ConnectionAborted
        ))
    }
}

impl From<std::io::Error> for MinesweeperError {
    fn from(e: std::io::Error) -> Self {
        MinesweeperError::Io(Arc::new(e))
    }
}
