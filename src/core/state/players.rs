// src/core/state/players.rs

//! The live player count shown in the welcome banner.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts connected players. Independent of the board lock; every update is a
/// single atomic read-modify-write, so concurrent joins each see a distinct count.
#[derive(Debug, Default)]
pub struct PlayerCounter {
    count: AtomicUsize,
}

impl PlayerCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player and returns the count including them.
    pub fn join(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Unregisters a player and returns the remaining count.
    pub fn leave(&self) -> usize {
        let previous = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
            .unwrap_or(0);
        previous.saturating_sub(1)
    }

    pub fn current(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}
