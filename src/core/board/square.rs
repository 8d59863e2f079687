// src/core/board/square.rs

//! A single cell of the board and its visibility state machine.

/// What a player can currently see of a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Untouched,
    Flagged,
    Dug,
}

impl Visibility {
    /// The character used for this state in a board rendering.
    pub fn glyph(self) -> char {
        match self {
            Visibility::Untouched => '-',
            Visibility::Flagged => 'F',
            Visibility::Dug => ' ',
        }
    }
}

/// One grid cell. Only the owning `Grid` can change its state, and only
/// along `Untouched -> Flagged`, `Flagged -> Untouched` and `Untouched -> Dug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    x: usize,
    y: usize,
    visibility: Visibility,
    has_bomb: bool,
}

impl Square {
    pub(crate) fn new(x: usize, y: usize, has_bomb: bool) -> Self {
        Self {
            x,
            y,
            visibility: Visibility::Untouched,
            has_bomb,
        }
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn has_bomb(&self) -> bool {
        self.has_bomb
    }

    pub fn is_untouched(&self) -> bool {
        self.visibility == Visibility::Untouched
    }

    /// `Untouched -> Flagged`. Returns whether the state changed.
    pub(crate) fn flag(&mut self) -> bool {
        if self.visibility != Visibility::Untouched {
            return false;
        }
        self.visibility = Visibility::Flagged;
        true
    }

    /// `Flagged -> Untouched`. Returns whether the state changed.
    pub(crate) fn deflag(&mut self) -> bool {
        if self.visibility != Visibility::Flagged {
            return false;
        }
        self.visibility = Visibility::Untouched;
        true
    }

    /// `Untouched -> Dug`. A detonated bomb is removed from the square.
    /// Returns whether the state changed.
    pub(crate) fn dig(&mut self) -> bool {
        if self.visibility != Visibility::Untouched {
            return false;
        }
        self.visibility = Visibility::Dug;
        self.has_bomb = false;
        true
    }
}
