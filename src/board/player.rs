//! Players (countries).

use serde::{Deserialize, Serialize};

/// Stable index of a player in its board's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u16);

impl PlayerId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A country taking part in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
}
