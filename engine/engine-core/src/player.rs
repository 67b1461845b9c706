//! Players and game outcomes.
//!
//! Boards store pieces as signed integers, so a player is also a sign:
//! `First` owns the positive cells and `Second` the negative ones. Negating a
//! player yields the opponent, which keeps perspective flips readable at call
//! sites (`-player`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

/// One of the two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    /// Moves first; stored as `+1` on the board.
    First,
    /// Moves second; stored as `-1` on the board.
    Second,
}

impl Player {
    /// Both players in turn order.
    pub const BOTH: [Player; 2] = [Player::First, Player::Second];

    /// Board sign of this player's pieces.
    #[inline]
    pub const fn sign(self) -> i8 {
        match self {
            Player::First => 1,
            Player::Second => -1,
        }
    }

    /// Index into per-player arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    #[inline]
    pub const fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Owner of a board cell, if any.
    #[inline]
    pub fn owner_of(cell: i8) -> Option<Player> {
        match cell.signum() {
            1 => Some(Player::First),
            -1 => Some(Player::Second),
            _ => None,
        }
    }
}

impl Neg for Player {
    type Output = Player;

    fn neg(self) -> Player {
        self.opponent()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::First => write!(f, "first"),
            Player::Second => write!(f, "second"),
        }
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win(Player),
    Draw,
}

impl Outcome {
    /// Value of the outcome seen by `player`: `1.0` win, `-1.0` loss, `0.0` draw.
    ///
    /// # Example
    /// ```
    /// use engine_core::{Outcome, Player};
    ///
    /// assert_eq!(Outcome::Win(Player::First).value_for(Player::First), 1.0);
    /// assert_eq!(Outcome::Win(Player::First).value_for(Player::Second), -1.0);
    /// assert_eq!(Outcome::Draw.value_for(Player::Second), 0.0);
    /// ```
    #[inline]
    pub fn value_for(self, player: Player) -> f32 {
        match self {
            Outcome::Win(winner) if winner == player => 1.0,
            Outcome::Win(_) => -1.0,
            Outcome::Draw => 0.0,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Win(winner) => Some(winner),
            Outcome::Draw => None,
        }
    }
}
