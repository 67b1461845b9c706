//! Game selection for the self-play tooling
//!
//! The search engine is generic over [`Environment`], so choosing a game by
//! name at runtime means handing the concrete environment to code that is
//! itself generic. [`GameVisitor`] is that code; [`dispatch`] builds the
//! environment and calls it.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Environment;
//! use engine_games::{dispatch, GameKind, GameOptions, GameVisitor};
//!
//! struct ActionSpace;
//!
//! impl GameVisitor for ActionSpace {
//!     type Output = usize;
//!
//!     fn visit<E: Environment + 'static>(self, env: E) -> usize {
//!         env.action_space()
//!     }
//! }
//!
//! let kind: GameKind = "checkers".parse().unwrap();
//! assert_eq!(dispatch(kind, &GameOptions::default(), ActionSpace), 2852);
//! ```

use std::fmt;
use std::str::FromStr;

use engine_core::{Environment, GameMetadata};
use games_checkers::Checkers;
use games_connect4::Connect4;
use games_tictactoe::TicTacToe;
use thiserror::Error;

/// The games shipped with the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    TicTacToe,
    Connect4,
    Checkers,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::TicTacToe, GameKind::Connect4, GameKind::Checkers];

    /// Environment identifier, as accepted by [`FromStr`].
    pub fn env_id(self) -> &'static str {
        match self {
            GameKind::TicTacToe => "tictactoe",
            GameKind::Connect4 => "connect4",
            GameKind::Checkers => "checkers",
        }
    }

    pub fn metadata(self, options: &GameOptions) -> GameMetadata {
        dispatch(self, options, MetadataVisitor)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameKindError {
    #[error("unknown game '{0}' (expected one of: tictactoe, connect4, checkers)")]
    Unknown(String),
}

impl FromStr for GameKind {
    type Err = GameKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "tictactoe" | "tic-tac-toe" => Ok(GameKind::TicTacToe),
            "connect4" | "connect-four" => Ok(GameKind::Connect4),
            "checkers" | "draughts" => Ok(GameKind::Checkers),
            _ => Err(GameKindError::Unknown(s.to_string())),
        }
    }
}

/// Per-game construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOptions {
    /// Ply limit after which a checkers game is drawn
    pub checkers_max_plies: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            checkers_max_plies: games_checkers::DEFAULT_MAX_PLIES,
        }
    }
}

/// Generic code to run against whichever environment was selected.
pub trait GameVisitor {
    type Output;

    fn visit<E: Environment + 'static>(self, env: E) -> Self::Output;
}

/// Build the environment for `kind` and hand it to `visitor`.
pub fn dispatch<V: GameVisitor>(kind: GameKind, options: &GameOptions, visitor: V) -> V::Output {
    match kind {
        GameKind::TicTacToe => visitor.visit(TicTacToe::new()),
        GameKind::Connect4 => visitor.visit(Connect4::new()),
        GameKind::Checkers => visitor.visit(Checkers::with_max_plies(options.checkers_max_plies)),
    }
}

struct MetadataVisitor;

impl GameVisitor for MetadataVisitor {
    type Output = GameMetadata;

    fn visit<E: Environment + 'static>(self, env: E) -> GameMetadata {
        env.metadata()
    }
}
