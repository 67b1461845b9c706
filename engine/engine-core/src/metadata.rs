//! Game metadata for display and configuration
//!
//! This module provides descriptive metadata about games that actors and
//! evaluation tooling use to size buffers and label output.

use serde::{Deserialize, Serialize};

/// Metadata about a game
///
/// This struct contains all the information needed to:
/// - Label the game in logs and reports (display name, player names)
/// - Size predictor inputs and outputs (observation shape, num_actions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    /// Environment identifier (e.g., "tictactoe", "checkers")
    pub env_id: String,

    /// Human-readable display name (e.g., "Tic-Tac-Toe", "Checkers")
    pub display_name: String,

    /// Board width in cells
    pub board_width: usize,

    /// Board height in cells
    pub board_height: usize,

    /// Size of the action space (catalog length)
    pub num_actions: usize,

    /// Observation shape as `[planes, rows, cols]`
    pub observation_shape: [usize; 3],

    /// Number of players (always 2 for the games shipped here)
    pub player_count: usize,

    /// Display names for each player (e.g., ["X", "O"] or ["Red", "Black"])
    pub player_names: Vec<String>,

    /// Single-character symbols for each player
    pub player_symbols: Vec<char>,

    /// Brief description of the game rules
    pub description: String,
}

impl GameMetadata {
    /// Create a new GameMetadata with required fields
    pub fn new(env_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            env_id: env_id.into(),
            display_name: display_name.into(),
            board_width: 0,
            board_height: 0,
            num_actions: 0,
            observation_shape: [0, 0, 0],
            player_count: 2,
            player_names: vec!["Player 1".to_string(), "Player 2".to_string()],
            player_symbols: vec!['1', '2'],
            description: String::new(),
        }
    }

    /// Builder method for board dimensions
    pub fn with_board(mut self, width: usize, height: usize) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    /// Builder method for action count
    pub fn with_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = num_actions;
        self
    }

    /// Builder method for the observation plane stack
    pub fn with_observation(mut self, planes: usize, rows: usize, cols: usize) -> Self {
        self.observation_shape = [planes, rows, cols];
        self
    }

    /// Builder method for player information
    pub fn with_players(mut self, names: [&str; 2], symbols: [char; 2]) -> Self {
        self.player_count = 2;
        self.player_names = names.iter().map(|n| n.to_string()).collect();
        self.player_symbols = symbols.to_vec();
        self
    }

    /// Builder method for description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Get the total number of board cells
    pub fn board_size(&self) -> usize {
        self.board_width * self.board_height
    }

    /// Number of f32 values in one observation
    pub fn obs_size(&self) -> usize {
        self.observation_shape.iter().product()
    }
}
