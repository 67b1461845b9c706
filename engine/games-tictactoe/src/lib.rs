//! Tic-tac-toe environment
//!
//! The smallest game in the workspace and the one the search engine's
//! behavioural tests lean on. Action id `row * 3 + col` places the mover's
//! stone on that cell.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Environment, Player};
//! use games_tictactoe::TicTacToe;
//!
//! let game = TicTacToe::new();
//! let state = game.apply(&game.reset(), 4, Player::First);
//! assert_eq!(game.legal_actions(&state, Player::Second).len(), 8);
//! ```

use engine_core::board_game::{stone_planes, STONE_PLANES};
use engine_core::{
    ActionId, Environment, GameMetadata, MoveCatalog, Observation, Outcome, Player,
};

pub const ROWS: usize = 3;
pub const COLS: usize = 3;
pub const BOARD_SIZE: usize = ROWS * COLS;

/// Winning positions (rows, columns, diagonals)
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Tic-tac-toe position
///
/// Board cells hold `+1` for the first player (X), `-1` for the second (O)
/// and `0` when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct State {
    board: [i8; BOARD_SIZE],
}

impl State {
    /// Create a new empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a position from raw cells.
    pub fn from_board(board: [i8; BOARD_SIZE]) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &[i8; BOARD_SIZE] {
        &self.board
    }

    /// Owner of a completed line, if any
    pub fn winner(&self) -> Option<Player> {
        LINES.iter().find_map(|&[a, b, c]| {
            let cell = self.board[a];
            if cell != 0 && cell == self.board[b] && cell == self.board[c] {
                Player::owner_of(cell)
            } else {
                None
            }
        })
    }

    pub fn is_full(&self) -> bool {
        self.board.iter().all(|&cell| cell != 0)
    }

    /// Empty cells in ascending order; empty once someone has won.
    pub fn empty_cells(&self) -> Vec<ActionId> {
        if self.winner().is_some() {
            return Vec::new();
        }
        (0..BOARD_SIZE).filter(|&pos| self.board[pos] == 0).collect()
    }

    /// Place `player`'s stone at `position`
    ///
    /// # Panics
    /// If the cell is off the board or already taken.
    pub fn place(&self, position: usize, player: Player) -> State {
        assert!(
            position < BOARD_SIZE && self.board[position] == 0,
            "illegal tic-tac-toe move {position} for {player} on {:?}",
            self.board
        );
        let mut next = *self;
        next.board[position] = player.sign();
        next
    }
}

/// Tic-tac-toe rules
#[derive(Debug, Clone)]
pub struct TicTacToe {
    catalog: MoveCatalog,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            catalog: MoveCatalog::placements(ROWS, COLS),
        }
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for TicTacToe {
    type State = State;

    fn name(&self) -> &'static str {
        "tictactoe"
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("tictactoe", "Tic-Tac-Toe")
            .with_board(COLS, ROWS)
            .with_actions(self.catalog.len())
            .with_observation(STONE_PLANES, ROWS, COLS)
            .with_players(["X", "O"], ['X', 'O'])
            .with_description("Get three in a row to win!")
    }

    fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    fn reset(&self) -> State {
        State::new()
    }

    fn legal_actions(&self, state: &State, _player: Player) -> Vec<ActionId> {
        state.empty_cells()
    }

    fn apply(&self, state: &State, action: ActionId, player: Player) -> State {
        let square = self.catalog.template(action)[0];
        state.place(square.index(COLS), player)
    }

    fn terminal_value(&self, state: &State, _player: Player, _ply: u32) -> Option<Outcome> {
        if let Some(winner) = state.winner() {
            return Some(Outcome::Win(winner));
        }
        state.is_full().then_some(Outcome::Draw)
    }

    fn to_player_relative(&self, state: &State, player: Player, _ply: u32) -> Observation {
        stone_planes(&state.board, ROWS, COLS, player)
    }
}

#[cfg(test)]
mod tests;
