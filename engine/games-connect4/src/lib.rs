//! Connect 4 environment
//!
//! Connect 4 is a two-player connection game where players drop discs into a
//! 7-column, 6-row vertically suspended grid. The objective is to be the
//! first to form a horizontal, vertical, or diagonal line of four discs.
//!
//! # Board Layout
//!
//! Cells are stored in row-major order with row 0 at the top. An action names
//! the cell a disc lands in, so only the lowest empty cell of each column is
//! ever legal:
//! ```text
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Top
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 4: [28][29][30][31][32][33][34]
//! Row 5: [35][36][37][38][39][40][41]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```

use engine_core::board_game::{stone_planes, STONE_PLANES};
use engine_core::game_utils::longest_line_through;
use engine_core::{
    ActionId, Environment, GameMetadata, MoveCatalog, Observation, Outcome, Player, Square,
};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS; // 42

/// Discs in a row needed to win
const CONNECT: usize = 4;

/// Connect 4 position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    /// `+1` first player (red), `-1` second player (yellow), `0` empty
    board: [i8; BOARD_SIZE],
    /// Number of discs in each column
    column_heights: [u8; COLS],
    /// Set once a move completes a line of four
    winner: Option<Player>,
}

impl State {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            board: [0; BOARD_SIZE],
            column_heights: [0; COLS],
            winner: None,
        }
    }

    pub fn board(&self) -> &[i8; BOARD_SIZE] {
        &self.board
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_full(&self) -> bool {
        self.column_heights.iter().all(|&h| h as usize >= ROWS)
    }

    /// Cell where a disc dropped in `col` would land
    pub fn landing_square(&self, col: usize) -> Option<Square> {
        let height = self.column_heights[col] as usize;
        (height < ROWS).then(|| Square::new((ROWS - 1 - height) as u8, col as u8))
    }

    /// Landing cells of all open columns, ascending by cell index; empty once decided.
    pub fn landing_cells(&self) -> Vec<ActionId> {
        if self.winner.is_some() {
            return Vec::new();
        }
        let mut cells: Vec<ActionId> = (0..COLS)
            .filter_map(|col| self.landing_square(col))
            .map(|square| square.index(COLS))
            .collect();
        cells.sort_unstable();
        cells
    }

    /// Drop `player`'s disc so that it lands on `square`
    ///
    /// # Panics
    /// If the game is over or `square` is not the landing cell of its column.
    pub fn drop_at(&self, square: Square, player: Player) -> State {
        let col = square.col as usize;
        assert!(
            self.winner.is_none() && self.landing_square(col) == Some(square),
            "illegal connect-four move {square} for {player}"
        );

        let mut next = self.clone();
        next.board[square.index(COLS)] = player.sign();
        next.column_heights[col] += 1;
        if longest_line_through(&next.board, ROWS, COLS, square) >= CONNECT {
            next.winner = Some(player);
        }
        next
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Connect 4 rules
#[derive(Debug, Clone)]
pub struct Connect4 {
    catalog: MoveCatalog,
}

impl Connect4 {
    pub fn new() -> Self {
        Self {
            catalog: MoveCatalog::placements(ROWS, COLS),
        }
    }
}

impl Default for Connect4 {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for Connect4 {
    type State = State;

    fn name(&self) -> &'static str {
        "connect4"
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("connect4", "Connect 4")
            .with_board(COLS, ROWS)
            .with_actions(self.catalog.len())
            .with_observation(STONE_PLANES, ROWS, COLS)
            .with_players(["Red", "Yellow"], ['R', 'Y'])
            .with_description("Drop pieces to connect 4 in a row horizontally, vertically, or diagonally!")
    }

    fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    fn reset(&self) -> State {
        State::new()
    }

    fn legal_actions(&self, state: &State, _player: Player) -> Vec<ActionId> {
        state.landing_cells()
    }

    fn apply(&self, state: &State, action: ActionId, player: Player) -> State {
        state.drop_at(self.catalog.template(action)[0], player)
    }

    fn terminal_value(&self, state: &State, _player: Player, _ply: u32) -> Option<Outcome> {
        if let Some(winner) = state.winner {
            return Some(Outcome::Win(winner));
        }
        state.is_full().then_some(Outcome::Draw)
    }

    fn to_player_relative(&self, state: &State, player: Player, _ply: u32) -> Observation {
        stone_planes(&state.board, ROWS, COLS, player)
    }
}
