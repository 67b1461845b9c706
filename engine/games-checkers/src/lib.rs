//! Checkers environment
//!
//! English draughts on an 8x8 board. Actions index a precomputed catalog of
//! every step and jump chain ([`catalog`]); the resolver ([`moves`]) narrows
//! it to what the current position allows, enforcing forward-only men,
//! mandatory capture and full-length chains.
//!
//! The first player (red) starts on rows 5 to 7 and is crowned on row 0.
//! A game is won by taking the opponent's last piece or leaving them without
//! a move, and drawn once the ply limit is reached.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Environment, Player};
//! use games_checkers::Checkers;
//!
//! let game = Checkers::new();
//! let state = game.reset();
//! let legal = game.legal_actions(&state, Player::First);
//! assert_eq!(legal.len(), 7);
//!
//! let next = game.apply(&state, legal[0], Player::First);
//! assert_eq!(game.terminal_value(&next, Player::First, 1), None);
//! ```

pub mod board;
pub mod catalog;
pub mod heuristic;
pub mod moves;
pub mod positions;

use engine_core::{
    ActionId, Environment, GameMetadata, MoveCatalog, Observation, Outcome, Player, Square,
};
use tracing::trace;

pub use board::Board;
pub use catalog::CheckersCatalog;
pub use positions::PositionIndex;

use board::{promotion_row, KING};
use catalog::SIZE;

/// Games reaching this many plies are drawn.
pub const DEFAULT_MAX_PLIES: u32 = 200;

pub const OBSERVATION_PLANES: usize = 6;
pub const OWN_MEN_PLANE: usize = 0;
pub const OWN_KINGS_PLANE: usize = 1;
pub const OPPONENT_MEN_PLANE: usize = 2;
pub const OPPONENT_KINGS_PLANE: usize = 3;
pub const PLAYER_PLANE: usize = 4;
pub const PLY_PLANE: usize = 5;

/// Checkers position: the board plus its position index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    board: Board,
    index: PositionIndex,
}

impl State {
    /// The standard starting position.
    pub fn new() -> Self {
        Self::from_board(Board::initial())
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            index: PositionIndex::from_board(&board),
            board,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    /// Move `player`'s piece along `origin -> destination`, lifting `captures`.
    ///
    /// No rule checks beyond keeping board and index in step; panics if they
    /// disagree afterwards.
    pub(crate) fn move_piece(
        &self,
        player: Player,
        origin: Square,
        destination: Square,
        captures: &[Square],
    ) -> State {
        let piece = self.board.get(origin);
        let mut next = *self;

        next.board.set(origin, 0);
        for &square in captures {
            next.board.set(square, 0);
        }
        let crowned = destination.row == promotion_row(player);
        next.board
            .set(destination, if crowned { player.sign() * KING } else { piece });

        next.index.apply_move(player, origin, destination, captures);
        next.index.verify(&next.board);
        next
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Checkers rules
#[derive(Debug, Clone)]
pub struct Checkers {
    catalog: CheckersCatalog,
    max_plies: u32,
}

impl Checkers {
    pub fn new() -> Self {
        Self::with_max_plies(DEFAULT_MAX_PLIES)
    }

    pub fn with_max_plies(max_plies: u32) -> Self {
        Self {
            catalog: CheckersCatalog::build(),
            max_plies,
        }
    }

    pub fn max_plies(&self) -> u32 {
        self.max_plies
    }

    pub fn checkers_catalog(&self) -> &CheckersCatalog {
        &self.catalog
    }
}

impl Default for Checkers {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for Checkers {
    type State = State;

    fn name(&self) -> &'static str {
        "checkers"
    }

    fn metadata(&self) -> GameMetadata {
        GameMetadata::new("checkers", "Checkers")
            .with_board(SIZE, SIZE)
            .with_actions(self.catalog.catalog().len())
            .with_observation(OBSERVATION_PLANES, SIZE, SIZE)
            .with_players(["Red", "Black"], ['r', 'b'])
            .with_description("Capture or block every enemy piece. Captures are mandatory.")
    }

    fn catalog(&self) -> &MoveCatalog {
        self.catalog.catalog()
    }

    fn reset(&self) -> State {
        State::new()
    }

    fn legal_actions(&self, state: &State, player: Player) -> Vec<ActionId> {
        moves::legal_actions(&self.catalog, &state.board, &state.index, player)
    }

    fn apply(&self, state: &State, action: ActionId, player: Player) -> State {
        let catalog = self.catalog.catalog();
        let template = catalog.template(action);
        let captures = catalog.captures(action);
        let origin = template[0];
        let destination = template[template.len() - 1];

        assert!(
            state.board.owner(origin) == Some(player),
            "illegal checkers move {action} for {player}: no piece of theirs on {origin}\n{}",
            state.board
        );
        assert!(
            destination == origin || state.board.is_empty(destination),
            "illegal checkers move {action} for {player}: {destination} is occupied\n{}",
            state.board
        );
        assert!(
            captures
                .iter()
                .all(|&sq| state.board.owner(sq) == Some(player.opponent())),
            "illegal checkers move {action} for {player}: captures {captures:?} are not all opponent pieces\n{}",
            state.board
        );
        assert!(
            self.legal_actions(state, player).binary_search(&action).is_ok(),
            "illegal checkers move {action} for {player}\n{}",
            state.board
        );

        trace!(action, %player, %origin, %destination, captured = captures.len(), "checkers move");
        state.move_piece(player, origin, destination, captures)
    }

    fn terminal_value(&self, state: &State, player: Player, ply: u32) -> Option<Outcome> {
        let opponent = player.opponent();
        if state.index.piece_count(opponent) == 0
            || !moves::has_legal_move(&self.catalog, &state.board, &state.index, opponent)
        {
            return Some(Outcome::Win(player));
        }
        (ply >= self.max_plies).then_some(Outcome::Draw)
    }

    fn heuristic(&self, state: &State, player: Player, legal: &[ActionId]) -> f32 {
        heuristic::evaluate(&self.catalog, &state.board, player, legal)
    }

    fn to_player_relative(&self, state: &State, player: Player, ply: u32) -> Observation {
        let mut obs = Observation::zeros(OBSERVATION_PLANES, SIZE, SIZE);
        for side in Player::BOTH {
            let (men_plane, kings_plane) = if side == player {
                (OWN_MEN_PLANE, OWN_KINGS_PLANE)
            } else {
                (OPPONENT_MEN_PLANE, OPPONENT_KINGS_PLANE)
            };
            for square in state.index.men(side).iter() {
                obs.set(men_plane, square.row as usize, square.col as usize, 1.0);
            }
            for square in state.index.kings(side).iter() {
                obs.set(kings_plane, square.row as usize, square.col as usize, 1.0);
            }
        }
        obs.fill_plane(PLAYER_PLANE, player.sign() as f32);
        obs.fill_plane(PLY_PLANE, ply as f32);
        obs
    }
}
