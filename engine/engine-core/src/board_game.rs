//! Shared observation layout for two-player stone games.
//!
//! Tic-tac-toe and connect-four present the same three planes to a predictor:
//! the mover's stones, the opponent's stones, and a constant plane holding the
//! mover's sign. Seen from the mover, every position looks like "my stones
//! versus theirs", which is what lets a single network play both sides.

use crate::observation::Observation;
use crate::player::Player;

/// Plane holding the mover's stones.
pub const OWN_PLANE: usize = 0;
/// Plane holding the opponent's stones.
pub const OPPONENT_PLANE: usize = 1;
/// Constant plane with the mover's sign (`+1` / `-1`).
pub const PLAYER_PLANE: usize = 2;
/// Number of planes produced by [`stone_planes`].
pub const STONE_PLANES: usize = 3;

/// Encode a signed board (`+1` first player, `-1` second, `0` empty) from
/// `player`'s point of view.
pub fn stone_planes(board: &[i8], rows: usize, cols: usize, player: Player) -> Observation {
    debug_assert_eq!(board.len(), rows * cols);
    let mut obs = Observation::zeros(STONE_PLANES, rows, cols);

    for (index, &cell) in board.iter().enumerate() {
        let (row, col) = (index / cols, index % cols);
        match Player::owner_of(cell) {
            Some(owner) if owner == player => obs.set(OWN_PLANE, row, col, 1.0),
            Some(_) => obs.set(OPPONENT_PLANE, row, col, 1.0),
            None => {}
        }
    }
    obs.fill_plane(PLAYER_PLANE, player.sign() as f32);

    obs
}
