//! Positional evaluation used to blend with predictor values.
//!
//! Men are worth [`MAN_VALUE`] plus a small bonus for each friendly piece
//! covering them from behind, weighted by how far they have advanced. Kings
//! are worth [`KING_VALUE`] weighted toward the centre. Opponent pieces that
//! the mover can already capture are left out of the opponent's total.

use engine_core::{ActionId, Player, Square};

use crate::board::{forward, Board, KING};
use crate::catalog::{CheckersCatalog, SIZE};

pub const MAN_VALUE: f32 = 5.0;
pub const KING_VALUE: f32 = 10.0;
pub const SUPPORT_BONUS: f32 = 0.025;

/// Advancement weights for the first player's men; the second player reads it
/// with rows mirrored.
#[rustfmt::skip]
const MAN_MAP: [[f32; SIZE]; SIZE] = [
    [0.9, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.9],
    [0.7, 0.8, 0.8, 0.8, 0.8, 0.8, 0.8, 0.7],
    [0.6, 0.7, 0.7, 0.7, 0.7, 0.7, 0.7, 0.6],
    [0.5, 0.6, 0.6, 0.6, 0.6, 0.6, 0.6, 0.5],
    [0.4, 0.5, 0.6, 0.6, 0.6, 0.6, 0.6, 0.4],
    [0.3, 0.4, 0.5, 0.5, 0.4, 0.4, 0.4, 0.3],
    [0.2, 0.3, 0.3, 0.3, 0.3, 0.3, 0.3, 0.2],
    [0.1, 0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.1],
];

#[rustfmt::skip]
const KING_MAP: [[f32; SIZE]; SIZE] = [
    [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1],
    [0.1, 0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.1],
    [0.2, 0.4, 0.3, 0.3, 0.3, 0.3, 0.4, 0.2],
    [0.3, 0.6, 0.7, 0.7, 0.7, 0.7, 0.6, 0.3],
    [0.4, 0.8, 1.0, 1.0, 1.0, 1.0, 0.8, 0.4],
    [0.3, 0.6, 0.7, 0.7, 0.7, 0.7, 0.6, 0.3],
    [0.2, 0.4, 0.3, 0.3, 0.3, 0.3, 0.4, 0.2],
    [0.1, 0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.1],
];

/// Material and position balance in `[-1, 1]` from `player`'s point of view.
///
/// `legal` are `player`'s legal actions; pieces they capture don't count for
/// the opponent.
pub fn evaluate(
    catalog: &CheckersCatalog,
    board: &Board,
    player: Player,
    legal: &[ActionId],
) -> f32 {
    let capturable: Vec<Square> = legal
        .iter()
        .flat_map(|&id| catalog.catalog().captures(id).iter().copied())
        .collect();

    let mut own = 0.0;
    let mut opponent = 0.0;
    for i in 0..SIZE * SIZE {
        let square = Square::from_index(i, SIZE);
        let Some(owner) = board.owner(square) else {
            continue;
        };
        if owner == player {
            own += piece_value(board, square, owner);
        } else if !capturable.contains(&square) {
            opponent += piece_value(board, square, owner);
        }
    }

    let total = own + opponent;
    if total == 0.0 {
        0.0
    } else {
        (own - opponent) / total
    }
}

fn piece_value(board: &Board, square: Square, owner: Player) -> f32 {
    let (row, col) = (square.row as usize, square.col as usize);
    if board.get(square).abs() == KING {
        return KING_VALUE * KING_MAP[row][col];
    }
    let map_row = match owner {
        Player::First => row,
        Player::Second => SIZE - 1 - row,
    };
    (MAN_VALUE + support(board, square, owner)) * MAN_MAP[map_row][col]
}

/// Bonus for friendly pieces on the two diagonals behind a man.
fn support(board: &Board, square: Square, owner: Player) -> f32 {
    let behind = -forward(owner);
    [-1, 1]
        .iter()
        .filter_map(|&dc| square.offset(behind, dc, SIZE, SIZE))
        .filter(|&sq| board.owner(sq) == Some(owner))
        .count() as f32
        * SUPPORT_BONUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::legal_actions;
    use crate::positions::PositionIndex;

    fn score(board: &Board, player: Player) -> f32 {
        let catalog = CheckersCatalog::build();
        let index = PositionIndex::from_board(board);
        let legal = legal_actions(&catalog, board, &index, player);
        evaluate(&catalog, board, player, &legal)
    }

    #[test]
    fn test_opening_is_balanced_between_sides() {
        let board = Board::initial();
        let first = score(&board, Player::First);
        let second = score(&board, Player::Second);
        assert!((first + second).abs() < 1e-6, "{first} vs {second}");
        assert!(first.abs() < 0.1);
    }

    #[test]
    fn test_extra_king_is_an_advantage() {
        let board = Board::from_ascii([
            "........", "......b.", "........", "........", "...R....", "........",
            "..r.....", "........",
        ])
        .unwrap();
        assert!(score(&board, Player::First) > 0.3);
        assert!(score(&board, Player::Second) < -0.3);
    }

    #[test]
    fn test_capturable_pieces_are_discounted() {
        let board = Board::from_ascii([
            "........", "......b.", "........", "..b.....", ".r......", "........",
            "........", "........",
        ])
        .unwrap();
        let catalog = CheckersCatalog::build();
        let index = PositionIndex::from_board(&board);
        let legal = legal_actions(&catalog, &board, &index, Player::First);
        let discounted = evaluate(&catalog, &board, Player::First, &legal);
        let full = evaluate(&catalog, &board, Player::First, &[]);
        assert!(discounted > full, "{discounted} <= {full}");
    }

    #[test]
    fn test_empty_board_scores_zero() {
        let catalog = CheckersCatalog::build();
        assert_eq!(evaluate(&catalog, &Board::empty(), Player::First, &[]), 0.0);
    }

    #[test]
    fn test_score_is_bounded() {
        let board = Board::from_ascii([
            "........", "........", "........", "........", "...R....", "........",
            "..r.....", "........",
        ])
        .unwrap();
        assert!((score(&board, Player::First) - 1.0).abs() < 1e-6);
        assert!((score(&board, Player::Second) + 1.0).abs() < 1e-6);
    }
}
