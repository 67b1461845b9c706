//! Position index: where every piece stands, split by owner and rank.
//!
//! The resolver walks pieces through this index instead of scanning all 64
//! cells. It is updated in lockstep with the [`Board`] on every applied move
//! and must always agree with it.

use engine_core::{Player, Square};

use crate::board::{promotion_row, Board};
use crate::catalog::SIZE;

/// Set of squares backed by a 64-bit mask. Iterates in ascending square index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SquareSet(u64);

impl SquareSet {
    pub fn insert(&mut self, square: Square) {
        self.0 |= 1u64 << square.index(SIZE);
    }

    pub fn remove(&mut self, square: Square) -> bool {
        let bit = 1u64 << square.index(SIZE);
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    pub fn contains(&self, square: Square) -> bool {
        self.0 & (1u64 << square.index(SIZE)) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Square> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(Square::from_index(index, SIZE))
        })
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::default();
        for square in iter {
            set.insert(square);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PositionIndex {
    men: [SquareSet; 2],
    kings: [SquareSet; 2],
}

impl PositionIndex {
    pub fn from_board(board: &Board) -> Self {
        let mut index = Self::default();
        for i in 0..SIZE * SIZE {
            let square = Square::from_index(i, SIZE);
            if let Some(owner) = board.owner(square) {
                if board.is_king(square) {
                    index.kings[owner.index()].insert(square);
                } else {
                    index.men[owner.index()].insert(square);
                }
            }
        }
        index
    }

    pub fn men(&self, player: Player) -> SquareSet {
        self.men[player.index()]
    }

    pub fn kings(&self, player: Player) -> SquareSet {
        self.kings[player.index()]
    }

    /// Every piece `player` owns, men and kings, in ascending square order.
    pub fn pieces(&self, player: Player) -> SquareSet {
        SquareSet(self.men[player.index()].0 | self.kings[player.index()].0)
    }

    pub fn piece_count(&self, player: Player) -> usize {
        self.pieces(player).len()
    }

    /// Record `player` moving from `origin` to `destination` and taking `captures`.
    ///
    /// A man finishing on its promotion row moves to the kings set.
    pub fn apply_move(
        &mut self,
        player: Player,
        origin: Square,
        destination: Square,
        captures: &[Square],
    ) {
        let side = player.index();
        let was_king = self.kings[side].remove(origin);
        if !was_king {
            self.men[side].remove(origin);
        }

        let opponent = player.opponent().index();
        for &square in captures {
            if !self.men[opponent].remove(square) {
                self.kings[opponent].remove(square);
            }
        }

        if was_king || destination.row == promotion_row(player) {
            self.kings[side].insert(destination);
        } else {
            self.men[side].insert(destination);
        }
    }

    /// First square where the index and `board` disagree.
    pub fn first_mismatch(&self, board: &Board) -> Option<Square> {
        let expected = Self::from_board(board);
        (0..SIZE * SIZE).map(|i| Square::from_index(i, SIZE)).find(|&square| {
            Player::BOTH.iter().any(|p| {
                self.men(*p).contains(square) != expected.men(*p).contains(square)
                    || self.kings(*p).contains(square) != expected.kings(*p).contains(square)
            })
        })
    }

    pub fn agrees_with(&self, board: &Board) -> bool {
        self.first_mismatch(board).is_none()
    }

    /// # Panics
    /// If the index has drifted from `board`; the position can no longer be trusted.
    pub fn verify(&self, board: &Board) {
        if let Some(square) = self.first_mismatch(board) {
            panic!("position index disagrees with board at {square}:\n{board}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_set_iterates_ascending() {
        let set: SquareSet = [Square::new(7, 0), Square::new(0, 1), Square::new(3, 4)]
            .into_iter()
            .collect();
        let squares: Vec<_> = set.iter().collect();
        assert_eq!(
            squares,
            vec![Square::new(0, 1), Square::new(3, 4), Square::new(7, 0)]
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_square_set_remove() {
        let mut set = SquareSet::default();
        set.insert(Square::new(2, 3));
        assert!(set.remove(Square::new(2, 3)));
        assert!(!set.remove(Square::new(2, 3)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_initial_index() {
        let board = Board::initial();
        let index = PositionIndex::from_board(&board);
        for player in Player::BOTH {
            assert_eq!(index.men(player).len(), 12);
            assert!(index.kings(player).is_empty());
        }
        assert!(index.men(Player::First).contains(Square::new(5, 0)));
        assert!(index.men(Player::Second).contains(Square::new(0, 1)));
        assert!(index.agrees_with(&board));
    }

    #[test]
    fn test_apply_move_promotes_and_removes_captures() {
        let board = Board::from_ascii([
            "........", "........", "...B....", "..b.....", ".r......", "........",
            "........", "........",
        ])
        .unwrap();
        let mut index = PositionIndex::from_board(&board);

        index.apply_move(
            Player::First,
            Square::new(4, 1),
            Square::new(0, 5),
            &[Square::new(3, 2), Square::new(1, 4)],
        );

        assert!(index.kings(Player::First).contains(Square::new(0, 5)));
        assert!(index.men(Player::First).is_empty());
        assert!(index.men(Player::Second).is_empty());
        // (2, 3) was not captured
        assert_eq!(index.piece_count(Player::Second), 1);
    }

    #[test]
    fn test_mismatch_is_detected() {
        let board = Board::initial();
        let mut index = PositionIndex::from_board(&board);
        index.apply_move(Player::First, Square::new(5, 0), Square::new(4, 1), &[]);
        assert_eq!(index.first_mismatch(&board), Some(Square::new(4, 1)));
    }

    #[test]
    #[should_panic(expected = "position index disagrees")]
    fn test_verify_panics_on_divergence() {
        let board = Board::initial();
        let mut index = PositionIndex::from_board(&board);
        index.apply_move(Player::Second, Square::new(2, 1), Square::new(3, 0), &[]);
        index.verify(&board);
    }
}
