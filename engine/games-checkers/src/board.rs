//! Raw checkers board.
//!
//! Cells hold `sign * MAN` or `sign * KING`, where the sign is the owner's
//! ([`Player::sign`]), and `0` when empty. Row 0 is the second player's home
//! rank; the first player starts on rows 5 to 7 and moves toward row 0.

use std::fmt;

use engine_core::{Player, Square};

use crate::catalog::SIZE;

pub const MAN: i8 = 1;
pub const KING: i8 = 2;

const HOME_ROWS: usize = 3;

/// Row delta of a man's forward step.
pub fn forward(player: Player) -> i32 {
    match player {
        Player::First => -1,
        Player::Second => 1,
    }
}

/// Rank on which `player`'s men are crowned.
pub fn promotion_row(player: Player) -> u8 {
    match player {
        Player::First => 0,
        Player::Second => (SIZE - 1) as u8,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [i8; SIZE * SIZE],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [0; SIZE * SIZE],
        }
    }

    /// Starting position: twelve men each on the dark squares of the three home rows.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for row in 0..SIZE {
            let owner = if row < HOME_ROWS {
                Player::Second
            } else if row >= SIZE - HOME_ROWS {
                Player::First
            } else {
                continue;
            };
            for col in (0..SIZE).filter(|col| (row + col) % 2 == 1) {
                board.set(Square::new(row as u8, col as u8), owner.sign() * MAN);
            }
        }
        board
    }

    /// Parse eight rows of `r`/`R` (first player man/king), `b`/`B` (second
    /// player) and `.` for empty. Whitespace inside a row is ignored.
    pub fn from_ascii(rows: [&str; SIZE]) -> Result<Self, String> {
        let mut board = Self::empty();
        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != SIZE {
                return Err(format!("row {row} has {} cells: {line:?}", symbols.len()));
            }
            for (col, symbol) in symbols.into_iter().enumerate() {
                let cell = match symbol {
                    '.' => 0,
                    'r' => MAN,
                    'R' => KING,
                    'b' => -MAN,
                    'B' => -KING,
                    other => return Err(format!("unknown piece {other:?} in row {row}")),
                };
                board.set(Square::new(row as u8, col as u8), cell);
            }
        }
        Ok(board)
    }

    pub fn get(&self, square: Square) -> i8 {
        self.cells[square.index(SIZE)]
    }

    pub fn set(&mut self, square: Square, cell: i8) {
        self.cells[square.index(SIZE)] = cell;
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square) == 0
    }

    pub fn is_king(&self, square: Square) -> bool {
        self.get(square).abs() == KING
    }

    pub fn owner(&self, square: Square) -> Option<Player> {
        Player::owner_of(self.get(square))
    }

    pub fn cells(&self) -> &[i8; SIZE * SIZE] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(SIZE) {
            for &cell in row {
                let symbol = match cell {
                    MAN => 'r',
                    KING => 'R',
                    -1 => 'b',
                    -2 => 'B',
                    _ => '.',
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
