//! Checkers move catalog.
//!
//! Every action a piece could ever take on an 8x8 board, independent of
//! occupancy:
//!
//! * quiet moves: one diagonal step from any square, 196 in total;
//! * captures: chains of two-square diagonal jumps, grown breadth-first one
//!   jump at a time. A chain may revisit a landing square but never jumps the
//!   same square twice, which bounds chains at nine captures.
//!
//! Whether a man may use a template (forward jumps only) and whether the board
//! allows it is decided at resolution time, see [`crate::moves`].

use engine_core::{ActionId, MoveCatalog, Square};
use tracing::debug;

pub const SIZE: usize = 8;

/// Diagonal unit steps in catalog order.
pub const DIRECTIONS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];

/// Immutable catalog plus a per-origin index of its templates.
#[derive(Debug, Clone)]
pub struct CheckersCatalog {
    catalog: MoveCatalog,
    by_origin: Vec<Vec<ActionId>>,
    quiet_moves: usize,
}

impl CheckersCatalog {
    /// Enumerate all templates. Runs once per environment.
    pub fn build() -> Self {
        let mut catalog = MoveCatalog::new();

        for index in 0..SIZE * SIZE {
            let origin = Square::from_index(index, SIZE);
            for (dr, dc) in DIRECTIONS {
                if let Some(dest) = origin.offset(dr, dc, SIZE, SIZE) {
                    catalog.push(vec![origin, dest], Vec::new());
                }
            }
        }
        let quiet_moves = catalog.len();

        // Seed with single jumps, then extend the previous grade until no chain grows.
        let mut grade: Vec<(Vec<Square>, Vec<Square>)> = Vec::new();
        for index in 0..SIZE * SIZE {
            let origin = Square::from_index(index, SIZE);
            grade.extend(extend_chain(&[origin], &[]));
        }
        let mut grades = 0;
        while !grade.is_empty() {
            grades += 1;
            let next: Vec<_> = grade
                .iter()
                .flat_map(|(path, captured)| extend_chain(path, captured))
                .collect();
            for (path, captured) in grade {
                catalog.push(path, captured);
            }
            grade = next;
        }

        let mut by_origin = vec![Vec::new(); SIZE * SIZE];
        for (id, template, _) in catalog.iter() {
            by_origin[template[0].index(SIZE)].push(id);
        }

        debug!(
            templates = catalog.len(),
            quiet_moves,
            capture_grades = grades,
            "Built checkers move catalog"
        );

        Self {
            catalog,
            by_origin,
            quiet_moves,
        }
    }

    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    /// Ids of every template starting on `origin`, ascending.
    pub fn from_square(&self, origin: Square) -> &[ActionId] {
        &self.by_origin[origin.index(SIZE)]
    }

    /// Number of one-step templates; they occupy ids `0..quiet_moves()`.
    pub fn quiet_moves(&self) -> usize {
        self.quiet_moves
    }

    /// Capture template counts indexed by number of captures (index 0 unused).
    pub fn capture_grades(&self) -> Vec<usize> {
        let mut grades = Vec::new();
        for (_, _, captured) in self.catalog.iter() {
            if captured.is_empty() {
                continue;
            }
            if grades.len() <= captured.len() {
                grades.resize(captured.len() + 1, 0);
            }
            grades[captured.len()] += 1;
        }
        grades
    }
}

/// All one-jump extensions of a chain that stay on the board and capture a new square.
fn extend_chain(path: &[Square], captured: &[Square]) -> Vec<(Vec<Square>, Vec<Square>)> {
    let Some(&from) = path.last() else {
        return Vec::new();
    };

    DIRECTIONS
        .iter()
        .filter_map(|&(dr, dc)| {
            let over = from.offset(dr, dc, SIZE, SIZE)?;
            let landing = from.offset(2 * dr, 2 * dc, SIZE, SIZE)?;
            if captured.contains(&over) {
                return None;
            }
            let mut next_path = path.to_vec();
            next_path.push(landing);
            let mut next_captured = captured.to_vec();
            next_captured.push(over);
            Some((next_path, next_captured))
        })
        .collect()
}
