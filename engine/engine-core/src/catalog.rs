//! Move catalogs.
//!
//! A catalog is the immutable table behind a game's action space: action id
//! `i` names the geometry-only move template `moves[i]` together with the
//! squares it captures, `captures[i]` (empty for quiet moves). Templates say
//! nothing about occupancy; deciding which ones are playable right now is the
//! environment's job.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable index into a [`MoveCatalog`].
pub type ActionId = usize;

/// A board coordinate. Row 0 is the top of the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major cell index on a board `cols` wide.
    #[inline]
    pub const fn index(self, cols: usize) -> usize {
        self.row as usize * cols + self.col as usize
    }

    /// Inverse of [`Square::index`].
    #[inline]
    pub const fn from_index(index: usize, cols: usize) -> Self {
        Self::new((index / cols) as u8, (index % cols) as u8)
    }

    /// The square `(dr, dc)` away, if it is still on a `rows x cols` board.
    #[inline]
    pub fn offset(self, dr: i32, dc: i32, rows: usize, cols: usize) -> Option<Square> {
        let row = self.row as i32 + dr;
        let col = self.col as i32 + dc;
        if row < 0 || col < 0 || row >= rows as i32 || col >= cols as i32 {
            return None;
        }
        Some(Square::new(row as u8, col as u8))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Index-aligned move and capture templates.
///
/// Append-only while a game builds it, then shared read-only for the life of
/// the environment.
#[derive(Debug, Clone, Default)]
pub struct MoveCatalog {
    moves: Vec<Vec<Square>>,
    captures: Vec<Vec<Square>>,
    lookup: HashMap<Vec<Square>, ActionId>,
}

impl MoveCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// One single-square placement template per cell, in row-major order.
    ///
    /// # Example
    /// ```
    /// use engine_core::{MoveCatalog, Square};
    ///
    /// let catalog = MoveCatalog::placements(3, 3);
    /// assert_eq!(catalog.len(), 9);
    /// assert_eq!(catalog.template(4), &[Square::new(1, 1)]);
    /// ```
    pub fn placements(rows: usize, cols: usize) -> Self {
        let mut catalog = Self::new();
        for index in 0..rows * cols {
            catalog.push(vec![Square::from_index(index, cols)], Vec::new());
        }
        catalog
    }

    /// Append a template and return its id.
    ///
    /// # Panics
    /// If the exact template is already present; ids must stay a bijection.
    pub fn push(&mut self, template: Vec<Square>, captures: Vec<Square>) -> ActionId {
        let id = self.moves.len();
        let previous = self.lookup.insert(template.clone(), id);
        assert!(
            previous.is_none(),
            "duplicate move template {template:?} (already action {previous:?})"
        );
        self.moves.push(template);
        self.captures.push(captures);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Squares visited by action `id`, origin first.
    #[inline]
    pub fn template(&self, id: ActionId) -> &[Square] {
        &self.moves[id]
    }

    /// Squares captured by action `id`, in jump order.
    #[inline]
    pub fn captures(&self, id: ActionId) -> &[Square] {
        &self.captures[id]
    }

    #[inline]
    pub fn is_capture(&self, id: ActionId) -> bool {
        !self.captures[id].is_empty()
    }

    /// Reverse lookup from a template to its action id.
    pub fn id_of(&self, template: &[Square]) -> Option<ActionId> {
        self.lookup.get(template).copied()
    }

    /// All `(id, template, captures)` triples in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &[Square], &[Square])> + '_ {
        self.moves
            .iter()
            .zip(self.captures.iter())
            .enumerate()
            .map(|(id, (m, c))| (id, m.as_slice(), c.as_slice()))
    }
}
