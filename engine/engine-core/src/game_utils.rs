//! Shared utilities for two-player game implementations
//!
//! This module provides common functionality used across multiple game implementations
//! to reduce code duplication and ensure consistent behavior.

use crate::catalog::{ActionId, Square};

/// The four line directions on a grid: horizontal, vertical and both diagonals.
pub const LINE_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Length of the longest same-colour line passing through `square`.
///
/// Returns 0 for an empty square.
///
/// # Example
/// ```
/// use engine_core::game_utils::longest_line_through;
/// use engine_core::Square;
///
/// // X X X
/// // . O .
/// // . O .
/// let board = [1, 1, 1, 0, -1, 0, 0, -1, 0];
/// assert_eq!(longest_line_through(&board, 3, 3, Square::new(0, 1)), 3);
/// assert_eq!(longest_line_through(&board, 3, 3, Square::new(1, 1)), 2);
/// ```
pub fn longest_line_through(board: &[i8], rows: usize, cols: usize, square: Square) -> usize {
    let stone = board[square.index(cols)];
    if stone == 0 {
        return 0;
    }

    LINE_DIRECTIONS
        .iter()
        .map(|&(dr, dc)| {
            1 + run_length(board, rows, cols, square, (dr, dc), stone)
                + run_length(board, rows, cols, square, (-dr, -dc), stone)
        })
        .max()
        .unwrap_or(1)
}

/// Count consecutive `stone` cells after `start` in direction `dir`.
fn run_length(
    board: &[i8],
    rows: usize,
    cols: usize,
    start: Square,
    (dr, dc): (i32, i32),
    stone: i8,
) -> usize {
    let mut count = 0;
    let mut current = start;
    while let Some(next) = current.offset(dr, dc, rows, cols) {
        if board[next.index(cols)] != stone {
            break;
        }
        count += 1;
        current = next;
    }
    count
}

/// Restrict a full-width policy to `legal` actions and renormalise.
///
/// Returns `(action, prior)` pairs in the order of `legal`, plus whether the
/// masked mass was zero and a uniform distribution over `legal` was used
/// instead. Negative and non-finite entries count as zero.
///
/// # Example
/// ```
/// use engine_core::game_utils::mask_priors;
///
/// let (priors, fallback) = mask_priors(&[0.5, 0.3, 0.2], &[0, 2]);
/// assert!(!fallback);
/// assert_eq!(priors[0].0, 0);
/// assert!((priors[0].1 - 0.5 / 0.7).abs() < 1e-6);
///
/// let (priors, fallback) = mask_priors(&[1.0, 0.0, 0.0], &[1, 2]);
/// assert!(fallback);
/// assert_eq!(priors, vec![(1, 0.5), (2, 0.5)]);
/// ```
pub fn mask_priors(policy: &[f32], legal: &[ActionId]) -> (Vec<(ActionId, f32)>, bool) {
    let masked: Vec<(ActionId, f32)> = legal
        .iter()
        .map(|&action| {
            let p = policy.get(action).copied().unwrap_or(0.0);
            (action, if p.is_finite() && p > 0.0 { p } else { 0.0 })
        })
        .collect();

    let total: f32 = masked.iter().map(|(_, p)| p).sum();
    if total > 0.0 && total.is_finite() {
        let priors = masked.into_iter().map(|(a, p)| (a, p / total)).collect();
        return (priors, false);
    }

    let uniform = 1.0 / legal.len().max(1) as f32;
    (legal.iter().map(|&a| (a, uniform)).collect(), true)
}
