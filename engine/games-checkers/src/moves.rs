//! Legal move resolution.
//!
//! Filters the catalog down to what the position allows:
//!
//! 1. every template starting on one of the mover's pieces is checked against
//!    the board. Men may only step or jump toward their promotion row, landing
//!    squares must be empty (the moving piece's origin counts as empty) and
//!    every captured square must hold an opponent piece;
//! 2. a validated capture that is a strict prefix of a longer validated
//!    capture from the same origin is dropped, so a chain can't stop early;
//! 3. if any capture survives, quiet moves are discarded.
//!
//! Captured pieces stay on the board until the move completes, so a chain can
//! never land on or re-jump a piece it has already taken.

use engine_core::{ActionId, Player, Square};

use crate::board::{forward, Board};
use crate::catalog::CheckersCatalog;
use crate::positions::PositionIndex;

/// Legal actions for `player`, ascending. Empty when `player` cannot move.
pub fn legal_actions(
    catalog: &CheckersCatalog,
    board: &Board,
    index: &PositionIndex,
    player: Player,
) -> Vec<ActionId> {
    let mut quiet = Vec::new();
    let mut captures = Vec::new();

    for origin in index.pieces(player).iter() {
        let king = board.is_king(origin);
        let mut chains = Vec::new();

        for &id in catalog.from_square(origin) {
            let template = catalog.catalog().template(id);
            let taken = catalog.catalog().captures(id);
            if !follows_direction(template, player, king) || !lands_clear(board, template) {
                continue;
            }
            if taken.is_empty() {
                quiet.push(id);
            } else if taken.iter().all(|&sq| board.owner(sq) == Some(player.opponent())) {
                chains.push(id);
            }
        }

        captures.extend(maximal_chains(catalog, &chains));
    }

    let mut legal = if captures.is_empty() { quiet } else { captures };
    legal.sort_unstable();
    legal
}

/// Whether `player` has any legal move, without building the full list.
pub fn has_legal_move(
    catalog: &CheckersCatalog,
    board: &Board,
    index: &PositionIndex,
    player: Player,
) -> bool {
    index.pieces(player).iter().any(|origin| {
        let king = board.is_king(origin);
        catalog.from_square(origin).iter().any(|&id| {
            let template = catalog.catalog().template(id);
            follows_direction(template, player, king)
                && lands_clear(board, template)
                && catalog
                    .catalog()
                    .captures(id)
                    .iter()
                    .all(|&sq| board.owner(sq) == Some(player.opponent()))
        })
    })
}

/// Men move toward their promotion row on every step; kings go anywhere.
fn follows_direction(template: &[Square], player: Player, king: bool) -> bool {
    king || template
        .windows(2)
        .all(|step| (step[1].row as i32 - step[0].row as i32).signum() == forward(player))
}

fn lands_clear(board: &Board, template: &[Square]) -> bool {
    let origin = template[0];
    template[1..]
        .iter()
        .all(|&sq| sq == origin || board.is_empty(sq))
}

/// Drop chains that a longer validated chain from the same origin extends.
fn maximal_chains(catalog: &CheckersCatalog, chains: &[ActionId]) -> Vec<ActionId> {
    chains
        .iter()
        .copied()
        .filter(|&id| {
            let path = catalog.catalog().template(id);
            !chains.iter().any(|&other| {
                let longer = catalog.catalog().template(other);
                longer.len() > path.len() && longer.starts_with(path)
            })
        })
        .collect()
}
