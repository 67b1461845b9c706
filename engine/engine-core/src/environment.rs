//! The environment contract every game implements.
//!
//! The search engine only ever talks to a game through this trait. States are
//! plain values: `apply` returns a fresh state and never mutates its input, so
//! the engine can keep private snapshots on tree nodes.

use crate::catalog::{ActionId, MoveCatalog};
use crate::metadata::GameMetadata;
use crate::observation::Observation;
use crate::player::{Outcome, Player};

/// Rules of one two-player, perfect-information game.
///
/// # Example
///
/// ```rust
/// use engine_core::{ActionId, Environment, GameMetadata, MoveCatalog, Observation, Outcome, Player};
///
/// /// Take the last stick from a pile of three to win.
/// #[derive(Debug)]
/// struct Sticks(MoveCatalog);
///
/// impl Environment for Sticks {
///     type State = u8;
///
///     fn name(&self) -> &'static str { "sticks" }
///     fn metadata(&self) -> GameMetadata { GameMetadata::new("sticks", "Sticks") }
///     fn catalog(&self) -> &MoveCatalog { &self.0 }
///     fn reset(&self) -> u8 { 3 }
///     fn legal_actions(&self, state: &u8, _player: Player) -> Vec<ActionId> {
///         (0..(*state as usize).min(2)).collect()
///     }
///     fn apply(&self, state: &u8, action: ActionId, _player: Player) -> u8 {
///         state - (action as u8 + 1)
///     }
///     fn terminal_value(&self, state: &u8, player: Player, _ply: u32) -> Option<Outcome> {
///         (*state == 0).then_some(Outcome::Win(player))
///     }
///     fn to_player_relative(&self, state: &u8, _player: Player, _ply: u32) -> Observation {
///         let mut obs = Observation::zeros(1, 1, 1);
///         obs.set(0, 0, 0, *state as f32);
///         obs
///     }
/// }
///
/// let game = Sticks(MoveCatalog::placements(1, 2));
/// let state = game.apply(&game.reset(), 1, Player::First);
/// assert_eq!(game.legal_actions(&state, Player::Second), vec![0]);
/// ```
pub trait Environment: Send + Sync + std::fmt::Debug {
    /// Game state snapshot. Cloned onto every expanded search node.
    type State: Clone + Send + Sync + std::fmt::Debug;

    /// Environment identifier (e.g. `"checkers"`).
    fn name(&self) -> &'static str;

    /// Descriptive metadata for logs and predictor sizing.
    fn metadata(&self) -> GameMetadata;

    /// The game's immutable move catalog.
    fn catalog(&self) -> &MoveCatalog;

    /// Size of the action space; predictor policies have exactly this length.
    fn action_space(&self) -> usize {
        self.catalog().len()
    }

    /// Initial position. [`Player::First`] is to move.
    fn reset(&self) -> Self::State;

    /// Currently legal action ids for `player`, ascending.
    fn legal_actions(&self, state: &Self::State, player: Player) -> Vec<ActionId>;

    /// State after `player` plays `action`.
    ///
    /// # Panics
    /// If `action` is not legal for `player` in `state`.
    fn apply(&self, state: &Self::State, action: ActionId, player: Player) -> Self::State;

    /// Outcome if the game is over right after `player` moved, `None` otherwise.
    ///
    /// `ply` is the number of moves played so far, including `player`'s.
    fn terminal_value(&self, state: &Self::State, player: Player, ply: u32) -> Option<Outcome>;

    /// Static evaluation in `[-1, 1]` from `player`'s point of view.
    ///
    /// `legal` are `player`'s legal actions in `state`. Games without a
    /// heuristic return 0.
    fn heuristic(&self, _state: &Self::State, _player: Player, _legal: &[ActionId]) -> f32 {
        0.0
    }

    /// Encode `state` as seen by `player`, the side to move.
    fn to_player_relative(&self, state: &Self::State, player: Player, ply: u32) -> Observation;
}
