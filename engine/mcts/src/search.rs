//! MCTS search implementation.
//!
//! Each rollout:
//! 1. Selection: descend from the root with [`MctsTree::select_child`],
//!    recording the path
//! 2. Expansion: materialise the leaf's position from its parent's snapshot;
//!    finished games become terminal nodes, anything else is expanded with
//!    masked, noised priors
//! 3. Evaluation: terminal value, or the predictor's value optionally blended
//!    with the game heuristic
//! 4. Backpropagation: update statistics along the recorded path
//!
//! A search owns nothing but its tree, so independent games can search in
//! parallel without coordination.

use std::time::{Duration, Instant};

use engine_core::game_utils::mask_priors;
use engine_core::{ActionId, Environment, Outcome, Player};
use rand::Rng;
use rand_distr::{Distribution, Gamma};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::MctsConfig;
use crate::evaluator::{Predictor, PredictorError};
use crate::node::NodeId;
use crate::tree::{MctsTree, TreeError};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Predictor error: {0}")]
    Predictor(#[from] PredictorError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Counters from one search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub rollouts: u32,
    pub predictor_calls: u32,
    pub terminal_hits: u32,
    pub max_depth: u32,
    pub elapsed: Duration,
}

/// MCTS driver binding an environment, a predictor and a budget.
pub struct MctsSearch<'a, E: Environment, P: Predictor + ?Sized> {
    env: &'a E,
    predictor: &'a P,
    config: MctsConfig,
}

impl<'a, E: Environment, P: Predictor + ?Sized> MctsSearch<'a, E, P> {
    pub fn new(env: &'a E, predictor: &'a P, config: MctsConfig) -> Result<Self, SearchError> {
        config.validate().map_err(SearchError::InvalidConfig)?;
        Ok(Self {
            env,
            predictor,
            config,
        })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Search from `state` with `player` to move after `ply` plies.
    ///
    /// `existing` is the subtree kept from the previous move; it is reused
    /// when already expanded for `player`, otherwise a fresh root is built.
    pub fn run<R: Rng + ?Sized>(
        &self,
        state: &E::State,
        player: Player,
        ply: u32,
        existing: Option<MctsTree<E::State>>,
        rng: &mut R,
    ) -> Result<MctsTree<E::State>, SearchError> {
        self.search(state, player, ply, existing, rng)
            .map(|(tree, _)| tree)
    }

    /// Like [`run`](Self::run), also returning the search counters.
    pub fn search<R: Rng + ?Sized>(
        &self,
        state: &E::State,
        player: Player,
        ply: u32,
        existing: Option<MctsTree<E::State>>,
        rng: &mut R,
    ) -> Result<(MctsTree<E::State>, SearchStats), SearchError> {
        let start = Instant::now();
        let mut stats = SearchStats::default();

        let legal = self.env.legal_actions(state, player);
        if legal.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let reusable = existing.filter(|tree| {
            let root = tree.get(tree.root());
            root.is_expanded() && !root.children.is_empty() && root.player == player
        });
        let mut tree = match reusable {
            Some(tree) => {
                trace!(nodes = tree.len(), "Reusing subtree");
                tree
            }
            None => {
                let mut tree = MctsTree::new(player);
                let root = tree.root();
                self.expand(&mut tree, root, state.clone(), ply, &legal, rng, &mut stats)?;
                tree
            }
        };

        for _ in 0..self.config.num_rollouts {
            if let Some(budget) = self.config.time_budget {
                if start.elapsed() >= budget {
                    break;
                }
            }
            self.rollout(&mut tree, ply, rng, &mut stats)?;
        }

        stats.elapsed = start.elapsed();
        let root = tree.get(tree.root());
        debug!(
            env = self.env.name(),
            rollouts = stats.rollouts,
            predictor_calls = stats.predictor_calls,
            terminal_hits = stats.terminal_hits,
            max_depth = stats.max_depth,
            nodes = tree.len(),
            root_visits = root.visit_count,
            root_value = root.value(),
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "MCTS search complete"
        );

        Ok((tree, stats))
    }

    /// One select, expand, evaluate, backpropagate cycle.
    fn rollout<R: Rng + ?Sized>(
        &self,
        tree: &mut MctsTree<E::State>,
        root_ply: u32,
        rng: &mut R,
        stats: &mut SearchStats,
    ) -> Result<(), SearchError> {
        let mut path = vec![tree.root()];
        let mut current = tree.root();
        let mut last_action = None;

        while tree.get(current).is_expanded() && !tree.get(current).is_terminal() {
            let (action, child) = tree
                .select_child(current, self.config.c_puct)
                .ok_or_else(|| {
                    SearchError::InvalidState(format!("expanded node {current:?} has no children"))
                })?;
            path.push(child);
            current = child;
            last_action = Some(action);
        }

        let depth = (path.len() - 1) as u32;
        let leaf_player = tree.get(current).player;
        let mover = leaf_player.opponent();

        let value = match (tree.get(current).terminal_value, last_action) {
            (Some(value), _) => {
                stats.terminal_hits += 1;
                value
            }
            (None, Some(action)) => {
                let parent = path[path.len() - 2];
                let leaf_ply = root_ply + depth;
                self.evaluate_leaf(tree, parent, current, action, leaf_ply, rng, stats)?
            }
            (None, None) => {
                return Err(SearchError::InvalidState(
                    "root is neither expanded nor terminal".into(),
                ))
            }
        };

        tree.backpropagate(&path, value, mover);
        stats.rollouts += 1;
        stats.max_depth = stats.max_depth.max(depth);

        trace!(depth, value, leaf = current.0, "MCTS rollout complete");
        Ok(())
    }

    /// Materialise and expand an unexpanded leaf, returning its value from the
    /// leaf player's perspective.
    #[allow(clippy::too_many_arguments)]
    fn evaluate_leaf<R: Rng + ?Sized>(
        &self,
        tree: &mut MctsTree<E::State>,
        parent: NodeId,
        leaf: NodeId,
        action: ActionId,
        ply: u32,
        rng: &mut R,
        stats: &mut SearchStats,
    ) -> Result<f32, SearchError> {
        let mover = tree.get(parent).player;
        let leaf_player = tree.get(leaf).player;
        let parent_state = tree.get(parent).state.as_ref().ok_or_else(|| {
            SearchError::InvalidState(format!("parent {parent:?} has no state snapshot"))
        })?;
        let state = self.env.apply(parent_state, action, mover);

        if let Some(outcome) = self.env.terminal_value(&state, mover, ply) {
            let value = outcome.value_for(leaf_player);
            tree.mark_terminal(leaf, state, value)?;
            stats.terminal_hits += 1;
            return Ok(value);
        }

        let legal = self.env.legal_actions(&state, leaf_player);
        if legal.is_empty() {
            warn!(
                env = self.env.name(),
                ply,
                "Non-terminal position without legal moves, scoring as a draw"
            );
            tree.mark_terminal(leaf, state, 0.0)?;
            return Ok(0.0);
        }

        let w = self.config.heuristic_weight;
        let heuristic = if w > 0.0 {
            self.env.heuristic(&state, leaf_player, &legal)
        } else {
            0.0
        };
        let network_value = self.expand(tree, leaf, state, ply, &legal, rng, stats)?;
        Ok(w * heuristic + (1.0 - w) * network_value)
    }

    /// Query the predictor for `state` and expand `id` with the result.
    /// Returns the predictor's value.
    #[allow(clippy::too_many_arguments)]
    fn expand<R: Rng + ?Sized>(
        &self,
        tree: &mut MctsTree<E::State>,
        id: NodeId,
        state: E::State,
        ply: u32,
        legal: &[ActionId],
        rng: &mut R,
        stats: &mut SearchStats,
    ) -> Result<f32, SearchError> {
        let player = tree.get(id).player;
        let observation = self.env.to_player_relative(&state, player, ply);
        let prediction = self.predictor.predict(&observation)?;
        prediction.validate(self.env.action_space())?;
        stats.predictor_calls += 1;

        let mut policy = prediction.policy;
        if self.config.noise_enabled() {
            let noise = dirichlet_noise(policy.len(), self.config.dirichlet_alpha, rng)?;
            let eps = self.config.dirichlet_epsilon;
            for (p, n) in policy.iter_mut().zip(noise) {
                *p = (1.0 - eps) * *p + eps * n;
            }
        }

        let (priors, fallback) = mask_priors(&policy, legal);
        if fallback {
            warn!(
                env = self.env.name(),
                legal = legal.len(),
                "Predictor put no mass on legal moves, using uniform priors"
            );
        }

        let winning = self.winning_action(&state, player, ply, &priors);
        tree.expand(id, state, &priors, winning)?;
        Ok(prediction.value)
    }

    /// First action (ascending) that ends the game with `player` winning.
    fn winning_action(
        &self,
        state: &E::State,
        player: Player,
        ply: u32,
        priors: &[(ActionId, f32)],
    ) -> Option<ActionId> {
        priors
            .iter()
            .filter(|(_, prior)| *prior > 0.0)
            .map(|&(action, _)| action)
            .find(|&action| {
                let next = self.env.apply(state, action, player);
                self.env.terminal_value(&next, player, ply + 1) == Some(Outcome::Win(player))
            })
    }
}

/// Sample a symmetric Dirichlet(`alpha`) vector of length `n`.
pub fn dirichlet_noise<R: Rng + ?Sized>(
    n: usize,
    alpha: f32,
    rng: &mut R,
) -> Result<Vec<f32>, SearchError> {
    let gamma = Gamma::new(alpha as f64, 1.0)
        .map_err(|e| SearchError::InvalidConfig(format!("dirichlet_alpha {alpha}: {e}")))?;
    let mut samples: Vec<f32> = (0..n).map(|_| gamma.sample(rng) as f32).collect();

    // Normalize
    let sum: f32 = samples.iter().sum();
    if sum > 0.0 {
        for s in &mut samples {
            *s /= sum;
        }
    } else if n > 0 {
        samples.fill(1.0 / n as f32);
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{Prediction, UniformPredictor};
    use engine_core::Observation;
    use games_checkers::Checkers;
    use games_connect4::Connect4;
    use games_tictactoe::TicTacToe;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    /// Uniform policy with a tiny deterministic per-position jitter.
    struct JitteredUniform {
        seed: u64,
        num_actions: usize,
    }

    impl Predictor for JitteredUniform {
        fn predict(&self, observation: &Observation) -> Result<Prediction, PredictorError> {
            let mut hasher = DefaultHasher::new();
            self.seed.hash(&mut hasher);
            for value in observation.data() {
                value.to_bits().hash(&mut hasher);
            }
            let mut rng = ChaCha20Rng::seed_from_u64(hasher.finish());
            let policy = (0..self.num_actions)
                .map(|_| 1.0 / self.num_actions as f32 + rng.gen::<f32>() * 1e-6)
                .collect();
            Ok(Prediction { policy, value: 0.0 })
        }
    }

    /// Always the same raw output.
    struct FixedPredictor(Prediction);

    impl Predictor for FixedPredictor {
        fn predict(&self, _observation: &Observation) -> Result<Prediction, PredictorError> {
            Ok(self.0.clone())
        }
    }

    fn play<E: Environment>(env: &E, moves: &[ActionId]) -> (E::State, Player) {
        let mut state = env.reset();
        let mut player = Player::First;
        for &action in moves {
            state = env.apply(&state, action, player);
            player = -player;
        }
        (state, player)
    }

    #[test]
    fn test_basic_search() {
        let game = TicTacToe::new();
        let predictor = UniformPredictor::new(9);
        let search = MctsSearch::new(&game, &predictor, MctsConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let (tree, stats) = search
            .search(&game.reset(), Player::First, 0, None, &mut rng)
            .unwrap();

        assert_eq!(stats.rollouts, 50);
        assert_eq!(tree.get(tree.root()).visit_count, 50);
        assert_eq!(tree.get(tree.root()).children.len(), 9);
        let sum: f32 = tree.visit_policy(9).iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(tree.select_action(tree.root(), 0.0, &mut rng).unwrap() < 9);
    }

    #[test]
    fn test_prefers_centre_on_empty_board() {
        let game = TicTacToe::new();
        let config = MctsConfig::for_evaluation()
            .with_rollouts(20_000)
            .with_c_puct(4.0);

        for seed in [1, 2, 3] {
            let predictor = JitteredUniform {
                seed,
                num_actions: 9,
            };
            let search = MctsSearch::new(&game, &predictor, config.clone()).unwrap();
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let tree = search
                .run(&game.reset(), Player::First, 0, None, &mut rng)
                .unwrap();

            let policy = tree.visit_policy(9);
            assert_eq!(
                tree.select_action(tree.root(), 0.0, &mut rng).unwrap(),
                4,
                "seed {seed}: {policy:?}"
            );
        }
    }

    #[test]
    fn test_takes_immediate_win() {
        // X | X | .
        // O | O | .
        // . | . | .
        let game = TicTacToe::new();
        let (state, player) = play(&game, &[0, 3, 1, 4]);
        assert_eq!(player, Player::First);

        let predictor = UniformPredictor::new(9);
        let search = MctsSearch::new(&game, &predictor, MctsConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let tree = search.run(&state, player, 4, None, &mut rng).unwrap();

        let root = tree.get(tree.root());
        assert_eq!(root.winning_action, Some(2));
        let winner = tree.get(root.child(2).unwrap());
        assert_eq!(winner.terminal_value, Some(-1.0), "stored for the loser");
        assert_eq!(winner.visit_count, 50);
        assert!(root.value() > 0.9);
        assert_eq!(tree.select_action(tree.root(), 0.0, &mut rng).unwrap(), 2);
    }

    #[test]
    fn test_single_rollout_backs_up_terminal_value() {
        // X O X
        // O X O
        // O X .   X to move; 8 completes the diagonal
        let game = TicTacToe::new();
        let (state, player) = play(&game, &[0, 1, 2, 3, 4, 5, 7, 6]);
        assert_eq!(game.legal_actions(&state, player), vec![8]);

        let predictor = UniformPredictor::new(9);
        let config = MctsConfig::for_testing().with_rollouts(1);
        let search = MctsSearch::new(&game, &predictor, config).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let tree = search.run(&state, player, 8, None, &mut rng).unwrap();

        let root = tree.get(tree.root());
        let child = tree.get(root.child(8).unwrap());
        // Child value is -1 for O; the root (X) receives the negation
        assert!((child.value_sum - (-1.0)).abs() < 1e-6);
        assert!((root.value_sum - 1.0).abs() < 1e-6);
        assert_eq!(root.visit_count, 1);
        assert_eq!(child.visit_count, 1);
    }

    #[test]
    fn test_connect4_finds_winning_drop() {
        // First has (5,0), (5,1), (5,2); Second stacked on top of them
        let game = Connect4::new();
        let (state, player) = play(&game, &[35, 28, 36, 29, 37, 30]);

        let predictor = UniformPredictor::new(42);
        let search = MctsSearch::new(&game, &predictor, MctsConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let tree = search.run(&state, player, 6, None, &mut rng).unwrap();

        assert_eq!(tree.select_action(tree.root(), 0.0, &mut rng).unwrap(), 38);
    }

    #[test]
    fn test_no_legal_moves_is_an_error() {
        let game = TicTacToe::new();
        let (state, player) = play(&game, &[0, 3, 1, 4, 2]);
        let predictor = UniformPredictor::new(9);
        let search = MctsSearch::new(&game, &predictor, MctsConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = search.run(&state, player, 5, None, &mut rng);
        assert!(matches!(result, Err(SearchError::NoLegalMoves)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let game = TicTacToe::new();
        let predictor = UniformPredictor::new(9);
        let config = MctsConfig::for_testing().with_rollouts(0);
        assert!(matches!(
            MctsSearch::new(&game, &predictor, config),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_tree_reuse_carries_statistics() {
        let game = TicTacToe::new();
        let predictor = UniformPredictor::new(9);
        let config = MctsConfig::for_testing().with_rollouts(200);
        let search = MctsSearch::new(&game, &predictor, config).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let state = game.reset();
        let tree = search.run(&state, Player::First, 0, None, &mut rng).unwrap();
        let action = tree.select_action(tree.root(), 0.0, &mut rng).unwrap();
        let carried = tree.get(tree.get(tree.root()).child(action).unwrap()).visit_count;

        let next = game.apply(&state, action, Player::First);
        let subtree = tree.into_subtree(action);
        let tree = search
            .run(&next, Player::Second, 1, subtree, &mut rng)
            .unwrap();

        let root = tree.get(tree.root());
        assert_eq!(root.player, Player::Second);
        assert_eq!(root.visit_count, carried + 200);
    }

    #[test]
    fn test_mismatched_subtree_is_discarded() {
        let game = TicTacToe::new();
        let predictor = UniformPredictor::new(9);
        let search = MctsSearch::new(&game, &predictor, MctsConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let stale = search
            .run(&game.reset(), Player::First, 0, None, &mut rng)
            .unwrap();
        // Same player to move as the stale root is required for reuse
        let tree = search
            .run(&game.reset(), Player::Second, 0, Some(stale), &mut rng)
            .unwrap();
        assert_eq!(tree.get(tree.root()).player, Player::Second);
        assert_eq!(tree.get(tree.root()).visit_count, 50);
    }

    #[test]
    fn test_time_budget_stops_search() {
        let game = Checkers::new();
        let predictor = UniformPredictor::new(game.action_space());
        let config = MctsConfig::for_evaluation()
            .with_rollouts(u32::MAX)
            .with_time_budget(Duration::from_millis(50));
        let search = MctsSearch::new(&game, &predictor, config).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let (_, stats) = search
            .search(&game.reset(), Player::First, 0, None, &mut rng)
            .unwrap();
        assert!(stats.rollouts > 0);
        assert!(stats.rollouts < u32::MAX);
        assert!(stats.elapsed < Duration::from_secs(5));
    }

    #[test]
    fn test_predictor_policy_length_is_checked() {
        let game = TicTacToe::new();
        let predictor = FixedPredictor(Prediction {
            policy: vec![1.0; 3],
            value: 0.0,
        });
        let search = MctsSearch::new(&game, &predictor, MctsConfig::for_testing()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let result = search.run(&game.reset(), Player::First, 0, None, &mut rng);
        assert!(matches!(
            result,
            Err(SearchError::Predictor(PredictorError::PolicyLength { .. }))
        ));
    }

    #[test]
    fn test_zero_legal_mass_falls_back_to_uniform() {
        // All mass on the occupied centre
        let game = TicTacToe::new();
        let (state, player) = play(&game, &[4]);
        let mut policy = vec![0.0; 9];
        policy[4] = 1.0;
        let predictor = FixedPredictor(Prediction { policy, value: 0.0 });
        let config = MctsConfig::for_testing().with_rollouts(1);
        let search = MctsSearch::new(&game, &predictor, config).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let tree = search.run(&state, player, 1, None, &mut rng).unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.children.len(), 8);
        for &(_, child) in &root.children {
            assert!((tree.get(child).prior - 0.125).abs() < 1e-6);
        }
    }

    #[test]
    fn test_noise_perturbs_root_priors() {
        let game = TicTacToe::new();
        let predictor = UniformPredictor::new(9);
        let config = MctsConfig::for_training().with_rollouts(1);
        let search = MctsSearch::new(&game, &predictor, config).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let tree = search
            .run(&game.reset(), Player::First, 0, None, &mut rng)
            .unwrap();
        let priors: Vec<f32> = tree
            .get(tree.root())
            .children
            .iter()
            .map(|&(_, child)| tree.get(child).prior)
            .collect();
        let total: f32 = priors.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(priors.iter().any(|&p| (p - 1.0 / 9.0).abs() > 1e-3));
    }

    #[test]
    fn test_checkers_search_with_heuristic() {
        let game = Checkers::new();
        let predictor = UniformPredictor::new(game.action_space());
        let config = MctsConfig::for_testing()
            .with_rollouts(30)
            .with_heuristic_weight(0.5);
        let search = MctsSearch::new(&game, &predictor, config).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        let (tree, stats) = search
            .search(&game.reset(), Player::First, 0, None, &mut rng)
            .unwrap();
        assert_eq!(stats.rollouts, 30);
        let action = tree.select_action(tree.root(), 0.0, &mut rng).unwrap();
        assert!(game.legal_actions(&game.reset(), Player::First).contains(&action));
    }

    #[test]
    fn test_dirichlet_noise() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let noise = dirichlet_noise(5, 0.3, &mut rng).unwrap();

        // Should sum to 1.0
        let sum: f32 = noise.iter().sum();
        assert!((sum - 1.0).abs() < 0.01);
        assert!(noise.iter().all(|&n| n >= 0.0));

        assert!(dirichlet_noise(5, 0.0, &mut rng).is_err());
    }
}
