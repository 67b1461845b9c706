//! Monte Carlo Tree Search (MCTS) for two-player, perfect-information games.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the `engine-core` [`Environment`](engine_core::Environment)
//! trait, guided by a [`Predictor`] that supplies priors and values.
//!
//! # Overview
//!
//! MCTS is a search algorithm that builds a search tree by running rollouts.
//! Each rollout consists of four phases:
//!
//! 1. **Selection**: Traverse the tree using UCB (Upper Confidence Bound) to
//!    balance exploration and exploitation, taking an immediately winning
//!    move whenever one exists
//! 2. **Expansion**: When reaching a leaf, expand it by adding children for
//!    each legal action
//! 3. **Evaluation**: Use the predictor (optionally blended with the game's
//!    heuristic) to estimate the value of the new state
//! 4. **Backpropagation**: Update visit counts and value estimates along the
//!    path from leaf to root
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Environment, Player};
//! use games_tictactoe::TicTacToe;
//! use mcts::{MctsConfig, MctsSearch, UniformPredictor};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let game = TicTacToe::new();
//! let predictor = UniformPredictor::new(game.action_space());
//! let search = MctsSearch::new(&game, &predictor, MctsConfig::for_testing()).unwrap();
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let tree = search
//!     .run(&game.reset(), Player::First, 0, None, &mut rng)
//!     .unwrap();
//!
//! let action = tree.select_action(tree.root(), 0.0, &mut rng).unwrap();
//! assert!(action < 9);
//!
//! // Keep the statistics below the move actually played
//! let reused = tree.into_subtree(action);
//! assert!(reused.is_some());
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_rollouts` / `time_budget`: rollout count and optional wall-clock bound
//! - `c_puct`: Exploration constant for UCB (default: 4)
//! - `dirichlet_alpha` / `dirichlet_epsilon`: exploration noise (default: 1 / 0.25)
//! - `heuristic_weight`: share of the game heuristic in leaf values (default: 0)
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                         MctsSearch                          |
//! +-------------------------------------------------------------+
//! |  +-------------+  +-------------+  +---------------------+   |
//! |  |  MctsTree   |  | Environment |  |     Predictor       |   |
//! |  |  (arena)    |  |   (rules)   |  |  (policy / value)   |   |
//! |  +------+------+  +------+------+  +----------+----------+   |
//! |         |                |                    |              |
//! |         v                v                    v              |
//! |  +------------------------------------------------------+   |
//! |  |          select -> expand -> evaluate ->             |   |
//! |  |                   backpropagate                      |   |
//! |  +------------------------------------------------------+   |
//! +-------------------------------------------------------------+
//! ```

pub mod config;
pub mod evaluator;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use evaluator::{Prediction, Predictor, PredictorError, UniformPredictor};
pub use node::{ucb_score, MctsNode, NodeId};
pub use search::{dirichlet_noise, MctsSearch, SearchError, SearchStats};
pub use tree::{MctsTree, TreeError, TreeStats};
