//! Default configuration values loaded from config.defaults.toml.
//!
//! The file is embedded at compile time so the binary and the library
//! tests agree on every default.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    selfplay: SelfPlayDefaults,
    evaluation: EvaluationDefaults,
    checkers: CheckersDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    env_id: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_rollouts: u32,
    time_budget_ms: u64,
    c_puct: f64,
    dirichlet_alpha: f64,
    dirichlet_epsilon: f64,
    heuristic_weight: f64,
}

#[derive(Debug, Deserialize)]
struct SelfPlayDefaults {
    episodes: u32,
    opening_temperature: f64,
    temp_threshold: u32,
    decay: f64,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct EvaluationDefaults {
    games: u32,
    rollouts: u32,
    win_threshold: f64,
}

#[derive(Debug, Deserialize)]
struct CheckersDefaults {
    max_plies: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn env_id() -> &'static str {
    &DEFAULTS.common.env_id
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn num_rollouts() -> u32 {
    DEFAULTS.mcts.num_rollouts
}
pub fn time_budget_ms() -> u64 {
    DEFAULTS.mcts.time_budget_ms
}
pub fn c_puct() -> f64 {
    DEFAULTS.mcts.c_puct
}
pub fn dirichlet_alpha() -> f64 {
    DEFAULTS.mcts.dirichlet_alpha
}
pub fn dirichlet_epsilon() -> f64 {
    DEFAULTS.mcts.dirichlet_epsilon
}
pub fn heuristic_weight() -> f64 {
    DEFAULTS.mcts.heuristic_weight
}

// Self-play
pub fn episodes() -> u32 {
    DEFAULTS.selfplay.episodes
}
pub fn opening_temperature() -> f64 {
    DEFAULTS.selfplay.opening_temperature
}
pub fn temp_threshold() -> u32 {
    DEFAULTS.selfplay.temp_threshold
}
pub fn decay() -> f64 {
    DEFAULTS.selfplay.decay
}
pub fn seed() -> u64 {
    DEFAULTS.selfplay.seed
}

// Evaluation
pub fn eval_games() -> u32 {
    DEFAULTS.evaluation.games
}
pub fn eval_rollouts() -> u32 {
    DEFAULTS.evaluation.rollouts
}
pub fn win_threshold() -> f64 {
    DEFAULTS.evaluation.win_threshold
}

// Checkers
pub fn max_plies() -> u32 {
    DEFAULTS.checkers.max_plies
}
