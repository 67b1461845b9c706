//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_env_id() -> String {
    defaults::env_id().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_num_rollouts() -> u32 {
    defaults::num_rollouts()
}
fn d_time_budget_ms() -> u64 {
    defaults::time_budget_ms()
}
fn d_c_puct() -> f64 {
    defaults::c_puct()
}
fn d_dirichlet_alpha() -> f64 {
    defaults::dirichlet_alpha()
}
fn d_dirichlet_epsilon() -> f64 {
    defaults::dirichlet_epsilon()
}
fn d_heuristic_weight() -> f64 {
    defaults::heuristic_weight()
}
fn d_episodes() -> u32 {
    defaults::episodes()
}
fn d_opening_temperature() -> f64 {
    defaults::opening_temperature()
}
fn d_temp_threshold() -> u32 {
    defaults::temp_threshold()
}
fn d_decay() -> f64 {
    defaults::decay()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_eval_games() -> u32 {
    defaults::eval_games()
}
fn d_eval_rollouts() -> u32 {
    defaults::eval_rollouts()
}
fn d_win_threshold() -> f64 {
    defaults::win_threshold()
}
fn d_max_plies() -> u32 {
    defaults::max_plies()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub selfplay: SelfPlayConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub checkers: CheckersConfig,
}

/// Settings shared by every subcommand
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_env_id")]
    pub env_id: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            env_id: defaults::env_id().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// Search parameters
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_num_rollouts")]
    pub num_rollouts: u32,
    /// Wall-clock budget per move in milliseconds (0 = rollouts only)
    #[serde(default = "d_time_budget_ms")]
    pub time_budget_ms: u64,
    #[serde(default = "d_c_puct")]
    pub c_puct: f64,
    #[serde(default = "d_dirichlet_alpha")]
    pub dirichlet_alpha: f64,
    #[serde(default = "d_dirichlet_epsilon")]
    pub dirichlet_epsilon: f64,
    /// Share of the leaf value taken from the game heuristic
    #[serde(default = "d_heuristic_weight")]
    pub heuristic_weight: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_rollouts: defaults::num_rollouts(),
            time_budget_ms: defaults::time_budget_ms(),
            c_puct: defaults::c_puct(),
            dirichlet_alpha: defaults::dirichlet_alpha(),
            dirichlet_epsilon: defaults::dirichlet_epsilon(),
            heuristic_weight: defaults::heuristic_weight(),
        }
    }
}

/// Self-play episode generation
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SelfPlayConfig {
    #[serde(default = "d_episodes")]
    pub episodes: u32,
    #[serde(default = "d_opening_temperature")]
    pub opening_temperature: f64,
    /// Plies played at the opening temperature before switching to greedy play
    #[serde(default = "d_temp_threshold")]
    pub temp_threshold: u32,
    #[serde(default = "d_decay")]
    pub decay: f64,
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            episodes: defaults::episodes(),
            opening_temperature: defaults::opening_temperature(),
            temp_threshold: defaults::temp_threshold(),
            decay: defaults::decay(),
            seed: defaults::seed(),
        }
    }
}

/// Evaluation matches
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EvaluationConfig {
    #[serde(default = "d_eval_games")]
    pub games: u32,
    #[serde(default = "d_eval_rollouts")]
    pub rollouts: u32,
    #[serde(default = "d_win_threshold")]
    pub win_threshold: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            games: defaults::eval_games(),
            rollouts: defaults::eval_rollouts(),
            win_threshold: defaults::win_threshold(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CheckersConfig {
    #[serde(default = "d_max_plies")]
    pub max_plies: u32,
}

impl Default for CheckersConfig {
    fn default() -> Self {
        Self {
            max_plies: defaults::max_plies(),
        }
    }
}
