//! Command-line configuration for the actor
//!
//! Defaults come from the central configuration (config.toml with
//! `SELFPLAY_` environment overrides). CLI arguments take highest priority.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use engine_config::{load_config, CentralConfig};
use engine_games::{GameKind, GameOptions};
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use crate::episode::TemperatureSchedule;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_env_id() -> String {
    CENTRAL_CONFIG.common.env_id.clone()
}
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}
fn default_seed() -> u64 {
    CENTRAL_CONFIG.selfplay.seed
}
fn default_heuristic_weight() -> f32 {
    CENTRAL_CONFIG.mcts.heuristic_weight as f32
}
fn default_max_plies() -> u32 {
    CENTRAL_CONFIG.checkers.max_plies
}
fn default_episodes() -> u32 {
    CENTRAL_CONFIG.selfplay.episodes
}
fn default_rollouts() -> u32 {
    CENTRAL_CONFIG.mcts.num_rollouts
}
fn default_time_budget_ms() -> u64 {
    CENTRAL_CONFIG.mcts.time_budget_ms
}
fn default_opening_temperature() -> f32 {
    CENTRAL_CONFIG.selfplay.opening_temperature as f32
}
fn default_temp_threshold() -> u32 {
    CENTRAL_CONFIG.selfplay.temp_threshold
}
fn default_decay() -> f32 {
    CENTRAL_CONFIG.selfplay.decay as f32
}
fn default_eval_games() -> u32 {
    CENTRAL_CONFIG.evaluation.games
}
fn default_eval_rollouts() -> u32 {
    CENTRAL_CONFIG.evaluation.rollouts
}
fn default_win_threshold() -> f64 {
    CENTRAL_CONFIG.evaluation.win_threshold
}

#[derive(Parser, Debug, Clone)]
#[command(name = "actor")]
#[command(about = "Self-play episode generation and evaluation matches")]
#[command(
    long_about = "Runs MCTS self-play games or evaluation matches for tic-tac-toe,
connect-four and checkers.

Configuration is loaded from config.toml with SELFPLAY_<SECTION>_<KEY>
environment overrides. CLI arguments take highest priority."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate self-play episodes
    Selfplay(SelfPlayArgs),
    /// Play test games against a random mover and a candidate-versus-baseline tournament
    Evaluate(EvaluateArgs),
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Game to play (tictactoe, connect4, checkers)
    #[arg(long, default_value_t = default_env_id())]
    pub env_id: String,

    /// Seed for every random choice of the run
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Share of leaf values taken from the game heuristic
    #[arg(long, default_value_t = default_heuristic_weight())]
    pub heuristic_weight: f32,

    /// Ply limit after which a checkers game is drawn
    #[arg(long, default_value_t = default_max_plies())]
    pub max_plies: u32,
}

#[derive(Args, Debug, Clone)]
pub struct SelfPlayArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of episodes to play
    #[arg(long, default_value_t = default_episodes())]
    pub episodes: u32,

    /// MCTS rollouts per move
    #[arg(long, default_value_t = default_rollouts())]
    pub rollouts: u32,

    /// Wall-clock budget per move in milliseconds (0 to disable)
    #[arg(long, default_value_t = default_time_budget_ms())]
    pub time_budget_ms: u64,

    /// Move-selection temperature for the opening plies
    #[arg(long, default_value_t = default_opening_temperature())]
    pub opening_temperature: f32,

    /// Plies played at the opening temperature before greedy selection
    #[arg(long, default_value_t = default_temp_threshold())]
    pub temp_threshold: u32,

    /// Per-ply discount of the game result in value targets
    #[arg(long, default_value_t = default_decay())]
    pub decay: f32,

    /// Write training samples as JSON lines to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Write run statistics as JSON to this file after every episode
    #[arg(long)]
    pub stats_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of tournament games; half as many pairs of test games
    #[arg(long, default_value_t = default_eval_games())]
    pub episodes: u32,

    /// MCTS rollouts per move for the candidate
    #[arg(long, default_value_t = default_eval_rollouts())]
    pub rollouts: u32,

    /// MCTS rollouts per move for the baseline (default: a quarter of --rollouts)
    #[arg(long)]
    pub baseline_rollouts: Option<u32>,

    /// Win share of decisive games the candidate must exceed
    #[arg(long, default_value_t = default_win_threshold())]
    pub win_threshold: f64,
}

impl Cli {
    pub fn common(&self) -> &CommonArgs {
        match &self.command {
            Command::Selfplay(args) => &args.common,
            Command::Evaluate(args) => &args.common,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.common().validate()?;
        match &self.command {
            Command::Selfplay(args) => args.validate(),
            Command::Evaluate(args) => args.validate(),
        }
    }
}

impl CommonArgs {
    pub fn validate(&self) -> Result<()> {
        self.game()?;

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        if !(0.0..=1.0).contains(&self.heuristic_weight) {
            return Err(anyhow!("heuristic_weight must be within [0, 1]"));
        }

        if self.max_plies == 0 {
            return Err(anyhow!("max_plies must be greater than 0"));
        }

        Ok(())
    }

    pub fn game(&self) -> Result<GameKind> {
        self.env_id.parse().map_err(|e| anyhow!("{e}"))
    }

    pub fn game_options(&self) -> GameOptions {
        GameOptions {
            checkers_max_plies: self.max_plies,
        }
    }

    /// Search settings shared by every subcommand, starting from `base`.
    fn search_config(&self, base: MctsConfig, rollouts: u32) -> MctsConfig {
        base.with_rollouts(rollouts)
            .with_c_puct(CENTRAL_CONFIG.mcts.c_puct as f32)
            .with_heuristic_weight(self.heuristic_weight)
    }
}

impl SelfPlayArgs {
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(anyhow!("episodes must be greater than 0"));
        }

        if self.rollouts == 0 {
            return Err(anyhow!("rollouts must be greater than 0"));
        }

        if self.opening_temperature.is_nan() || self.opening_temperature < 0.0 {
            return Err(anyhow!("opening_temperature must be non-negative"));
        }

        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(anyhow!("decay must be within (0, 1]"));
        }

        Ok(())
    }

    /// Self-play search: exploration noise on, per-move budgets from the CLI.
    pub fn mcts_config(&self) -> MctsConfig {
        let noise = &CENTRAL_CONFIG.mcts;
        let config = self
            .common
            .search_config(MctsConfig::for_training(), self.rollouts)
            .with_noise(noise.dirichlet_alpha as f32, noise.dirichlet_epsilon as f32);
        match self.time_budget() {
            Some(budget) => config.with_time_budget(budget),
            None => config,
        }
    }

    pub fn time_budget(&self) -> Option<Duration> {
        (self.time_budget_ms > 0).then(|| Duration::from_millis(self.time_budget_ms))
    }

    pub fn schedule(&self) -> TemperatureSchedule {
        TemperatureSchedule {
            opening: self.opening_temperature,
            threshold: self.temp_threshold,
        }
    }
}

impl EvaluateArgs {
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(anyhow!("episodes must be greater than 0"));
        }

        if self.rollouts == 0 || self.baseline_rollouts == Some(0) {
            return Err(anyhow!("rollouts must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.win_threshold) {
            return Err(anyhow!("win_threshold must be within [0, 1]"));
        }

        Ok(())
    }

    pub fn baseline_rollouts(&self) -> u32 {
        self.baseline_rollouts.unwrap_or((self.rollouts / 4).max(1))
    }

    pub fn test_pairs(&self) -> u32 {
        self.episodes.div_ceil(2)
    }

    /// Greedy evaluation search with `rollouts` per move.
    pub fn mcts_config(&self, rollouts: u32) -> MctsConfig {
        self.common
            .search_config(MctsConfig::for_evaluation(), rollouts)
    }
}
