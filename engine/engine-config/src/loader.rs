//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "SELFPLAY_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the `SELFPLAY_CONFIG` environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_PATH_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_PATH_VAR,
            path.display()
        );
    }

    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
///
/// An unreadable or malformed file is logged and replaced by the defaults.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, u64, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        match std::env::var($key).map(|s| s.parse()) {
            Ok(Ok(v)) => $config.$section.$field = v,
            Ok(Err(_)) => warn!("Ignoring unparseable {}", $key),
            Err(_) => {}
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: SELFPLAY_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.env_id, "SELFPLAY_COMMON_ENV_ID");
    env_override!(config, common.log_level, "SELFPLAY_COMMON_LOG_LEVEL");

    // MCTS
    env_override!(
        config,
        mcts.num_rollouts,
        "SELFPLAY_MCTS_NUM_ROLLOUTS",
        parse
    );
    env_override!(
        config,
        mcts.time_budget_ms,
        "SELFPLAY_MCTS_TIME_BUDGET_MS",
        parse
    );
    env_override!(config, mcts.c_puct, "SELFPLAY_MCTS_C_PUCT", parse);
    env_override!(
        config,
        mcts.dirichlet_alpha,
        "SELFPLAY_MCTS_DIRICHLET_ALPHA",
        parse
    );
    env_override!(
        config,
        mcts.dirichlet_epsilon,
        "SELFPLAY_MCTS_DIRICHLET_EPSILON",
        parse
    );
    env_override!(
        config,
        mcts.heuristic_weight,
        "SELFPLAY_MCTS_HEURISTIC_WEIGHT",
        parse
    );

    // Self-play
    env_override!(
        config,
        selfplay.episodes,
        "SELFPLAY_SELFPLAY_EPISODES",
        parse
    );
    env_override!(
        config,
        selfplay.opening_temperature,
        "SELFPLAY_SELFPLAY_OPENING_TEMPERATURE",
        parse
    );
    env_override!(
        config,
        selfplay.temp_threshold,
        "SELFPLAY_SELFPLAY_TEMP_THRESHOLD",
        parse
    );
    env_override!(config, selfplay.decay, "SELFPLAY_SELFPLAY_DECAY", parse);
    env_override!(config, selfplay.seed, "SELFPLAY_SELFPLAY_SEED", parse);

    // Evaluation
    env_override!(
        config,
        evaluation.games,
        "SELFPLAY_EVALUATION_GAMES",
        parse
    );
    env_override!(
        config,
        evaluation.rollouts,
        "SELFPLAY_EVALUATION_ROLLOUTS",
        parse
    );
    env_override!(
        config,
        evaluation.win_threshold,
        "SELFPLAY_EVALUATION_WIN_THRESHOLD",
        parse
    );

    // Checkers
    env_override!(
        config,
        checkers.max_plies,
        "SELFPLAY_CHECKERS_MAX_PLIES",
        parse
    );

    config
}
