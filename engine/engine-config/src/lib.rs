//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the actor binary and its subcommands.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`SELFPLAY_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (`config.defaults.toml`, embedded at compile time)
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! SELFPLAY_<SECTION>_<KEY>=value
//!
//! Examples:
//!     SELFPLAY_COMMON_ENV_ID=checkers
//!     SELFPLAY_MCTS_NUM_ROLLOUTS=1600
//!     SELFPLAY_SELFPLAY_TEMP_THRESHOLD=10
//!     SELFPLAY_CHECKERS_MAX_PLIES=150
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{
    apply_env_overrides, load_config, load_from_path, CONFIG_PATH_VAR, CONFIG_SEARCH_PATHS,
};
pub use structs::*;
