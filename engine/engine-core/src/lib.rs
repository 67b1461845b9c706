//! Core traits and types shared by every game
//!
//! This crate provides the fundamental abstractions for self-play search:
//! - `Environment`: the rules contract the search engine drives
//! - `MoveCatalog`: immutable action-id to move-template tables
//! - `Player` / `Outcome`: sides and results, with sign-based perspective flips
//! - `Observation`: player-relative feature planes handed to predictors

pub mod board_game;
pub mod catalog;
pub mod environment;
pub mod game_utils;
pub mod metadata;
pub mod observation;
pub mod player;

// Re-export main types for convenience
pub use catalog::{ActionId, MoveCatalog, Square};
pub use environment::Environment;
pub use metadata::GameMetadata;
pub use observation::Observation;
pub use player::{Outcome, Player};
