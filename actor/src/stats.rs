//! Self-play run statistics.
//!
//! This module tracks:
//! - Episode counts and outcomes
//! - Search counters summed over every move
//! - Episode timing information
//!
//! A snapshot can be written to a JSON file after every episode.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use engine_core::{Outcome, Player};

use crate::episode::{Episode, SearchTotals};

/// Aggregated statistics of one `selfplay` run.
#[derive(Debug)]
pub struct RunStats {
    env_id: String,
    episodes_completed: u32,
    total_plies: u64,
    samples: u64,
    first_wins: u32,
    second_wins: u32,
    draws: u32,
    search: SearchTotals,
    start_time: Instant,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunStatsSnapshot {
    pub env_id: String,
    pub episodes_completed: u32,
    pub total_plies: u64,
    pub samples: u64,
    pub first_wins: u32,
    pub second_wins: u32,
    pub draws: u32,
    pub avg_episode_length: f64,
    pub episodes_per_second: f64,
    pub runtime_seconds: f64,
    pub searches: u32,
    pub rollouts: u64,
    pub predictor_calls: u64,
    pub terminal_hits: u64,
    pub max_depth: u32,
    pub avg_search_ms: f64,
    pub timestamp: u64,
}

impl RunStats {
    pub fn new(env_id: &str) -> Self {
        Self {
            env_id: env_id.to_string(),
            episodes_completed: 0,
            total_plies: 0,
            samples: 0,
            first_wins: 0,
            second_wins: 0,
            draws: 0,
            search: SearchTotals::default(),
            start_time: Instant::now(),
        }
    }

    /// Record a completed episode.
    pub fn record_episode(&mut self, episode: &Episode) {
        self.episodes_completed += 1;
        self.total_plies += episode.plies as u64;
        self.samples += episode.samples.len() as u64;
        match episode.outcome {
            Outcome::Win(Player::First) => self.first_wins += 1,
            Outcome::Win(Player::Second) => self.second_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
        self.search.merge(&episode.search);
    }

    pub fn episodes_completed(&self) -> u32 {
        self.episodes_completed
    }

    /// Get a snapshot of current stats.
    pub fn snapshot(&self) -> RunStatsSnapshot {
        let episodes = self.episodes_completed;
        let runtime = self.start_time.elapsed().as_secs_f64();

        let avg_episode_length = if episodes > 0 {
            self.total_plies as f64 / episodes as f64
        } else {
            0.0
        };

        let episodes_per_second = if runtime > 0.0 {
            episodes as f64 / runtime
        } else {
            0.0
        };

        let avg_search_ms = if self.search.searches > 0 {
            self.search.elapsed.as_secs_f64() * 1000.0 / self.search.searches as f64
        } else {
            0.0
        };

        RunStatsSnapshot {
            env_id: self.env_id.clone(),
            episodes_completed: episodes,
            total_plies: self.total_plies,
            samples: self.samples,
            first_wins: self.first_wins,
            second_wins: self.second_wins,
            draws: self.draws,
            avg_episode_length,
            episodes_per_second,
            runtime_seconds: runtime,
            searches: self.search.searches,
            rollouts: self.search.rollouts,
            predictor_calls: self.search.predictor_calls,
            terminal_hits: self.search.terminal_hits,
            max_depth: self.search.max_depth,
            avg_search_ms,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Log a one-line summary of the run so far.
    pub fn log_summary(&self) {
        let snapshot = self.snapshot();
        info!(
            env = %snapshot.env_id,
            episodes = snapshot.episodes_completed,
            first_wins = snapshot.first_wins,
            second_wins = snapshot.second_wins,
            draws = snapshot.draws,
            avg_length = format!("{:.1}", snapshot.avg_episode_length),
            avg_search_ms = format!("{:.2}", snapshot.avg_search_ms),
            rollouts = snapshot.rollouts,
            "Self-play summary"
        );
    }

    /// Write stats to a JSON file (atomic write-then-rename).
    ///
    /// Failures are logged and otherwise ignored.
    pub fn write_stats(&self, path: &Path) {
        let json = match serde_json::to_string_pretty(&self.snapshot()) {
            Ok(j) => j,
            Err(e) => {
                warn!("Failed to serialize run stats: {}", e);
                return;
            }
        };

        let mut temp_path = PathBuf::from(path);
        temp_path.as_mut_os_string().push(".tmp");
        match fs::File::create(&temp_path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(json.as_bytes()) {
                    warn!("Failed to write run stats: {}", e);
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to create temp stats file: {}", e);
                return;
            }
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            warn!("Failed to rename stats file: {}", e);
            let _ = fs::remove_file(&temp_path);
            return;
        }

        debug!("Wrote run stats to {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::Sample;
    use std::time::Duration;
    use tempfile::tempdir;

    fn episode(plies: u32, outcome: Outcome) -> Episode {
        let sample = Sample {
            observation: vec![0.0],
            shape: [1, 1, 1],
            player: Player::First,
            policy: vec![1.0],
            mcts_value: 0.0,
            value: 0.0,
        };
        Episode {
            samples: vec![sample; plies as usize],
            outcome,
            plies,
            search: SearchTotals {
                searches: plies,
                rollouts: plies as u64 * 10,
                predictor_calls: plies as u64 * 8,
                terminal_hits: 2,
                max_depth: plies,
                elapsed: Duration::from_millis(plies as u64),
            },
        }
    }

    #[test]
    fn test_record_episode() {
        let mut stats = RunStats::new("tictactoe");

        stats.record_episode(&episode(7, Outcome::Win(Player::First)));
        stats.record_episode(&episode(8, Outcome::Win(Player::Second)));
        stats.record_episode(&episode(9, Outcome::Draw));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.episodes_completed, 3);
        assert_eq!(snapshot.first_wins, 1);
        assert_eq!(snapshot.second_wins, 1);
        assert_eq!(snapshot.draws, 1);
        assert_eq!(snapshot.total_plies, 24);
        assert_eq!(snapshot.samples, 24);
        assert_eq!(snapshot.searches, 24);
        assert_eq!(snapshot.rollouts, 240);
        assert_eq!(snapshot.terminal_hits, 6);
        assert_eq!(snapshot.max_depth, 9);
        assert!((snapshot.avg_episode_length - 8.0).abs() < 1e-9);
        assert!((snapshot.avg_search_ms - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_write_stats() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("selfplay_stats.json");
        let mut stats = RunStats::new("connect4");

        stats.record_episode(&episode(20, Outcome::Win(Player::First)));
        stats.write_stats(&path);

        let content = fs::read_to_string(&path).unwrap();
        let parsed: RunStatsSnapshot = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.env_id, "connect4");
        assert_eq!(parsed.episodes_completed, 1);
        assert!(!dir.path().join("selfplay_stats.json.tmp").exists());
    }

    #[test]
    fn test_average_with_zero_episodes() {
        let stats = RunStats::new("checkers");
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.episodes_completed, 0);
        assert_eq!(snapshot.avg_episode_length, 0.0);
        assert_eq!(snapshot.avg_search_ms, 0.0);
    }

    #[test]
    fn test_write_to_missing_directory_is_ignored() {
        let dir = tempdir().unwrap();
        let stats = RunStats::new("tictactoe");
        let path = dir.path().join("missing").join("stats.json");
        stats.write_stats(&path);
        assert!(!path.exists());
    }
}
