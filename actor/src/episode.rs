//! Self-play episode generation
//!
//! One episode plays a full game with the engine on both sides. The tree is
//! carried from move to move, re-rooted on the played child, and every
//! searched position becomes a training sample once the result is known.

use engine_core::{Environment, Observation, Outcome, Player};
use mcts::{MctsConfig, MctsSearch, Predictor, SearchError, SearchStats};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};

/// Move-selection temperature by ply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSchedule {
    /// Temperature for the opening plies
    pub opening: f32,
    /// Plies played at `opening` before switching to greedy selection
    pub threshold: u32,
}

impl TemperatureSchedule {
    pub fn at(&self, ply: u32) -> f32 {
        if ply < self.threshold {
            self.opening
        } else {
            0.0
        }
    }
}

/// A searched position with its training targets.
#[derive(Debug, Clone, Serialize)]
pub struct Sample {
    /// Observation planes, row-major
    pub observation: Vec<f32>,
    pub shape: [usize; 3],
    /// Side to move in this position
    pub player: Player,
    /// Normalised root visit counts over the full action space
    pub policy: Vec<f32>,
    /// Value of the played move according to the search, seen by `player`.
    /// This is the chosen child's value, not the root's average.
    pub mcts_value: f32,
    /// Training target blending the game result with `mcts_value`
    pub value: f32,
}

/// A position recorded during play, before the result is known.
#[derive(Debug, Clone)]
pub(crate) struct Record {
    pub observation: Observation,
    pub player: Player,
    pub policy: Vec<f32>,
    pub mcts_value: f32,
}

/// Search counters summed over every move of a game.
#[derive(Debug, Clone, Default)]
pub struct SearchTotals {
    pub searches: u32,
    pub rollouts: u64,
    pub predictor_calls: u64,
    pub terminal_hits: u64,
    pub max_depth: u32,
    pub elapsed: Duration,
}

impl SearchTotals {
    pub fn add(&mut self, stats: &SearchStats) {
        self.searches += 1;
        self.rollouts += stats.rollouts as u64;
        self.predictor_calls += stats.predictor_calls as u64;
        self.terminal_hits += stats.terminal_hits as u64;
        self.max_depth = self.max_depth.max(stats.max_depth);
        self.elapsed += stats.elapsed;
    }

    pub fn merge(&mut self, other: &SearchTotals) {
        self.searches += other.searches;
        self.rollouts += other.rollouts;
        self.predictor_calls += other.predictor_calls;
        self.terminal_hits += other.terminal_hits;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.elapsed += other.elapsed;
    }
}

/// A finished self-play game.
#[derive(Debug, Clone)]
pub struct Episode {
    pub samples: Vec<Sample>,
    pub outcome: Outcome,
    pub plies: u32,
    pub search: SearchTotals,
}

/// Play one game of `env` against itself.
///
/// `decay` discounts the game result for positions further from the end.
pub fn play_episode<E, P, R>(
    env: &E,
    predictor: &P,
    config: &MctsConfig,
    schedule: &TemperatureSchedule,
    decay: f32,
    rng: &mut R,
) -> Result<Episode, SearchError>
where
    E: Environment,
    P: Predictor + ?Sized,
    R: Rng + ?Sized,
{
    let search = MctsSearch::new(env, predictor, config.clone())?;
    let num_actions = env.action_space();

    let mut state = env.reset();
    let mut player = Player::First;
    let mut ply = 0u32;
    let mut tree = None;
    let mut records = Vec::new();
    let mut totals = SearchTotals::default();

    let outcome = loop {
        let (searched, stats) = search.search(&state, player, ply, tree.take(), rng)?;
        totals.add(&stats);

        let root = searched.root();
        let action = searched.select_action(root, schedule.at(ply), rng)?;
        let child = searched.get(root).child(action).ok_or_else(|| {
            SearchError::InvalidState(format!("selected action {action} has no child"))
        })?;

        records.push(Record {
            observation: env.to_player_relative(&state, player, ply),
            player,
            policy: searched.visit_policy(num_actions),
            mcts_value: -searched.get(child).value(),
        });

        state = env.apply(&state, action, player);
        ply += 1;
        trace!(ply, action, %player, "Self-play move");

        if let Some(outcome) = env.terminal_value(&state, player, ply) {
            break outcome;
        }
        tree = searched.into_subtree(action);
        player = player.opponent();
    };

    debug!(
        env = env.name(),
        plies = ply,
        ?outcome,
        rollouts = totals.rollouts,
        "Episode finished"
    );

    Ok(Episode {
        samples: finish_episode(records, outcome, decay),
        outcome,
        plies: ply,
        search: totals,
    })
}

/// Attach value targets to the records of a finished game.
///
/// Counting back from the last move, the result is discounted by `decay`
/// per ply, taken from each record's side, and averaged with the search value.
pub(crate) fn finish_episode(records: Vec<Record>, outcome: Outcome, decay: f32) -> Vec<Sample> {
    let last = records.len();
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let from_end = (last - 1 - i) as i32;
            let adjusted = outcome.value_for(record.player) * decay.powi(from_end);
            Sample {
                shape: record.observation.shape(),
                observation: record.observation.data().to_vec(),
                player: record.player,
                policy: record.policy,
                mcts_value: record.mcts_value,
                value: (adjusted + record.mcts_value) / 2.0,
            }
        })
        .collect()
}
