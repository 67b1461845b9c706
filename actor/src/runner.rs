//! Subcommand drivers
//!
//! Each subcommand is a [`GameVisitor`], so the generic search code runs
//! against whichever concrete environment `--env-id` selected.

use anyhow::{Context, Result};
use engine_core::Environment;
use engine_games::{dispatch, GameVisitor};
use indicatif::{ProgressBar, ProgressStyle};
use mcts::UniformPredictor;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::arena::{self, Agent, MatchRecord, TournamentResult};
use crate::config::{Cli, Command, EvaluateArgs, SelfPlayArgs};
use crate::episode::play_episode;
use crate::stats::{RunStats, RunStatsSnapshot};

/// What a finished run reports back to `main`.
#[derive(Debug)]
pub enum RunReport {
    SelfPlay(RunStatsSnapshot),
    Evaluate {
        vs_random: MatchRecord,
        tournament: TournamentResult,
    },
}

/// Run the selected subcommand to completion or until `shutdown` is set.
pub fn run(cli: Cli, shutdown: Arc<AtomicBool>) -> Result<RunReport> {
    let common = cli.common();
    let game = common.game()?;
    let options = common.game_options();
    let metadata = game.metadata(&options);
    info!(
        env = %game,
        actions = metadata.num_actions,
        observation = ?metadata.observation_shape,
        "Loaded game"
    );

    match cli.command {
        Command::Selfplay(args) => dispatch(game, &options, SelfPlayJob { args, shutdown }),
        Command::Evaluate(args) => dispatch(game, &options, EvaluateJob { args, shutdown }),
    }
}

/// Progress bar for bounded runs, only when stderr is a TTY.
fn progress_bar(len: u64, unit: &str) -> Result<Option<ProgressBar>> {
    if !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        return Ok(None);
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} ({{eta}})"
            ))?
            .progress_chars("#>-"),
    );
    Ok(Some(pb))
}

struct SelfPlayJob {
    args: SelfPlayArgs,
    shutdown: Arc<AtomicBool>,
}

impl GameVisitor for SelfPlayJob {
    type Output = Result<RunReport>;

    fn visit<E: Environment + 'static>(self, env: E) -> Result<RunReport> {
        let args = &self.args;
        let predictor = UniformPredictor::new(env.action_space());
        let config = args.mcts_config();
        let schedule = args.schedule();
        let mut rng = ChaCha20Rng::seed_from_u64(args.common.seed);

        info!(
            env = env.name(),
            episodes = args.episodes,
            rollouts = config.num_rollouts,
            time_budget = ?config.time_budget,
            c_puct = config.c_puct,
            heuristic_weight = config.heuristic_weight,
            opening_temperature = schedule.opening,
            temp_threshold = schedule.threshold,
            "Starting self-play"
        );

        let mut output = match &args.output {
            Some(path) => Some(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            )),
            None => None,
        };

        let progress = progress_bar(args.episodes as u64, "episodes")?;
        let mut stats = RunStats::new(env.name());

        while stats.episodes_completed() < args.episodes {
            if self.shutdown.load(Ordering::Relaxed) {
                info!("Shutdown requested, stopping self-play");
                break;
            }

            let episode = play_episode(&env, &predictor, &config, &schedule, args.decay, &mut rng)
                .context("self-play episode failed")?;

            if let Some(writer) = output.as_mut() {
                for sample in &episode.samples {
                    serde_json::to_writer(&mut *writer, sample)?;
                    writer.write_all(b"\n")?;
                }
            }

            stats.record_episode(&episode);
            info!(
                episode = stats.episodes_completed(),
                plies = episode.plies,
                outcome = ?episode.outcome,
                rollouts = episode.search.rollouts,
                "Episode complete"
            );
            if let Some(path) = &args.stats_path {
                stats.write_stats(path);
            }
            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(mut writer) = output {
            writer.flush()?;
        }
        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        stats.log_summary();
        Ok(RunReport::SelfPlay(stats.snapshot()))
    }
}

struct EvaluateJob {
    args: EvaluateArgs,
    shutdown: Arc<AtomicBool>,
}

impl EvaluateJob {
    fn after_game<'p>(
        &'p self,
        progress: &'p Option<ProgressBar>,
    ) -> impl FnMut(&MatchRecord) -> ControlFlow<()> + 'p {
        move |_| {
            if let Some(pb) = progress {
                pb.inc(1);
            }
            if self.shutdown.load(Ordering::Relaxed) {
                warn!("Shutdown requested, ending match early");
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    }
}

impl GameVisitor for EvaluateJob {
    type Output = Result<RunReport>;

    fn visit<E: Environment + 'static>(self, env: E) -> Result<RunReport> {
        let args = &self.args;
        let predictor = UniformPredictor::new(env.action_space());
        let candidate_config = args.mcts_config(args.rollouts);
        let baseline_config = args.mcts_config(args.baseline_rollouts());
        let mut rng = ChaCha20Rng::seed_from_u64(args.common.seed);

        info!(
            env = env.name(),
            games = args.episodes,
            candidate_rollouts = candidate_config.num_rollouts,
            baseline_rollouts = baseline_config.num_rollouts,
            win_threshold = args.win_threshold,
            "Starting evaluation"
        );

        let candidate = Agent::search(&env, &predictor, candidate_config)?;
        let baseline = Agent::search(&env, &predictor, baseline_config)?;

        let pairs = args.test_pairs();
        let progress = progress_bar((pairs * 2 + args.episodes) as u64, "games")?;
        let mut hook = self.after_game(&progress);

        let vs_random = arena::test_games(&env, &candidate, pairs, &mut rng, &mut hook)
            .context("test games failed")?;

        let tournament = if self.shutdown.load(Ordering::Relaxed) {
            TournamentResult {
                record: MatchRecord::default(),
                accepted: false,
            }
        } else {
            arena::tournament(
                &env,
                &candidate,
                &baseline,
                args.episodes,
                args.win_threshold,
                &mut rng,
                &mut hook,
            )
            .context("tournament failed")?
        };

        if let Some(pb) = &progress {
            pb.finish_and_clear();
        }

        Ok(RunReport::Evaluate {
            vs_random,
            tournament,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("actor").chain(args.iter().copied()))
    }

    #[test]
    fn selfplay_writes_samples() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("samples.jsonl");
        let stats_path = dir.path().join("stats.json");
        let cli = cli(&[
            "selfplay",
            "--env-id",
            "tictactoe",
            "--episodes",
            "2",
            "--rollouts",
            "30",
            "--seed",
            "4",
            "--output",
            output.to_str().unwrap(),
            "--stats-path",
            stats_path.to_str().unwrap(),
        ]);

        let report = run(cli, Arc::new(AtomicBool::new(false))).unwrap();
        let snapshot = match report {
            RunReport::SelfPlay(snapshot) => snapshot,
            other => panic!("unexpected report {other:?}"),
        };
        assert_eq!(snapshot.episodes_completed, 2);

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len() as u64, snapshot.samples);
        assert_eq!(lines[0]["player"], "First");
        assert_eq!(lines[0]["policy"].as_array().unwrap().len(), 9);
        assert!(stats_path.exists());
    }

    #[test]
    fn shutdown_stops_before_first_episode() {
        let cli = cli(&["selfplay", "--env-id", "connect4", "--episodes", "5"]);
        let report = run(cli, Arc::new(AtomicBool::new(true))).unwrap();
        assert!(matches!(
            report,
            RunReport::SelfPlay(ref s) if s.episodes_completed == 0
        ));
    }

    #[test]
    fn evaluate_plays_both_phases() {
        let cli = cli(&[
            "evaluate",
            "--env-id",
            "tictactoe",
            "--episodes",
            "2",
            "--rollouts",
            "40",
            "--seed",
            "1",
        ]);
        match run(cli, Arc::new(AtomicBool::new(false))).unwrap() {
            RunReport::Evaluate {
                vs_random,
                tournament,
            } => {
                assert_eq!(vs_random.games(), 2);
                assert_eq!(tournament.record.games(), 2);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }
}
