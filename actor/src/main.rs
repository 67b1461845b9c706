//! Actor - self-play and evaluation runner
//!
//! A single process that:
//! 1. Builds the game selected with `--env-id`
//! 2. Runs MCTS self-play episodes (`selfplay`), optionally writing training
//!    samples as JSON lines
//! 3. Or plays evaluation matches (`evaluate`): test games against a random
//!    mover and a candidate-versus-baseline tournament
//!
//! Games run sequentially on a blocking worker; Ctrl-C stops the run after
//! the current game.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

mod arena;
mod config;
mod episode;
mod runner;
mod stats;

use crate::config::Cli;
use crate::runner::RunReport;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;

    init_tracing(&cli.common().log_level)?;
    info!(log_level = %cli.common().log_level, "Tracing initialized");

    // Setup graceful shutdown
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);
    let shutdown_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, stopping after the current game...");
                shutdown_flag.store(true, Ordering::Relaxed);
            }
            Err(e) => error!("Failed to listen for ctrl+c: {}", e),
        }
    });

    // Searches are CPU-bound; keep them off the async workers
    let run_result = tokio::task::spawn_blocking(move || runner::run(cli, shutdown)).await?;

    shutdown_handle.abort();

    match run_result {
        Ok(RunReport::SelfPlay(snapshot)) => {
            info!(
                episodes = snapshot.episodes_completed,
                samples = snapshot.samples,
                "Self-play completed successfully"
            );
            Ok(())
        }
        Ok(RunReport::Evaluate {
            vs_random,
            tournament,
        }) => {
            info!(
                random_wins = vs_random.wins,
                random_losses = vs_random.losses,
                random_draws = vs_random.draws,
                tournament_games = tournament.record.games(),
                candidate_wins = tournament.record.wins,
                baseline_wins = tournament.record.losses,
                draws = tournament.record.draws,
                accepted = tournament.accepted,
                "Evaluation completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!("Actor failed: {:#}", e);
            Err(e)
        }
    }
}
