//! Headless Set game runner.
//!
//! Starts a game with the classic feature-vector rule and logs every display
//! event. Runs until no legal set remains or Ctrl+C is pressed.

mod config;
mod rules;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Error};
use log::info;
use pico_args::Arguments;
use set_engine::{Game, display::LogDisplay};

use crate::config::CliOverrides;
use crate::rules::ClassicRules;

const HELP: &str = "\
Run a headless game of Set

USAGE:
  set_runner [OPTIONS]

OPTIONS:
  --config     FILE        JSON game configuration  [default: built-in defaults]
  --humans     N           Number of human players  [default: env SET_HUMAN_PLAYERS or 0]
  --computers  N           Number of computer players  [default: env SET_COMPUTER_PLAYERS or 2]

FLAGS:
  --hints                  Log every set on the grid after each deal
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log filter (e.g. info, set_engine=debug)
  SET_TABLE_SIZE           Grid slots
  SET_TURN_TIMEOUT_MILLIS  Time before the grid is reshuffled
  (Every configuration field can be set as SET_<FIELD>)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = CliOverrides {
        config_file: pargs.opt_value_from_str::<_, PathBuf>("--config")?,
        humans: pargs.opt_value_from_str("--humans")?,
        computers: pargs.opt_value_from_str("--computers")?,
        hints: pargs.contains("--hints"),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let config = config::load(&overrides).context("Failed to load configuration")?;
    info!(
        "Starting game: {} slots, {} cards, sets of {}",
        config.table_size, config.deck_size, config.feature_size
    );

    let rules = ClassicRules::new(config.feature_size, config.deck_size);
    let mut game = Game::start(config, Arc::new(rules), Arc::new(LogDisplay))
        .context("Failed to start game")?;

    let dealer = game.dealer().clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutting down game...");
        dealer.terminate();
    });

    let summary = game.wait().await.context("Game ended abnormally")?;

    println!("Final scores:");
    for (player, score) in summary.scores.iter().enumerate() {
        let kind = if game.players()[player].is_human() {
            "human"
        } else {
            "computer"
        };
        println!("  player {player} ({kind}): {score}");
    }
    println!("Winners: {:?}", summary.winners);
    if !summary.finished {
        println!("Game was stopped before the deck ran out of sets");
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install CTRL+C signal handler: {e}");
        std::future::pending::<()>().await;
    }
}
