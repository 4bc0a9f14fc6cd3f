mod autoplay;
mod config;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use twenty48_core::Engine;

use autoplay::AutoplayOptions;
use config::Config;
use session::Session;

#[derive(Debug, Parser)]
#[command(author, version, about = "Play the 4x4 sliding-tile merge puzzle in a terminal")]
struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "FILE", global = true, value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[arg(long, value_name = "N", global = true)]
    seed: Option<u64>,

    /// Log filter, e.g. "info", "debug".
    #[arg(long, default_value = "info", global = true)]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive game reading one command per line from stdin
    Play,
    /// Self-play with random legal moves
    Autoplay {
        /// Number of games
        #[arg(long, value_name = "N")]
        games: Option<u32>,

        /// Move cap per game
        #[arg(long, value_name = "N")]
        max_moves: Option<u64>,

        /// Number of worker threads (defaults to Rayon default)
        #[arg(long, value_name = "N")]
        workers: Option<usize>,

        /// Write per-game summaries as JSON lines
        #[arg(long, value_name = "FILE")]
        results: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log.as_str())).init();

    let config = Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        info!("Using configuration file: {}", path.display());
    }
    let seed = cli.seed.or(config.seed).unwrap_or_else(rand::random);
    let engine = Engine::new(config.terminal_rule);
    info!("seed {seed}, terminal rule {:?}", engine.terminal_rule);

    match cli.command {
        Commands::Play => {
            let mut session = Session::new(engine, StdRng::seed_from_u64(seed));
            let stdin = std::io::stdin();
            let state = session::run(&mut session, stdin.lock(), std::io::stdout().lock())?;
            info!("Session ended with score {}", state.score);
        }
        Commands::Autoplay {
            games,
            max_moves,
            workers,
            results,
        } => {
            let opts = AutoplayOptions {
                games: games.unwrap_or(config.autoplay.games),
                base_seed: seed,
                max_moves: max_moves.unwrap_or(config.autoplay.max_moves),
                workers: workers.or(config.autoplay.workers),
                results_file: results.or(config.report.results_file),
            };
            let summaries = autoplay::run(engine, &opts)?;
            if let Some(st) = autoplay::stats(&summaries) {
                info!(
                    "Completed {} games: mean score {:.1}, max score {}, best tile {}",
                    st.games, st.mean_score, st.max_score, st.best_tile
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "twenty48", "autoplay", "--games", "5", "--seed", "9", "--results", "r.jsonl",
        ])
        .unwrap();
        assert_eq!(cli.seed, Some(9));
        match cli.command {
            Commands::Autoplay { games, results, max_moves, .. } => {
                assert_eq!(games, Some(5));
                assert_eq!(results, Some(PathBuf::from("r.jsonl")));
                assert_eq!(max_moves, None);
            }
            Commands::Play => panic!("expected autoplay"),
        }
        assert!(Cli::try_parse_from(["twenty48"]).is_err());
    }
}
