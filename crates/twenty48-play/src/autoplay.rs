use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use twenty48_core::{legal_moves, Engine, Score, Tile};

/// Self-play configuration supplied by the CLI and config file.
#[derive(Clone, Debug)]
pub struct AutoplayOptions {
    pub games: u32,
    pub base_seed: u64,
    pub max_moves: u64,
    pub workers: Option<usize>,
    pub results_file: Option<PathBuf>,
}

/// Summary for a completed game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub game_id: u32,
    pub seed: u64,
    pub moves: u64,
    pub score: Score,
    pub highest_tile: Tile,
    /// False when the game was cut off by `max_moves`.
    pub finished: bool,
}

/// Drive one game with uniformly random legal moves.
pub fn play_game(engine: Engine, game_id: u32, seed: u64, max_moves: u64) -> GameSummary {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = engine.new_game(&mut rng);
    let mut moves = 0;

    while !state.game_over && moves < max_moves {
        let legal = legal_moves(state.board);
        let Some(&direction) = legal.choose(&mut rng) else {
            break;
        };
        let result = engine.apply_move(state.board, state.score, direction, &mut rng);
        if result.changed {
            moves += 1;
        }
        state.board = result.board;
        state.score = result.score;
        state.game_over = result.game_over;
    }

    GameSummary {
        game_id,
        seed,
        moves,
        score: state.score,
        highest_tile: state.board.highest_tile(),
        finished: state.game_over || legal_moves(state.board).is_empty(),
    }
}

/// Play `opts.games` games in parallel; game `i` uses seed `base_seed + i`.
pub fn run(engine: Engine, opts: &AutoplayOptions) -> Result<Vec<GameSummary>> {
    if opts.games == 0 {
        bail!("games must be > 0");
    }
    if opts.max_moves == 0 {
        bail!("max_moves must be > 0");
    }

    info!(
        "Playing {} games (base seed {}, rule {:?})",
        opts.games, opts.base_seed, engine.terminal_rule
    );
    let pb = ProgressBar::new(u64::from(opts.games));
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {wide_bar} {pos}/{len} ({eta})",
        )
        .context("invalid progress template")?
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );

    let play = || -> Vec<GameSummary> {
        (0..opts.games)
            .into_par_iter()
            .map(|id| {
                let seed = opts.base_seed.wrapping_add(u64::from(id));
                let summary = play_game(engine, id, seed, opts.max_moves);
                pb.inc(1);
                summary
            })
            .collect()
    };

    let mut summaries = if let Some(n) = opts.workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("failed to build rayon thread pool")?
            .install(play)
    } else {
        play()
    };
    pb.finish_with_message("games played");
    summaries.sort_by_key(|s| s.game_id);

    let cut_off = summaries.iter().filter(|s| !s.finished).count();
    if cut_off > 0 {
        warn!("{cut_off} game(s) hit the {} move limit", opts.max_moves);
    }
    if let Some(path) = &opts.results_file {
        write_results(path, &summaries)?;
        info!("Wrote {} summaries to {}", summaries.len(), path.display());
    }
    Ok(summaries)
}

/// Write one JSON object per line.
pub fn write_results(path: &Path, summaries: &[GameSummary]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for s in summaries {
        serde_json::to_writer(&mut w, s)?;
        w.write_all(b"\n")?;
    }
    w.flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub games: usize,
    pub mean_score: f64,
    pub max_score: Score,
    pub best_tile: Tile,
}

pub fn stats(summaries: &[GameSummary]) -> Option<Stats> {
    if summaries.is_empty() {
        return None;
    }
    let total: Score = summaries.iter().map(|s| s.score).sum();
    Some(Stats {
        games: summaries.len(),
        mean_score: total as f64 / summaries.len() as f64,
        max_score: summaries.iter().map(|s| s.score).max().unwrap_or(0),
        best_tile: summaries.iter().map(|s| s.highest_tile).max().unwrap_or(0),
    })
}
