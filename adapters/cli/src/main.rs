#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays superfco levels headlessly.
//!
//! Levels are replayed against a scripted input sequence at a fixed frame
//! rate; no window is opened. Set `RUST_LOG=info` to follow the run.

mod script;
mod session;
mod tuning_file;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use superfco_core::{TileGrid, Tuning, DEFAULT_COLUMNS, WELCOME_BANNER};
use superfco_world::{parse_level, World};

use crate::session::{Outcome, Session};

/// Seconds of idle play granted when neither a script nor a frame budget is given.
const DEFAULT_IDLE_SECONDS: u64 = 10;

#[derive(Debug, Parser)]
#[command(name = "superfco", about = "Replay superfco levels without a window")]
struct Args {
    /// Level files to play in order; reaching a goal advances to the next.
    #[arg(long = "level", required = true)]
    levels: Vec<PathBuf>,
    /// Comma-separated numpad steps, e.g. `6*30,8,*60`.
    #[arg(long, default_value = "")]
    script: String,
    /// Number of frames to simulate; defaults to the script length.
    #[arg(long)]
    frames: Option<u64>,
    /// Fixed simulation frame rate.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,
    /// Attempts available before the run ends.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    lives: u32,
    /// Optional TOML file overriding the physics tuning.
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Width of every level row in tiles.
    #[arg(long, default_value_t = DEFAULT_COLUMNS)]
    columns: usize,
}

/// Entry point for the superfco command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    println!("{WELCOME_BANNER}");

    let outcome = run(&args)?;
    match outcome {
        Outcome::Completed { frames } => println!("All levels complete after {frames} frames."),
        Outcome::GameOver { frames, level } => {
            println!("Game over on level {} after {frames} frames.", level + 1);
        }
        Outcome::OutOfFrames { frames, level } => {
            println!("Stopped on level {} after {frames} frames.", level + 1);
        }
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn run(args: &Args) -> Result<Outcome> {
    let tuning = match &args.tuning {
        Some(path) => tuning_file::load_tuning(path)?,
        None => Tuning::default(),
    };
    let levels = args
        .levels
        .iter()
        .map(|path| load_level(path, args.columns, tuning))
        .collect::<Result<Vec<_>>>()?;
    let inputs = script::parse_script(&args.script).context("invalid input script")?;

    let dt = Duration::from_secs(1) / args.fps;
    let frames = args.frames.unwrap_or_else(|| {
        if inputs.is_empty() {
            DEFAULT_IDLE_SECONDS * u64::from(args.fps)
        } else {
            inputs.len() as u64
        }
    });
    tracing::info!(
        levels = levels.len(),
        frames,
        fps = args.fps,
        lives = args.lives,
        "starting run"
    );

    let mut session = Session::new(levels, tuning, args.lives)?;
    let outcome = session.run(dt, frames, &inputs)?;
    tracing::info!(?outcome, "run finished");
    Ok(outcome)
}

/// Reads a level file and checks that it yields a playable world.
fn load_level(path: &Path, columns: usize, tuning: Tuning) -> Result<TileGrid> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read level {}", path.display()))?;
    let grid = parse_level(&text, columns)
        .with_context(|| format!("failed to parse level {}", path.display()))?;
    let _ = World::new(grid.clone(), tuning)
        .with_context(|| format!("level {} is not playable", path.display()))?;
    Ok(grid)
}
