#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Reef levels in the terminal.

mod keys;
mod settings;
mod terminal;

use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use reef_core::Command;
use reef_engine::Engine;
use reef_highscores::HighscoreTable;
use reef_rendering::{Frame, Presenter};
use reef_world::{query, Level};

use crate::{keys::Key, settings::Settings, terminal::Terminal};

/// Command-line arguments for the Reef player.
#[derive(Debug, Parser)]
#[command(name = "reef", about = "Guide two fish out of every room.")]
struct CliArgs {
    /// Directory holding the level files, played in file name order.
    #[arg(long, value_name = "DIR", default_value = "rooms")]
    levels: PathBuf,
    /// Optional TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Name recorded in the high-score table.
    #[arg(long, default_value = "Player")]
    player: String,
    /// Keys to play instead of reading standard input.
    #[arg(long, value_name = "KEYS")]
    script: Option<String>,
    /// Print the room after every update.
    #[arg(long)]
    frames: bool,
}

/// Entry point for the Reef command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CliArgs::parse();
    let settings = Settings::load(args.config.as_deref())?;

    let levels = Level::load_dir(&args.levels)
        .with_context(|| format!("failed to load levels from {}", args.levels.display()))?;
    info!("loaded {} levels from {}", levels.len(), args.levels.display());

    let mut events = Vec::new();
    let mut engine = Engine::new(levels, settings.engine.clone(), &mut events)
        .context("failed to start the session")?;
    let mut terminal = Terminal::new(io::stdout().lock(), args.frames);
    terminal
        .present(&frame(&engine), &events)
        .context("failed to write to the terminal")?;

    let lines: Box<dyn Iterator<Item = io::Result<String>>> = match &args.script {
        Some(script) => Box::new(std::iter::once(Ok(script.clone()))),
        None => Box::new(io::stdin().lock().lines()),
    };

    for line in lines {
        let line = line.context("failed to read input")?;
        for key in keys::parse_line(&line) {
            events.clear();
            match key {
                Key::Quit => {
                    info!("quitting");
                    return Ok(());
                }
                Key::Restart => engine.apply(Command::RestartLevel, &mut events),
                Key::Play(input) => engine.update(input, &mut events),
            }
            terminal
                .present(&frame(&engine), &events)
                .context("failed to write to the terminal")?;

            if engine.is_finished() {
                record_highscore(&settings, &args.player, &engine, &mut terminal)?;
                return Ok(());
            }
        }
    }

    info!("input ended before the last level was completed");
    Ok(())
}

fn frame(engine: &Engine) -> Frame {
    let room = engine.room();
    Frame::paint(room.width(), room.height(), &query::render_tiles(room))
}

fn record_highscore<W: io::Write>(
    settings: &Settings,
    player: &str,
    engine: &Engine,
    terminal: &mut Terminal<W>,
) -> Result<()> {
    let mut table = HighscoreTable::load(&settings.highscores.path);
    let tally = engine.session_tally();
    match table.record(player, engine.elapsed(), tally.moves) {
        Ok(Some(rank)) => info!("new highscore at rank {}", rank + 1),
        Ok(None) => info!("session did not make the highscore table"),
        Err(error) => warn!("highscore not saved: {error}"),
    }
    terminal
        .scores(table.scores())
        .context("failed to write to the terminal")
}
