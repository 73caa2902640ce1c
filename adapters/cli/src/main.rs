#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the Grid Defence pathing engine.
//!
//! The adapter owns the terminal loop only: it constructs an engine from the
//! requested geometry and forwards line-oriented commands to it, printing
//! replies. All pathing rules live in the world crate.

mod session;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use grid_defence_core::{TileCoord, WELCOME_BANNER};
use grid_defence_world::PathEngine;

use crate::session::{Reply, Session};

/// Interactive front end for the Grid Defence pathing engine.
#[derive(Debug, Parser)]
#[command(name = "grid-defence", version, about)]
struct Cli {
    /// Number of tile columns in the grid.
    #[arg(long, default_value_t = 16)]
    width: u32,

    /// Number of tile rows in the grid.
    #[arg(long, default_value_t = 12)]
    height: u32,

    /// Spawn tile, written as `x,y`. Defaults to the upper-left corner.
    #[arg(long, value_parser = parse_tile)]
    spawn: Option<TileCoord>,

    /// Goal tile, written as `x,y`. Defaults to the lower-right corner.
    #[arg(long, value_parser = parse_tile)]
    goal: Option<TileCoord>,
}

fn parse_tile(value: &str) -> Result<TileCoord, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("`{value}` is not of the form `x,y`"))?;
    let x = x
        .trim()
        .parse()
        .map_err(|_| format!("`{x}` is not a valid x coordinate"))?;
    let y = y
        .trim()
        .parse()
        .map_err(|_| format!("`{y}` is not a valid y coordinate"))?;
    Ok(TileCoord::new(x, y))
}

/// Entry point for the Grid Defence command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let spawn = cli.spawn.unwrap_or_else(|| TileCoord::new(0, 0));
    let goal = cli.goal.unwrap_or_else(|| {
        TileCoord::new(
            cli.width.saturating_sub(1),
            cli.height.saturating_sub(1),
        )
    });

    let engine = PathEngine::new(cli.width, cli.height, spawn, goal)
        .context("failed to construct the pathing engine")?;
    let mut session = Session::new(engine);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{WELCOME_BANNER}")?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        match session.run_line(&line) {
            Ok(Reply::Text(text)) => {
                if !text.is_empty() {
                    writeln!(stdout, "{text}")?;
                }
            }
            Ok(Reply::Quit) => break,
            Err(error) => writeln!(stdout, "error: {error}")?,
        }
    }

    Ok(())
}
