mod animation;
mod config;
mod error;
mod gesture;
mod graphics;
mod host;
mod logger;
mod math;
mod state;
mod terminal;
mod widget;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{info, LevelFilter};

use crate::config::Config;
use crate::error::Error;

/// Wind compass for the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Initial wind direction in degrees, clockwise from north
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    direction: f64,

    /// Config file (defaults to <config dir>/compass/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append debug logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Override the animation frame rate
    #[arg(long)]
    frame_rate: Option<u32>,

    /// Override the animation length in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,
}

fn run(cli: Cli) -> Result<(), Error> {
    logger::init(cli.log_file.as_deref(), LevelFilter::Debug)?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(frame_rate) = cli.frame_rate {
        config.frame_rate = frame_rate;
    }
    if let Some(duration_ms) = cli.duration_ms {
        config.animation_duration_ms = duration_ms;
    }
    config.validate()?;
    info!("starting with {config:?}");

    terminal::run(&config, cli.direction)?;
    Ok(())
}

/// Main function
fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
