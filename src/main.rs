//! Inkball headless runner
//!
//! Loads a campaign, plays it with no player input at the configured frame
//! rate and prints the final snapshot as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use inkball::config::Campaign;
use inkball::sim::{GamePhase, GameState, TickInput, tick};

#[derive(Parser, Debug)]
#[command(about = "Run an Inkball campaign headless and print the final state", version)]
struct Args {
    /// Game config JSON; layout paths resolve relative to it
    #[arg(long)]
    config: PathBuf,
    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,
    /// RNG seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,
    /// Spawn countdown speed-up (overrides the config)
    #[arg(long)]
    time_scale: Option<f32>,
    /// 0-based level to start from (overrides the config)
    #[arg(long)]
    start_level: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let campaign = match Campaign::load(&args.config) {
        Ok(campaign) => campaign,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut settings = campaign.config.settings;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(time_scale) = args.time_scale {
        settings.time_scale = time_scale;
    }
    if let Some(level) = args.start_level {
        settings.start_level = level;
    }

    let mut state = match GameState::new(campaign, settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Running {} level(s) at {} fps, seed {}",
        state.level_count(),
        settings.fps,
        settings.seed
    );

    let dt = settings.tick_ms();
    let input = TickInput::default();
    let mut phase = state.phase;
    let mut ticks = 0u64;
    while !matches!(state.phase, GamePhase::Ended | GamePhase::Lost) {
        if args.ticks.is_some_and(|limit| ticks >= limit) {
            break;
        }
        tick(&mut state, &input, dt);
        ticks += 1;
        if state.phase != phase {
            log::debug!("Tick {ticks}: {phase:?} -> {:?}", state.phase);
            phase = state.phase;
        }
    }
    log::info!("Stopped after {ticks} ticks in {:?}", state.phase);

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {e}");
            ExitCode::FAILURE
        }
    }
}
