//! Arena Brawl headless host
//!
//! Drives the simulation at a fixed frame rate without rendering, drains the
//! effect queues the way a renderer would, and prints the match report.

use std::path::PathBuf;

use clap::Parser;

use arena_brawl::roster::{load_roster, sample_roster};
use arena_brawl::sim::{SimState, SimRng, step_frame};
use arena_brawl::{BattleLogExport, MatchReport, Tuning};

/// Headless elimination arena
#[derive(Parser, Debug)]
#[command(name = "arena-brawl", version, about)]
struct Args {
    /// Seed string; omit for a non-deterministic match
    #[arg(short, long)]
    seed: Option<String>,

    /// Roster file (JSON array or CSV with name,image columns)
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Number of placeholder entrants when no roster is given
    #[arg(short = 'n', long, default_value_t = 59)]
    count: usize,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 720.0)]
    height: f32,

    /// Clock speed multiplier (overrides tuning)
    #[arg(long)]
    speed: Option<f32>,

    /// Tuning overrides (JSON)
    #[arg(short, long)]
    tuning: Option<PathBuf>,

    /// Give up after this many frames
    #[arg(long, default_value_t = 60 * 60 * 30)]
    max_frames: u64,

    /// Frames per second of the host loop
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Write the full battle log here
    #[arg(long)]
    log_out: Option<PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = run(Args::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

fn run(args: Args) -> arena_brawl::Result<()> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    let records = match &args.roster {
        Some(path) => load_roster(path)?,
        None => sample_roster(args.count),
    };

    let rng = SimRng::from_seed_str(args.seed.as_deref());
    let mut state = SimState::with_tuning(rng, tuning);
    if let Some(speed) = args.speed {
        state.clock.speed = speed;
    }
    state.populate(&records);
    state.layout(args.width, args.height);
    state.start();

    log::info!(
        "Arena Brawl: {} entrants, seed {:?}, {}x{}",
        state.entities.len(),
        state.rng.seed(),
        args.width,
        args.height
    );

    let dt = 1.0 / args.fps.max(1.0);
    let mut frames = 0u64;
    let mut hits = 0usize;
    let mut deaths = 0usize;
    let mut last_alive = state.alive_count();
    while !state.is_concluded() && frames < args.max_frames {
        step_frame(&mut state, dt, args.width, args.height);
        hits += state.clock.hits.drain().count();
        deaths += state.clock.deaths.drain().count();
        frames += 1;

        let alive = state.alive_count();
        if alive != last_alive && alive % 10 == 0 {
            log::info!("Tick {}: {} alive", state.clock.ticks, alive);
        }
        last_alive = alive;
    }

    if !state.is_concluded() {
        log::warn!(
            "Stopped after {} frames with {} still alive",
            frames,
            state.alive_count()
        );
    }
    log::debug!("{frames} frames, {hits} hit effects, {deaths} death effects");

    if let Some(path) = &args.log_out {
        std::fs::write(path, BattleLogExport::from_state(&state).to_json_pretty()?)?;
        log::info!("Battle log written to {}", path.display());
    }

    println!("{}", MatchReport::from_state(&state).to_json_pretty()?);
    Ok(())
}
