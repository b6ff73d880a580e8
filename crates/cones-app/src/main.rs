use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use cones_app::console;
use cones_app::game_loop::{self, LoopSettings};
use cones_app::state;
use cones_core::params::Parameters;
use cones_sim::engine::SimConfig;

/// Conveyor belt cone-filling simulation.
#[derive(Parser, Debug)]
#[command(name = "cones", version, about)]
struct Args {
    /// JSON parameter file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for cone drop positions
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Ticks to run; 0 runs until stdin closes or `quit` is read
    #[arg(short, long, default_value_t = 0)]
    ticks: u64,

    /// Ticks per loop iteration
    #[arg(long, default_value_t = 1)]
    frame_skip: u32,

    /// Pace the simulation to wall-clock time
    #[arg(long)]
    realtime: bool,

    /// Log a summary every N ticks (0 disables)
    #[arg(long, default_value_t = 500)]
    report_every: u64,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump_final: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let params = match &args.config {
        Some(path) => Parameters::load(path)
            .with_context(|| format!("loading parameters from {}", path.display()))?,
        None => Parameters::default(),
    };
    params.validate().context("invalid parameters")?;
    info!("starting with seed {} and {:?}", args.seed, params);

    let bounded = args.ticks > 0;
    let settings = LoopSettings {
        frame_skip: args.frame_skip.max(1),
        realtime: args.realtime,
        max_ticks: bounded.then_some(args.ticks),
        report_every: args.report_every,
    };
    let config = SimConfig {
        seed: args.seed,
        params,
    };

    let latest = state::shared_snapshot();
    let (tx, handle) = game_loop::spawn_game_loop(config, settings, latest)
        .context("spawning game loop thread")?;
    // The reader blocks on stdin, so it is left detached.
    console::spawn_reader(tx, !bounded).context("spawning console thread")?;

    let last = handle
        .join()
        .map_err(|_| anyhow::anyhow!("game loop thread panicked"))?;

    if args.dump_final {
        println!("{}", serde_json::to_string_pretty(&last)?);
    }
    Ok(())
}
