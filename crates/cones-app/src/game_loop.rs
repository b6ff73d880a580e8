//! Game loop thread: runs the simulation engine and publishes snapshots.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Commands arrive via `mpsc` channel. The latest snapshot is stored in shared
//! state for polling by the driver.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::info;

use cones_core::state::SimSnapshot;
use cones_sim::engine::{SimConfig, SimulationEngine};

use crate::state::{LoopCommand, SharedSnapshot};

/// How the loop paces and reports.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// Ticks per loop iteration.
    pub frame_skip: u32,
    /// Sleep so simulated time tracks wall-clock time.
    pub realtime: bool,
    /// Stop after this many ticks. `None` runs until shutdown.
    pub max_ticks: Option<u64>,
    /// Log a summary every this many ticks (0 disables).
    pub report_every: u64,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            frame_skip: 1,
            realtime: false,
            max_ticks: None,
            report_every: 500,
        }
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle. The thread yields the
/// final snapshot when it exits.
pub fn spawn_game_loop(
    config: SimConfig,
    settings: LoopSettings,
    latest_snapshot: SharedSnapshot,
) -> io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<SimSnapshot>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("cones-game-loop".into())
        .spawn(move || {
            let engine = SimulationEngine::new(config);
            run_game_loop(engine, settings, cmd_rx, &latest_snapshot)
        })?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown, channel disconnect, or the tick limit.
pub fn run_game_loop(
    mut engine: SimulationEngine,
    mut settings: LoopSettings,
    cmd_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &SharedSnapshot,
) -> SimSnapshot {
    let mut next_tick_time = Instant::now();
    let mut open = true;

    loop {
        // 1. Drain all pending commands
        while open {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Sim(cmd)) => engine.queue_command(cmd),
                Ok(LoopCommand::SetFrameSkip(n)) => {
                    settings.frame_skip = n.max(1);
                    info!("frame skip set to {}", settings.frame_skip);
                }
                Ok(LoopCommand::Shutdown) => return finish(&mut engine, latest_snapshot),
                Err(mpsc::TryRecvError::Empty) => break,
                // Without a tick limit nothing could stop the loop any more.
                Err(mpsc::TryRecvError::Disconnected) if settings.max_ticks.is_none() => {
                    return finish(&mut engine, latest_snapshot);
                }
                Err(mpsc::TryRecvError::Disconnected) => open = false,
            }
        }

        // 2. Advance `frame_skip` ticks, stopping at the limit
        let mut ran = 0u32;
        for _ in 0..settings.frame_skip.max(1) {
            if reached_limit(&engine, &settings) {
                break;
            }
            engine.advance();
            ran += 1;
            let tick = engine.time().tick;
            if settings.report_every > 0 && tick % settings.report_every == 0 {
                log_summary(&engine);
            }
        }

        // 3. Store latest snapshot for polling
        let snapshot = engine.snapshot();
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if reached_limit(&engine, &settings) {
            return finish(&mut engine, latest_snapshot);
        }

        // 4. Sleep until the simulated time catches up with the wall clock
        if settings.realtime {
            let frame = Duration::from_secs_f64(engine.params().timestep * f64::from(ran.max(1)));
            next_tick_time += frame;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > frame * 2 {
                // Too far behind, reset to avoid catch-up spiral
                next_tick_time = now;
            }
        }
    }
}

fn reached_limit(engine: &SimulationEngine, settings: &LoopSettings) -> bool {
    settings
        .max_ticks
        .is_some_and(|limit| engine.time().tick >= limit)
}

fn finish(engine: &mut SimulationEngine, latest_snapshot: &SharedSnapshot) -> SimSnapshot {
    let snapshot = engine.snapshot();
    log_summary(engine);
    if let Ok(mut lock) = latest_snapshot.lock() {
        *lock = Some(snapshot.clone());
    }
    snapshot
}

fn log_summary(engine: &SimulationEngine) {
    let time = engine.time();
    let stats = engine.stats();
    let hose = engine.hose();
    info!(
        "t={:.2}s tick={} cones={} spawned={} filled={} retired full/partial/empty={}/{}/{} hose={:?}{}",
        time.elapsed_secs,
        time.tick,
        engine.world().len(),
        stats.cones_spawned,
        stats.cones_filled,
        stats.retired_full,
        stats.retired_partial,
        stats.retired_empty,
        hose.phase(),
        if hose.urgent_mode() { " [urgent]" } else { "" },
    );
}
