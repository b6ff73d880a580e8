//! State shared between the driver and the game loop thread.

use std::sync::{Arc, Mutex};

use cones_core::commands::SimCommand;
use cones_core::state::SimSnapshot;

/// Commands sent from the console to the game loop thread.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopCommand {
    /// A parameter change to forward to the simulation engine.
    Sim(SimCommand),
    /// Ticks to run per loop iteration (0 is treated as 1).
    SetFrameSkip(u32),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the game loop after each iteration.
pub type SharedSnapshot = Arc<Mutex<Option<SimSnapshot>>>;

pub fn shared_snapshot() -> SharedSnapshot {
    Arc::new(Mutex::new(None))
}
