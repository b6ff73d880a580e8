//! Headless driver for the cone-filling simulation.
//!
//! Runs the engine on a game loop thread and takes parameter changes from a
//! line-based console.

pub mod console;
pub mod game_loop;
pub mod state;

pub use cones_core as core;
