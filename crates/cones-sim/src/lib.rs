//! Simulation engine for the cone-filling conveyor.
//!
//! Owns the hecs world of cones and the single hose head, runs systems at a
//! fixed timestep, and produces SimSnapshots for whatever draws them.

pub mod engine;
pub mod guidance;
pub mod hose;
pub mod systems;
pub mod world_setup;

pub use cones_core as core;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
