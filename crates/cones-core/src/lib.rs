//! Core types and definitions for the cone-filling simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, parameters, components, commands, state snapshots, events,
//! and constants. It has no dependency on the engine or any driver.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod params;
pub mod state;
pub mod types;

pub use glam::DVec2;
