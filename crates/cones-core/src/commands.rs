//! Parameter commands sent from a driver to the simulation.
//!
//! Commands are queued and applied together at the next tick boundary, so the
//! systems never observe a half-updated parameter set.

use serde::{Deserialize, Serialize};

/// One setter per tunable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimCommand {
    /// Set belt speed (units / second).
    SetBeltSpeed { value: f64 },
    /// Set belt width. Also moves the far (bottom) edges of the hose range and
    /// drop area by the same delta.
    SetBeltWidth { value: f64 },
    /// Set cone spawn rate. Pulls the next spawn closer if the old schedule
    /// would now stall.
    SetConeRate { value: f64 },
    /// Set drop area width through its left edge; the right edge stays put.
    SetConeVariance { value: f64 },
    /// Set hose range width through its right edge; the left edge stays put.
    SetHoseRange { value: f64 },
    /// Set hose head speed (units / second).
    SetHoseSpeed { value: f64 },
    /// Set fill rate (full fills / second).
    SetFillRate { value: f64 },
    /// Set the urgent slack threshold (seconds).
    SetUrgentTime { value: f64 },
}
