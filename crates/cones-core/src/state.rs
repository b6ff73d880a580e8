//! Simulation state snapshot: everything a renderer reads after each tick.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::params::Parameters;
use crate::types::{ConeId, SimTime};

/// Complete visible state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub params: Parameters,
    /// Live cones in spawn order.
    pub cones: Vec<ConeView>,
    pub hose: HoseView,
    pub events: Vec<SimEvent>,
    pub stats: StatsView,
}

/// A cone on the belt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConeView {
    pub id: ConeId,
    pub position: DVec2,
    pub fill: f64,
    /// Status from the most recent targeting round.
    pub status: ConeStatus,
    /// Whether the hose is currently targeting this cone.
    pub targeted: bool,
}

/// The hose head.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoseView {
    pub position: DVec2,
    pub phase: HosePhase,
    pub target: Option<ConeId>,
    /// Current movement destination (rest position while idle).
    pub destination: DVec2,
    pub arrived: bool,
    /// Whether the last targeting round was an urgent triage.
    pub urgent_mode: bool,
}

/// Running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsView {
    pub cones_spawned: u64,
    pub cones_filled: u64,
    /// Cones that left the belt full.
    pub retired_full: u64,
    /// Cones that left the belt with some but not enough fill.
    pub retired_partial: u64,
    /// Cones that left the belt untouched.
    pub retired_empty: u64,
    /// Targets chosen by urgent triage.
    pub urgent_selections: u64,
}
