//! Snapshot system: reads the world and builds a complete SimSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use cones_core::events::SimEvent;
use cones_core::params::Parameters;
use cones_core::state::*;
use cones_core::types::SimTime;

use crate::hose::Hose;
use crate::systems::targeting::{self, TargetingReport};

/// Build a complete SimSnapshot from the current state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    params: &Parameters,
    hose: &Hose,
    report: &TargetingReport,
    events: Vec<SimEvent>,
    stats: &StatsView,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        params: params.clone(),
        cones: build_cones(world, hose, report),
        hose: hose.view(),
        events,
        stats: *stats,
    }
}

/// Build ConeView list in spawn order.
pub fn build_cones(world: &World, hose: &Hose, report: &TargetingReport) -> Vec<ConeView> {
    let target = hose.target();
    targeting::gather(world)
        .into_iter()
        .map(|cone| ConeView {
            id: cone.id,
            position: cone.position,
            fill: cone.fill,
            status: report.status_of(cone.id).unwrap_or_default(),
            targeted: target == Some(cone.entity),
        })
        .collect()
}
