//! Hose control system: targeting, motion, and filling for the hose head.
//!
//! Per tick, in order:
//! 1. Idle: run a targeting round; a selection starts an approach.
//! 2. Idle: drift toward the rest position. Approaching: move toward the
//!    intercept point, switching to Filling on arrival.
//! 3. Filling: snap onto the target and pour. A full cone ends the fill.

use hecs::World;
use log::debug;

use cones_core::components::{BeltPosition, Cone};
use cones_core::constants::FULL;
use cones_core::events::SimEvent;
use cones_core::params::Parameters;
use cones_core::state::StatsView;

use crate::guidance;
use crate::hose::{Hose, HoseMode, Triage};
use crate::systems::targeting::{self, TargetingReport};

/// Run the hose for one tick.
pub fn run(
    world: &mut World,
    params: &Parameters,
    hose: &mut Hose,
    report: &mut TargetingReport,
    tick: u64,
    events: &mut Vec<SimEvent>,
    stats: &mut StatsView,
) {
    if hose.is_scanning() {
        let cones = targeting::gather(world);
        let mut round = targeting::assess(&cones, hose.position, params);
        round.tick = tick;
        apply_selection(hose, &round, events, stats);
        *report = round;
    }

    advance(hose, params, events);
    pour(world, params, hose, events, stats);
}

/// Point the hose at the round's choice and update the triage flag.
fn apply_selection(
    hose: &mut Hose,
    round: &TargetingReport,
    events: &mut Vec<SimEvent>,
    stats: &mut StatsView,
) {
    hose.triage = if round.any_urgent {
        Triage::Urgent
    } else {
        Triage::Normal
    };

    if let Some(sel) = round.selection {
        debug!(
            "targeting {} at ({:.2}, {:.2}){}",
            sel.id,
            sel.destination.x,
            sel.destination.y,
            if sel.urgent { " [urgent]" } else { "" }
        );
        hose.mode = HoseMode::Approaching {
            target: sel.entity,
            id: sel.id,
            destination: sel.destination,
        };
        if sel.urgent {
            stats.urgent_selections += 1;
        }
        events.push(SimEvent::TargetAcquired {
            id: sel.id,
            urgent: sel.urgent,
        });
    }
}

/// Move toward the current destination by at most one step.
fn advance(hose: &mut Hose, params: &Parameters, events: &mut Vec<SimEvent>) {
    let step = params.hose_speed * params.timestep;
    let mut reached = None;

    match &mut hose.mode {
        HoseMode::Idle {
            destination,
            arrived,
        } => {
            *destination = params.rest_position();
            let (pos, done) = guidance::step_toward(hose.position, *destination, step);
            hose.position = pos;
            *arrived = done;
        }
        HoseMode::Approaching {
            target,
            id,
            destination,
        } => {
            let (pos, done) = guidance::step_toward(hose.position, *destination, step);
            hose.position = pos;
            if done {
                reached = Some((*target, *id));
            }
        }
        HoseMode::Filling { .. } => {}
    }

    if let Some((target, id)) = reached {
        hose.mode = HoseMode::Filling { target, id };
        events.push(SimEvent::FillStarted { id });
    }
}

/// Ride along with the target and fill it.
fn pour(
    world: &mut World,
    params: &Parameters,
    hose: &mut Hose,
    events: &mut Vec<SimEvent>,
    stats: &mut StatsView,
) {
    let HoseMode::Filling { target, id } = hose.mode else {
        return;
    };

    let Ok((pos, cone)) = world.query_one_mut::<(&BeltPosition, &mut Cone)>(target) else {
        // Removal paths release the target first; this only guards the handle.
        debug!("{id} vanished mid-fill");
        hose.mode = HoseMode::Idle {
            destination: params.rest_position(),
            arrived: false,
        };
        events.push(SimEvent::TargetLost { id });
        return;
    };

    hose.position = pos.0;
    cone.fill += params.hose_fill_rate * params.timestep;
    if cone.fill >= FULL {
        cone.fill = FULL;
        debug!("{id} filled");
        hose.mode = HoseMode::Idle {
            destination: params.rest_position(),
            arrived: false,
        };
        stats.cones_filled += 1;
        events.push(SimEvent::ConeFilled { id });
    }
}
