//! Cleanup system: removes cones that have run off the end of the belt.

use hecs::{Entity, World};
use log::debug;

use cones_core::components::{BeltPosition, Cone};
use cones_core::constants::FULL;
use cones_core::events::SimEvent;
use cones_core::params::Parameters;
use cones_core::state::StatsView;
use cones_core::types::ConeId;

use crate::hose::Hose;

/// A cone on its way off the belt: id, entity and final fill.
pub type Retiring = (ConeId, Entity, f64);

/// Despawn every cone past the death position, full or not.
///
/// A despawned cone that was the hose's target is released from the hose in
/// the same pass, so the handle never outlives its entity.
/// `retiring` is scratch space owned by the caller and reused every tick.
pub fn run(
    world: &mut World,
    params: &Parameters,
    hose: &mut Hose,
    retiring: &mut Vec<Retiring>,
    events: &mut Vec<SimEvent>,
    stats: &mut StatsView,
) {
    retiring.clear();

    let death_x = params.death_position();
    retiring.extend(
        world
            .query_mut::<(&ConeId, &BeltPosition, &Cone)>()
            .into_iter()
            .filter(|(_, (_, pos, _))| pos.0.x > death_x)
            .map(|(entity, (id, _, cone))| (*id, entity, cone.fill)),
    );
    retiring.sort_by_key(|(id, _, _)| *id);

    for &(id, entity, fill) in retiring.iter() {
        if hose.release_target(entity) {
            debug!("{id} left the belt while targeted (fill {fill:.2})");
            events.push(SimEvent::TargetLost { id });
        }
        if fill >= FULL {
            stats.retired_full += 1;
        } else if fill > 0.0 {
            stats.retired_partial += 1;
        } else {
            stats.retired_empty += 1;
        }
        events.push(SimEvent::ConeRetired { id, fill });
        let _ = world.despawn(entity);
    }
}
