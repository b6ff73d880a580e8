//! Belt movement system.
//!
//! Every cone rides the belt: x += belt_speed * dt.

use hecs::World;

use cones_core::components::{BeltPosition, Cone};
use cones_core::params::Parameters;

/// Advance all cones along +X by one timestep.
pub fn run(world: &mut World, params: &Parameters) {
    let dx = params.belt_speed * params.timestep;
    for (_entity, (pos, _cone)) in world.query_mut::<(&mut BeltPosition, &Cone)>() {
        pos.0.x += dx;
    }
}
