//! Entity spawn factories for cones.

use glam::DVec2;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use cones_core::components::{BeltPosition, Cone};
use cones_core::types::{ConeId, Rect};

/// Drop an empty cone at a uniformly random point inside `area`.
pub fn spawn_cone(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    next_id: &mut ConeId,
    area: &Rect,
) -> (hecs::Entity, ConeId) {
    let x = area.left + rng.gen::<f64>() * area.width();
    let y = area.top + rng.gen::<f64>() * area.height();
    spawn_cone_at(world, next_id, DVec2::new(x, y), 0.0)
}

/// Place a cone at an exact position with a given fill.
pub fn spawn_cone_at(
    world: &mut World,
    next_id: &mut ConeId,
    position: DVec2,
    fill: f64,
) -> (hecs::Entity, ConeId) {
    let id = *next_id;
    *next_id = id.next();
    let entity = world.spawn((id, BeltPosition(position), Cone { fill }));
    (entity, id)
}
