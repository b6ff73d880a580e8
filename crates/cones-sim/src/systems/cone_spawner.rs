//! Cone spawning system: drops cones on a fixed-period schedule.

use hecs::World;
use log::trace;
use rand_chacha::ChaCha8Rng;

use cones_core::events::SimEvent;
use cones_core::params::Parameters;
use cones_core::state::StatsView;
use cones_core::types::ConeId;

use crate::world_setup;

/// Timestamp of the next cone drop.
///
/// Advances by exactly one period per spawn, so a high rate can spawn several
/// cones in one tick rather than queueing them up.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnSchedule {
    /// Simulated time (seconds) at which the next cone drops.
    pub next_at: f64,
}

impl SpawnSchedule {
    /// Pull the next drop closer if the new rate's period is shorter than
    /// the wait left on the old schedule.
    pub fn retune(&mut self, now: f64, rate: f64) {
        let period = 1.0 / rate;
        if self.next_at - now > period {
            self.next_at = now + period;
        }
    }
}

/// Spawn every cone that is due at `now`.
///
/// `params.cone_rate` must be positive.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    schedule: &mut SpawnSchedule,
    now: f64,
    params: &Parameters,
    next_id: &mut ConeId,
    events: &mut Vec<SimEvent>,
    stats: &mut StatsView,
) {
    while now >= schedule.next_at {
        schedule.next_at += 1.0 / params.cone_rate;
        let (_, id) = world_setup::spawn_cone(world, rng, next_id, &params.cone_drop);
        trace!("{id} dropped at t={now:.2}");
        stats.cones_spawned += 1;
        events.push(SimEvent::ConeSpawned { id });
    }
}
