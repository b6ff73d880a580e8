//! Simulation engine: the core of the conveyor simulation.
//!
//! `SimulationEngine` owns the hecs world of cones, the hose head, the
//! parameters and the spawn schedule, applies queued parameter commands at
//! tick boundaries, runs all systems, and produces `SimSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cones_core::commands::SimCommand;
use cones_core::events::SimEvent;
use cones_core::params::Parameters;
use cones_core::state::{ConeView, SimSnapshot, StatsView};
use cones_core::types::{ConeId, SimTime};

use crate::hose::Hose;
use crate::systems;
use crate::systems::cleanup::Retiring;
use crate::systems::cone_spawner::SpawnSchedule;
use crate::systems::targeting::TargetingReport;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for cone drop positions. Same seed = same simulation.
    pub seed: u64,
    /// Initial parameters. Not validated here.
    pub params: Parameters,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            params: Parameters::default(),
        }
    }
}

/// The simulation engine. Owns the world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    params: Parameters,
    rng: ChaCha8Rng,
    next_cone_id: ConeId,
    spawn_schedule: SpawnSchedule,
    hose: Hose,
    command_queue: VecDeque<SimCommand>,
    retiring: Vec<Retiring>,
    events: Vec<SimEvent>,
    report: TargetingReport,
    stats: StatsView,
}

impl SimulationEngine {
    /// Create a new simulation engine. The hose starts idle at the center of
    /// its range and the first cone drops on the first tick.
    pub fn new(config: SimConfig) -> Self {
        let hose = Hose::new(config.params.hose_range.center());
        Self {
            world: World::new(),
            time: SimTime::default(),
            params: config.params,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_cone_id: ConeId::default(),
            spawn_schedule: SpawnSchedule::default(),
            hose,
            command_queue: VecDeque::new(),
            retiring: Vec::new(),
            events: Vec::new(),
            report: TargetingReport::default(),
            stats: StatsView::default(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SimCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SimCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one timestep and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.advance();
        self.snapshot()
    }

    /// Advance the simulation by one timestep without building a snapshot.
    ///
    /// Events accumulate until the next [`snapshot`](Self::snapshot).
    pub fn advance(&mut self) {
        self.process_commands();
        self.run_systems();
        self.time.advance(self.params.timestep);
    }

    /// Build a snapshot of the current state, draining pending events.
    pub fn snapshot(&mut self) -> SimSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            &self.params,
            &self.hose,
            &self.report,
            events,
            &self.stats,
        )
    }

    /// Current parameters.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// The hose head.
    pub fn hose(&self) -> &Hose {
        &self.hose
    }

    /// Live cones in spawn order.
    pub fn cones(&self) -> Vec<ConeView> {
        systems::snapshot::build_cones(&self.world, &self.hose, &self.report)
    }

    /// Output of the most recent targeting round.
    pub fn last_report(&self) -> &TargetingReport {
        &self.report
    }

    pub fn stats(&self) -> StatsView {
        self.stats
    }

    /// Get a read-only reference to the world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn set_belt_speed(&mut self, value: f64) {
        self.handle_command(SimCommand::SetBeltSpeed { value });
    }

    /// Also moves the far edges of the hose range and drop area.
    pub fn set_belt_width(&mut self, value: f64) {
        self.handle_command(SimCommand::SetBeltWidth { value });
    }

    /// Also pulls the next spawn closer when the rate goes up.
    pub fn set_cone_rate(&mut self, value: f64) {
        self.handle_command(SimCommand::SetConeRate { value });
    }

    /// Drop area width, adjusted through its left edge.
    pub fn set_cone_variance(&mut self, value: f64) {
        self.handle_command(SimCommand::SetConeVariance { value });
    }

    /// Hose range width, adjusted through its right edge.
    pub fn set_hose_range(&mut self, value: f64) {
        self.handle_command(SimCommand::SetHoseRange { value });
    }

    pub fn set_hose_speed(&mut self, value: f64) {
        self.handle_command(SimCommand::SetHoseSpeed { value });
    }

    pub fn set_fill_rate(&mut self, value: f64) {
        self.handle_command(SimCommand::SetFillRate { value });
    }

    pub fn set_urgent_time(&mut self, value: f64) {
        self.handle_command(SimCommand::SetUrgentTime { value });
    }

    /// Place a cone at an exact spot (for tests).
    #[cfg(test)]
    pub fn place_cone(&mut self, position: glam::DVec2, fill: f64) -> ConeId {
        let (_, id) = crate::world_setup::spawn_cone_at(
            &mut self.world,
            &mut self.next_cone_id,
            position,
            fill,
        );
        id
    }

    /// Stop the spawn schedule so only placed cones exist (for tests).
    #[cfg(test)]
    pub fn suspend_spawning(&mut self) {
        self.spawn_schedule.next_at = f64::INFINITY;
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single parameter command.
    fn handle_command(&mut self, command: SimCommand) {
        self.params.apply(&command);
        if let SimCommand::SetConeRate { value } = command {
            self.spawn_schedule.retune(self.time.elapsed_secs, value);
        }
        info!("parameters updated: {command:?}");
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Belt movement
        systems::movement::run(&mut self.world, &self.params);
        // 2. Retire cones past the end of the belt (releases a lost target).
        //    Runs after movement, so a cone is gone on the tick it crosses.
        systems::cleanup::run(
            &mut self.world,
            &self.params,
            &mut self.hose,
            &mut self.retiring,
            &mut self.events,
            &mut self.stats,
        );
        // 3. Cone drops
        systems::cone_spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.spawn_schedule,
            self.time.elapsed_secs,
            &self.params,
            &mut self.next_cone_id,
            &mut self.events,
            &mut self.stats,
        );
        // 4. Hose targeting, motion and filling
        systems::hose_control::run(
            &mut self.world,
            &self.params,
            &mut self.hose,
            &mut self.report,
            self.time.tick,
            &mut self.events,
            &mut self.stats,
        );
    }
}
