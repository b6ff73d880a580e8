//! Tests for the simulation engine: determinism, cone lifecycle, hose state
//! machine, triage, and tick-level invariants.

use std::collections::HashMap;

use glam::DVec2;
use proptest::prelude::*;

use cones_core::commands::SimCommand;
use cones_core::enums::*;
use cones_core::events::SimEvent;
use cones_core::params::Parameters;
use cones_core::state::SimSnapshot;
use cones_core::types::{ConeId, Rect};

use crate::engine::{SimConfig, SimulationEngine};

fn engine_with(params: Parameters) -> SimulationEngine {
    SimulationEngine::new(SimConfig { seed: 7, params })
}

/// Default parameters, no automatic cone drops.
fn quiet_engine() -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.suspend_spawning();
    engine
}

/// Cones always drop at the same spot: left edge of the drop area, y = 4.
fn fixed_drop_params() -> Parameters {
    Parameters {
        cone_rate: 1.0,
        belt_speed: 2.0,
        hose_fill_rate: 3.0,
        hose_speed: 20.0,
        cone_drop: Rect { left: -12.0, top: 4.0, right: -12.0, bottom: 4.0 },
        ..Default::default()
    }
}

fn acquired(snap: &SimSnapshot) -> Option<(ConeId, bool)> {
    snap.events.iter().find_map(|e| match e {
        SimEvent::TargetAcquired { id, urgent } => Some((*id, *urgent)),
        _ => None,
    })
}

fn filled(snap: &SimSnapshot, cone: ConeId) -> bool {
    snap.events
        .iter()
        .any(|e| matches!(e, SimEvent::ConeFilled { id } if *id == cone))
}

/// Checks that hold after every tick.
fn assert_tick_invariants(snap: &SimSnapshot, prev_fill: &mut HashMap<ConeId, f64>) {
    let death = snap.params.death_position();
    assert!(snap.cones.iter().all(|c| c.position.x <= death), "cone left past the end");

    let targeted: Vec<_> = snap.cones.iter().filter(|c| c.targeted).collect();
    assert!(targeted.len() <= 1, "more than one cone targeted");
    if let Some(id) = snap.hose.target {
        assert!(
            snap.cones.iter().any(|c| c.id == id),
            "hose targets {id}, which is not on the belt"
        );
        assert_eq!(targeted.first().map(|c| c.id), Some(id));
    } else {
        assert!(targeted.is_empty());
    }

    let mut increased = Vec::new();
    for cone in &snap.cones {
        assert!((0.0..=1.0).contains(&cone.fill), "{} fill {}", cone.id, cone.fill);
        let before = prev_fill.get(&cone.id).copied().unwrap_or(0.0);
        assert!(cone.fill >= before, "{} fill went down", cone.id);
        if cone.fill > before {
            increased.push(cone.id);
        }
    }
    assert!(increased.len() <= 1, "several cones filled in one tick");
    for id in &increased {
        assert!(
            snap.hose.target == Some(*id) || filled(snap, *id),
            "{id} filled without being the hose target"
        );
        if snap.hose.target == Some(*id) {
            assert_eq!(snap.hose.phase, HosePhase::Filling);
        }
    }

    prev_fill.clear();
    prev_fill.extend(snap.cones.iter().map(|c| (c.id, c.fill)));
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    for _ in 0..600 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });

    // The very first drop lands somewhere random.
    let snap_a = engine_a.tick();
    let snap_b = engine_b.tick();
    assert_ne!(snap_a.cones[0].position, snap_b.cones[0].position);
}

// ---- Cone lifecycle ----

#[test]
fn test_first_cone_drops_on_first_tick() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let snap = engine.tick();

    assert_eq!(snap.cones.len(), 1);
    assert_eq!(snap.stats.cones_spawned, 1);
    assert!(snap.events.contains(&SimEvent::ConeSpawned { id: ConeId(0) }));

    let cone = &snap.cones[0];
    assert!(snap.params.cone_drop.contains(cone.position));
    assert_eq!(cone.fill, 0.0);
}

#[test]
fn test_spawn_follows_fixed_period() {
    let mut engine = engine_with(Parameters {
        cone_rate: 1.0,
        ..Default::default()
    });
    for _ in 0..45 {
        engine.advance();
    }
    assert_eq!(engine.cones().len(), 1);
    for _ in 0..30 {
        engine.advance();
    }
    assert_eq!(engine.cones().len(), 2);
}

#[test]
fn test_high_rate_spawns_several_per_tick() {
    let mut engine = engine_with(Parameters {
        cone_rate: 200.0,
        ..Default::default()
    });
    for _ in 0..10 {
        engine.advance();
    }
    // Drops every 5ms across checks at t = 0.00 ..= 0.18.
    let spawned = engine.stats().cones_spawned;
    assert!((35..=38).contains(&spawned), "spawned {spawned}");
    assert_eq!(engine.cones().len() as u64, spawned);
}

#[test]
fn test_raising_cone_rate_pulls_next_drop_closer() {
    let mut engine = engine_with(Parameters {
        cone_rate: 0.1,
        ..Default::default()
    });
    for _ in 0..5 {
        engine.advance();
    }
    assert_eq!(engine.cones().len(), 1);

    // Old schedule says t = 10s; the new period is 0.1s.
    engine.set_cone_rate(10.0);
    for _ in 0..10 {
        engine.advance();
    }
    assert!(engine.cones().len() >= 2);
}

#[test]
fn test_lowering_cone_rate_keeps_schedule() {
    let mut engine = engine_with(Parameters {
        cone_rate: 10.0,
        ..Default::default()
    });
    engine.advance();
    engine.set_cone_rate(0.1);
    // The drop already scheduled for t = 0.1 still happens.
    for _ in 0..6 {
        engine.advance();
    }
    assert_eq!(engine.cones().len(), 2);
}

#[test]
fn test_cones_ride_the_belt() {
    let mut engine = quiet_engine();
    engine.place_cone(DVec2::new(0.0, 12.0), 0.0);
    let snap = engine.tick();
    assert!((snap.cones[0].position.x - 0.04).abs() < 1e-12);
    assert_eq!(snap.cones[0].position.y, 12.0);
}

#[test]
fn test_cone_past_death_position_is_removed() {
    let mut engine = quiet_engine();
    let death = engine.params().death_position();
    engine.place_cone(DVec2::new(death + 0.5, 12.0), 0.0);

    let snap = engine.tick();
    assert!(snap.cones.is_empty());
    assert!(snap.events.contains(&SimEvent::ConeRetired { id: ConeId(0), fill: 0.0 }));
    assert_eq!(snap.stats.retired_empty, 1);
}

#[test]
fn test_cone_crossing_death_position_is_removed_same_tick() {
    let mut engine = quiet_engine();
    let death = engine.params().death_position();
    engine.place_cone(DVec2::new(death - 0.05, 12.0), 1.0);

    // Still on the belt after moving 0.04.
    assert_eq!(engine.tick().cones.len(), 1);
    let snap = engine.tick();
    assert!(snap.cones.is_empty());
    assert_eq!(snap.stats.retired_full, 1);
}

#[test]
fn test_losing_the_target_clears_the_hose() {
    let mut engine = quiet_engine();
    let id = engine.place_cone(DVec2::new(20.0, 12.0), 0.0);

    let snap = engine.tick();
    assert_eq!(snap.hose.phase, HosePhase::Approaching);
    assert_eq!(snap.hose.target, Some(id));

    // Crank the belt so the cone is flung past the end before it is reached.
    engine.set_belt_speed(5000.0);
    let snap = engine.tick();
    assert!(snap.cones.is_empty());
    assert!(snap.hose.target.is_none());
    assert!(engine.hose().target().is_none());
    assert!(snap.events.contains(&SimEvent::TargetLost { id }));
    assert_eq!(snap.stats.retired_empty, 1);
}

// ---- Parameters ----

#[test]
fn test_queued_commands_apply_at_tick_boundary() {
    let mut engine = quiet_engine();
    engine.queue_commands([
        SimCommand::SetBeltSpeed { value: 5.0 },
        SimCommand::SetBeltWidth { value: 30.0 },
    ]);
    assert_eq!(engine.params().belt_speed, 2.0);
    assert_eq!(engine.params().belt_width, 24.0);

    let snap = engine.tick();
    assert_eq!(snap.params.belt_speed, 5.0);
    assert_eq!(snap.params.belt_width, 30.0);
    assert_eq!(snap.params.hose_range.bottom, 29.0);
    assert_eq!(snap.params.cone_drop.bottom, 28.0);
}

#[test]
fn test_direct_setters() {
    let mut engine = quiet_engine();
    engine.set_cone_variance(6.0);
    engine.set_hose_range(30.0);
    engine.set_hose_speed(12.0);
    engine.set_fill_rate(1.5);
    engine.set_urgent_time(0.5);

    let p = engine.params();
    assert_eq!(p.cone_variance(), 6.0);
    assert_eq!(p.cone_drop.right, -12.0);
    assert_eq!(p.hose_range_width(), 30.0);
    assert_eq!(p.hose_range.left, 12.0);
    assert_eq!(p.hose_speed, 12.0);
    assert_eq!(p.hose_fill_rate, 1.5);
    assert_eq!(p.urgent_time, 0.5);
}

// ---- Hose state machine ----

#[test]
fn test_idle_hose_drifts_to_rest() {
    let mut engine = quiet_engine();
    let rest = engine.params().rest_position();

    let snap = engine.tick();
    assert_eq!(snap.hose.phase, HosePhase::Idle);
    assert_eq!(snap.hose.destination, rest);
    assert!(!snap.hose.arrived);

    // 18 units at 0.4 per tick.
    for _ in 0..45 {
        engine.tick();
    }
    let snap = engine.tick();
    assert_eq!(snap.hose.position, rest);
    assert!(snap.hose.arrived);
}

#[test]
fn test_fill_cycle_idle_approaching_filling_idle() {
    let mut engine = engine_with(fixed_drop_params());

    let mut phases = vec![HosePhase::Idle];
    let mut first_target = None;
    let mut done = None;

    for _ in 0..1000 {
        let snap = engine.tick();
        if first_target.is_none() {
            first_target = acquired(&snap).map(|(id, _)| id);
        }
        if phases.last() != Some(&snap.hose.phase) {
            phases.push(snap.hose.phase);
        }
        if let Some(id) = first_target {
            if filled(&snap, id) {
                done = Some((id, snap));
                break;
            }
        }
    }

    let (id, snap) = done.expect("first target should be filled within 1000 ticks");
    assert_eq!(id, ConeId(0));
    assert_eq!(
        phases,
        vec![
            HosePhase::Idle,
            HosePhase::Approaching,
            HosePhase::Filling,
            HosePhase::Idle
        ]
    );
    let cone = snap.cones.iter().find(|c| c.id == id).unwrap();
    assert_eq!(cone.fill, 1.0);
    assert!(!cone.targeted);
    assert!(snap.hose.target.is_none());
    assert_eq!(snap.stats.cones_filled, 1);
}

#[test]
fn test_filling_rides_along_with_the_cone() {
    let mut engine = quiet_engine();
    let id = engine.place_cone(DVec2::new(30.0, 12.0), 0.0);

    // The cone starts under the hose: targeted, reached and poured at once.
    let snap = engine.tick();
    assert_eq!(snap.hose.phase, HosePhase::Filling);
    assert!(snap.events.contains(&SimEvent::FillStarted { id }));

    let snap = engine.tick();
    let cone = &snap.cones[0];
    assert_eq!(snap.hose.position, cone.position);
    assert!((cone.fill - 0.12).abs() < 1e-12);
}

#[test]
fn test_timestep_does_not_change_outcome() {
    let fill_time = |timestep: f64| {
        let mut engine = engine_with(Parameters {
            timestep,
            ..fixed_drop_params()
        });
        loop {
            let snap = engine.tick();
            if filled(&snap, ConeId(0)) {
                return snap.time.elapsed_secs;
            }
            assert!(snap.time.elapsed_secs < 30.0, "cone 0 never filled");
        }
    };
    let coarse = fill_time(0.02);
    let fine = fill_time(0.005);
    assert!((coarse - fine).abs() < 0.15, "coarse {coarse}, fine {fine}");
}

// ---- Targeting & triage ----

#[test]
fn test_unfillable_cone_is_never_targeted() {
    let mut engine = quiet_engine();
    let id = engine.place_cone(DVec2::new(47.5, 12.0), 0.0);

    for _ in 0..100 {
        let snap = engine.tick();
        assert_eq!(snap.hose.phase, HosePhase::Idle);
        assert!(acquired(&snap).is_none());
        assert_eq!(snap.cones[0].status, ConeStatus::CantFill);
        assert_eq!(snap.cones[0].id, id);
        assert_eq!(snap.cones[0].fill, 0.0);
    }
}

#[test]
fn test_triage_picks_urgent_then_resets() {
    let mut engine = quiet_engine();
    // Urgent: 6 units from the exit. Closer to the hose but relaxed: 10 units.
    let urgent = engine.place_cone(DVec2::new(42.0, 12.0), 0.0);
    let relaxed = engine.place_cone(DVec2::new(38.0, 12.0), 0.0);

    let snap = engine.tick();
    assert_eq!(acquired(&snap), Some((urgent, true)));
    assert!(snap.hose.urgent_mode);
    assert_eq!(snap.stats.urgent_selections, 1);
    let statuses: Vec<_> = snap.cones.iter().map(|c| c.status).collect();
    assert_eq!(statuses, vec![ConeStatus::Urgent, ConeStatus::Boring]);

    let mut second = None;
    for _ in 0..200 {
        let snap = engine.tick();
        if let Some(pick) = acquired(&snap) {
            second = Some((pick, snap));
            break;
        }
        // Sticky through the approach and fill.
        assert!(snap.hose.urgent_mode);
    }

    let (pick, snap) = second.expect("the relaxed cone is picked next");
    assert_eq!(pick, (relaxed, false));
    assert!(!snap.hose.urgent_mode);
    let first = snap.cones.iter().find(|c| c.id == urgent).unwrap();
    assert_eq!(first.fill, 1.0);
    assert_eq!(first.status, ConeStatus::AlreadyFull);
}

#[test]
fn test_last_report_matches_cone_views() {
    let mut engine = quiet_engine();
    engine.place_cone(DVec2::new(30.0, 5.0), 1.0);
    engine.place_cone(DVec2::new(47.9, 12.0), 0.0);
    engine.place_cone(DVec2::new(25.0, 18.0), 0.0);

    let snap = engine.tick();
    let report = engine.last_report();
    assert_eq!(report.tick, 0);
    assert_eq!(report.assessments.len(), 3);
    for cone in &snap.cones {
        assert_eq!(Some(cone.status), report.status_of(cone.id));
    }
    assert_eq!(snap.cones[0].status, ConeStatus::AlreadyFull);
    assert_eq!(snap.cones[1].status, ConeStatus::CantFill);
    assert_eq!(report.selection.map(|s| s.id), Some(ConeId(2)));
}

#[test]
fn test_new_cones_show_boring_until_assessed() {
    let mut engine = engine_with(Parameters {
        cone_rate: 50.0,
        ..Default::default()
    });
    engine.place_cone(DVec2::new(30.0, 12.0), 0.0);

    // Drops from the first tick are assessed with the placed cone.
    let snap = engine.tick();
    assert_eq!(snap.hose.target, Some(ConeId(0)));
    let assessed = snap.cones.len() as u64;
    assert!(snap.cones[1..].iter().all(|c| c.status == ConeStatus::CantFill));

    // Busy filling, so no targeting round sees the later drops.
    for _ in 0..5 {
        let snap = engine.tick();
        assert_eq!(snap.hose.phase, HosePhase::Filling);
        assert!(snap.cones.len() as u64 > assessed);
        for cone in snap.cones.iter().filter(|c| c.id.0 >= assessed) {
            assert_eq!(cone.status, ConeStatus::Boring);
        }
    }
}

// ---- Long-run invariants ----

#[test]
fn test_invariants_over_long_run() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: 3,
        ..Default::default()
    });
    let mut prev_fill = HashMap::new();
    let mut prev_urgent = false;

    for _ in 0..5000 {
        let snap = engine.tick();
        assert_tick_invariants(&snap, &mut prev_fill);

        let report = engine.last_report();
        let round_ran = report.tick + 1 == snap.time.tick;
        if round_ran {
            assert_eq!(snap.hose.urgent_mode, report.any_urgent);
        } else {
            assert_eq!(snap.hose.urgent_mode, prev_urgent, "urgent mode changed without a round");
        }
        prev_urgent = snap.hose.urgent_mode;
    }

    let stats = engine.stats();
    assert!(stats.cones_filled > 0);
    assert!(stats.retired_full > 0);
    assert_eq!(
        stats.cones_spawned,
        engine.cones().len() as u64 + stats.retired_full + stats.retired_partial + stats.retired_empty
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_invariants_hold_for_any_tuning(
        seed in any::<u64>(),
        belt_speed in 1.0f64..4.0,
        cone_rate in 0.5f64..4.0,
        hose_speed in 5.0f64..30.0,
        hose_fill_rate in 1.0f64..6.0,
        urgent_time in 0.0f64..5.0,
    ) {
        let mut engine = SimulationEngine::new(SimConfig {
            seed,
            params: Parameters {
                belt_speed,
                cone_rate,
                hose_speed,
                hose_fill_rate,
                urgent_time,
                ..Default::default()
            },
        });
        let mut prev_fill = HashMap::new();
        for _ in 0..1500 {
            let snap = engine.tick();
            assert_tick_invariants(&snap, &mut prev_fill);
        }
    }
}
