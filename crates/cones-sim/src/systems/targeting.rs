//! Targeting system: decides which cone the hose should fill next.
//!
//! `assess` is a pure function of the cone list, the hose position and the
//! parameters. It produces a [`TargetingReport`]: one assessment per cone plus
//! the chosen target. Applying the choice to the hose is the hose system's job.
//!
//! Selection rules:
//! - Feasible cones are those that can be reached inside the hose range and
//!   topped off before they leave it.
//! - Normally the feasible cone with the smallest total (move + fill) time
//!   wins.
//! - If any feasible cone has less slack than `urgent_time`, triage overrides
//!   that: the urgent cone with the smallest total time wins instead.
//! - Ties go to the earliest-spawned cone.

use glam::DVec2;
use hecs::World;

use cones_core::components::{BeltPosition, Cone};
use cones_core::constants::FULL;
use cones_core::enums::ConeStatus;
use cones_core::params::Parameters;
use cones_core::types::ConeId;

use crate::guidance;

/// One cone as seen by the targeting round.
#[derive(Debug, Clone, Copy)]
pub struct ConeSample {
    pub entity: hecs::Entity,
    pub id: ConeId,
    pub position: DVec2,
    pub fill: f64,
}

/// Timing for a cone that can be reached and filled in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillPlan {
    /// Where the hose meets the cone.
    pub fillpoint: DVec2,
    /// Seconds to reach the fill point.
    pub movetime: f64,
    /// Seconds to top the cone off once there.
    pub filltime: f64,
    /// `movetime + filltime`.
    pub totaltime: f64,
    /// Seconds before the cone leaves the hose range.
    pub timelimit: f64,
}

impl FillPlan {
    /// Time to spare if this cone is chosen now.
    pub fn slack(&self) -> f64 {
        self.timelimit - self.totaltime
    }
}

/// Verdict for one cone.
#[derive(Debug, Clone, Copy)]
pub struct ConeAssessment {
    pub entity: hecs::Entity,
    pub id: ConeId,
    pub status: ConeStatus,
    /// Present exactly when the cone is a feasible candidate.
    pub plan: Option<FillPlan>,
}

/// The cone the hose should go after.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub entity: hecs::Entity,
    pub id: ConeId,
    pub destination: DVec2,
    /// Chosen by urgent triage rather than as the fastest candidate.
    pub urgent: bool,
}

/// Output of one targeting round.
#[derive(Debug, Clone, Default)]
pub struct TargetingReport {
    /// Tick the round ran on.
    pub tick: u64,
    /// One entry per cone, in spawn order.
    pub assessments: Vec<ConeAssessment>,
    pub selection: Option<Selection>,
    /// Whether any cone was urgent this round.
    pub any_urgent: bool,
}

impl TargetingReport {
    /// Status the round gave a cone, if the cone was assessed.
    pub fn status_of(&self, id: ConeId) -> Option<ConeStatus> {
        self.assessments
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|i| self.assessments[i].status)
    }

    pub fn urgent(&self) -> impl Iterator<Item = &ConeAssessment> {
        self.assessments
            .iter()
            .filter(|a| a.status == ConeStatus::Urgent)
    }

    pub fn candidates(&self) -> impl Iterator<Item = &ConeAssessment> {
        self.assessments.iter().filter(|a| a.plan.is_some())
    }
}

/// Collect every cone in spawn order.
pub fn gather(world: &World) -> Vec<ConeSample> {
    let mut samples: Vec<ConeSample> = world
        .query::<(&ConeId, &BeltPosition, &Cone)>()
        .iter()
        .map(|(entity, (id, pos, cone))| ConeSample {
            entity,
            id: *id,
            position: pos.0,
            fill: cone.fill,
        })
        .collect();
    samples.sort_by_key(|s| s.id);
    samples
}

/// Run one targeting round over `cones` (expected in spawn order).
///
/// `params.belt_speed` and `params.hose_fill_rate` must be positive.
pub fn assess(cones: &[ConeSample], hose_pos: DVec2, params: &Parameters) -> TargetingReport {
    let assessments: Vec<ConeAssessment> = cones
        .iter()
        .map(|cone| evaluate(cone, hose_pos, params))
        .collect();

    let fastest = pick_fastest(assessments.iter().filter(|a| a.plan.is_some()));
    let most_urgent = pick_fastest(
        assessments
            .iter()
            .filter(|a| a.status == ConeStatus::Urgent),
    );
    let any_urgent = most_urgent.is_some();

    let selection = most_urgent.or(fastest).and_then(|chosen| {
        chosen.plan.map(|plan| Selection {
            entity: chosen.entity,
            id: chosen.id,
            destination: plan.fillpoint,
            urgent: any_urgent,
        })
    });

    TargetingReport {
        tick: 0,
        assessments,
        selection,
        any_urgent,
    }
}

/// Classify one cone and, if it is feasible, plan its fill.
fn evaluate(cone: &ConeSample, hose_pos: DVec2, params: &Parameters) -> ConeAssessment {
    let verdict = |status, plan| ConeAssessment {
        entity: cone.entity,
        id: cone.id,
        status,
        plan,
    };

    if cone.fill >= FULL {
        return verdict(ConeStatus::AlreadyFull, None);
    }

    let timelimit = (params.hose_range.right - cone.position.x) / params.belt_speed;
    let filltime = (FULL - cone.fill) / params.hose_fill_rate;
    if filltime > timelimit {
        return verdict(ConeStatus::CantFill, None);
    }

    let intercept = match guidance::solve_intercept(
        cone.position,
        params.belt_velocity(),
        hose_pos,
        params.hose_speed,
    ) {
        Some(hit) if params.hose_range.contains(hit.point) => hit,
        _ => return verdict(ConeStatus::CantFill, None),
    };

    let totaltime = filltime + intercept.time;
    if totaltime > timelimit {
        return verdict(ConeStatus::CantFill, None);
    }

    let plan = FillPlan {
        fillpoint: intercept.point,
        movetime: intercept.time,
        filltime,
        totaltime,
        timelimit,
    };
    let status = if plan.slack() < params.urgent_time {
        ConeStatus::Urgent
    } else {
        ConeStatus::Boring
    };
    verdict(status, Some(plan))
}

/// Smallest `totaltime`; the first one seen wins a tie.
fn pick_fastest<'a>(
    candidates: impl Iterator<Item = &'a ConeAssessment>,
) -> Option<&'a ConeAssessment> {
    let mut best: Option<(&ConeAssessment, f64)> = None;
    for candidate in candidates {
        let Some(plan) = candidate.plan else { continue };
        match best {
            Some((_, best_time)) if plan.totaltime >= best_time => {}
            _ => best = Some((candidate, plan.totaltime)),
        }
    }
    best.map(|(a, _)| a)
}
