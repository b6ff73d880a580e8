//! Hose head data model: position, targeting mode, and triage flag.
//!
//! Stored directly in `SimulationEngine`, NOT as an ECS entity. The target is
//! a non-owning `hecs::Entity` handle into the cone world.

use glam::DVec2;

use cones_core::enums::HosePhase;
use cones_core::state::HoseView;
use cones_core::types::ConeId;

/// What the hose is doing. The target handle only exists in the modes that
/// need one, so "no target" is never a stale handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoseMode {
    /// No target. Drifting toward `destination` (the rest position).
    Idle { destination: DVec2, arrived: bool },
    /// Moving toward the precomputed intercept point of `target`.
    Approaching {
        target: hecs::Entity,
        id: ConeId,
        destination: DVec2,
    },
    /// Riding along with `target` and filling it.
    Filling { target: hecs::Entity, id: ConeId },
}

/// Whether the last targeting round ran urgent triage.
///
/// Only rewritten by a targeting round, so it sticks through the approach
/// and fill that follow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Triage {
    #[default]
    Normal,
    Urgent,
}

/// The single hose head.
#[derive(Debug, Clone)]
pub struct Hose {
    pub position: DVec2,
    pub mode: HoseMode,
    pub triage: Triage,
}

impl Hose {
    /// An idle hose at `position`, resting in place.
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            mode: HoseMode::Idle {
                destination: position,
                arrived: false,
            },
            triage: Triage::Normal,
        }
    }

    pub fn phase(&self) -> HosePhase {
        match self.mode {
            HoseMode::Idle { .. } => HosePhase::Idle,
            HoseMode::Approaching { .. } => HosePhase::Approaching,
            HoseMode::Filling { .. } => HosePhase::Filling,
        }
    }

    /// The targeted cone entity, if any.
    pub fn target(&self) -> Option<hecs::Entity> {
        match self.mode {
            HoseMode::Idle { .. } => None,
            HoseMode::Approaching { target, .. } | HoseMode::Filling { target, .. } => Some(target),
        }
    }

    pub fn target_id(&self) -> Option<ConeId> {
        match self.mode {
            HoseMode::Idle { .. } => None,
            HoseMode::Approaching { id, .. } | HoseMode::Filling { id, .. } => Some(id),
        }
    }

    /// Idle with no target: the next hose step runs a targeting round.
    pub fn is_scanning(&self) -> bool {
        matches!(self.mode, HoseMode::Idle { .. })
    }

    pub fn urgent_mode(&self) -> bool {
        self.triage == Triage::Urgent
    }

    /// Drop back to Idle if `entity` is the current target.
    ///
    /// Must be called by every path that despawns a cone, before the handle
    /// can be looked up again. Returns whether the target was released.
    pub fn release_target(&mut self, entity: hecs::Entity) -> bool {
        if self.target() != Some(entity) {
            return false;
        }
        self.mode = HoseMode::Idle {
            destination: self.position,
            arrived: false,
        };
        true
    }

    /// Read-only view for the snapshot.
    pub fn view(&self) -> HoseView {
        let (destination, arrived) = match self.mode {
            HoseMode::Idle { destination, arrived } => (destination, arrived),
            HoseMode::Approaching { destination, .. } => (destination, false),
            HoseMode::Filling { .. } => (self.position, true),
        };
        HoseView {
            position: self.position,
            phase: self.phase(),
            target: self.target_id(),
            destination,
            arrived,
            urgent_mode: self.urgent_mode(),
        }
    }
}
