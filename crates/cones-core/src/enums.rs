//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// What the latest targeting round concluded about a cone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConeStatus {
    /// Not assessed, or fillable with time to spare.
    #[default]
    Boring,
    /// Already topped off.
    AlreadyFull,
    /// Cannot be reached and filled before it leaves the hose range.
    CantFill,
    /// Fillable, but with less slack than the urgent threshold.
    Urgent,
}

/// Hose head phase, as seen by readers of the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HosePhase {
    /// No target. Scanning, or drifting to the rest position.
    #[default]
    Idle,
    /// Moving toward the intercept point of the target.
    Approaching,
    /// Riding along with the target and filling it.
    Filling,
}
