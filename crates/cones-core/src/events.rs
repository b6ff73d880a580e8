//! Events emitted by the simulation during a tick.

use serde::{Deserialize, Serialize};

use crate::types::ConeId;

/// Things that happened during the last tick, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A cone was dropped onto the belt.
    ConeSpawned { id: ConeId },
    /// The hose picked a target.
    TargetAcquired { id: ConeId, urgent: bool },
    /// The hose reached its target and began filling.
    FillStarted { id: ConeId },
    /// The target was topped off.
    ConeFilled { id: ConeId },
    /// The target left the belt before it was full.
    TargetLost { id: ConeId },
    /// A cone fell off the end of the belt.
    ConeRetired { id: ConeId, fill: f64 },
}
