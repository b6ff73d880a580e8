//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A cone on the belt.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Cone {
    /// Amount filled, 0.0 (empty) to 1.0 (full).
    pub fill: f64,
}

/// Position on the belt plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BeltPosition(pub DVec2);

// ConeId (types.rs) is attached to every cone as its spawn-order key.
