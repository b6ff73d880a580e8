//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle on the belt plane.
///
/// The belt runs along +X. Y grows from `top` toward `bottom`, so a rectangle
/// built with [`Rect::new`] spans `top..=top + height`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Stable identity of a cone, assigned in spawn order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConeId(pub u64);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Rect {
    /// Rectangle from its top-left corner and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Whether `p` lies inside the rectangle, edges included.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Copy with each edge moved by the given delta.
    pub fn adjusted(&self, dl: f64, dt: f64, dr: f64, db: f64) -> Self {
        Self {
            left: self.left + dl,
            top: self.top + dt,
            right: self.right + dr,
            bottom: self.bottom + db,
        }
    }

    /// Copy with a new width, anchored on the right edge.
    pub fn with_width_from_right(&self, width: f64) -> Self {
        Self {
            left: self.right - width,
            ..*self
        }
    }

    /// Copy with a new width, anchored on the left edge.
    pub fn with_width_from_left(&self, width: f64) -> Self {
        Self {
            right: self.left + width,
            ..*self
        }
    }
}

impl ConeId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for ConeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cone#{}", self.0)
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
