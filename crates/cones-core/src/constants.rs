//! Simulation constants and default tuning.
//!
//! The defaults describe a 24-unit belt moving at 2 units/s, a drop area
//! upstream of the hose, and a hose range downstream of it.

/// Nominal driver cadence (Hz).
pub const TICK_RATE: u32 = 50;

/// Seconds per tick at the nominal cadence.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Belt ---

/// Belt width (units).
pub const BELT_WIDTH: f64 = 24.0;

/// Belt speed (units / second), along +X.
pub const BELT_SPEED: f64 = 2.0;

// --- Cones ---

/// Average spawn rate (cones / second).
pub const CONE_RATE: f64 = 1.7;

/// Left edge of the drop area.
pub const CONE_DROP_LEFT: f64 = -36.0;

/// Width of the drop area (the "cone variance").
pub const CONE_DROP_WIDTH: f64 = 24.0;

/// Distance kept between the belt edges and the drop area.
pub const CONE_DROP_INSET: f64 = 2.0;

/// Distance past the mirrored gap at which cones leave the belt.
pub const DEATH_MARGIN: f64 = 2.0;

// --- Hose ---

/// Left edge of the hose movement range.
pub const HOSE_RANGE_LEFT: f64 = 12.0;

/// Width of the hose movement range.
pub const HOSE_RANGE_WIDTH: f64 = 36.0;

/// Distance kept between the belt edges and the hose range.
pub const HOSE_RANGE_INSET: f64 = 1.0;

/// Fill rate (full fills / second).
pub const HOSE_FILL_RATE: f64 = 3.0;

/// Hose head speed (units / second).
pub const HOSE_SPEED: f64 = 20.0;

/// Slack below which a fillable cone is urgent (seconds).
pub const URGENT_TIME: f64 = 3.0;

/// A cone at or above this fill is full.
pub const FULL: f64 = 1.0;
