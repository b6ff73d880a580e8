//! Simulation parameters.
//!
//! Distance units are arbitrary; rates are per second and are scaled by
//! `timestep` each tick. The belt moves along +X.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::commands::SimCommand;
use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};
use crate::types::Rect;

/// The full tunable parameter bundle.
///
/// Not validated by the engine. Callers that take parameters from outside
/// should run [`Parameters::validate`] first: a zero `cone_rate`,
/// `belt_speed` or `hose_fill_rate` is a division by zero in the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Seconds advanced per tick.
    pub timestep: f64,
    /// Width of the belt.
    pub belt_width: f64,
    /// Speed of the belt (units / second).
    pub belt_speed: f64,
    /// Average spawn rate (cones / second).
    pub cone_rate: f64,
    /// Cone spawn area.
    pub cone_drop: Rect,
    /// Hose head movement range.
    pub hose_range: Rect,
    /// Cone fill rate (full fills / second).
    pub hose_fill_rate: f64,
    /// Hose head movement speed (units / second).
    pub hose_speed: f64,
    /// Slack margin under which a cone is urgent (seconds).
    pub urgent_time: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            timestep: DT,
            belt_width: BELT_WIDTH,
            belt_speed: BELT_SPEED,
            cone_rate: CONE_RATE,
            cone_drop: Rect::new(CONE_DROP_LEFT, 0.0, CONE_DROP_WIDTH, BELT_WIDTH).adjusted(
                0.0,
                CONE_DROP_INSET,
                0.0,
                -CONE_DROP_INSET,
            ),
            hose_range: Rect::new(HOSE_RANGE_LEFT, 0.0, HOSE_RANGE_WIDTH, BELT_WIDTH).adjusted(
                0.0,
                HOSE_RANGE_INSET,
                0.0,
                -HOSE_RANGE_INSET,
            ),
            hose_fill_rate: HOSE_FILL_RATE,
            hose_speed: HOSE_SPEED,
            urgent_time: URGENT_TIME,
        }
    }
}

impl Parameters {
    /// Parse a JSON parameter bundle. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON parameter bundle from disk.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check the preconditions the engine relies on but does not enforce.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("timestep", self.timestep)?;
        positive("belt_width", self.belt_width)?;
        positive("belt_speed", self.belt_speed)?;
        positive("cone_rate", self.cone_rate)?;
        positive("hose_fill_rate", self.hose_fill_rate)?;
        non_negative("hose_speed", self.hose_speed)?;
        non_negative("urgent_time", self.urgent_time)?;
        well_formed("cone_drop", &self.cone_drop)?;
        well_formed("hose_range", &self.hose_range)?;
        Ok(())
    }

    /// Width of the drop area, adjusted through its left edge.
    pub fn cone_variance(&self) -> f64 {
        self.cone_drop.width()
    }

    /// Width of the hose range, adjusted through its right edge.
    pub fn hose_range_width(&self) -> f64 {
        self.hose_range.width()
    }

    /// X coordinate past which cones are removed from the belt.
    ///
    /// Mirrors the gap between the drop area and the hose range past the
    /// far edge of the hose range, plus a small margin.
    pub fn death_position(&self) -> f64 {
        self.hose_range.right + (self.hose_range.left - self.cone_drop.right) + DEATH_MARGIN
    }

    /// Where an idle hose parks: left edge of its range, vertically centered.
    pub fn rest_position(&self) -> DVec2 {
        DVec2::new(self.hose_range.left, self.hose_range.center().y)
    }

    /// Velocity of everything riding on the belt.
    pub fn belt_velocity(&self) -> DVec2 {
        DVec2::new(self.belt_speed, 0.0)
    }

    /// Apply a setter command to the parameter fields.
    ///
    /// Spawn rescheduling for [`SimCommand::SetConeRate`] is the engine's job;
    /// here it only stores the new rate.
    pub fn apply(&mut self, command: &SimCommand) {
        match *command {
            SimCommand::SetBeltSpeed { value } => self.belt_speed = value,
            SimCommand::SetBeltWidth { value } => {
                let delta = value - self.belt_width;
                self.hose_range = self.hose_range.adjusted(0.0, 0.0, 0.0, delta);
                self.cone_drop = self.cone_drop.adjusted(0.0, 0.0, 0.0, delta);
                self.belt_width = value;
            }
            SimCommand::SetConeRate { value } => self.cone_rate = value,
            SimCommand::SetConeVariance { value } => {
                self.cone_drop = self.cone_drop.with_width_from_right(value);
            }
            SimCommand::SetHoseRange { value } => {
                self.hose_range = self.hose_range.with_width_from_left(value);
            }
            SimCommand::SetHoseSpeed { value } => self.hose_speed = value,
            SimCommand::SetFillRate { value } => self.hose_fill_rate = value,
            SimCommand::SetUrgentTime { value } => self.urgent_time = value,
        }
    }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be a positive finite number",
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be a non-negative finite number",
        })
    }
}

fn well_formed(field: &'static str, rect: &Rect) -> ConfigResult<()> {
    let edges = [rect.left, rect.top, rect.right, rect.bottom];
    if edges.iter().any(|e| !e.is_finite()) {
        return Err(ConfigError::Invalid {
            field,
            reason: "edges must be finite",
        });
    }
    if rect.width() < 0.0 || rect.height() < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: "rectangle is inverted",
        });
    }
    Ok(())
}
