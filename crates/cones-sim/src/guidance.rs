//! Guidance math for the hose head.
//!
//! Provides the closed-form pursuit intercept (straight-line pursuer at fixed
//! speed against a constant-velocity target) and bounded straight-line motion.

use glam::DVec2;

/// Where and when a pursuer can meet a moving target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    /// Target position at the moment of intercept.
    pub point: DVec2,
    /// Seconds until intercept.
    pub time: f64,
}

/// Earliest non-negative intercept of a constant-velocity target.
///
/// Solves `|target_pos + target_vel * t - pursuer_pos| = speed * t` for the
/// smallest `t >= 0`. Returns `None` when the pursuer can never catch up.
pub fn solve_intercept(
    target_pos: DVec2,
    target_vel: DVec2,
    pursuer_pos: DVec2,
    speed: f64,
) -> Option<Intercept> {
    let to_target = target_pos - pursuer_pos;

    let a = target_vel.length_squared() - speed * speed;
    let b = 2.0 * target_vel.dot(to_target);
    let c = to_target.length_squared();

    let time = if a.abs() < f64::EPSILON {
        // Equal speeds: the quadratic collapses to b*t + c = 0.
        if b != 0.0 {
            -c / b
        } else if c == 0.0 {
            0.0
        } else {
            return None;
        }
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t1 = (-b + sqrt_disc) / (2.0 * a);
        let t2 = (-b - sqrt_disc) / (2.0 * a);
        match (t1 >= 0.0, t2 >= 0.0) {
            (true, true) => t1.min(t2),
            (true, false) => t1,
            (false, true) => t2,
            (false, false) => return None,
        }
    };

    if !(time >= 0.0 && time.is_finite()) {
        return None;
    }

    Some(Intercept {
        point: target_pos + target_vel * time,
        time,
    })
}

/// Move from `from` toward `to` by at most `max_step`.
///
/// Returns the new position and whether `to` was reached. Reaching snaps
/// exactly onto `to`, so there is never any overshoot.
pub fn step_toward(from: DVec2, to: DVec2, max_step: f64) -> (DVec2, bool) {
    let delta = to - from;
    let dist = delta.length();
    if max_step >= dist {
        (to, true)
    } else {
        (from + delta / dist * max_step, false)
    }
}
