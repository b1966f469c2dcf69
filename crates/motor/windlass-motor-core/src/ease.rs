//! Two-sided Hermite easing ramps.
//!
//! A motor carries one ease-in and one ease-out ramp, each a cubic Hermite
//! segment over a global-time window. Outside the window the ramp holds its
//! endpoint value; a degenerate window is an instantaneous step. The two
//! sides combine multiplicatively into the motor's weight multiplier.

use serde::{Deserialize, Serialize};

use crate::error::MotorError;

/// One Hermite segment over `[start_seconds, end_seconds]` in global time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HermiteRamp {
    pub start_seconds: f32,
    pub end_seconds: f32,
    pub start_value: f32,
    pub start_tangent: f32,
    pub end_tangent: f32,
    pub end_value: f32,
}

impl HermiteRamp {
    /// A ramp from `from` to `to` over `[start, start + duration]` with flat
    /// tangents, the shape the ease-in/ease-out conveniences install.
    pub fn over(start: f32, duration: f32, from: f32, to: f32) -> Self {
        Self {
            start_seconds: start,
            end_seconds: start + duration.max(0.0),
            start_value: from,
            start_tangent: 0.0,
            end_tangent: 0.0,
            end_value: to,
        }
    }

    /// Windows must be monotonic; equal endpoints are allowed and step.
    pub fn validate(&self) -> Result<(), MotorError> {
        if self.start_seconds > self.end_seconds {
            return Err(MotorError::InvalidConfiguration(format!(
                "ease window starts at {} after it ends at {}",
                self.start_seconds, self.end_seconds
            )));
        }
        Ok(())
    }

    /// Evaluate at global time `t`. Holds `start_value` before the window,
    /// `end_value` after it (and everywhere for a degenerate window).
    pub fn evaluate(&self, t: f32) -> f32 {
        if t < self.start_seconds {
            return self.start_value;
        }
        let span = self.end_seconds - self.start_seconds;
        if t > self.end_seconds || span <= 0.0 {
            return self.end_value;
        }
        let u = (t - self.start_seconds) / span;
        let u2 = u * u;
        let u3 = u2 * u;
        // Tangents are authored per second; scale into normalized u space.
        let m0 = self.start_tangent * span;
        let m1 = self.end_tangent * span;
        (2.0 * u3 - 3.0 * u2 + 1.0) * self.start_value
            + (u3 - 2.0 * u2 + u) * m0
            + (-2.0 * u3 + 3.0 * u2) * self.end_value
            + (u3 - u2) * m1
    }
}

/// Combine the enabled sides into one multiplier, clamped so the effective
/// weight stays within the authored weight's range.
pub(crate) fn combined_multiplier(
    ease_in: Option<&HermiteRamp>,
    ease_out: Option<&HermiteRamp>,
    t: f32,
) -> f32 {
    let a = ease_in.map_or(1.0, |r| r.evaluate(t));
    let b = ease_out.map_or(1.0, |r| r.evaluate(t));
    (a * b).clamp(0.0, 1.0)
}
