//! Acquisition-time motor configuration.

use serde::{Deserialize, Serialize};

/// Initial timing parameters for a freshly acquired motor.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MotorConfig {
    /// Global time the motor considers "now" at acquisition.
    pub curr_clock: f32,
    /// Duration of one iteration, in seconds of local time.
    pub local_dur: f32,
    /// Total allowed loops; 0 means infinite.
    pub iter_cnt: u32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            curr_clock: 0.0,
            local_dur: 1.0,
            iter_cnt: 1,
        }
    }
}
