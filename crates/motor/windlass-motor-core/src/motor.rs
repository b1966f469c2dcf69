//! One playback instance: timing, iteration state, weight, activity and
//! termination flags. The pool owns the slots; everything here is the
//! per-motor math composing the clock model with the easing ramps.

use serde::{Deserialize, Serialize};

use crate::clock::advance_local_clock;
use crate::config::MotorConfig;
use crate::ease::{combined_multiplier, HermiteRamp};

/// Sentinel for "no termination scheduled".
pub(crate) const KILL_UNSCHEDULED: f32 = f32::INFINITY;

#[derive(Clone, Debug)]
pub struct Motor {
    pub(crate) curr_clock: f32,
    pub(crate) kill_clock: f32,
    pub(crate) ease_in: HermiteRamp,
    pub(crate) ease_out: HermiteRamp,
    pub(crate) ease_in_enabled: bool,
    pub(crate) ease_out_enabled: bool,
    pub(crate) speed: f32,
    pub(crate) iter_cnt: u32,
    pub(crate) curr_iter_idx: u32,
    pub(crate) curr_weight: f32,
    pub(crate) effective_weight: f32,
    pub(crate) active: bool,
    /// Latched the first time a clock update runs while active; the
    /// once-unused sweep uses it to tell "never started" from "finished".
    pub(crate) ever_active: bool,
    pub(crate) terminated: bool,
    pub(crate) underflow: bool,
    pub(crate) overflow: bool,
    pub(crate) local_clock_raw: f32,
    pub(crate) local_clock_clamped: f32,
    pub(crate) local_dur: f32,
    pub(crate) clamp_iterations: bool,
    pub(crate) check_termination: bool,
}

/// Read-only snapshot of a motor's playback state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotorState {
    pub active: bool,
    pub speed: f32,
    pub iter_cnt: u32,
    pub curr_iter_idx: u32,
    pub curr_weight: f32,
    pub effective_weight: f32,
    pub underflow: bool,
    pub overflow: bool,
    pub local_clock_raw: f32,
    pub local_clock_clamped: f32,
    /// How long this motor plays for in total, in global seconds
    /// (infinite while looping forever or paused).
    pub dur: f32,
    /// How long it will continue to play for, accounting for elapsed time
    /// and any scheduled termination.
    pub dur_left: f32,
    pub local_dur: f32,
}

/// Snapshot of the global-time clocks.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MotorTiming {
    pub curr_clock: f32,
    pub kill_clock: f32,
    pub ease_in_start_clock: f32,
    pub ease_in_end_clock: f32,
    pub ease_out_start_clock: f32,
    pub ease_out_end_clock: f32,
}

impl Motor {
    pub(crate) fn new(cfg: &MotorConfig) -> Self {
        Self {
            curr_clock: cfg.curr_clock,
            kill_clock: KILL_UNSCHEDULED,
            ease_in: HermiteRamp::over(cfg.curr_clock, 0.0, 1.0, 1.0),
            ease_out: HermiteRamp::over(cfg.curr_clock, 0.0, 1.0, 1.0),
            ease_in_enabled: false,
            ease_out_enabled: false,
            speed: 1.0,
            iter_cnt: cfg.iter_cnt,
            curr_iter_idx: 0,
            curr_weight: 1.0,
            effective_weight: 1.0,
            active: true,
            ever_active: false,
            terminated: false,
            underflow: false,
            overflow: false,
            local_clock_raw: 0.0,
            local_clock_clamped: 0.0,
            local_dur: cfg.local_dur.max(0.0),
            clamp_iterations: false,
            check_termination: true,
        }
    }

    /// Advance to a new absolute global time.
    ///
    /// Suspended motors resync `curr_clock` without integrating the span, so
    /// reactivation does not replay the suspended interval. The ease
    /// multiplier tracks global time either way, and a scheduled kill clock
    /// fires on crossing regardless of activity.
    pub(crate) fn update_clock(&mut self, new_time: f32) {
        let delta = new_time - self.curr_clock;
        self.curr_clock = new_time;
        if self.active {
            let adv = advance_local_clock(
                self.speed,
                self.local_clock_raw,
                delta,
                self.local_dur,
                self.iter_cnt,
                self.curr_iter_idx,
                self.clamp_iterations,
            );
            self.local_clock_raw = adv.raw;
            self.local_clock_clamped = adv.clamped;
            self.curr_iter_idx = adv.iter_idx;
            self.underflow = adv.underflow;
            self.overflow = adv.overflow;
            self.ever_active = true;
            if self.check_termination && self.playback_exhausted() {
                self.terminated = true;
            }
        }
        self.refresh_effective_weight();
        if new_time >= self.kill_clock {
            self.terminated = true;
        }
    }

    /// The clock is pinned at the boundary in the direction of travel with
    /// no looping headroom left.
    fn playback_exhausted(&self) -> bool {
        if self.speed >= 0.0 {
            let no_headroom =
                self.clamp_iterations || (self.iter_cnt != 0 && self.curr_iter_idx + 1 >= self.iter_cnt);
            no_headroom && self.local_clock_raw >= self.local_dur
        } else {
            let no_headroom = self.clamp_iterations || (self.iter_cnt != 0 && self.curr_iter_idx == 0);
            no_headroom && self.local_clock_raw <= 0.0
        }
    }

    #[inline]
    pub(crate) fn refresh_effective_weight(&mut self) {
        self.effective_weight = self.curr_weight * self.ease_multiplier();
    }

    /// Combined ease-in × ease-out multiplier at the current global time.
    pub(crate) fn ease_multiplier(&self) -> f32 {
        combined_multiplier(
            self.ease_in_enabled.then_some(&self.ease_in),
            self.ease_out_enabled.then_some(&self.ease_out),
            self.curr_clock,
        )
    }

    /// Anchor the motor so its local clock reads `local_clock` at
    /// `target_global`, back-extrapolated through the current speed.
    pub(crate) fn set_target_state(
        &mut self,
        curr_global: f32,
        target_global: f32,
        local_clock: f32,
        iter_idx: u32,
    ) {
        self.curr_clock = curr_global;
        self.local_clock_raw = local_clock - self.speed * (target_global - curr_global);
        self.local_clock_clamped = self.local_clock_raw.clamp(0.0, self.local_dur);
        self.curr_iter_idx = iter_idx;
        self.underflow = false;
        self.overflow = false;
        self.refresh_effective_weight();
    }

    /// Shift every global-time field by a common origin; local clocks keep
    /// their phase.
    pub(crate) fn rebase(&mut self, origin: f32) {
        self.curr_clock -= origin;
        if self.kill_clock != KILL_UNSCHEDULED {
            self.kill_clock -= origin;
        }
        self.ease_in.start_seconds -= origin;
        self.ease_in.end_seconds -= origin;
        self.ease_out.start_seconds -= origin;
        self.ease_out.end_seconds -= origin;
    }

    pub(crate) fn state(&self) -> MotorState {
        let (dur, iter_dur_left) = if self.iter_cnt == 0 || self.speed == 0.0 {
            (f32::INFINITY, f32::INFINITY)
        } else {
            let remaining_local = if self.speed >= 0.0 {
                (self.iter_cnt - 1 - self.curr_iter_idx.min(self.iter_cnt - 1)) as f32
                    * self.local_dur
                    + (self.local_dur - self.local_clock_clamped)
            } else {
                self.curr_iter_idx as f32 * self.local_dur + self.local_clock_clamped
            };
            let inv_speed = self.speed.abs().recip();
            (
                self.iter_cnt as f32 * self.local_dur * inv_speed,
                remaining_local * inv_speed,
            )
        };
        let dur_left = if self.kill_clock == KILL_UNSCHEDULED {
            iter_dur_left
        } else {
            iter_dur_left.min((self.kill_clock - self.curr_clock).max(0.0))
        };
        MotorState {
            active: self.active,
            speed: self.speed,
            iter_cnt: self.iter_cnt,
            curr_iter_idx: self.curr_iter_idx,
            curr_weight: self.curr_weight,
            effective_weight: self.effective_weight,
            underflow: self.underflow,
            overflow: self.overflow,
            local_clock_raw: self.local_clock_raw,
            local_clock_clamped: self.local_clock_clamped,
            dur,
            dur_left,
            local_dur: self.local_dur,
        }
    }

    pub(crate) fn timing(&self) -> MotorTiming {
        MotorTiming {
            curr_clock: self.curr_clock,
            kill_clock: self.kill_clock,
            ease_in_start_clock: self.ease_in.start_seconds,
            ease_in_end_clock: self.ease_in.end_seconds,
            ease_out_start_clock: self.ease_out.start_seconds,
            ease_out_end_clock: self.ease_out.end_seconds,
        }
    }

    #[inline]
    pub(crate) fn has_effect(&self) -> bool {
        self.active && self.effective_weight > 0.0
    }

    #[inline]
    pub(crate) fn is_unused(&self) -> bool {
        !self.active || self.terminated
    }
}
