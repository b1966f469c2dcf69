//! Bulk motor lifecycle: a capacity-bounded arena of generation-tagged
//! slots plus the batched mutation surface. Every mutator takes a slice of
//! handles and applies identically to all, so a whole scene's motors update
//! in one call.
//!
//! Acquire/release mutate the free list and therefore require `&mut self`
//! (single-writer discipline); the query surface is `&self` and safe to
//! share with sampling.

use log::debug;

use crate::config::MotorConfig;
use crate::ease::HermiteRamp;
use crate::error::MotorError;
use crate::handle::MotorHandle;
use crate::motor::{Motor, MotorState, MotorTiming, KILL_UNSCHEDULED};

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    motor: Option<Motor>,
}

#[derive(Debug)]
pub struct MotorPool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    capacity: usize,
}

impl MotorPool {
    /// A pool that will never hold more than `capacity` live motors.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.capacity - self.live
    }

    /// Acquire `cnt` motors initialized from `cfg`. All-or-nothing: fails
    /// with `ResourceExhausted` without acquiring anything if the pool
    /// cannot satisfy the whole request.
    pub fn acquire(&mut self, cfg: &MotorConfig, cnt: usize) -> Result<Vec<MotorHandle>, MotorError> {
        let available = self.available();
        if cnt > available {
            return Err(MotorError::ResourceExhausted {
                requested: cnt,
                available,
            });
        }
        let mut handles = Vec::with_capacity(cnt);
        for _ in 0..cnt {
            let index = match self.free.pop() {
                Some(index) => index,
                None => {
                    self.slots.push(Slot::default());
                    (self.slots.len() - 1) as u32
                }
            };
            let slot = &mut self.slots[index as usize];
            slot.motor = Some(Motor::new(cfg));
            handles.push(MotorHandle {
                index,
                generation: slot.generation,
            });
        }
        self.live += cnt;
        debug!("acquired {} motor(s), {} live", cnt, self.live);
        Ok(handles)
    }

    fn release_slot(&mut self, handle: MotorHandle) -> bool {
        match self.slots.get_mut(handle.index as usize) {
            Some(slot) if slot.generation == handle.generation && slot.motor.is_some() => {
                slot.motor = None;
                // Bump the generation so retained handles stop resolving.
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(handle.index);
                self.live -= 1;
                true
            }
            _ => false,
        }
    }

    #[inline]
    fn motor(&self, handle: MotorHandle) -> Option<&Motor> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.motor.as_ref())
    }

    #[inline]
    fn motor_mut(&mut self, handle: MotorHandle) -> Option<&mut Motor> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.motor.as_mut())
    }

    /// Run `f` on every motor a handle resolves to. Stale handles are a
    /// caller contract violation: asserted in debug, skipped in release.
    fn for_each_mut(&mut self, handles: &[MotorHandle], mut f: impl FnMut(&mut Motor)) {
        for &handle in handles {
            match self.motor_mut(handle) {
                Some(motor) => f(motor),
                None => debug_assert!(false, "stale motor handle in batch op"),
            }
        }
    }

    // -- batched mutators ---------------------------------------------------

    /// Update each motor's clock to a new absolute global time, advancing
    /// local clocks, ease multipliers, and termination state.
    pub fn update_clock(&mut self, time: f32, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| m.update_clock(time));
    }

    /// Set the stored global clock without advancing anything.
    pub fn set_clock_only(&mut self, time: f32, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| m.curr_clock = time);
    }

    /// Reset the raw local clock to the time passed in.
    pub fn reset_local_clock(&mut self, local_clock: f32, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| {
            m.local_clock_raw = local_clock;
            m.local_clock_clamped = local_clock.clamp(0.0, m.local_dur);
            m.underflow = false;
            m.overflow = false;
        });
    }

    /// Rebase internal clocks against a new origin. Long-running f32 clocks
    /// lose precision after about a day and a half of operation; subtracting
    /// a common origin from every global-time field preserves relative phase
    /// while recentering the representable range.
    pub fn rebase_clocks(&mut self, origin: f32, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| m.rebase(origin));
    }

    /// Speed multiplier: 0 pauses, negative plays backwards, 2.0 doubles.
    pub fn set_speed(&mut self, speed: f32, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| m.speed = speed);
    }

    /// Authored blend weight; the effective weight refreshes on the next
    /// clock update.
    pub fn set_weight(&mut self, weight: f32, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| m.curr_weight = weight);
    }

    /// Suspend or resume. Suspended motors hold their local clock and stop
    /// contributing to blends.
    pub fn activate(&mut self, active: bool, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| m.active = active);
    }

    /// Reset the total of iterations allowed. 0 means infinite. Opens a new
    /// playback budget: the iteration index, the never-started latch and any
    /// completion-triggered termination are cleared.
    pub fn reset_iterations(&mut self, iter_cnt: u32, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| {
            m.iter_cnt = iter_cnt;
            m.curr_iter_idx = 0;
            m.ever_active = false;
            m.terminated = false;
        });
    }

    /// Select the current iteration index (clamped into a finite budget).
    pub fn select_iteration(&mut self, curr_iter_idx: u32, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| {
            m.curr_iter_idx = if m.iter_cnt == 0 {
                curr_iter_idx
            } else {
                curr_iter_idx.min(m.iter_cnt - 1)
            };
        });
    }

    /// When on, the clock clamps at the current iteration's boundary instead
    /// of looping.
    pub fn enable_iteration_clamping(&mut self, clamp: bool, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| m.clamp_iterations = clamp);
    }

    /// When on, exhausting the playback budget flips the terminated flag.
    pub fn enable_termination_check(&mut self, check: bool, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| m.check_termination = check);
    }

    pub fn enable_ease_in(&mut self, ease_in: bool, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| {
            m.ease_in_enabled = ease_in;
            m.refresh_effective_weight();
        });
    }

    pub fn enable_ease_out(&mut self, ease_out: bool, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| {
            m.ease_out_enabled = ease_out;
            m.refresh_effective_weight();
        });
    }

    /// Install a validated ease-in curve on every motor and enable it.
    pub fn set_ease_in_curve(
        &mut self,
        ramp: HermiteRamp,
        handles: &[MotorHandle],
    ) -> Result<(), MotorError> {
        ramp.validate()?;
        self.for_each_mut(handles, |m| {
            m.ease_in = ramp;
            m.ease_in_enabled = true;
            m.refresh_effective_weight();
        });
        Ok(())
    }

    /// Install a validated ease-out curve on every motor and enable it.
    pub fn set_ease_out_curve(
        &mut self,
        ramp: HermiteRamp,
        handles: &[MotorHandle],
    ) -> Result<(), MotorError> {
        ramp.validate()?;
        self.for_each_mut(handles, |m| {
            m.ease_out = ramp;
            m.ease_out_enabled = true;
            m.refresh_effective_weight();
        });
        Ok(())
    }

    /// Ease each motor in over the next `duration` seconds of its own
    /// global clock, starting from its current multiplier when
    /// `from_current` is set (so re-easing mid-ramp does not snap to zero).
    pub fn ease_in(&mut self, duration: f32, from_current: bool, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| {
            let from = if from_current { m.ease_multiplier() } else { 0.0 };
            m.ease_in = HermiteRamp::over(m.curr_clock, duration, from, 1.0);
            m.ease_in_enabled = true;
            m.ease_out_enabled = false;
            m.refresh_effective_weight();
        });
    }

    /// Ease each motor out over the next `duration` seconds, from its
    /// current multiplier down to zero.
    pub fn ease_out(&mut self, duration: f32, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| {
            let from = m.ease_multiplier();
            m.ease_out = HermiteRamp::over(m.curr_clock, duration, from, 0.0);
            m.ease_out_enabled = true;
            m.ease_in_enabled = false;
            m.refresh_effective_weight();
        });
    }

    /// Schedule self-termination when the global clock reaches `at_secs`.
    /// The flag flips on the clock update that crosses it; nothing is
    /// auto-released.
    pub fn schedule_termination(&mut self, at_secs: f32, handles: &[MotorHandle]) {
        self.for_each_mut(handles, |m| m.kill_clock = at_secs);
    }

    /// Anchor motors so their local clock reads `local_clock` at
    /// `target_global` given their current speed.
    pub fn set_target_state(
        &mut self,
        curr_global: f32,
        target_global: f32,
        local_clock: f32,
        curr_iter_idx: u32,
        handles: &[MotorHandle],
    ) {
        self.for_each_mut(handles, |m| {
            m.set_target_state(curr_global, target_global, local_clock, curr_iter_idx)
        });
    }

    // -- sweeps -------------------------------------------------------------

    fn sweep(
        &mut self,
        handles: &[MotorHandle],
        pred: impl Fn(&Motor) -> bool,
        what: &str,
    ) -> bool {
        let mut released = 0usize;
        for &handle in handles {
            if self.motor(handle).is_some_and(&pred) && self.release_slot(handle) {
                released += 1;
            }
        }
        if released > 0 {
            debug!("released {} {} motor(s), {} live", released, what, self.live);
        }
        released > 0
    }

    /// Release every listed motor that is currently unused (suspended or
    /// terminated). Returns whether anything was released. Stale handles
    /// are skipped.
    pub fn release_unused(&mut self, handles: &[MotorHandle]) -> bool {
        self.sweep(handles, Motor::is_unused, "unused")
    }

    /// Like [`release_unused`](Self::release_unused), but only for motors
    /// that additionally never ran while active since acquisition or their
    /// last iteration reset: sweeps the never-started without touching the
    /// merely-finished.
    pub fn release_once_unused(&mut self, handles: &[MotorHandle]) -> bool {
        self.sweep(handles, |m| m.is_unused() && !m.ever_active, "once-unused")
    }

    /// Release every listed motor whose terminated flag is set.
    pub fn release_terminated(&mut self, handles: &[MotorHandle]) -> bool {
        self.sweep(handles, |m| m.terminated, "terminated")
    }

    /// Unconditional release of a single handle. Returns false for stale
    /// handles.
    pub fn release(&mut self, handle: MotorHandle) -> bool {
        self.release_slot(handle)
    }

    // -- query surface (read-only, no side effects) -------------------------

    /// Whether the handle still resolves to a live motor.
    #[inline]
    pub fn contains(&self, handle: MotorHandle) -> bool {
        self.motor(handle).is_some()
    }

    /// Full playback-state snapshot.
    pub fn query_state(&self, handle: MotorHandle) -> Result<MotorState, MotorError> {
        self.motor(handle)
            .map(|m| m.state())
            .ok_or(MotorError::InvalidHandle)
    }

    /// Raw local clock plus the clamped value valid for sampling.
    pub fn query_local_clock(&self, handle: MotorHandle) -> Result<(f32, f32), MotorError> {
        self.motor(handle)
            .map(|m| (m.local_clock_raw, m.local_clock_clamped))
            .ok_or(MotorError::InvalidHandle)
    }

    /// Snapshot of the global-time clocks.
    pub fn get_timing(&self, handle: MotorHandle) -> Result<MotorTiming, MotorError> {
        self.motor(handle)
            .map(|m| m.timing())
            .ok_or(MotorError::InvalidHandle)
    }

    #[inline]
    pub fn is_active(&self, handle: MotorHandle) -> bool {
        self.motor(handle).is_some_and(|m| m.active)
    }

    #[inline]
    pub fn is_unused(&self, handle: MotorHandle) -> bool {
        self.motor(handle).is_some_and(Motor::is_unused)
    }

    #[inline]
    pub fn has_terminated(&self, handle: MotorHandle) -> bool {
        self.motor(handle).is_some_and(|m| m.terminated)
    }

    #[inline]
    pub fn termination_is_scheduled(&self, handle: MotorHandle) -> bool {
        self.motor(handle)
            .is_some_and(|m| m.kill_clock != KILL_UNSCHEDULED)
    }

    /// True iff the motor is active with a positive effective weight.
    #[inline]
    pub fn has_effect(&self, handle: MotorHandle) -> bool {
        self.motor(handle).is_some_and(Motor::has_effect)
    }

    /// Effective weight after easing; 0 for stale handles.
    #[inline]
    pub fn effective_weight(&self, handle: MotorHandle) -> f32 {
        self.motor(handle).map_or(0.0, |m| m.effective_weight)
    }
}
