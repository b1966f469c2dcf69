//! Pure local-clock math: maps a speed-scaled global-time delta onto a
//! motor's local timeline, folding permitted loops into the iteration index
//! and clamping at the boundary once the iteration budget is spent.
//!
//! No storage here; [`crate::motor::Motor`] owns the state and calls
//! [`advance_local_clock`] per update.

/// Result of one local-clock step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClockAdvance {
    /// Unwrapped local clock. In range while looping; left past the boundary
    /// when the budget is exhausted so callers extracting root motion keep a
    /// continuous value.
    pub raw: f32,
    /// Always within `[0, local_dur]`; valid to sample animation with.
    pub clamped: f32,
    /// Iteration index after folding this step's wraps.
    pub iter_idx: u32,
    /// The step crossed the lower boundary (wrapped or first pinned at 0).
    pub underflow: bool,
    /// The step crossed the upper boundary (wrapped or first pinned at dur).
    pub overflow: bool,
}

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Advance a local clock by `speed * delta_global`.
///
/// Looping is permitted while `clamp_iterations` is off and the iteration
/// budget (`iter_cnt`, 0 = infinite) has headroom in the direction of
/// travel. Large deltas fold as many wraps as the budget allows in one call.
/// Boundary-crossing flags fire on every permitted wrap and on the first
/// saturating crossing, then stay quiet while the clock remains pinned.
pub fn advance_local_clock(
    speed: f32,
    prior_raw: f32,
    delta_global: f32,
    local_dur: f32,
    iter_cnt: u32,
    curr_iter_idx: u32,
    clamp_iterations: bool,
) -> ClockAdvance {
    if local_dur <= 0.0 {
        // Degenerate timeline: pinned at zero.
        return ClockAdvance {
            raw: 0.0,
            clamped: 0.0,
            iter_idx: curr_iter_idx,
            underflow: false,
            overflow: false,
        };
    }

    let raw_next = prior_raw + speed * delta_global;

    if raw_next > local_dur {
        let crossings = (raw_next / local_dur).floor();
        if !clamp_iterations && iter_cnt == 0 {
            let raw = fmod(raw_next, local_dur);
            return ClockAdvance {
                raw,
                clamped: raw,
                iter_idx: curr_iter_idx.wrapping_add(crossings as u32),
                underflow: false,
                overflow: true,
            };
        }
        let headroom = if clamp_iterations {
            0.0
        } else {
            (iter_cnt - 1).saturating_sub(curr_iter_idx) as f32
        };
        let consumed = crossings.min(headroom);
        let raw = raw_next - consumed * local_dur;
        let iter_idx = curr_iter_idx + consumed as u32;
        if raw > local_dur {
            // Budget spent: pin the sampled clock, keep raw continuous.
            ClockAdvance {
                raw,
                clamped: local_dur,
                iter_idx,
                underflow: false,
                overflow: consumed > 0.0 || prior_raw < local_dur,
            }
        } else {
            ClockAdvance {
                raw,
                clamped: raw,
                iter_idx,
                underflow: false,
                overflow: true,
            }
        }
    } else if raw_next < 0.0 {
        let crossings = (-raw_next / local_dur).ceil();
        if !clamp_iterations && iter_cnt == 0 {
            let raw = fmod(raw_next, local_dur);
            return ClockAdvance {
                raw,
                clamped: raw,
                iter_idx: curr_iter_idx.wrapping_sub(crossings as u32),
                underflow: true,
                overflow: false,
            };
        }
        let headroom = if clamp_iterations {
            0.0
        } else {
            curr_iter_idx as f32
        };
        let consumed = crossings.min(headroom);
        let raw = raw_next + consumed * local_dur;
        let iter_idx = curr_iter_idx - consumed as u32;
        if raw < 0.0 {
            ClockAdvance {
                raw,
                clamped: 0.0,
                iter_idx,
                underflow: consumed > 0.0 || prior_raw > 0.0,
                overflow: false,
            }
        } else {
            ClockAdvance {
                raw,
                clamped: raw,
                iter_idx,
                underflow: true,
                overflow: false,
            }
        }
    } else {
        ClockAdvance {
            raw: raw_next,
            clamped: raw_next,
            iter_idx: curr_iter_idx,
            underflow: false,
            overflow: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range_without_crossing() {
        let adv = advance_local_clock(1.0, 0.2, 0.3, 1.0, 1, 0, false);
        assert_eq!(adv.raw, 0.5);
        assert_eq!(adv.clamped, 0.5);
        assert!(!adv.overflow && !adv.underflow);
    }

    #[test]
    fn wraps_forward_and_steps_iteration() {
        let adv = advance_local_clock(1.0, 0.9, 0.3, 1.0, 3, 0, false);
        assert!((adv.raw - 0.2).abs() < 1e-6);
        assert_eq!(adv.iter_idx, 1);
        assert!(adv.overflow);
    }

    #[test]
    fn saturates_when_budget_spent() {
        let adv = advance_local_clock(1.0, 0.9, 0.3, 1.0, 1, 0, false);
        assert_eq!(adv.clamped, 1.0);
        assert_eq!(adv.iter_idx, 0);
        assert!(adv.overflow);
        // Pinned: the next step past the boundary is not a new crossing.
        let adv2 = advance_local_clock(1.0, adv.raw, 0.3, 1.0, 1, adv.iter_idx, false);
        assert_eq!(adv2.clamped, 1.0);
        assert!(!adv2.overflow);
    }

    #[test]
    fn large_delta_folds_multiple_wraps() {
        // 0.5 + 2.7 exceeds the whole 3-iteration budget: both remaining
        // wraps fold in one call and the clock pins at the end.
        let adv = advance_local_clock(1.0, 0.5, 2.7, 1.0, 3, 0, false);
        assert_eq!(adv.iter_idx, 2);
        assert_eq!(adv.clamped, 1.0);
        assert!(adv.overflow);

        // Same jump with headroom to spare lands mid-iteration.
        let adv2 = advance_local_clock(1.0, 0.5, 2.7, 1.0, 5, 0, false);
        assert_eq!(adv2.iter_idx, 3);
        assert!((adv2.clamped - 0.2).abs() < 1e-5);
    }

    #[test]
    fn reverse_wraps_and_pins_at_zero() {
        let adv = advance_local_clock(-1.0, 0.1, 0.3, 1.0, 3, 1, false);
        assert!((adv.raw - 0.8).abs() < 1e-6);
        assert_eq!(adv.iter_idx, 0);
        assert!(adv.underflow);

        let adv2 = advance_local_clock(-1.0, adv.raw, 1.0, 1.0, 3, 0, false);
        assert_eq!(adv2.clamped, 0.0);
        assert!(adv2.underflow);
        let adv3 = advance_local_clock(-1.0, adv2.raw, 0.5, 1.0, 3, 0, false);
        assert_eq!(adv3.clamped, 0.0);
        assert!(!adv3.underflow);
    }

    #[test]
    fn infinite_budget_keeps_wrapping() {
        let adv = advance_local_clock(1.0, 0.0, 12.25, 1.0, 0, 0, false);
        assert!((adv.clamped - 0.25).abs() < 1e-4);
        assert_eq!(adv.iter_idx, 12);
        assert!(adv.overflow);
    }

    #[test]
    fn iteration_clamping_overrides_budget() {
        let adv = advance_local_clock(1.0, 0.9, 0.3, 1.0, 0, 5, true);
        assert_eq!(adv.clamped, 1.0);
        assert_eq!(adv.iter_idx, 5);
        assert!(adv.overflow);
    }

    #[test]
    fn zero_duration_is_pinned() {
        let adv = advance_local_clock(2.0, 0.4, 1.0, 0.0, 0, 3, false);
        assert_eq!(adv.raw, 0.0);
        assert_eq!(adv.clamped, 0.0);
        assert_eq!(adv.iter_idx, 3);
    }
}
