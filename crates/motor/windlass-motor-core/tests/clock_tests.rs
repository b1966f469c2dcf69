use windlass_motor_core::{MotorConfig, MotorPool};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

/// Tiny deterministic LCG so the property walk needs no rand dependency.
struct Lcg(u64);

impl Lcg {
    fn next_unit(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 40) as f32) / ((1u64 << 24) as f32)
    }
}

/// it should keep the clamped local clock within [0, local_dur] under random
/// speed/delta sequences, looping or not
#[test]
fn clamped_clock_stays_in_range_under_random_walk() {
    for (iter_cnt, clamping) in [(0u32, false), (3, false), (1, true)] {
        let mut pool = MotorPool::with_capacity(1);
        let cfg = MotorConfig {
            curr_clock: 0.0,
            local_dur: 0.75,
            iter_cnt,
        };
        let motors = pool.acquire(&cfg, 1).unwrap();
        pool.enable_iteration_clamping(clamping, &motors);

        let mut rng = Lcg(0x5eed_0123_4567);
        let mut t = 0.0f32;
        for _ in 0..500 {
            let speed = rng.next_unit() * 4.0 - 2.0;
            pool.set_speed(speed, &motors);
            t += rng.next_unit() * 0.5;
            pool.update_clock(t, &motors);
            let (_, clamped) = pool.query_local_clock(motors[0]).unwrap();
            assert!(
                (0.0..=0.75).contains(&clamped),
                "clamped {clamped} escaped range (iter_cnt={iter_cnt}, clamping={clamping})"
            );
        }
    }
}

/// it should overflow exactly iter_cnt times when driven past the whole
/// budget, with the iteration index saturating at iter_cnt - 1
#[test]
fn looping_budget_overflows_exactly_iter_cnt_times() {
    let mut pool = MotorPool::with_capacity(1);
    let cfg = MotorConfig {
        curr_clock: 0.0,
        local_dur: 1.0,
        iter_cnt: 3,
    };
    let motors = pool.acquire(&cfg, 1).unwrap();

    let mut overflows = 0;
    let mut t = 0.0f32;
    // 10 * 0.45 = 4.5 seconds, well past the 3-second budget.
    for _ in 0..10 {
        t += 0.45;
        pool.update_clock(t, &motors);
        let state = pool.query_state(motors[0]).unwrap();
        if state.overflow {
            overflows += 1;
        }
        assert!(state.curr_iter_idx <= 2, "iteration index must saturate");
    }
    assert_eq!(overflows, 3);

    let state = pool.query_state(motors[0]).unwrap();
    assert_eq!(state.curr_iter_idx, 2);
    approx(state.local_clock_clamped, 1.0, 1e-6);
}

/// it should yield identical (local clock, effective weight) when
/// set_clock_only is applied twice with the same time
#[test]
fn set_clock_only_is_idempotent() {
    let mut pool = MotorPool::with_capacity(1);
    let motors = pool.acquire(&MotorConfig::default(), 1).unwrap();
    pool.update_clock(0.25, &motors);

    pool.set_clock_only(0.8, &motors);
    let clock_a = pool.query_local_clock(motors[0]).unwrap();
    let weight_a = pool.query_state(motors[0]).unwrap().effective_weight;

    pool.set_clock_only(0.8, &motors);
    let clock_b = pool.query_local_clock(motors[0]).unwrap();
    let weight_b = pool.query_state(motors[0]).unwrap().effective_weight;

    assert_eq!(clock_a, clock_b);
    assert_eq!(weight_a, weight_b);
}

/// it should preserve relative phase across a clock rebase: re-advancing by
/// the same deltas after rebasing produces the same clamped sequence
#[test]
fn rebase_preserves_phase_under_same_deltas() {
    let cfg = MotorConfig {
        curr_clock: 0.0,
        local_dur: 1.0,
        iter_cnt: 0,
    };
    let times = [0.3f32, 0.7, 1.1, 1.6, 2.2];

    // Reference run: no rebase.
    let mut pool_a = MotorPool::with_capacity(1);
    let a = pool_a.acquire(&cfg, 1).unwrap();
    let mut reference = Vec::new();
    for &t in &times {
        pool_a.update_clock(t, &a);
        reference.push(pool_a.query_local_clock(a[0]).unwrap().1);
    }

    // Rebased run: same absolute times for the first two updates, then a
    // rebase to a new origin and the remaining updates shifted by it.
    let origin = 0.7f32;
    let mut pool_b = MotorPool::with_capacity(1);
    let b = pool_b.acquire(&cfg, 1).unwrap();
    let mut rebased = Vec::new();
    for &t in &times[..2] {
        pool_b.update_clock(t, &b);
        rebased.push(pool_b.query_local_clock(b[0]).unwrap().1);
    }
    pool_b.rebase_clocks(origin, &b);
    approx(pool_b.get_timing(b[0]).unwrap().curr_clock, 0.0, 1e-6);
    for &t in &times[2..] {
        pool_b.update_clock(t - origin, &b);
        rebased.push(pool_b.query_local_clock(b[0]).unwrap().1);
    }

    for (r, e) in rebased.iter().zip(reference.iter()) {
        approx(*r, *e, 1e-5);
    }
}

/// it should hold the local clock on a suspended motor and report the
/// last-known value from queries rather than an error
#[test]
fn suspended_motor_holds_local_clock() {
    let mut pool = MotorPool::with_capacity(1);
    let motors = pool.acquire(&MotorConfig::default(), 1).unwrap();
    pool.update_clock(0.4, &motors);
    let before = pool.query_local_clock(motors[0]).unwrap();

    pool.activate(false, &motors);
    pool.update_clock(0.9, &motors);
    let after = pool.query_local_clock(motors[0]).unwrap();
    assert_eq!(before, after);
    assert!(!pool.is_active(motors[0]));

    // Reactivating resumes from where it stopped: the suspended span is not
    // replayed.
    pool.activate(true, &motors);
    pool.update_clock(1.0, &motors);
    let resumed = pool.query_local_clock(motors[0]).unwrap();
    approx(resumed.1, 0.5, 1e-5);
}

/// it should anchor motors with set_target_state so the requested local
/// clock is reached exactly at the target global time
#[test]
fn set_target_state_back_extrapolates() {
    let mut pool = MotorPool::with_capacity(1);
    let cfg = MotorConfig {
        curr_clock: 0.0,
        local_dur: 2.0,
        iter_cnt: 1,
    };
    let motors = pool.acquire(&cfg, 1).unwrap();

    pool.set_target_state(0.0, 1.0, 0.5, 0, &motors);
    pool.update_clock(1.0, &motors);
    let (_, clamped) = pool.query_local_clock(motors[0]).unwrap();
    approx(clamped, 0.5, 1e-5);
}

/// it should reverse through the timeline with negative speed and pin at
/// zero once the first iteration is exhausted
#[test]
fn negative_speed_reverses_and_pins_at_zero() {
    let mut pool = MotorPool::with_capacity(1);
    let cfg = MotorConfig {
        curr_clock: 0.0,
        local_dur: 1.0,
        iter_cnt: 1,
    };
    let motors = pool.acquire(&cfg, 1).unwrap();
    pool.reset_local_clock(0.6, &motors);
    pool.set_speed(-1.0, &motors);

    pool.update_clock(0.4, &motors);
    approx(pool.query_local_clock(motors[0]).unwrap().1, 0.2, 1e-5);

    pool.update_clock(1.0, &motors);
    let state = pool.query_state(motors[0]).unwrap();
    approx(state.local_clock_clamped, 0.0, 1e-6);
    assert!(state.underflow);
}
