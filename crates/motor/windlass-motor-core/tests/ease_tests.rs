use windlass_motor_core::{HermiteRamp, MotorConfig, MotorError, MotorPool};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn one_motor(pool: &mut MotorPool) -> Vec<windlass_motor_core::MotorHandle> {
    pool.acquire(&MotorConfig::default(), 1).unwrap()
}

/// it should hit start_value at the window start and end_value at the window
/// end for configured curves
#[test]
fn ease_multiplier_is_continuous_at_endpoints() {
    let mut pool = MotorPool::with_capacity(1);
    let motors = one_motor(&mut pool);
    let ramp = HermiteRamp {
        start_seconds: 1.0,
        end_seconds: 3.0,
        start_value: 0.2,
        start_tangent: 0.4,
        end_tangent: -0.1,
        end_value: 0.9,
    };
    pool.set_ease_in_curve(ramp, &motors).unwrap();

    pool.update_clock(1.0, &motors);
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 0.2, 1e-6);

    pool.update_clock(3.0, &motors);
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 0.9, 1e-6);

    // Before and after the window the endpoint values hold.
    pool.set_clock_only(0.0, &motors);
    pool.update_clock(0.5, &motors);
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 0.2, 1e-6);
    pool.update_clock(10.0, &motors);
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 0.9, 1e-6);
}

/// it should combine ease-in and ease-out multiplicatively
#[test]
fn ease_sides_combine_multiplicatively() {
    let mut pool = MotorPool::with_capacity(1);
    let motors = one_motor(&mut pool);
    pool.set_ease_in_curve(HermiteRamp::over(0.0, 1.0, 0.0, 1.0), &motors)
        .unwrap();
    pool.set_ease_out_curve(HermiteRamp::over(0.0, 1.0, 1.0, 0.0), &motors)
        .unwrap();

    pool.update_clock(0.5, &motors);
    // Both flat-tangent ramps read 0.5 at the midpoint.
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 0.25, 1e-6);
}

/// it should treat a disabled side as multiplier 1
#[test]
fn disabled_side_contributes_one() {
    let mut pool = MotorPool::with_capacity(1);
    let motors = one_motor(&mut pool);
    pool.set_ease_in_curve(HermiteRamp::over(0.0, 2.0, 0.0, 1.0), &motors)
        .unwrap();
    pool.update_clock(1.0, &motors);
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 0.5, 1e-6);

    pool.enable_ease_in(false, &motors);
    pool.update_clock(1.0, &motors);
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 1.0, 1e-6);
}

/// it should reject ease windows that start after they end
#[test]
fn non_monotonic_window_is_rejected() {
    let mut pool = MotorPool::with_capacity(1);
    let motors = one_motor(&mut pool);
    let bad = HermiteRamp {
        start_seconds: 2.0,
        end_seconds: 1.0,
        start_value: 0.0,
        start_tangent: 0.0,
        end_tangent: 0.0,
        end_value: 1.0,
    };
    assert!(matches!(
        pool.set_ease_in_curve(bad, &motors),
        Err(MotorError::InvalidConfiguration(_))
    ));
    // Nothing was installed: the motor still runs at full weight.
    pool.update_clock(1.5, &motors);
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 1.0, 1e-6);
}

/// it should install ramps over the motor's own clock via the ease-in /
/// ease-out conveniences
#[test]
fn convenience_ramps_window_from_current_clock() {
    let mut pool = MotorPool::with_capacity(1);
    let motors = one_motor(&mut pool);
    pool.update_clock(1.0, &motors);

    pool.ease_in(2.0, false, &motors);
    let timing = pool.get_timing(motors[0]).unwrap();
    approx(timing.ease_in_start_clock, 1.0, 1e-6);
    approx(timing.ease_in_end_clock, 3.0, 1e-6);

    approx(pool.query_state(motors[0]).unwrap().effective_weight, 0.0, 1e-6);
    pool.update_clock(3.0, &motors);
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 1.0, 1e-6);

    // Ease out over one second from full weight.
    pool.ease_out(1.0, &motors);
    pool.update_clock(3.5, &motors);
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 0.5, 1e-6);
    pool.update_clock(4.0, &motors);
    approx(pool.query_state(motors[0]).unwrap().effective_weight, 0.0, 1e-6);
    assert!(!pool.has_effect(motors[0]));
}

/// it should keep the effective weight within [0, 1] even for overshooting
/// tangents, per the blend-weight invariant
#[test]
fn effective_weight_stays_in_unit_range() {
    let mut pool = MotorPool::with_capacity(1);
    let motors = one_motor(&mut pool);
    let hot = HermiteRamp {
        start_seconds: 0.0,
        end_seconds: 1.0,
        start_value: 0.0,
        start_tangent: 10.0,
        end_tangent: 10.0,
        end_value: 1.0,
    };
    pool.set_ease_in_curve(hot, &motors).unwrap();
    for k in 0..=10 {
        pool.update_clock(k as f32 * 0.1, &motors);
        let w = pool.query_state(motors[0]).unwrap().effective_weight;
        assert!((0.0..=1.0).contains(&w), "weight {w} escaped [0,1]");
    }
}
