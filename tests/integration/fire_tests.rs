//! Firing sequence tests.
//!
//! The sequence runs under `block_on` with [`MockClock`], which records
//! each requested delay and returns immediately.

use std::time::Duration;

use futures_lite::future::block_on;

use crate::mock_hw::{make_context, structured_config, ActuatorCall};

use sentry::config::TurretConfig;

#[test]
fn sequence_stages_and_timing() {
    let (ctx, _, clock) = make_context(TurretConfig::default());
    ctx.fire_control().try_launch(false).unwrap();

    block_on(ctx.run_fire_sequence());

    assert_eq!(
        ctx.actuators().borrow().calls,
        vec![
            ActuatorCall::Flywheel(true),
            ActuatorCall::TriggerAngle(0.0),
            ActuatorCall::TriggerAngle(180.0),
            ActuatorCall::Flywheel(false),
        ]
    );
    assert_eq!(
        *clock.sleeps.borrow(),
        vec![
            Duration::from_millis(1500),
            Duration::from_millis(1000),
            Duration::from_millis(250),
        ]
    );
    assert_eq!(clock.total(), Duration::from_millis(2750));
    assert!(!ctx.fire_control().in_flight());
    assert_eq!(ctx.fire_control().shots_fired(), 1);
}

#[test]
fn configured_angles_and_durations_are_used() {
    let cfg = TurretConfig {
        flywheel_spinup_ms: 200,
        trigger_pull_ms: 100,
        trigger_return_ms: 50,
        trigger_retracted_deg: 20.0,
        trigger_extended_deg: 160.0,
        ..TurretConfig::default()
    };
    let (ctx, _, clock) = make_context(cfg);

    block_on(ctx.run_fire_sequence());

    let hw = ctx.actuators().borrow();
    assert_eq!(hw.calls[1], ActuatorCall::TriggerAngle(20.0));
    assert_eq!(hw.calls[2], ActuatorCall::TriggerAngle(160.0));
    assert_eq!(clock.total(), Duration::from_millis(350));
}

#[test]
fn spin_hold_keeps_flywheel_running_after_shot() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_line("SPIN UP");
    serial.push_line("FIRE");
    assert!(ctx.poll_serial());
    ctx.dispatch_pass();
    assert!(ctx.poll_serial());
    ctx.dispatch_pass();

    block_on(ctx.run_fire_sequence());

    let hw = ctx.actuators().borrow();
    assert!(hw.flywheel_on());
    assert!(!hw.calls.contains(&ActuatorCall::Flywheel(false)));
}

#[test]
fn spin_down_mid_shot_defers_to_sequence_end() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_line("SPIN UP");
    serial.push_line("FIRE");
    serial.push_line("SPIN DOWN");
    for _ in 0..2 {
        assert!(ctx.poll_serial());
        ctx.dispatch_pass();
    }
    assert!(ctx.fire_control().in_flight());

    // Spin down arrives while the shot is in flight: relay stays on.
    assert!(ctx.poll_serial());
    ctx.dispatch_pass();
    assert!(ctx.actuators().borrow().flywheel_on());

    block_on(ctx.run_fire_sequence());
    assert!(!ctx.actuators().borrow().flywheel_on());
}

#[test]
fn new_fire_accepted_after_sequence_completes() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_line("FIRE");
    assert!(ctx.poll_serial());
    ctx.dispatch_pass();
    block_on(ctx.run_fire_sequence());

    serial.push_line("FIRE");
    assert!(ctx.poll_serial());
    ctx.dispatch_pass();
    assert!(ctx.fire_control().in_flight());
    assert_eq!(ctx.stats().fire_rejections, 0);
}
