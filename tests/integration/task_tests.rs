//! Full task-set tests on the real reactor clock.
//!
//! Durations are shortened so each test runs in well under a second; the
//! assertions only depend on ordering with a wide timing margin.

use std::time::Duration;

use async_io_mini::Timer;

use sentry::adapters::time::AsyncIoClock;
use sentry::app::commands::Axis;
use sentry::app::service::SentryContext;
use sentry::config::TurretConfig;

use crate::mock_hw::{structured_config, ActuatorCall, MockContext, MockDisplay, MockHardware, ScriptedTransport};

fn fast_config() -> TurretConfig {
    TurretConfig {
        flywheel_spinup_ms: 60,
        trigger_pull_ms: 60,
        trigger_return_ms: 30,
        heartbeat_interval_ms: 10,
        ..structured_config()
    }
}

fn make_live(config: TurretConfig) -> (MockContext<AsyncIoClock>, ScriptedTransport) {
    let transport = ScriptedTransport::default();
    let ctx = SentryContext::new(
        config,
        MockHardware::new(),
        MockDisplay::default(),
        transport.clone(),
        AsyncIoClock::new(),
    );
    (ctx, transport)
}

fn run_for(ctx: &MockContext<AsyncIoClock>, ms: u64) {
    ctx.run_until(Timer::after(Duration::from_millis(ms)));
}

/// Run the task set, pushing `late` onto the serial link after `delay_ms`.
fn run_with_late_line(ctx: &MockContext<AsyncIoClock>, serial: &ScriptedTransport, delay_ms: u64, late: &str, total_ms: u64) {
    ctx.run_until(async {
        Timer::after(Duration::from_millis(delay_ms)).await;
        serial.push_line(late);
        Timer::after(Duration::from_millis(total_ms - delay_ms)).await;
    });
}

#[test]
fn axis_updates_proceed_while_shot_is_in_flight() {
    let (ctx, serial) = make_live(fast_config());
    serial.push_line("FIRE");

    run_with_late_line(&ctx, &serial, 20, "SET PAN 0.5", 400);

    let hw = ctx.actuators().borrow();
    let spin_up = hw.position(&ActuatorCall::Flywheel(true)).unwrap();
    let spin_down = hw.position(&ActuatorCall::Flywheel(false)).unwrap();
    let pan = hw
        .position(&ActuatorCall::AxisSpeed {
            axis: Axis::Pan,
            speed: 0.5,
        })
        .unwrap();
    assert!(spin_up < pan && pan < spin_down, "pan applied mid-sequence");
    assert_eq!(ctx.fire_control().shots_fired(), 1);
}

#[test]
fn heartbeat_keeps_toggling() {
    let (ctx, _serial) = make_live(fast_config());

    run_for(&ctx, 120);

    let beats: Vec<bool> = ctx
        .actuators()
        .borrow()
        .calls
        .iter()
        .filter_map(|c| match c {
            ActuatorCall::Heartbeat(on) => Some(*on),
            _ => None,
        })
        .collect();
    assert!(beats.len() >= 3, "only {} heartbeats", beats.len());
    assert!(beats[0]);
    assert!(beats.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn fire_during_sequence_is_rejected_not_queued() {
    let (ctx, serial) = make_live(fast_config());
    serial.push_line("FIRE");

    run_with_late_line(&ctx, &serial, 20, "FIRE", 400);

    assert_eq!(ctx.fire_control().shots_fired(), 1);
    assert_eq!(ctx.stats().fire_rejections, 1);
    assert_eq!(ctx.display().borrow().last(), Some("FIRE BUSY"));
    assert!(!ctx.fire_control().in_flight());
}

#[test]
fn snapshot_press_release_end_to_end() {
    let (ctx, serial) = make_live(TurretConfig {
        heartbeat_interval_ms: 10,
        ..TurretConfig::default()
    });
    serial.push_line("{'w'}");

    run_with_late_line(&ctx, &serial, 20, "{}", 100);

    assert_eq!(ctx.actuators().borrow().axis_calls(Axis::Tilt), vec![0.3, 0.0]);
    assert!(ctx.active().borrow().is_empty());
}
