//! Integration tests for the serial → decoder → active set → actuator chain.
//!
//! These drive the reader and executor steps directly (`poll_serial`,
//! `dispatch_pass`) so the ordering of every actuator call is exact.

use crate::mock_hw::{make_context, structured_config, ActuatorCall, MockContext};

use sentry::app::commands::{Axis, Channel, Command};
use sentry::config::TurretConfig;

fn feed(ctx: &MockContext, n: usize) {
    for _ in 0..n {
        assert!(ctx.poll_serial(), "expected a buffered line");
    }
}

// ── Snapshot mode ─────────────────────────────────────────────

#[test]
fn press_and_release_tilt_leaves_no_residual_entry() {
    let (ctx, serial, _) = make_context(TurretConfig::default());

    serial.push_line("{'w'}");
    feed(&ctx, 1);
    assert_eq!(ctx.dispatch_pass(), 1);

    serial.push_line("{}");
    feed(&ctx, 1);
    assert_eq!(ctx.dispatch_pass(), 1);

    let hw = ctx.actuators().borrow();
    assert_eq!(hw.axis_calls(Axis::Tilt), vec![0.3, 0.0]);
    assert!(ctx.active().borrow().is_empty());
}

#[test]
fn held_key_is_applied_once() {
    let (ctx, serial, _) = make_context(TurretConfig::default());
    for _ in 0..5 {
        serial.push_line("{'d'}");
    }
    for _ in 0..5 {
        feed(&ctx, 1);
        ctx.dispatch_pass();
    }
    assert_eq!(ctx.actuators().borrow().axis_calls(Axis::Pan), vec![1.0]);
}

#[test]
fn no_line_means_no_commands() {
    let (ctx, _serial, _) = make_context(TurretConfig::default());
    assert!(!ctx.poll_serial());
    assert_eq!(ctx.dispatch_pass(), 0);
    assert!(ctx.actuators().borrow().calls.is_empty());
}

// ── Structured mode ───────────────────────────────────────────

#[test]
fn later_command_supersedes_earlier_on_same_channel() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_line("SET PAN 0.5");
    serial.push_line("SET PAN -0.2");
    serial.push_line("SET TILT 0.1");
    feed(&ctx, 3);

    assert_eq!(ctx.active().borrow().len(), 2);
    assert_eq!(
        ctx.active().borrow().get(Channel::Pan),
        Some(&Command::pan(-0.2))
    );

    ctx.dispatch_pass();
    let hw = ctx.actuators().borrow();
    assert_eq!(hw.axis_calls(Axis::Pan), vec![-0.2]);
    assert_eq!(hw.axis_calls(Axis::Tilt), vec![0.1]);
}

#[test]
fn decode_error_is_shown_and_decoding_continues() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_line("SET ROLL 0.5");
    serial.push_line("SET TILT 0.5");
    feed(&ctx, 2);

    assert_eq!(ctx.display().borrow().last(), Some("INVALID SET"));
    assert_eq!(ctx.stats().decode_errors, 1);

    ctx.dispatch_pass();
    assert_eq!(ctx.actuators().borrow().axis_calls(Axis::Tilt), vec![0.5]);
}

#[test]
fn blank_structured_line_is_silent() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_line("");
    feed(&ctx, 1);
    assert_eq!(ctx.stats().decode_errors, 0);
    assert!(ctx.display().borrow().shown.is_empty());
    assert!(ctx.active().borrow().is_empty());
}

#[test]
fn echo_shows_every_received_line() {
    let cfg = TurretConfig {
        echo_lines: true,
        ..structured_config()
    };
    let (ctx, serial, _) = make_context(cfg);
    serial.push_line("SAFETY ON");
    serial.push_line("BOGUS");
    feed(&ctx, 2);

    assert_eq!(
        ctx.display().borrow().shown,
        vec!["SAFETY ON", "BOGUS", "INVALID COMMAND"]
    );
}

#[test]
fn transport_failure_is_counted_and_reading_resumes() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_failure();
    serial.push_line("SPIN UP");

    assert!(!ctx.poll_serial());
    assert_eq!(ctx.stats().transport_errors, 1);
    assert!(ctx.poll_serial());
    assert_eq!(ctx.active().borrow().len(), 1);
}

#[test]
fn line_split_across_reads_is_reassembled() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_bytes(b"SET TI");
    serial.push_bytes(b"LT -0.75\r\n");

    assert!(ctx.poll_serial());
    ctx.dispatch_pass();
    assert_eq!(ctx.actuators().borrow().axis_calls(Axis::Tilt), vec![-0.75]);
}

// ── Spin / safety / fire dispatch ─────────────────────────────

#[test]
fn spin_toggles_flywheel_and_is_consumed() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_line("SPIN UP");
    feed(&ctx, 1);
    ctx.dispatch_pass();
    assert!(ctx.actuators().borrow().flywheel_on());
    assert!(ctx.fire_control().spin_hold());
    assert!(ctx.active().borrow().is_empty());

    serial.push_line("SPIN DOWN");
    feed(&ctx, 1);
    ctx.dispatch_pass();
    assert!(!ctx.actuators().borrow().flywheel_on());
    assert!(!ctx.fire_control().spin_hold());
}

#[test]
fn fire_with_safety_engaged_is_rejected() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_line("SAFETY ON");
    feed(&ctx, 1);
    ctx.dispatch_pass();

    serial.push_line("FIRE");
    feed(&ctx, 1);
    ctx.dispatch_pass();

    assert!(!ctx.fire_control().in_flight());
    assert!(!ctx.fire_control().order_pending());
    assert_eq!(ctx.display().borrow().last(), Some("SAFETY ON"));
    assert_eq!(ctx.stats().fire_rejections, 1);
    assert!(ctx.active().borrow().is_empty());
}

#[test]
fn safety_release_allows_fire() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_line("SAFETY ON");
    serial.push_line("SAFETY OFF");
    feed(&ctx, 2);
    ctx.dispatch_pass();

    serial.push_line("FIRE");
    feed(&ctx, 1);
    ctx.dispatch_pass();
    assert!(ctx.fire_control().in_flight());
    assert_eq!(
        ctx.actuators().borrow().actuation_calls(),
        vec![ActuatorCall::Safety(false)]
    );
}

#[test]
fn second_fire_while_latched_is_busy() {
    let (ctx, serial, _) = make_context(structured_config());
    serial.push_line("FIRE");
    feed(&ctx, 1);
    ctx.dispatch_pass();
    assert!(ctx.fire_control().in_flight());

    serial.push_line("FIRE");
    feed(&ctx, 1);
    ctx.dispatch_pass();

    assert_eq!(ctx.display().borrow().last(), Some("FIRE BUSY"));
    assert!(ctx.active().borrow().is_empty());
}

#[test]
fn fire_release_key_is_consumed_without_actuation() {
    let (ctx, serial, _) = make_context(TurretConfig::default());
    serial.push_line("{'f'}");
    feed(&ctx, 1);
    ctx.dispatch_pass();
    ctx.fire_control().release();

    serial.push_line("{}");
    feed(&ctx, 1);
    assert_eq!(
        ctx.active().borrow().get(Channel::Trigger),
        Some(&Command::Fire { on: false })
    );
    assert_eq!(ctx.dispatch_pass(), 1);
    assert!(ctx.actuators().borrow().actuation_calls().is_empty());
    assert!(!ctx.fire_control().in_flight());
}
