//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers. The transport and
//! clock mocks share their state through `Rc`, so a test keeps a handle
//! after moving a clone into the context.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use sentry::app::commands::Axis;
use sentry::app::ports::{ActuatorPort, Clock, DisplayPort};
use sentry::app::service::SentryContext;
use sentry::config::TurretConfig;
use sentry::error::TransportError;
use sentry::protocol::Transport;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    AxisSpeed { axis: Axis, speed: f32 },
    Flywheel(bool),
    TriggerAngle(f32),
    Safety(bool),
    Heartbeat(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    safety: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call except heartbeats, which interleave nondeterministically
    /// when the full task set runs.
    pub fn actuation_calls(&self) -> Vec<ActuatorCall> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, ActuatorCall::Heartbeat(_)))
            .cloned()
            .collect()
    }

    pub fn axis_calls(&self, axis: Axis) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::AxisSpeed { axis: a, speed } if *a == axis => Some(*speed),
                _ => None,
            })
            .collect()
    }

    pub fn flywheel_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Flywheel(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn position(&self, call: &ActuatorCall) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }
}

impl ActuatorPort for MockHardware {
    fn set_axis_speed(&mut self, axis: Axis, speed: f32) {
        self.calls.push(ActuatorCall::AxisSpeed { axis, speed });
    }

    fn set_flywheel(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Flywheel(on));
    }

    fn set_trigger_angle(&mut self, angle_deg: f32) {
        self.calls.push(ActuatorCall::TriggerAngle(angle_deg));
    }

    fn set_safety(&mut self, engaged: bool) {
        self.safety = engaged;
        self.calls.push(ActuatorCall::Safety(engaged));
    }

    fn safety_engaged(&self) -> bool {
        self.safety
    }

    fn set_heartbeat(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Heartbeat(on));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub shown: Vec<String>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn last(&self) -> Option<&str> {
        self.shown.last().map(String::as_str)
    }
}

impl DisplayPort for MockDisplay {
    fn show(&mut self, text: &str) {
        self.shown.push(text.to_owned());
    }
}

// ── ScriptedTransport ─────────────────────────────────────────

enum Chunk {
    Bytes(Vec<u8>),
    Fail,
}

/// Delivers queued chunks one per `read`.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    chunks: Rc<RefCell<VecDeque<Chunk>>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn push_line(&self, line: &str) {
        let mut bytes = line.as_bytes().to_vec();
        bytes.push(b'\n');
        self.push_bytes(&bytes);
    }

    pub fn push_bytes(&self, bytes: &[u8]) {
        self.chunks.borrow_mut().push_back(Chunk::Bytes(bytes.to_vec()));
    }

    pub fn push_failure(&self) {
        self.chunks.borrow_mut().push_back(Chunk::Fail);
    }
}

impl Transport for ScriptedTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let mut chunks = self.chunks.borrow_mut();
        match chunks.pop_front() {
            Some(Chunk::Bytes(c)) => {
                let n = c.len().min(buf.len());
                buf[..n].copy_from_slice(&c[..n]);
                if n < c.len() {
                    chunks.push_front(Chunk::Bytes(c[n..].to_vec()));
                }
                Ok(n)
            }
            Some(Chunk::Fail) => Err(TransportError::ReadFailed),
            None => Ok(0),
        }
    }

    fn available(&self) -> bool {
        !self.chunks.borrow().is_empty()
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Records requested sleeps and yields once instead of waiting.
#[derive(Clone, Default)]
pub struct MockClock {
    pub sleeps: Rc<RefCell<Vec<Duration>>>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn total(&self) -> Duration {
        self.sleeps.borrow().iter().sum()
    }
}

impl Clock for MockClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        futures_lite::future::yield_now().await;
    }
}

// ── Fixtures ──────────────────────────────────────────────────

pub type MockContext<C = MockClock> = SentryContext<MockHardware, MockDisplay, ScriptedTransport, C>;

#[allow(dead_code)]
pub fn structured_config() -> TurretConfig {
    TurretConfig {
        decode_mode: sentry::config::DecodeMode::Structured,
        ..TurretConfig::default()
    }
}

#[allow(dead_code)]
pub fn make_context(config: TurretConfig) -> (MockContext, ScriptedTransport, MockClock) {
    let transport = ScriptedTransport::default();
    let clock = MockClock::default();
    let ctx = SentryContext::new(
        config,
        MockHardware::new(),
        MockDisplay::default(),
        transport.clone(),
        clock.clone(),
    );
    (ctx, transport, clock)
}
