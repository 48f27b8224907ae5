//! Application service: the hexagonal core.
//!
//! [`SentryContext`] owns the decoder, the active command set and the fire
//! latch, and borrows the outside world through port traits. Four
//! cooperative tasks share it on one thread:
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │  futures_lite::block_on                                      │
//!  │  ┌────────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                          │  │
//!  │  │                                                        │  │
//!  │  │  ┌───────────┐  ┌──────────┐  ┌──────────┐  ┌────────┐ │  │
//!  │  │  │ heartbeat │  │ reader   │  │ executor │  │ firing │ │  │
//!  │  │  │ 80ms ⏱    │  │ 1ms ⏱    │  │ 1ms ⏱    │  │ signal │ │  │
//!  │  │  └───────────┘  └────┬─────┘  └────┬─────┘  └───▲────┘ │  │
//!  │  │                upsert│      remove │  try_launch│      │  │
//!  │  │                      ▼             ▼            │      │  │
//!  │  │                  ActiveCommandSet ──────────────┘      │  │
//!  │  └────────────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! `RefCell` borrows are always dropped before an `.await`.

use core::cell::{Cell, RefCell};
use core::fmt::Write as _;
use core::future::Future;
use core::time::Duration;

use log::{debug, info, warn};

use crate::config::TurretConfig;
use crate::error::{Error, TransportError};
use crate::protocol::{CommandDecoder, LineReader, Transport};

use super::active_set::ActiveCommandSet;
use super::commands::{Channel, Command};
use super::fire::FireControl;
use super::ports::{ActuatorPort, Clock, DisplayPort};

/// Display text buffer; the panel fits about 21 characters per line.
type DisplayText = heapless::String<32>;

/// Counters exposed for diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ServiceStats {
    pub lines: u32,
    pub decode_errors: u32,
    pub transport_errors: u32,
    pub fire_rejections: u32,
    pub dispatched: u32,
}

// ───────────────────────────────────────────────────────────────
// SentryContext
// ───────────────────────────────────────────────────────────────

pub struct SentryContext<A, D, T, C>
where
    A: ActuatorPort,
    D: DisplayPort,
    T: Transport,
    C: Clock,
{
    config: TurretConfig,
    actuators: RefCell<A>,
    display: RefCell<D>,
    reader: RefCell<LineReader<T>>,
    decoder: RefCell<CommandDecoder>,
    active: RefCell<ActiveCommandSet>,
    fire: FireControl,
    clock: C,
    stats: Cell<ServiceStats>,
}

impl<A, D, T, C> SentryContext<A, D, T, C>
where
    A: ActuatorPort,
    D: DisplayPort,
    T: Transport,
    C: Clock,
{
    pub fn new(config: TurretConfig, actuators: A, display: D, transport: T, clock: C) -> Self {
        let decoder = CommandDecoder::new(&config);
        info!(
            "SentryContext: {:?} mode, echo={}",
            decoder.mode(),
            config.echo_lines
        );
        Self {
            actuators: RefCell::new(actuators),
            display: RefCell::new(display),
            reader: RefCell::new(LineReader::new(transport)),
            decoder: RefCell::new(decoder),
            active: RefCell::new(ActiveCommandSet::new()),
            fire: FireControl::new(),
            clock,
            stats: Cell::new(ServiceStats::default()),
            config,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn config(&self) -> &TurretConfig {
        &self.config
    }

    pub fn actuators(&self) -> &RefCell<A> {
        &self.actuators
    }

    pub fn display(&self) -> &RefCell<D> {
        &self.display
    }

    pub fn active(&self) -> &RefCell<ActiveCommandSet> {
        &self.active
    }

    pub fn fire_control(&self) -> &FireControl {
        &self.fire
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats.get()
    }

    fn bump(&self, f: impl FnOnce(&mut ServiceStats)) {
        let mut s = self.stats.get();
        f(&mut s);
        self.stats.set(s);
    }

    fn show(&self, item: impl core::fmt::Display) {
        let mut text = DisplayText::new();
        // Overlong text is cut at the buffer size.
        let _ = write!(text, "{}", item);
        self.display.borrow_mut().show(&text);
    }

    // ── Reader side ───────────────────────────────────────────

    /// Read and decode at most one complete line from the transport.
    /// Returns whether a line was consumed.
    pub fn poll_serial(&self) -> bool {
        let polled = self.reader.borrow_mut().poll_line();
        match polled {
            Ok(Some(line)) => {
                self.handle_line(&line);
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.report_transport_error(e);
                false
            }
        }
    }

    /// Decode one line and merge its commands into the active set.
    pub fn handle_line(&self, line: &str) {
        self.bump(|s| s.lines = s.lines.wrapping_add(1));
        if self.config.echo_lines {
            self.display.borrow_mut().show(line);
        }

        let decoded = self.decoder.borrow_mut().decode(line);
        match decoded {
            Ok(cmds) => {
                let mut active = self.active.borrow_mut();
                for cmd in cmds {
                    debug!("decode: {}", cmd);
                    active.upsert(cmd);
                }
            }
            Err(e) => {
                warn!("decode: {:?} in {:?}", e, line);
                self.bump(|s| s.decode_errors = s.decode_errors.wrapping_add(1));
                self.show(e);
            }
        }
    }

    fn report_transport_error(&self, e: TransportError) {
        warn!("{}", Error::from(e));
        self.bump(|s| s.transport_errors = s.transport_errors.wrapping_add(1));
    }

    // ── Executor side ─────────────────────────────────────────

    /// Consume the entry on `channel`, if any, and apply it.
    ///
    /// The entry is taken at dispatch time, so a command upserted after
    /// the pass snapshot is the one that gets applied.
    pub fn dispatch(&self, channel: Channel) -> Option<Command> {
        let cmd = self.active.borrow_mut().remove(channel)?;
        self.apply(cmd);
        self.bump(|s| s.dispatched = s.dispatched.wrapping_add(1));
        Some(cmd)
    }

    fn apply(&self, cmd: Command) {
        match cmd {
            Command::PanTilt { axis, speed } => {
                self.actuators.borrow_mut().set_axis_speed(axis, speed);
            }
            Command::Spin { on } => {
                self.fire.set_spin_hold(on);
                if on {
                    self.actuators.borrow_mut().set_flywheel(true);
                } else if !self.fire.in_flight() {
                    self.actuators.borrow_mut().set_flywheel(false);
                }
                info!("spin: hold {}", if on { "on" } else { "off" });
            }
            Command::Safety { on } => {
                self.actuators.borrow_mut().set_safety(on);
                info!("safety: {}", if on { "engaged" } else { "released" });
            }
            Command::Fire { on: true } => {
                let safety = self.actuators.borrow().safety_engaged();
                match self.fire.try_launch(safety) {
                    Ok(()) => info!("fire: order accepted"),
                    Err(e) => {
                        warn!("{}", Error::from(e));
                        self.bump(|s| s.fire_rejections = s.fire_rejections.wrapping_add(1));
                        self.show(e);
                    }
                }
            }
            Command::Fire { on: false } => {}
        }
    }

    /// Apply every entry present in one snapshot of the active set.
    /// Returns how many were applied.
    pub fn dispatch_pass(&self) -> usize {
        let entries = self.active.borrow().snapshot_entries();
        let mut applied = 0;
        for cmd in &entries {
            if self.dispatch(cmd.channel()).is_some() {
                applied += 1;
            }
        }
        applied
    }

    // ── Firing sequence ───────────────────────────────────────

    /// Flywheel up, pull, release, flywheel down (unless spin is held),
    /// then release the latch.
    pub async fn run_fire_sequence(&self) {
        let cfg = &self.config;
        info!("fire: sequence start");

        self.actuators.borrow_mut().set_flywheel(true);
        self.clock.sleep(ms(cfg.flywheel_spinup_ms)).await;

        self.actuators
            .borrow_mut()
            .set_trigger_angle(cfg.trigger_retracted_deg);
        self.clock.sleep(ms(cfg.trigger_pull_ms)).await;

        self.actuators
            .borrow_mut()
            .set_trigger_angle(cfg.trigger_extended_deg);
        self.clock.sleep(ms(cfg.trigger_return_ms)).await;

        if !self.fire.spin_hold() {
            self.actuators.borrow_mut().set_flywheel(false);
        }
        self.fire.release();
        info!("fire: sequence done ({} total)", self.fire.shots_fired());
    }

    // ── Tasks ─────────────────────────────────────────────────

    async fn heartbeat_loop(&self) {
        let interval = ms(self.config.heartbeat_interval_ms);
        let mut on = false;
        loop {
            on = !on;
            self.actuators.borrow_mut().set_heartbeat(on);
            self.clock.sleep(interval).await;
        }
    }

    async fn reader_loop(&self) {
        let interval = ms(self.config.poll_interval_ms);
        loop {
            self.poll_serial();
            self.clock.sleep(interval).await;
        }
    }

    async fn executor_loop(&self) {
        let interval = ms(self.config.poll_interval_ms);
        loop {
            let entries = self.active.borrow().snapshot_entries();
            for cmd in &entries {
                self.dispatch(cmd.channel());
                futures_lite::future::yield_now().await;
            }
            self.clock.sleep(interval).await;
        }
    }

    async fn firing_loop(&self) {
        loop {
            self.fire.wait_order().await;
            self.run_fire_sequence().await;
        }
    }

    /// Run all four tasks until `stop` completes, returning its output.
    pub fn run_until<F: Future>(&self, stop: F) -> F::Output {
        let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();

        executor.spawn(self.heartbeat_loop()).detach();
        executor.spawn(self.reader_loop()).detach();
        executor.spawn(self.executor_loop()).detach();
        executor.spawn(self.firing_loop()).detach();

        futures_lite::future::block_on(executor.run(stop))
    }

    /// Run forever.
    pub fn run(&self) {
        info!("SentryContext: tasks started");
        self.run_until(core::future::pending::<()>());
    }
}

fn ms(v: u32) -> Duration {
    Duration::from_millis(u64::from(v))
}

impl<A, D, T, C> Drop for SentryContext<A, D, T, C>
where
    A: ActuatorPort,
    D: DisplayPort,
    T: Transport,
    C: Clock,
{
    fn drop(&mut self) {
        self.actuators.get_mut().all_off();
        info!("SentryContext: actuators released");
    }
}
