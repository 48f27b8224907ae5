//! Hardware adapter: bridges real peripherals to the actuator port.
//!
//! Owns every actuator driver and exposes them through [`ActuatorPort`].
//! This is the only module in the system that touches actual hardware.
//! On non-espidf targets, the underlying drivers use cfg-gated
//! simulation stubs.
//!
//! Bring-up applies the microstep mode and toggles the hold line; drop
//! stops everything and toggles the hold line back.

use embedded_hal::digital::StatefulOutputPin;
use log::{info, warn};

use crate::app::commands::Axis;
use crate::app::ports::ActuatorPort;
use crate::config::TurretConfig;
use crate::drivers::hold::HoldToggle;
use crate::drivers::hw_init::OutputGpio;
use crate::drivers::status_led::StatusLed;
use crate::drivers::stepper::{
    MicrostepSelect, StepChannel, StepOutput, StepperDriver, StepperState,
};
use crate::drivers::trigger::TriggerMechanism;
use crate::error::{ActuatorError, Result};
use crate::pins;

/// Concrete adapter that combines all hardware behind the port trait.
pub struct HardwareAdapter<P = OutputGpio, S = StepChannel>
where
    P: StatefulOutputPin,
    S: StepOutput,
{
    pan: StepperDriver<S, P>,
    tilt: StepperDriver<S, P>,
    trigger: TriggerMechanism<P>,
    hold: HoldToggle<P>,
    led: StatusLed<P>,
}

impl HardwareAdapter {
    /// Bring up the board's actuators from the pin table.
    pub fn new(config: &TurretConfig) -> Result<Self> {
        let mut microstep = MicrostepSelect::new(
            OutputGpio::new(pins::MS1_GPIO),
            OutputGpio::new(pins::MS2_GPIO),
            OutputGpio::new(pins::MS3_GPIO),
        );
        microstep.apply(config.microstep)?;

        info!(
            "HardwareAdapter: pan {} steps/s, tilt {} steps/s",
            config.pan_max_steps_per_sec, config.tilt_max_steps_per_sec
        );

        Self::from_parts(
            StepperDriver::new(
                StepChannel::PAN,
                OutputGpio::new(pins::PAN_DIR_GPIO),
                config.pan_max_steps_per_sec,
            ),
            StepperDriver::new(
                StepChannel::TILT,
                OutputGpio::new(pins::TILT_DIR_GPIO),
                config.tilt_max_steps_per_sec,
            ),
            TriggerMechanism::new(OutputGpio::new(pins::FLYWHEEL_RELAY_GPIO)),
            HoldToggle::new(OutputGpio::new(pins::HOLD_GPIO)),
            StatusLed::new(OutputGpio::new(pins::STATUS_LED_GPIO)),
        )
    }
}

impl<P, S> HardwareAdapter<P, S>
where
    P: StatefulOutputPin,
    S: StepOutput,
{
    /// Assemble from already-built drivers. Toggles the hold line.
    pub fn from_parts(
        pan: StepperDriver<S, P>,
        tilt: StepperDriver<S, P>,
        trigger: TriggerMechanism<P>,
        mut hold: HoldToggle<P>,
        led: StatusLed<P>,
    ) -> Result<Self> {
        hold.toggle()?;
        Ok(Self {
            pan,
            tilt,
            trigger,
            hold,
            led,
        })
    }

    pub fn axis_state(&self, axis: Axis) -> StepperState {
        match axis {
            Axis::Pan => self.pan.state(),
            Axis::Tilt => self.tilt.state(),
        }
    }

    pub fn flywheel_on(&self) -> bool {
        self.trigger.flywheel_on()
    }

    pub fn trigger_angle(&self) -> Option<f32> {
        self.trigger.angle()
    }

    pub fn heartbeat_on(&self) -> bool {
        self.led.is_on()
    }

    pub fn hold_high(&mut self) -> bool {
        self.hold.is_high()
    }
}

fn log_fault(what: &str, r: core::result::Result<(), ActuatorError>) {
    if let Err(e) = r {
        warn!("{}: {}", what, e);
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P, S> ActuatorPort for HardwareAdapter<P, S>
where
    P: StatefulOutputPin,
    S: StepOutput,
{
    fn set_axis_speed(&mut self, axis: Axis, speed: f32) {
        let r = match axis {
            Axis::Pan => self.pan.set_speed(speed),
            Axis::Tilt => self.tilt.set_speed(speed),
        };
        log_fault("stepper", r);
    }

    fn set_flywheel(&mut self, on: bool) {
        log_fault("flywheel", self.trigger.set_flywheel(on));
    }

    fn set_trigger_angle(&mut self, angle_deg: f32) {
        log_fault("trigger servo", self.trigger.set_angle(angle_deg));
    }

    fn set_safety(&mut self, engaged: bool) {
        self.trigger.set_safety(engaged);
    }

    fn safety_engaged(&self) -> bool {
        self.trigger.safety_engaged()
    }

    fn set_heartbeat(&mut self, on: bool) {
        log_fault("status led", self.led.set(on));
    }

    fn all_off(&mut self) {
        log_fault("stepper", self.pan.stop());
        log_fault("stepper", self.tilt.stop());
        log_fault("flywheel", self.trigger.set_flywheel(false));
        log_fault("status led", self.led.off());
    }
}

impl<P, S> Drop for HardwareAdapter<P, S>
where
    P: StatefulOutputPin,
    S: StepOutput,
{
    fn drop(&mut self) {
        self.all_off();
        log_fault("hold", self.hold.toggle());
        info!("HardwareAdapter: released");
    }
}
