//! Trigger mechanism: flywheel relay, trigger servo and safety flag.
//!
//! The servo is a standard hobby servo on a 50 Hz LEDC channel
//! (0–180° → 500–2500 µs pulse). The relay switches the flywheel motors.
//! The safety flag lives here so it travels with the hardware it guards;
//! this driver does not enforce it, the fire path does.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the servo PWM via hw_init and the relay through its
//! output pin.
//! On host/test: tracks state in-memory only.

use embedded_hal::digital::OutputPin;

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

const SERVO_MIN_PULSE_US: f32 = 500.0;
const SERVO_MAX_PULSE_US: f32 = 2500.0;
const SERVO_TRAVEL_DEG: f32 = 180.0;

/// LEDC duty for a servo angle at the configured frame rate and
/// resolution. Angles are clamped to the servo travel.
pub fn servo_duty(angle_deg: f32) -> u32 {
    let angle = if angle_deg.is_nan() {
        0.0
    } else {
        angle_deg.clamp(0.0, SERVO_TRAVEL_DEG)
    };
    let pulse_us =
        SERVO_MIN_PULSE_US + angle / SERVO_TRAVEL_DEG * (SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US);
    let period_us = 1_000_000.0 / pins::SERVO_PWM_FREQ_HZ as f32;
    let full_scale = (1u32 << pins::SERVO_PWM_RESOLUTION_BITS) as f32;
    (pulse_us / period_us * full_scale) as u32
}

pub struct TriggerMechanism<R: OutputPin> {
    relay: R,
    flywheel_on: bool,
    angle_deg: Option<f32>,
    safety: bool,
}

impl<R: OutputPin> TriggerMechanism<R> {
    pub fn new(relay: R) -> Self {
        Self {
            relay,
            flywheel_on: false,
            angle_deg: None,
            safety: false,
        }
    }

    pub fn set_flywheel(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.relay
            .set_state(on.into())
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.flywheel_on = on;
        Ok(())
    }

    pub fn set_angle(&mut self, angle_deg: f32) -> Result<(), ActuatorError> {
        hw_init::ledc_set(hw_init::LEDC_CH_SERVO, servo_duty(angle_deg))?;
        self.angle_deg = Some(angle_deg.clamp(0.0, SERVO_TRAVEL_DEG));
        Ok(())
    }

    pub fn set_safety(&mut self, engaged: bool) {
        self.safety = engaged;
    }

    pub fn safety_engaged(&self) -> bool {
        self.safety
    }

    pub fn flywheel_on(&self) -> bool {
        self.flywheel_on
    }

    /// Last commanded servo angle; `None` until the first move.
    pub fn angle(&self) -> Option<f32> {
        self.angle_deg
    }
}
