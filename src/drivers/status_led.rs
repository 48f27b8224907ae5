//! Heartbeat status LED.
//!
//! A single digital output blinked by the heartbeat task so a stalled
//! executor is visible on the board.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO through its output pin.
//! On host/test: tracks state in-memory only.

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct StatusLed<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.pin
            .set_state(on.into())
            .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.on = on;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), ActuatorError> {
        self.set(false)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
