//! Stepper hold toggle.
//!
//! One output shared by both A4988 ENABLE inputs. It is toggled once at
//! bring-up and once at teardown, so the coils are released however the
//! board boots.

use embedded_hal::digital::StatefulOutputPin;

use crate::error::ActuatorError;

pub struct HoldToggle<P: StatefulOutputPin> {
    pin: P,
}

impl<P: StatefulOutputPin> HoldToggle<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn toggle(&mut self) -> Result<(), ActuatorError> {
        self.pin
            .toggle()
            .map_err(|_| ActuatorError::GpioWriteFailed)
    }

    pub fn is_high(&mut self) -> bool {
        self.pin.is_set_high().unwrap_or(false)
    }
}
