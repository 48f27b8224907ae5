//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod hold;
pub mod hw_init;
pub mod status_led;
pub mod stepper;
pub mod trigger;
