//! Application core: pure domain logic, zero I/O.
//!
//! Command model, the active command set, fire control and the task set
//! that ties them together. All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod active_set;
pub mod commands;
pub mod fire;
pub mod ports;
pub mod service;
