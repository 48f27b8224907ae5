//! System configuration parameters
//!
//! All tunable parameters for the sentry turret.
//! Values can be overridden via the persisted NVS blob.

use serde::{Deserialize, Serialize};

use crate::drivers::stepper::Microstep;
use crate::pins::{STEP_PWM_MAX_FREQ_HZ as STEP_RATE_MAX, STEP_PWM_MIN_FREQ_HZ as STEP_RATE_MIN};

/// Which line encoding the host speaks on the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeMode {
    /// Operator keyboard snapshots: `{'w', 'a'}`.
    Snapshot,
    /// Verb commands: `SET PAN 0.5`, `FIRE`, ...
    Structured,
}

/// Core turret configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurretConfig {
    // --- Protocol ---
    /// Line encoding expected from the host
    pub decode_mode: DecodeMode,
    /// Show every received line on the display
    pub echo_lines: bool,
    /// Pan speed emitted for a/d in snapshot mode (fraction of max)
    pub op_pan_speed: f32,
    /// Tilt speed emitted for w/s in snapshot mode (fraction of max)
    pub op_tilt_speed: f32,

    // --- Steppers ---
    /// Pan stepper pulse rate at full speed (steps/s)
    pub pan_max_steps_per_sec: u32,
    /// Tilt stepper pulse rate at full speed (steps/s)
    pub tilt_max_steps_per_sec: u32,
    /// A4988 microstep resolution
    pub microstep: Microstep,

    // --- Firing sequence ---
    /// Flywheel spin-up before the trigger pull (ms)
    pub flywheel_spinup_ms: u32,
    /// Time the trigger is held retracted (ms)
    pub trigger_pull_ms: u32,
    /// Time for the trigger to return before spin-down (ms)
    pub trigger_return_ms: u32,
    /// Servo angle with the trigger pulled (degrees)
    pub trigger_retracted_deg: f32,
    /// Servo angle with the trigger released (degrees)
    pub trigger_extended_deg: f32,

    // --- Timing ---
    /// Heartbeat LED half-period (ms)
    pub heartbeat_interval_ms: u32,
    /// Serial poll and executor pass interval (ms, 0 = plain yield)
    pub poll_interval_ms: u32,
}

impl Default for TurretConfig {
    fn default() -> Self {
        Self {
            // Protocol
            decode_mode: DecodeMode::Snapshot,
            echo_lines: false,
            op_pan_speed: 1.0,
            op_tilt_speed: 0.3,

            // Steppers
            pan_max_steps_per_sec: 4950,
            tilt_max_steps_per_sec: 1694,
            microstep: Microstep::Sixteenth,

            // Firing sequence
            flywheel_spinup_ms: 1500,
            trigger_pull_ms: 1000,
            trigger_return_ms: 250,
            trigger_retracted_deg: 0.0,
            trigger_extended_deg: 180.0,

            // Timing
            heartbeat_interval_ms: 80,
            poll_interval_ms: 1,
        }
    }
}

impl TurretConfig {
    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(0.0..=1.0).contains(&self.op_pan_speed) || self.op_pan_speed == 0.0 {
            return Err("op_pan_speed must be in (0, 1]");
        }
        if !(0.0..=1.0).contains(&self.op_tilt_speed) || self.op_tilt_speed == 0.0 {
            return Err("op_tilt_speed must be in (0, 1]");
        }
        if !(STEP_RATE_MIN..=STEP_RATE_MAX).contains(&self.pan_max_steps_per_sec) {
            return Err("pan_max_steps_per_sec must be 10–9765");
        }
        if !(STEP_RATE_MIN..=STEP_RATE_MAX).contains(&self.tilt_max_steps_per_sec) {
            return Err("tilt_max_steps_per_sec must be 10–9765");
        }
        if self.flywheel_spinup_ms > 10_000
            || self.trigger_pull_ms > 10_000
            || self.trigger_return_ms > 10_000
        {
            return Err("firing stage durations must be <= 10000 ms");
        }
        for angle in [self.trigger_retracted_deg, self.trigger_extended_deg] {
            if !(0.0..=180.0).contains(&angle) {
                return Err("trigger angles must be 0–180 degrees");
            }
        }
        if !(10..=5000).contains(&self.heartbeat_interval_ms) {
            return Err("heartbeat_interval_ms must be 10–5000");
        }
        if self.poll_interval_ms > 100 {
            return Err("poll_interval_ms must be <= 100");
        }
        Ok(())
    }

    /// Total time a firing sequence keeps the flywheel energised (ms).
    pub fn firing_sequence_ms(&self) -> u32 {
        self.flywheel_spinup_ms + self.trigger_pull_ms + self.trigger_return_ms
    }
}
