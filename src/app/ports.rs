//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SentryContext (domain)
//! ```
//!
//! Driven adapters (actuators, display, clock, storage) implement these
//! traits. The [`SentryContext`](super::service::SentryContext) consumes
//! them via generics, so the domain core never touches hardware directly.

use core::future::Future;
use core::time::Duration;

use crate::config::TurretConfig;

use super::commands::Axis;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
///
/// Methods are infallible from the domain's point of view; adapters log
/// driver failures and keep going, since no actuator fault may stop the
/// control loop.
pub trait ActuatorPort {
    /// Run `axis` at `speed` (fraction of max, [-1, 1]). Zero stops it.
    fn set_axis_speed(&mut self, axis: Axis, speed: f32);

    /// Energise or release the flywheel relay.
    fn set_flywheel(&mut self, on: bool);

    /// Move the trigger servo to `angle_deg` (0–180).
    fn set_trigger_angle(&mut self, angle_deg: f32);

    /// Engage or release the trigger safety.
    fn set_safety(&mut self, engaged: bool);

    /// Whether the trigger safety is engaged.
    fn safety_engaged(&self) -> bool;

    /// Drive the heartbeat LED.
    fn set_heartbeat(&mut self, on: bool);

    /// Stop both axes and the flywheel.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → status display)
// ───────────────────────────────────────────────────────────────

/// Short status text for the operator (decode errors, fire rejections,
/// echoed lines). Implementations replace whatever was shown before.
pub trait DisplayPort {
    fn show(&mut self, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: domain → timer reactor)
// ───────────────────────────────────────────────────────────────

/// Async delays. Every wait in the firmware goes through this, so no task
/// ever blocks the executor thread.
pub trait Clock {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists turret configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`TurretConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<TurretConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &TurretConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
