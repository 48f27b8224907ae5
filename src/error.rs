//! Unified error types for the sentry firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! cooperative tasks can report failures uniformly and keep running.
//! All variants are `Copy` so they pass through the decoder, the executor
//! and the display without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A received line could not be decoded into commands.
    Decode(DecodeError),
    /// A fire order was refused by the executor.
    Fire(FireRejected),
    /// The serial transport failed to deliver bytes.
    Transport(TransportError),
    /// An actuator output could not be driven.
    Actuator(ActuatorError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Fire(e) => write!(f, "fire: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Verbs of the structured protocol, used to tag argument errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Set,
    Spin,
    Safety,
}

/// A structured line that does not match the grammar.
///
/// The `Display` form is the short uppercase tag rendered on the
/// 128x32 status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// First token is not a known verb.
    UnknownVerb,
    /// Second token is missing or not valid for the verb.
    InvalidArgument(Verb),
    /// A speed value is missing or not a number.
    InvalidNumber,
    /// A speed value is outside [-1, 1] or not finite.
    SpeedOutOfRange,
    /// Extra tokens follow a complete command.
    TrailingTokens,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownVerb => write!(f, "INVALID COMMAND"),
            Self::InvalidArgument(Verb::Set) => write!(f, "INVALID SET"),
            Self::InvalidArgument(Verb::Spin) => write!(f, "INVALID SPIN"),
            Self::InvalidArgument(Verb::Safety) => write!(f, "INVALID SAFETY"),
            Self::InvalidNumber => write!(f, "INVALID NUMBER"),
            Self::SpeedOutOfRange => write!(f, "SPEED RANGE"),
            Self::TrailingTokens => write!(f, "TRAILING ARGS"),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Fire rejections
// ---------------------------------------------------------------------------

/// Reasons a `Fire(true)` command is refused instead of launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRejected {
    /// A firing sequence is already in flight.
    Busy,
    /// The trigger safety is engaged.
    SafetyEngaged,
}

impl fmt::Display for FireRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "FIRE BUSY"),
            Self::SafetyEngaged => write!(f, "SAFETY ON"),
        }
    }
}

impl From<FireRejected> for Error {
    fn from(e: FireRejected) -> Self {
        Self::Fire(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The underlying driver reported a read failure.
    ReadFailed,
    /// The receive FIFO overflowed and bytes were lost.
    Overrun,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::Overrun => write!(f, "receive overrun"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
    /// PWM duty or frequency write failed.
    PwmWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
