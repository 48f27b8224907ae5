//! Canonical turret commands.
//!
//! Both serial encodings decode into [`Command`]; the
//! [`ActiveCommandSet`](super::active_set::ActiveCommandSet) and the
//! executor only ever see this type.

/// Actuation identity of a command. The active set keeps one slot per
/// channel, so a newer command always supersedes an older one here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    Pan = 0,
    Tilt = 1,
    Spin = 2,
    Safety = 3,
    Trigger = 4,
}

impl Channel {
    /// Number of channels (size of the active set).
    pub const COUNT: usize = 5;

    /// Every channel, in dispatch order.
    pub const ALL: [Channel; Self::COUNT] = [
        Channel::Pan,
        Channel::Tilt,
        Channel::Spin,
        Channel::Safety,
        Channel::Trigger,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Continuous-rotation axis driven by a stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Pan,
    Tilt,
}

impl Axis {
    pub const fn channel(self) -> Channel {
        match self {
            Axis::Pan => Channel::Pan,
            Axis::Tilt => Channel::Tilt,
        }
    }
}

/// A single actuation request.
///
/// Value equality compares the payload; set membership uses
/// [`Command::channel`] only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Drive `axis` at `speed`, a fraction of max speed in [-1, 1].
    /// Zero stops the axis.
    PanTilt { axis: Axis, speed: f32 },
    /// Spin the flywheel up (`true`) or down (`false`).
    Spin { on: bool },
    /// Engage (`true`) or release (`false`) the trigger safety.
    Safety { on: bool },
    /// Start (`true`) a firing sequence; `false` marks the fire key release.
    Fire { on: bool },
}

impl Command {
    pub const fn pan(speed: f32) -> Self {
        Self::PanTilt {
            axis: Axis::Pan,
            speed,
        }
    }

    pub const fn tilt(speed: f32) -> Self {
        Self::PanTilt {
            axis: Axis::Tilt,
            speed,
        }
    }

    pub const fn channel(&self) -> Channel {
        match self {
            Command::PanTilt { axis, .. } => axis.channel(),
            Command::Spin { .. } => Channel::Spin,
            Command::Safety { .. } => Channel::Safety,
            Command::Fire { .. } => Channel::Trigger,
        }
    }
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Command::PanTilt { axis, speed } => write!(f, "{:?} speed {:.2}", axis, speed),
            Command::Spin { on } => write!(f, "Spin {}", if *on { "up" } else { "down" }),
            Command::Safety { on } => write!(f, "Safety {}", if *on { "on" } else { "off" }),
            Command::Fire { on } => write!(f, "Fire {}", if *on { "press" } else { "release" }),
        }
    }
}
