//! Operator keyboard snapshots.
//!
//! The host sends the full set of held keys on every tick:
//!
//! ```text
//! {'w', 'a'}      w + a held
//! set()           nothing held (any line without quoted letters works)
//! ```
//!
//! The decoder keeps the previous tick's [`KeyState`] and turns the level
//! input into edges: a key that becomes held emits its start command once,
//! a key that is released emits its stop command once, and a key that
//! stays held emits nothing.

use heapless::Vec;

use crate::app::commands::{Channel, Command};

/// Commands decoded from one line: at most a stop and a start per axis,
/// plus fire.
pub type Commands = Vec<Command, { Channel::COUNT }>;

/// Keys the operator console reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Key {
    W = 0,
    A = 1,
    S = 2,
    D = 3,
    F = 4,
    /// Tracked, but not bound to a command.
    J = 5,
}

impl Key {
    const COUNT: usize = 6;

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'w' => Some(Key::W),
            'a' => Some(Key::A),
            's' => Some(Key::S),
            'd' => Some(Key::D),
            'f' => Some(Key::F),
            'j' => Some(Key::J),
            _ => None,
        }
    }

    /// The key whose presence suppresses this key's start.
    const fn opposing(self) -> Option<Key> {
        match self {
            Key::W => Some(Key::S),
            Key::S => Some(Key::W),
            Key::A => Some(Key::D),
            Key::D => Some(Key::A),
            Key::F | Key::J => None,
        }
    }
}

/// Set of keys, one bit per [`Key`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyState {
    held: [bool; Key::COUNT],
}

impl KeyState {
    pub fn is_held(&self, key: Key) -> bool {
        self.held[key as usize]
    }

    fn set(&mut self, key: Key, held: bool) {
        self.held[key as usize] = held;
    }

    /// Parse a snapshot line: split on `'` and keep the tokens that are a
    /// single lowercase letter. Unknown letters are ignored.
    pub fn parse(line: &str) -> Self {
        let mut keys = Self::default();
        for token in line.split('\'') {
            let mut chars = token.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                if c.is_ascii_lowercase() {
                    if let Some(key) = Key::from_char(c) {
                        keys.set(key, true);
                    }
                }
            }
        }
        keys
    }
}

/// Edge detector over successive snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotDecoder {
    state: KeyState,
    pan_speed: f32,
    tilt_speed: f32,
}

impl SnapshotDecoder {
    /// Evaluation order fixes the output order: tilt, pan, fire.
    const ORDER: [Key; 5] = [Key::W, Key::S, Key::A, Key::D, Key::F];

    pub fn new(pan_speed: f32, tilt_speed: f32) -> Self {
        Self {
            state: KeyState::default(),
            pan_speed,
            tilt_speed,
        }
    }

    pub fn decode(&mut self, line: &str) -> Commands {
        let held = KeyState::parse(line);
        let mut out = Commands::new();

        for key in Self::ORDER {
            let was_active = self.state.is_held(key);
            let is_held = held.is_held(key);
            let opposed = key.opposing().is_some_and(|o| held.is_held(o));

            let cmd = if is_held && !opposed && !was_active {
                self.state.set(key, true);
                Some(self.start_command(key))
            } else if was_active && !is_held {
                self.state.set(key, false);
                Some(Self::stop_command(key))
            } else {
                None
            };

            if let Some(cmd) = cmd {
                // ORDER has five keys, each emitting at most once.
                let _ = out.push(cmd);
            }
        }

        self.state.set(Key::J, held.is_held(Key::J));
        out
    }

    fn start_command(&self, key: Key) -> Command {
        match key {
            Key::W => Command::tilt(self.tilt_speed),
            Key::S => Command::tilt(-self.tilt_speed),
            Key::A => Command::pan(-self.pan_speed),
            Key::D => Command::pan(self.pan_speed),
            Key::F | Key::J => Command::Fire { on: true },
        }
    }

    fn stop_command(key: Key) -> Command {
        match key {
            Key::W | Key::S => Command::tilt(0.0),
            Key::A | Key::D => Command::pan(0.0),
            Key::F | Key::J => Command::Fire { on: false },
        }
    }

    /// Key state carried into the next line.
    pub fn key_state(&self) -> KeyState {
        self.state
    }
}
