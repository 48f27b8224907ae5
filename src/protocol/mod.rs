//! Serial line protocol.
//!
//! ```text
//!   Transport ──▶ LineReader ──▶ CommandDecoder ──▶ Commands
//!   (bytes)       (\n framing)    (snapshot | structured)
//! ```
//!
//! The host speaks one of two encodings, chosen by configuration. Both
//! produce the same [`Command`](crate::app::commands::Command) values.

pub mod line;
pub mod snapshot;
pub mod structured;
pub mod transport;

use crate::config::{DecodeMode, TurretConfig};
use crate::error::DecodeError;

pub use line::{Line, LineDecoder, LineReader};
pub use snapshot::{Commands, SnapshotDecoder};
pub use transport::{NullTransport, Transport};

/// Decodes one line at a time in the configured encoding.
///
/// Snapshot decoding is stateful (it tracks held keys between lines),
/// so one decoder instance must see every line in order.
#[derive(Debug, Clone)]
pub enum CommandDecoder {
    Snapshot(SnapshotDecoder),
    Structured,
}

impl CommandDecoder {
    pub fn new(config: &TurretConfig) -> Self {
        match config.decode_mode {
            DecodeMode::Snapshot => Self::Snapshot(SnapshotDecoder::new(
                config.op_pan_speed,
                config.op_tilt_speed,
            )),
            DecodeMode::Structured => Self::Structured,
        }
    }

    pub fn mode(&self) -> DecodeMode {
        match self {
            Self::Snapshot(_) => DecodeMode::Snapshot,
            Self::Structured => DecodeMode::Structured,
        }
    }

    /// Decode a line. Snapshot lines never fail; structured lines fail
    /// with the reason to show on the display.
    pub fn decode(&mut self, line: &str) -> Result<Commands, DecodeError> {
        match self {
            Self::Snapshot(d) => Ok(d.decode(line)),
            Self::Structured => {
                let mut out = Commands::new();
                if let Some(cmd) = structured::decode(line)? {
                    let _ = out.push(cmd);
                }
                Ok(out)
            }
        }
    }
}
