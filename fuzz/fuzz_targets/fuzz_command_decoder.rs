//! Fuzz target: `CommandDecoder::decode` in both encodings.
//!
//! Invariants checked:
//! - No panics on any UTF-8 line
//! - Snapshot mode never fails and emits at most five commands
//! - Structured mode emits at most one command, with speeds in [-1, 1]
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use sentry::app::commands::Command;
use sentry::config::{DecodeMode, TurretConfig};
use sentry::protocol::CommandDecoder;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let mut snapshot = CommandDecoder::new(&TurretConfig::default());
    let structured_cfg = TurretConfig {
        decode_mode: DecodeMode::Structured,
        ..TurretConfig::default()
    };
    let mut structured = CommandDecoder::new(&structured_cfg);

    for line in text.split('\n') {
        let cmds = snapshot.decode(line).expect("snapshot decode is infallible");
        assert!(cmds.len() <= 5);

        if let Ok(cmds) = structured.decode(line) {
            assert!(cmds.len() <= 1);
            for cmd in cmds {
                if let Command::PanTilt { speed, .. } = cmd {
                    assert!((-1.0..=1.0).contains(&speed));
                }
            }
        }
    }
});
