//! Fuzz target: `LineDecoder::feed`
//!
//! Drives arbitrary byte sequences, split at a fuzzer-chosen point, into
//! the streaming line decoder and asserts that it never panics, never
//! yields an oversized line or one containing a terminator, and always
//! makes progress.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use sentry::protocol::line::{LineDecoder, MAX_LINE_LEN};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let split = data[0] as usize % data.len();
    let mut decoder = LineDecoder::new();

    for chunk in [&data[1..split.max(1)], &data[split.max(1)..]] {
        let mut rest = chunk;
        while !rest.is_empty() {
            let (used, line) = decoder.feed(rest);
            assert!(used > 0 && used <= rest.len(), "decoder must consume input");
            if let Some(line) = line {
                assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");
                assert!(!line.contains('\n'), "line kept its terminator");
                assert!(!line.ends_with('\r'), "CR not stripped");
            }
            rest = &rest[used..];
        }
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    let _ = decoder.feed(data);
});
