//! Newline-delimited line framing.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────────────┬──────┐
//! │ ASCII payload (≤ 128 bytes)  │ \n   │   any \r run before \n is dropped
//! └──────────────────────────────┴──────┘
//! ```
//!
//! The decoder accumulates incoming bytes and yields complete lines. A
//! single `Transport::read` may return part of a line or several lines
//! concatenated; at most one line is returned per `feed`, and the
//! unconsumed bytes are kept for the next call.

use heapless::String;

use super::transport::Transport;
use crate::error::TransportError;

/// Maximum line payload, excluding the terminator.
pub const MAX_LINE_LEN: usize = 128;

/// Bytes pulled from the transport per read.
const READ_CHUNK: usize = 64;

pub type Line = String<MAX_LINE_LEN>;

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Collecting payload bytes.
    Collecting,
    /// Buffer overran; dropping bytes until the next `\n`.
    Discarding,
}

/// Lines that never reached the decoder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    pub delivered: u32,
    pub overruns: u32,
    pub invalid_utf8: u32,
}

/// Streaming line decoder.
pub struct LineDecoder {
    state: DecoderState,
    buf: heapless::Vec<u8, MAX_LINE_LEN>,
    /// CRs seen since the last payload byte; held back until we know
    /// they are not the line terminator.
    held_cr: usize,
    stats: LineStats,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Collecting,
            buf: heapless::Vec::new(),
            held_cr: 0,
            stats: LineStats::default(),
        }
    }

    /// Feed bytes into the decoder.
    ///
    /// Returns the number of bytes consumed and, if the consumed bytes
    /// completed a line, that line. Callers re-feed `data[consumed..]`.
    pub fn feed(&mut self, data: &[u8]) -> (usize, Option<Line>) {
        for (i, &b) in data.iter().enumerate() {
            match self.state {
                DecoderState::Collecting => match b {
                    b'\n' => return (i + 1, self.finish_line()),
                    b'\r' => self.held_cr = self.held_cr.saturating_add(1),
                    _ => {
                        if self.push_payload(b).is_err() {
                            log::warn!("line: overrun past {} bytes, discarding", MAX_LINE_LEN);
                            self.stats.overruns = self.stats.overruns.wrapping_add(1);
                            self.buf.clear();
                            self.held_cr = 0;
                            self.state = DecoderState::Discarding;
                        }
                    }
                },
                DecoderState::Discarding => {
                    if b == b'\n' {
                        self.state = DecoderState::Collecting;
                    }
                }
            }
        }
        (data.len(), None)
    }

    /// Push a payload byte after any CRs it follows; those were interior.
    fn push_payload(&mut self, b: u8) -> Result<(), u8> {
        while self.held_cr > 0 {
            self.buf.push(b'\r')?;
            self.held_cr -= 1;
        }
        self.buf.push(b)
    }

    fn finish_line(&mut self) -> Option<Line> {
        self.held_cr = 0;
        let bytes = core::mem::take(&mut self.buf);
        match String::from_utf8(bytes) {
            Ok(line) => {
                self.stats.delivered = self.stats.delivered.wrapping_add(1);
                Some(line)
            }
            Err(_) => {
                log::warn!("line: not valid UTF-8, discarding");
                self.stats.invalid_utf8 = self.stats.invalid_utf8.wrapping_add(1);
                None
            }
        }
    }

    /// Drop any partial line (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.held_cr = 0;
        self.state = DecoderState::Collecting;
    }

    pub fn stats(&self) -> LineStats {
        self.stats
    }
}

/// Pulls bytes from a [`Transport`] and frames them into lines.
pub struct LineReader<T: Transport> {
    transport: T,
    decoder: LineDecoder,
    pending: [u8; READ_CHUNK],
    pending_start: usize,
    pending_end: usize,
}

impl<T: Transport> LineReader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: LineDecoder::new(),
            pending: [0; READ_CHUNK],
            pending_start: 0,
            pending_end: 0,
        }
    }

    /// Return one complete line if the buffered bytes hold one, reading
    /// from the transport as long as it has data. Never waits.
    pub fn poll_line(&mut self) -> Result<Option<Line>, TransportError> {
        loop {
            if self.pending_start < self.pending_end {
                let (used, line) = self
                    .decoder
                    .feed(&self.pending[self.pending_start..self.pending_end]);
                self.pending_start += used;
                if line.is_some() {
                    return Ok(line);
                }
                continue;
            }

            let n = self.transport.read(&mut self.pending)?;
            if n == 0 {
                return Ok(None);
            }
            self.pending_start = 0;
            self.pending_end = n;
        }
    }

    pub fn stats(&self) -> LineStats {
        self.decoder.stats()
    }
}
