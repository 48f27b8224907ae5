//! Log-backed status display.
//!
//! Implements [`DisplayPort`] by writing each message to the logger
//! (which goes to UART / USB-CDC in production). The last message is kept
//! so it can be queried.

use log::info;

use crate::app::ports::DisplayPort;

pub struct LogDisplay {
    last: heapless::String<64>,
}

impl Default for LogDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl LogDisplay {
    pub fn new() -> Self {
        Self {
            last: heapless::String::new(),
        }
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}

impl DisplayPort for LogDisplay {
    fn show(&mut self, text: &str) {
        info!("DISPLAY | {}", text);
        self.last.clear();
        for c in text.chars() {
            if self.last.push(c).is_err() {
                break;
            }
        }
    }
}
