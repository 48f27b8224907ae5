//! Transport abstraction: any non-blocking byte source.
//!
//! Concrete implementations:
//! - UART from the host (ESP32-S3 UART1)
//! - [`NullTransport`] on host builds
//! - scripted byte queues in tests
//!
//! The line reader is generic over `Transport`, so the decoder never
//! knows where its bytes come from.

use crate::error::TransportError;

/// Byte-oriented receive channel.
pub trait Transport {
    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;
}

/// A null transport that never delivers a byte.
/// Used on host builds where no serial link exists.
pub struct NullTransport;

impl Transport for NullTransport {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, TransportError> {
        Ok(0)
    }

    fn available(&self) -> bool {
        false
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        (**self).read(buf)
    }

    fn available(&self) -> bool {
        (**self).available()
    }
}
