//! UART transport from the host.
//!
//! Implements [`Transport`] over ESP-IDF's UART driver with zero-timeout
//! reads, so polling never blocks the executor thread.

use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{config::Config, UartDriver};
use esp_idf_hal::units::Hertz;
use log::info;

use crate::drivers::hw_init::HwInitError;
use crate::error::TransportError;
use crate::pins;
use crate::protocol::Transport;

pub struct UartTransport {
    driver: UartDriver<'static>,
}

impl UartTransport {
    /// Take UART1 on the host link pins.
    pub fn new(peripherals: Peripherals) -> Result<Self, HwInitError> {
        let config = Config::new().baudrate(Hertz(pins::HOST_UART_BAUD));
        // SAFETY: the host link pins are not claimed by any other driver;
        // pins.rs is the single assignment table.
        let (tx, rx) = unsafe {
            (
                AnyIOPin::new(pins::HOST_UART_TX_GPIO),
                AnyIOPin::new(pins::HOST_UART_RX_GPIO),
            )
        };
        let driver = UartDriver::new(
            peripherals.uart1,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )
        .map_err(|e| HwInitError::GpioConfigFailed(e.code()))?;
        info!("UartTransport: UART1 @ {} baud", pins::HOST_UART_BAUD);
        Ok(Self { driver })
    }
}

impl Transport for UartTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self.driver.read(buf, NON_BLOCK) {
            Ok(n) => Ok(n),
            Err(e) if e.code() == esp_idf_svc::sys::ESP_ERR_TIMEOUT as i32 => Ok(0),
            Err(_) => Err(TransportError::ReadFailed),
        }
    }

    fn available(&self) -> bool {
        self.driver.remaining_read().map(|n| n > 0).unwrap_or(false)
    }
}
