//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements    | Connects to                |
//! |---------------|---------------|----------------------------|
//! | `hardware`    | ActuatorPort  | ESP32 LEDC PWM, GPIO       |
//! | `log_display` | DisplayPort   | Serial log output          |
//! | `nvs`         | ConfigPort    | NVS / in-memory store      |
//! | `time`        | Clock         | async-io-mini timers       |
//! | `uart`        | Transport     | ESP32 UART1 (host link)    |

pub mod hardware;
pub mod log_display;
pub mod nvs;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
