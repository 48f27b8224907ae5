//! Sentry Turret Firmware: Main Entry Point
//!
//! Hexagonal architecture on a single-threaded cooperative executor.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogDisplay    NvsAdapter    AsyncIoClock    │
//! │  (ActuatorPort)    (DisplayPort) (ConfigPort)  (Clock)         │
//! │  UartTransport                                                 │
//! │  (Transport)                                                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              SentryContext (pure logic)                │    │
//! │  │  Decoder · ActiveCommandSet · FireControl              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{info, warn};

use sentry::adapters::hardware::HardwareAdapter;
use sentry::adapters::log_display::LogDisplay;
use sentry::adapters::nvs::NvsAdapter;
use sentry::adapters::time::AsyncIoClock;
use sentry::adapters::uart::UartTransport;
use sentry::app::ports::ConfigPort;
use sentry::app::service::SentryContext;
use sentry::config::TurretConfig;
use sentry::drivers::hw_init;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Sentry v{}                          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    hw_init::init_peripherals().map_err(|e| anyhow::anyhow!("HAL init failed: {}", e))?;

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new().and_then(|nvs| nvs.load()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            TurretConfig::default()
        }
    };
    info!(
        "Config: {:?} mode, firing sequence {} ms",
        config.decode_mode,
        config.firing_sequence_ms()
    );

    // ── 4. Adapters ───────────────────────────────────────────
    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
    let transport = UartTransport::new(peripherals)
        .map_err(|e| anyhow::anyhow!("UART init failed: {}", e))?;
    let hardware = HardwareAdapter::new(&config)
        .map_err(|e| anyhow::anyhow!("actuator bring-up failed: {}", e))?;

    // ── 5. Run ────────────────────────────────────────────────
    let ctx = SentryContext::new(config, hardware, LogDisplay::new(), transport, AsyncIoClock::new());
    info!("System ready. Entering executor.");
    ctx.run();

    Ok(())
}
