//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions and LEDC timers/channels using raw ESP-IDF
//! sys calls. Called once from `main()` before the executor starts.
//!
//! ```text
//!   LEDC timer 0 ── CH0 ── pan STEP      (10 Hz..9.7 kHz, 13-bit, APB)
//!   LEDC timer 1 ── CH1 ── tilt STEP     (10 Hz..9.7 kHz, 13-bit, APB)
//!   LEDC timer 2 ── CH2 ── trigger servo (50 Hz, 14-bit)
//! ```

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};

use crate::error::ActuatorError;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        match e {
            HwInitError::GpioConfigFailed(_) => Self::Init("GPIO config failed"),
            HwInitError::LedcInitFailed(_) => Self::Init("LEDC config failed"),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the executor; single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::PAN_DIR_GPIO,
        pins::TILT_DIR_GPIO,
        pins::HOLD_GPIO,
        pins::MS1_GPIO,
        pins::MS2_GPIO,
        pins::MS3_GPIO,
        pins::FLYWHEEL_RELAY_GPIO,
        pins::STATUS_LED_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin as gpio_num_t, 0) };
    }

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Executor thread only.
    let ret = unsafe { gpio_set_level(pin as gpio_num_t, if high { 1 } else { 0 }) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::GpioWriteFailed);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) -> Result<(), ActuatorError> {
    Ok(())
}

// ── Output pin handle ─────────────────────────────────────────

/// A configured push-pull output, exposed through `embedded-hal` so the
/// drivers can be written against the trait and fed mock pins in tests.
///
/// The commanded level is mirrored in memory; on host that mirror is the
/// whole pin.
#[derive(Debug)]
pub struct OutputGpio {
    pin: i32,
    level: bool,
}

impl OutputGpio {
    pub const fn new(pin: i32) -> Self {
        Self { pin, level: false }
    }

    pub const fn pin(&self) -> i32 {
        self.pin
    }
}

impl ErrorType for OutputGpio {
    type Error = Infallible;
}

impl OutputPin for OutputGpio {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if let Err(e) = gpio_write(self.pin, false) {
            log::warn!("gpio {}: {}", self.pin, e);
        }
        self.level = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if let Err(e) = gpio_write(self.pin, true) {
            log::warn!("gpio {}: {}", self.pin, e);
        }
        self.level = true;
        Ok(())
    }
}

impl StatefulOutputPin for OutputGpio {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level)
    }
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_PAN_STEP: u32 = 0;
pub const LEDC_CH_TILT_STEP: u32 = 1;
pub const LEDC_CH_SERVO: u32 = 2;

pub const LEDC_TIMER_PAN: u32 = 0;
pub const LEDC_TIMER_TILT: u32 = 1;
pub const LEDC_TIMER_SERVO: u32 = 2;

/// 50 % duty at the step-train resolution.
pub const STEP_DUTY_HALF: u32 = 1 << (pins::STEP_PWM_RESOLUTION_BITS - 1);

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Step timers start at an idle frequency with duty 0 (no pulses).
    // SAFETY: Called from single main-task context via init_peripherals().
    // Step timers are pinned to APB so later ledc_set_freq calls keep the
    // same divider range.
    let timers = [
        (
            LEDC_TIMER_PAN,
            ledc_timer_bit_t_LEDC_TIMER_13_BIT,
            pins::STEP_PWM_IDLE_FREQ_HZ,
            soc_periph_ledc_clk_src_legacy_t_LEDC_USE_APB_CLK,
        ),
        (
            LEDC_TIMER_TILT,
            ledc_timer_bit_t_LEDC_TIMER_13_BIT,
            pins::STEP_PWM_IDLE_FREQ_HZ,
            soc_periph_ledc_clk_src_legacy_t_LEDC_USE_APB_CLK,
        ),
        (
            LEDC_TIMER_SERVO,
            ledc_timer_bit_t_LEDC_TIMER_14_BIT,
            pins::SERVO_PWM_FREQ_HZ,
            soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ),
    ];
    for (timer_num, duty_resolution, freq_hz, clk_cfg) in timers {
        let cfg = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num,
            duty_resolution,
            freq_hz,
            clk_cfg,
            ..Default::default()
        };
        let ret = unsafe { ledc_timer_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed(ret));
        }
    }

    let channels = [
        (LEDC_CH_PAN_STEP, LEDC_TIMER_PAN, pins::PAN_STEP_GPIO),
        (LEDC_CH_TILT_STEP, LEDC_TIMER_TILT, pins::TILT_STEP_GPIO),
        (LEDC_CH_SERVO, LEDC_TIMER_SERVO, pins::TRIGGER_SERVO_GPIO),
    ];
    for (channel, timer_sel, gpio_num) in channels {
        let ret = unsafe {
            ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel,
                timer_sel,
                gpio_num,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            })
        };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed(ret));
        }
    }

    info!("hw_init: LEDC configured (pan=CH0, tilt=CH1, servo=CH2)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) -> Result<(), ActuatorError> {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the executor thread calls this.
    let ret = unsafe {
        let ret = ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        if ret == ESP_OK as i32 {
            ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel)
        } else {
            ret
        }
    };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::PwmWriteFailed);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) -> Result<(), ActuatorError> {
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set_frequency(timer: u32, freq_hz: u32) -> Result<(), ActuatorError> {
    // SAFETY: timer was configured in init_ledc(); executor thread only.
    let ret = unsafe { ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, timer, freq_hz) };
    if ret != ESP_OK as i32 {
        return Err(ActuatorError::PwmWriteFailed);
    }
    Ok(())
}

/// Host stand-in: accepts exactly the range the step timers can reach.
#[cfg(not(target_os = "espidf"))]
pub fn ledc_set_frequency(_timer: u32, freq_hz: u32) -> Result<(), ActuatorError> {
    if (pins::STEP_PWM_MIN_FREQ_HZ..=pins::STEP_PWM_MAX_FREQ_HZ).contains(&freq_hz) {
        Ok(())
    } else {
        Err(ActuatorError::PwmWriteFailed)
    }
}
