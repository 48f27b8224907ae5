//! Continuous-rotation stepper driver (A4988 carrier).
//!
//! STEP is a 50 % duty LEDC pulse train whose frequency sets the speed;
//! DIR is a plain output. There is no position tracking and no ramping:
//! a speed change takes effect on the next PWM period.
//!
//! A speed change that fails part-way leaves the axis stopped, never
//! running the previous pulse train under a new direction.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM via hw_init helpers.
//! On host/test: tracks state in-memory only.

use embedded_hal::digital::OutputPin;
use serde::{Deserialize, Serialize};

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperState {
    Stopped,
    Running { freq_hz: u32, dir: Direction },
}

/// LEDC resources backing one STEP output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepChannel {
    pub ledc_channel: u32,
    pub ledc_timer: u32,
}

impl StepChannel {
    pub const PAN: Self = Self {
        ledc_channel: hw_init::LEDC_CH_PAN_STEP,
        ledc_timer: hw_init::LEDC_TIMER_PAN,
    };
    pub const TILT: Self = Self {
        ledc_channel: hw_init::LEDC_CH_TILT_STEP,
        ledc_timer: hw_init::LEDC_TIMER_TILT,
    };
}

/// PWM resource that produces a STEP pulse train.
pub trait StepOutput {
    fn set_frequency(&mut self, freq_hz: u32) -> Result<(), ActuatorError>;
    fn set_duty(&mut self, duty: u32) -> Result<(), ActuatorError>;
}

impl StepOutput for StepChannel {
    fn set_frequency(&mut self, freq_hz: u32) -> Result<(), ActuatorError> {
        hw_init::ledc_set_frequency(self.ledc_timer, freq_hz)
    }

    fn set_duty(&mut self, duty: u32) -> Result<(), ActuatorError> {
        hw_init::ledc_set(self.ledc_channel, duty)
    }
}

/// Pulse frequency for a signed speed fraction: floor(max × |s|), with
/// `s` clamped to [-1, 1]. NaN maps to 0.
pub fn step_frequency(max_steps_per_sec: u32, speed: f32) -> u32 {
    let s = if speed.is_nan() { 0.0 } else { speed.clamp(-1.0, 1.0) };
    (max_steps_per_sec as f32 * s.abs()).floor() as u32
}

pub struct StepperDriver<S: StepOutput, D: OutputPin> {
    step: S,
    dir_pin: D,
    max_steps_per_sec: u32,
    state: StepperState,
}

impl<S: StepOutput, D: OutputPin> StepperDriver<S, D> {
    pub fn new(step: S, dir_pin: D, max_steps_per_sec: u32) -> Self {
        Self {
            step,
            dir_pin,
            max_steps_per_sec,
            state: StepperState::Stopped,
        }
    }

    /// Run at `speed` (fraction of max, clamped to [-1, 1]). Zero, or a
    /// fraction below the slowest rate the step timer can generate, stops
    /// the train. On any write failure the train is stopped before the
    /// error is returned.
    pub fn set_speed(&mut self, speed: f32) -> Result<(), ActuatorError> {
        let freq_hz = step_frequency(self.max_steps_per_sec, speed);
        if freq_hz < pins::STEP_PWM_MIN_FREQ_HZ {
            return self.stop();
        }

        let dir = if speed > 0.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        if let Err(e) = self.start(dir, freq_hz) {
            let _ = self.stop();
            return Err(e);
        }

        self.state = StepperState::Running { freq_hz, dir };
        Ok(())
    }

    fn start(&mut self, dir: Direction, freq_hz: u32) -> Result<(), ActuatorError> {
        self.set_direction_hw(dir)?;
        self.step.set_frequency(freq_hz)?;
        self.step.set_duty(hw_init::STEP_DUTY_HALF)
    }

    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        // State goes to Stopped even if the duty write fails, so a retry
        // is not short-circuited by a stale Running state.
        self.state = StepperState::Stopped;
        self.step.set_duty(0)
    }

    fn set_direction_hw(&mut self, dir: Direction) -> Result<(), ActuatorError> {
        let res = match dir {
            Direction::Forward => self.dir_pin.set_high(),
            Direction::Reverse => self.dir_pin.set_low(),
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)
    }

    pub fn state(&self) -> StepperState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, StepperState::Stopped)
    }

    pub fn max_steps_per_sec(&self) -> u32 {
        self.max_steps_per_sec
    }
}

// ── Microstep select ──────────────────────────────────────────

/// A4988 microstep resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Microstep {
    Full,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl Microstep {
    /// MS1, MS2, MS3 levels for this resolution.
    pub const fn levels(self) -> [bool; 3] {
        match self {
            Microstep::Full => [false, false, false],
            Microstep::Half => [true, false, false],
            Microstep::Quarter => [false, true, false],
            Microstep::Eighth => [true, true, false],
            Microstep::Sixteenth => [true, true, true],
        }
    }

    /// Microsteps per full step.
    pub const fn divisor(self) -> u32 {
        match self {
            Microstep::Full => 1,
            Microstep::Half => 2,
            Microstep::Quarter => 4,
            Microstep::Eighth => 8,
            Microstep::Sixteenth => 16,
        }
    }
}

/// The three shared MS lines. Applied once at bring-up.
pub struct MicrostepSelect<P: OutputPin> {
    pins: [P; 3],
}

impl<P: OutputPin> MicrostepSelect<P> {
    pub fn new(ms1: P, ms2: P, ms3: P) -> Self {
        Self {
            pins: [ms1, ms2, ms3],
        }
    }

    pub fn apply(&mut self, mode: Microstep) -> Result<(), ActuatorError> {
        for (pin, high) in self.pins.iter_mut().zip(mode.levels()) {
            pin.set_state(high.into())
                .map_err(|_| ActuatorError::GpioWriteFailed)?;
        }
        log::info!("stepper: microstep 1/{}", mode.divisor());
        Ok(())
    }

    pub fn into_pins(self) -> [P; 3] {
        self.pins
    }
}
