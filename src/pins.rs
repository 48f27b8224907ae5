//! GPIO / peripheral pin assignments for the sentry turret controller board.
//!
//! Every driver references this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Pan / tilt steppers (A4988 carriers)
// ---------------------------------------------------------------------------

/// LEDC PWM output: pan STEP pulse train.
pub const PAN_STEP_GPIO: i32 = 17;
/// Digital output: pan DIR (HIGH = forward).
pub const PAN_DIR_GPIO: i32 = 16;
/// LEDC PWM output: tilt STEP pulse train.
pub const TILT_STEP_GPIO: i32 = 13;
/// Digital output: tilt DIR (HIGH = forward).
pub const TILT_DIR_GPIO: i32 = 12;

/// Shared A4988 ENABLE line. LOW = coils energised (hold on).
pub const HOLD_GPIO: i32 = 11;

/// Shared A4988 microstep select lines.
pub const MS1_GPIO: i32 = 4;
pub const MS2_GPIO: i32 = 5;
pub const MS3_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Trigger mechanism
// ---------------------------------------------------------------------------

/// LEDC PWM output: MG996R trigger servo signal.
pub const TRIGGER_SERVO_GPIO: i32 = 15;
/// Digital output: flywheel motor relay coil (HIGH = spinning).
pub const FLYWHEEL_RELAY_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Heartbeat LED.
pub const STATUS_LED_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Host serial link (UART1)
// ---------------------------------------------------------------------------

/// GPIO43/44 stay with the UART0 console, which carries the log and
/// the status display text.
pub const HOST_UART_TX_GPIO: i32 = 1;
pub const HOST_UART_RX_GPIO: i32 = 2;
pub const HOST_UART_BAUD: u32 = 115_200;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC duty resolution for the step trains (bits). On the 80 MHz APB
/// clock, 13 bits spans the divider range of roughly 10 Hz to 9.7 kHz.
pub const STEP_PWM_RESOLUTION_BITS: u32 = 13;
/// Slowest step rate the step timers can be programmed to.
pub const STEP_PWM_MIN_FREQ_HZ: u32 = 10;
/// Fastest step rate: APB / 2^13, rounded down.
pub const STEP_PWM_MAX_FREQ_HZ: u32 = 9_765;
/// Idle frequency programmed into the step timers before the first move.
pub const STEP_PWM_IDLE_FREQ_HZ: u32 = 1_000;
/// LEDC duty resolution for the servo (bits). 14-bit gives ~1.2 µs steps at 50 Hz.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// Hobby servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
