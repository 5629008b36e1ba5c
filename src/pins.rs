//! GPIO / peripheral pin assignments for the clothesline controller board
//! (ESP32-S3).
//!
//! Every driver references this module rather than hard-coding pin
//! numbers.

// ---------------------------------------------------------------------------
// Line motor driver (L298N H-bridge)
// ---------------------------------------------------------------------------

/// LEDC PWM output to the bridge enable input (ENA).
pub const MOTOR_EN_GPIO: i32 = 10;
/// Direction input IN1: HIGH with IN2 LOW retracts the line.
pub const MOTOR_IN1_GPIO: i32 = 11;
/// Direction input IN2: HIGH with IN1 LOW extends the line.
pub const MOTOR_IN2_GPIO: i32 = 12;

/// LEDC channel driving [`MOTOR_EN_GPIO`].
pub const MOTOR_LEDC_CHANNEL: u32 = 0;
/// PWM carrier for the enable input.  8-bit resolution.
pub const MOTOR_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// Sensors (ADC1)
// ---------------------------------------------------------------------------

/// Rain sensor module, analog output.  ADC1 channel 5 (GPIO 6).
pub const RAIN_ADC_CHANNEL: u32 = 5;
/// LDR light sensor divider.  ADC1 channel 6 (GPIO 7).
pub const LIGHT_ADC_CHANNEL: u32 = 6;

// ---------------------------------------------------------------------------
// Manual command input
// ---------------------------------------------------------------------------

/// Pulse-coded command line from the companion controller.
/// Pulled down on board; idle LOW, pulses HIGH.
pub const COMMAND_GPIO: i32 = 4;
