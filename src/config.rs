//! System configuration parameters
//!
//! Every threshold and timing constant for the clothesline controller.
//! The values are fixed at compile time; [`SystemConfig`] exists so the
//! control components can be constructed (and tested) with explicit
//! parameters instead of reaching for globals.

use crate::error::{Error, Result};

// --- Sensor thresholds (raw 10-bit ADC counts) ---

/// Rain sensor reading *below* this value means "wet" (inverted sensor).
pub const RAIN_THRESHOLD: u16 = 500;
/// Light sensor reading *above* this value means "day".
pub const LIGHT_THRESHOLD: u16 = 200;
/// Full-scale raw analog reading after normalisation.
pub const ADC_FULL_SCALE: u16 = 1023;

// --- Motor ---

/// Time for a full retract or extend travel (ms). Sole travel interlock.
pub const ROTATION_TIME_MS: u32 = 7000;
/// Drive magnitude written to the enable output (0-255).
pub const MOTOR_SPEED: u8 = 255;

// --- Manual pulse protocol ---

/// Maximum gap between rising edges that still belong to one sequence (ms).
pub const PULSE_TIMEOUT_MS: u32 = 500;
/// Quiet period after the last rising edge before the count commits (ms).
pub const COMMAND_DELAY_MS: u32 = 750;

// --- Loop cadence ---

/// Status snapshot cadence (ms).
pub const STATUS_INTERVAL_MS: u32 = 1000;
/// Fixed delay between control ticks (ms).
pub const LOOP_INTERVAL_MS: u32 = 10;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    // --- Sensors ---
    /// Rain threshold; readings below it count as raining.
    pub rain_threshold: u16,
    /// Light threshold; readings above it count as daylight.
    pub light_threshold: u16,

    // --- Motor ---
    /// Travel-time cutoff in milliseconds.
    pub rotation_time_ms: u32,
    /// PWM magnitude applied while the motor runs (0-255).
    pub motor_speed: u8,

    // --- Pulse decoding ---
    pub pulse_timeout_ms: u32,
    pub command_delay_ms: u32,

    // --- Timing ---
    /// Status report interval (milliseconds)
    pub status_interval_ms: u32,
    /// Control loop interval (milliseconds)
    pub loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            rain_threshold: RAIN_THRESHOLD,
            light_threshold: LIGHT_THRESHOLD,

            rotation_time_ms: ROTATION_TIME_MS,
            motor_speed: MOTOR_SPEED,

            pulse_timeout_ms: PULSE_TIMEOUT_MS,
            command_delay_ms: COMMAND_DELAY_MS,

            status_interval_ms: STATUS_INTERVAL_MS, // 1 Hz
            loop_interval_ms: LOOP_INTERVAL_MS,     // 100 Hz
        }
    }
}

impl SystemConfig {
    /// Reject parameter combinations the control loop cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.rain_threshold > ADC_FULL_SCALE {
            return Err(Error::Config("rain_threshold above ADC full scale"));
        }
        if self.light_threshold > ADC_FULL_SCALE {
            return Err(Error::Config("light_threshold above ADC full scale"));
        }
        if self.rotation_time_ms == 0 {
            return Err(Error::Config("rotation_time_ms must be non-zero"));
        }
        if self.command_delay_ms == 0 {
            return Err(Error::Config("command_delay_ms must be non-zero"));
        }
        if self.pulse_timeout_ms > self.command_delay_ms {
            return Err(Error::Config(
                "pulse_timeout_ms must not exceed command_delay_ms",
            ));
        }
        if self.status_interval_ms == 0 {
            return Err(Error::Config("status_interval_ms must be non-zero"));
        }
        if self.loop_interval_ms == 0 || self.loop_interval_ms >= self.pulse_timeout_ms {
            return Err(Error::Config(
                "loop_interval_ms must be non-zero and shorter than pulse_timeout_ms",
            ));
        }
        Ok(())
    }
}
