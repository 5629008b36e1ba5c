//! Hardware adapter: bridges the sensor hub and the H-bridge driver to
//! the domain port traits.
//!
//! Owns the [`SensorHub`] and the [`HBridgeMotor`], exposing them
//! through [`SensorPort`] and [`MotorPort`].  Driver errors are logged
//! here and never reach the controller.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{MotorPort, SensorPort, SensorSnapshot};
use crate::control::Direction;
use crate::drivers::motor::HBridgeMotor;
use crate::sensors::SensorHub;
use crate::sensors::analog::AnalogSource;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<C, R, L, EN, A, B> {
    sensor_hub: SensorHub<C, R, L>,
    motor: HBridgeMotor<EN, A, B>,
}

impl<C, R, L, EN, A, B> HardwareAdapter<C, R, L, EN, A, B>
where
    C: InputPin,
    R: AnalogSource,
    L: AnalogSource,
    EN: SetDutyCycle,
    A: OutputPin,
    B: OutputPin,
{
    pub fn new(sensor_hub: SensorHub<C, R, L>, motor: HBridgeMotor<EN, A, B>) -> Self {
        Self { sensor_hub, motor }
    }

    pub fn motor(&self) -> &HBridgeMotor<EN, A, B> {
        &self.motor
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<C, R, L, EN, A, B> SensorPort for HardwareAdapter<C, R, L, EN, A, B>
where
    C: InputPin,
    R: AnalogSource,
    L: AnalogSource,
{
    fn sample(&mut self) -> SensorSnapshot {
        self.sensor_hub.sample()
    }
}

// ── MotorPort implementation ──────────────────────────────────

impl<C, R, L, EN, A, B> MotorPort for HardwareAdapter<C, R, L, EN, A, B>
where
    EN: SetDutyCycle,
    A: OutputPin,
    B: OutputPin,
{
    fn drive(&mut self, direction: Direction, magnitude: u8) {
        if let Err(e) = self.motor.drive(direction, magnitude) {
            warn!("Motor drive {:?} failed: {}, releasing", direction, e);
            if let Err(e) = self.motor.release() {
                warn!("Motor release failed: {}", e);
            }
        }
    }

    fn release(&mut self) {
        if let Err(e) = self.motor.release() {
            warn!("Motor release failed: {}", e);
        }
    }
}
