//! Line motor driver (L298N-style H-bridge).
//!
//! One PWM enable output sets the drive magnitude; two digital direction
//! outputs select the rotation.
//!
//! | IN1  | IN2  | Motion          |
//! |------|------|-----------------|
//! | HIGH | LOW  | Retract (IN)    |
//! | LOW  | HIGH | Extend (OUT)    |
//! | LOW  | LOW  | Stopped         |
//!
//! Both direction outputs are pulled LOW before the new one is raised,
//! so the bridge never sees IN1 = IN2 = HIGH.
//!
//! Generic over `embedded-hal` 1.0 traits: on ESP-IDF the outputs are the
//! `GpioOutput` and `LedcPwm` handles from `hw_init`; tests use recording
//! mocks.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::control::Direction;
use crate::error::{ActuatorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveState {
    Released,
    Driving { direction: Direction, magnitude: u8 },
}

pub struct HBridgeMotor<EN, A, B> {
    enable: EN,
    in1: A,
    in2: B,
    state: DriveState,
}

impl<EN, A, B> HBridgeMotor<EN, A, B>
where
    EN: SetDutyCycle,
    A: OutputPin,
    B: OutputPin,
{
    pub fn new(enable: EN, in1: A, in2: B) -> Self {
        Self {
            enable,
            in1,
            in2,
            state: DriveState::Released,
        }
    }

    /// Drive in `direction` with enable duty `magnitude / 255`.
    pub fn drive(&mut self, direction: Direction, magnitude: u8) -> Result<()> {
        self.in1.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.in2.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.enable
            .set_duty_cycle_fraction(u16::from(magnitude), u16::from(u8::MAX))
            .map_err(|_| ActuatorError::PwmWriteFailed)?;

        match direction {
            Direction::Retract => self
                .in1
                .set_high()
                .map_err(|_| ActuatorError::GpioWriteFailed)?,
            Direction::Extend => self
                .in2
                .set_high()
                .map_err(|_| ActuatorError::GpioWriteFailed)?,
        }

        self.state = DriveState::Driving {
            direction,
            magnitude,
        };
        Ok(())
    }

    /// Direction outputs LOW, enable off.  Every output is attempted even
    /// if an earlier one fails; the first error is reported.
    pub fn release(&mut self) -> Result<()> {
        let in1 = self.in1.set_low();
        let in2 = self.in2.set_low();
        let enable = self.enable.set_duty_cycle_fully_off();
        self.state = DriveState::Released;

        in1.map_err(|_| ActuatorError::GpioWriteFailed)?;
        in2.map_err(|_| ActuatorError::GpioWriteFailed)?;
        enable.map_err(|_| ActuatorError::PwmWriteFailed)?;
        Ok(())
    }

    pub fn state(&self) -> DriveState {
        self.state
    }

    pub fn is_driving(&self) -> bool {
        !matches!(self.state, DriveState::Released)
    }
}
