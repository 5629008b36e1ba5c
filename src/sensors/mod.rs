//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every input and produces a [`SensorSnapshot`] each tick
//! for the controller.

pub mod analog;
pub mod command_line;

use embedded_hal::digital::InputPin;

use crate::app::ports::SensorSnapshot;
use analog::{AnalogSensor, AnalogSource};
use command_line::CommandLine;

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub<C, R, L> {
    pub command: CommandLine<C>,
    pub rain: AnalogSensor<R>,
    pub light: AnalogSensor<L>,
}

impl<C, R, L> SensorHub<C, R, L>
where
    C: InputPin,
    R: AnalogSource,
    L: AnalogSource,
{
    /// Until their first successful read, the rain sensor reports dry
    /// (full scale) and the light sensor reports dark (zero).
    pub fn new(command_pin: C, rain: R, light: L) -> Self {
        Self {
            command: CommandLine::new(command_pin),
            rain: AnalogSensor::new("rain", rain, crate::config::ADC_FULL_SCALE),
            light: AnalogSensor::new("light", light, 0),
        }
    }

    /// Read every input and return a unified snapshot.
    ///
    /// Individual read failures are logged and the previous good value is
    /// retained.
    pub fn sample(&mut self) -> SensorSnapshot {
        SensorSnapshot {
            command_line: self.command.read(),
            rain_raw: self.rain.read(),
            light_raw: self.light.read(),
        }
    }
}
