//! Analog rain and light sensors.
//!
//! Both sensors are resistive modules read through an ADC channel and
//! normalised to a 10-bit range (0–1023).  The rain module reads *low*
//! when wet; the light module (LDR divider) reads *high* when bright.
//! Interpretation against thresholds happens in the environment policy,
//! this layer only delivers raw counts.

use log::{info, warn};

use crate::config::ADC_FULL_SCALE;
use crate::error::SensorError;

/// A source of raw analog samples, already scaled to 0–1023.
///
/// Implemented by the ESP-IDF ADC adapter in production and by plain
/// closures or mocks in tests.
pub trait AnalogSource {
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

impl<F> AnalogSource for F
where
    F: FnMut() -> Result<u16, SensorError>,
{
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self()
    }
}

/// Wraps an [`AnalogSource`], clamping readings and retaining the last
/// good value when a read fails.
pub struct AnalogSensor<S> {
    name: &'static str,
    source: S,
    last: u16,
    failing: bool,
}

impl<S: AnalogSource> AnalogSensor<S> {
    /// `initial` is reported until the first successful read.
    pub fn new(name: &'static str, source: S, initial: u16) -> Self {
        Self {
            name,
            source,
            last: initial.min(ADC_FULL_SCALE),
            failing: false,
        }
    }

    pub fn read(&mut self) -> u16 {
        match self.source.read_raw() {
            Ok(raw) => {
                if self.failing {
                    info!("{} sensor recovered", self.name);
                    self.failing = false;
                }
                self.last = raw.min(ADC_FULL_SCALE);
            }
            Err(e) => {
                if !self.failing {
                    warn!("{} sensor: {}, holding {}", self.name, e, self.last);
                    self.failing = true;
                }
            }
        }
        self.last
    }

    pub fn last(&self) -> u16 {
        self.last
    }
}
