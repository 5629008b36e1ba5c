//! Manual-command input line from the companion controller.
//!
//! A plain digital input, polled once per tick.  Edge detection and
//! pulse counting happen in the pulse decoder; this driver only reports
//! the level, holding the previous level if a read fails.

use embedded_hal::digital::InputPin;
use log::warn;

pub struct CommandLine<P> {
    pin: P,
    last: bool,
    failing: bool,
}

impl<P: InputPin> CommandLine<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last: false,
            failing: false,
        }
    }

    /// Current line level (`true` = HIGH).
    pub fn read(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => {
                self.failing = false;
                self.last = level;
            }
            Err(e) => {
                if !self.failing {
                    warn!("Command line read failed: {:?}", e);
                    self.failing = true;
                }
            }
        }
        self.last
    }
}
