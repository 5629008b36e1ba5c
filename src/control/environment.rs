//! Light/rain automation with edge-triggered latches.
//!
//! Each environmental transition fires the motor at most once.  Four
//! one-shot flags remember that the move for the current condition has
//! been taken; each flag is cleared when the opposite condition becomes
//! true, re-arming it for the next transition.
//!
//! ## Decision table (fixed evaluation order = priority)
//!
//! | # | Condition                                   | Move      | Latches                 |
//! |---|---------------------------------------------|-----------|-------------------------|
//! | 1 | day, (!light or dark), dry                  | `Extend`  | light=1, dark=0         |
//! | 1 | day, (!light or dark), raining              | none      | (logged only)           |
//! | 2 | day, raining, !rain_wet                     | `Retract` | rain_wet=1              |
//! | 2 | day, dry, !rain_dry                         | `Extend`  | rain_dry=1              |
//! | 3 | night, !dark                                | `Retract` | dark=1, light=0         |
//!
//! Rows 1 and 2 can both request a move in the same cycle.  The
//! controller applies requests in order and only the first one that
//! reaches an idle motor takes effect; the latches of later rows are set
//! regardless.
//!
//! The rain sensor is inverted: a *lower* raw reading means wetter.

use heapless::Vec;
use log::debug;

use super::Direction;
use crate::config::SystemConfig;

/// Why an automated move was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Daylight,
    RainStarted,
    RainStopped,
    Nightfall,
}

/// One automated move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoMove {
    pub trigger: Trigger,
    pub direction: Direction,
}

/// Move requests from one evaluation, in priority order.
pub type AutoMoves = Vec<AutoMove, 3>;

/// Thresholded view of the two analog sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conditions {
    pub is_day: bool,
    pub is_raining: bool,
}

/// One-shot latches, owned by [`ControllerState`](super::ControllerState).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentFlags {
    pub ran_light_move: bool,
    pub ran_dark_move: bool,
    pub ran_rain_wet_move: bool,
    pub ran_rain_dry_move: bool,
}

impl EnvironmentFlags {
    /// Clear every latch whose opposing condition currently holds.
    pub fn decay(&mut self, c: Conditions) {
        if !c.is_day {
            self.ran_light_move = false;
        }
        if c.is_day {
            self.ran_dark_move = false;
        }
        if !c.is_raining {
            self.ran_rain_wet_move = false;
        }
        if c.is_raining {
            self.ran_rain_dry_move = false;
        }
    }

    /// The daylight rain hold is reported only on the cycle rain is first
    /// seen, before the rain row latches.
    pub fn announces_rain_hold(&self) -> bool {
        !self.ran_rain_wet_move
    }
}

pub struct EnvironmentPolicy {
    rain_threshold: u16,
    light_threshold: u16,
}

impl EnvironmentPolicy {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            rain_threshold: config.rain_threshold,
            light_threshold: config.light_threshold,
        }
    }

    pub fn conditions(&self, rain_raw: u16, light_raw: u16) -> Conditions {
        Conditions {
            is_day: light_raw > self.light_threshold,
            is_raining: rain_raw < self.rain_threshold,
        }
    }

    /// Evaluate the decision table.
    ///
    /// `armed` is the arbiter's gate (motor idle, no manual pulse
    /// pending).  When it is false nothing is evaluated and the latches
    /// are left untouched.
    pub fn evaluate(
        &self,
        flags: &mut EnvironmentFlags,
        rain_raw: u16,
        light_raw: u16,
        armed: bool,
    ) -> AutoMoves {
        let mut moves = AutoMoves::new();
        if !armed {
            return moves;
        }

        let c = self.conditions(rain_raw, light_raw);

        if c.is_day {
            if !flags.ran_light_move || flags.ran_dark_move {
                if c.is_raining {
                    if flags.announces_rain_hold() {
                        debug!("Rain detected in daylight, holding position");
                    }
                } else {
                    request(&mut moves, Trigger::Daylight, Direction::Extend);
                    flags.ran_light_move = true;
                    flags.ran_dark_move = false;
                }
            }

            if c.is_raining && !flags.ran_rain_wet_move {
                request(&mut moves, Trigger::RainStarted, Direction::Retract);
                flags.ran_rain_wet_move = true;
            } else if !c.is_raining && !flags.ran_rain_dry_move {
                request(&mut moves, Trigger::RainStopped, Direction::Extend);
                flags.ran_rain_dry_move = true;
            }
        } else if !flags.ran_dark_move {
            request(&mut moves, Trigger::Nightfall, Direction::Retract);
            flags.ran_dark_move = true;
            flags.ran_light_move = false;
        }

        flags.decay(c);
        moves
    }
}

fn request(moves: &mut AutoMoves, trigger: Trigger, direction: Direction) {
    // At most two rows fire per cycle; capacity is never exceeded.
    let _ = moves.push(AutoMove { trigger, direction });
}
