//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the
//! ESP-IDF logger (UART / USB-CDC in production).

use log::{debug, info};

use crate::app::events::{AppEvent, MoveSource};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(s) => {
                info!("{}", s.line());
            }
            AppEvent::PhaseChanged { from, to } => {
                debug!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::PulseCounted { count } => {
                info!("PULSE | count={}", count);
            }
            AppEvent::ManualCommand(direction) => {
                info!("CMD | manual {}", direction.label());
            }
            AppEvent::PulsesDiscarded { count } => {
                info!("CMD | {} pulses ignored", count);
            }
            AppEvent::MotorStarted { direction, source } => match source {
                MoveSource::Manual => info!("MOTOR | start {} (manual)", direction.label()),
                MoveSource::Automatic(trigger) => {
                    info!("MOTOR | start {} (auto: {:?})", direction.label(), trigger)
                }
                MoveSource::Command => info!("MOTOR | start {} (command)", direction.label()),
            },
            AppEvent::MotorStopped { reason } => {
                info!("MOTOR | stop ({:?})", reason);
            }
            AppEvent::Started(phase) => {
                info!("START | initial_phase={:?}", phase);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::{StatusSnapshot, StopReason};
    use crate::control::environment::Trigger;
    use crate::control::{Direction, Phase};

    #[test]
    fn every_event_is_accepted() {
        let mut sink = LogEventSink::new();
        let events = [
            AppEvent::Started(Phase::Idle),
            AppEvent::PulseCounted { count: 2 },
            AppEvent::ManualCommand(Direction::Extend),
            AppEvent::PulsesDiscarded { count: 3 },
            AppEvent::MotorStarted {
                direction: Direction::Retract,
                source: MoveSource::Automatic(Trigger::Nightfall),
            },
            AppEvent::MotorStopped { reason: StopReason::TravelTimeout },
            AppEvent::PhaseChanged { from: Phase::Idle, to: Phase::Running },
            AppEvent::Status(StatusSnapshot {
                command_line: false,
                motor_running: true,
                rain_raw: 1023,
                light_raw: 0,
                phase: Phase::Running,
                runs: 0,
            }),
        ];
        for e in &events {
            sink.emit(e);
        }
    }
}
