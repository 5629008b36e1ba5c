//! Mock hardware adapter for integration tests.
//!
//! Serves a settable sensor snapshot and records every motor call so
//! tests can assert on the full command history without touching real
//! GPIO/PWM registers.

use clothesline::app::events::{AppEvent, MoveSource};
use clothesline::app::ports::{EventSink, MotorPort, SensorPort, SensorSnapshot};
use clothesline::control::Direction;

// ── Motor call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCall {
    Drive { direction: Direction, magnitude: u8 },
    Release,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub sample: SensorSnapshot,
    pub calls: Vec<MotorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(rain_raw: u16, light_raw: u16) -> Self {
        Self {
            sample: SensorSnapshot {
                command_line: false,
                rain_raw,
                light_raw,
            },
            calls: Vec::new(),
        }
    }

    pub fn drives(&self) -> Vec<Direction> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                MotorCall::Drive { direction, .. } => Some(*direction),
                MotorCall::Release => None,
            })
            .collect()
    }

    /// Whether the last motor call left the bridge energised.
    pub fn energised(&self) -> bool {
        matches!(self.calls.last(), Some(MotorCall::Drive { .. }))
    }
}

impl SensorPort for MockHardware {
    fn sample(&mut self) -> SensorSnapshot {
        self.sample
    }
}

impl MotorPort for MockHardware {
    fn drive(&mut self, direction: Direction, magnitude: u8) {
        self.calls.push(MotorCall::Drive {
            direction,
            magnitude,
        });
    }

    fn release(&mut self) {
        self.calls.push(MotorCall::Release);
    }
}

// ── MockSink ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn motor_starts(&self) -> Vec<(Direction, MoveSource)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::MotorStarted { direction, source } => Some((*direction, *source)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MockSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
