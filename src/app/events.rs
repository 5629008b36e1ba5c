//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use core::fmt;

use crate::control::environment::Trigger;
use crate::control::{Direction, Phase};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic status snapshot.
    Status(StatusSnapshot),

    /// The arbiter moved between phases.
    PhaseChanged { from: Phase, to: Phase },

    /// A rising edge was counted on the command line.
    PulseCounted { count: u8 },

    /// A pulse sequence settled into a manual command.
    ManualCommand(Direction),

    /// A pulse sequence settled with no meaning and was dropped.
    PulsesDiscarded { count: u8 },

    /// The motor was energised.
    MotorStarted {
        direction: Direction,
        source: MoveSource,
    },

    /// The motor was de-energised.
    MotorStopped { reason: StopReason },

    /// The controller has started (carries initial phase).
    Started(Phase),
}

/// Who asked for a motor start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// Pulse-coded command from the companion controller.
    Manual,
    /// Light/rain automation.
    Automatic(Trigger),
    /// An [`AppCommand`](super::commands::AppCommand) from the host side.
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The travel-time cutoff fired.
    TravelTimeout,
    /// An explicit stop command.
    Commanded,
}

/// A point-in-time status snapshot, rendered as one text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub command_line: bool,
    pub motor_running: bool,
    pub rain_raw: u16,
    pub light_raw: u16,
    pub phase: Phase,
    /// Completed motor runs since start-up.
    pub runs: u32,
}

/// Capacity of a rendered status line.
pub const STATUS_LINE_CAP: usize = 128;

impl StatusSnapshot {
    /// Render into a fixed-capacity buffer (no heap on the status path).
    pub fn line(&self) -> heapless::String<STATUS_LINE_CAP> {
        use core::fmt::Write;
        let mut line = heapless::String::new();
        // Worst case is 102 chars; the write cannot overflow.
        let _ = write!(line, "{self}");
        line
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "STATUS | cmd={} | motor={} | rain={} | light={} | phase={:?} | runs={}",
            u8::from(self.command_line),
            if self.motor_running { "running" } else { "stopped" },
            self.rain_raw,
            self.light_raw,
            self.phase,
            self.runs,
        )
    }
}
