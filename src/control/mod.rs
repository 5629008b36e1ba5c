//! Command arbitration and motor-state machine.
//!
//! ```text
//!               ┌──────────────────────────────────────────┐
//!   line ──────▶│ PulseDecoder ──[Retract/Extend]──┐       │
//!               │                                  ▼       │
//!               │                           MotorActuator ─┼──▶ MotorPort
//!               │                                  ▲       │
//!   rain/light ▶│ EnvironmentPolicy ──[AutoMove]───┘       │
//!               └──────────────────────────────────────────┘
//!                      all state lives in ControllerState
//! ```
//!
//! The components are stateless apart from their configuration.  All
//! mutable state is owned by one [`ControllerState`] that the
//! [`Controller`](crate::app::service::Controller) threads by `&mut`
//! through each component's step function once per tick.

pub mod environment;
pub mod motor;
pub mod pulse;

use environment::EnvironmentFlags;
use motor::MotorState;
use pulse::PulseWindow;

/// Direction of actuator travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Bring the line/awning to its stowed position (IN).
    Retract,
    /// Bring the line/awning to its deployed position (OUT).
    Extend,
}

impl Direction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Retract => "IN",
            Self::Extend => "OUT",
        }
    }
}

/// Coarse arbiter phase, derived from [`ControllerState`] after each tick.
///
/// ```text
///   IDLE ──[rising edge]──▶ AWAITING_PULSE_SETTLE
///    ▲  ╲                          │
///    │   ╲[automated move]   [commit, motor idle]
///    │    ▼                        ▼
///    └──[cutoff / stop]──────── RUNNING
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    Idle = 0,
    AwaitingPulseSettle = 1,
    Running = 2,
}

/// Every piece of mutable controller state, owned by the control loop.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    pub motor: MotorState,
    pub pulses: PulseWindow,
    pub flags: EnvironmentFlags,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase as seen by the arbiter.  A running motor dominates; a pulse
    /// sequence that arrives mid-travel does not change the phase.
    pub fn phase(&self) -> Phase {
        if self.motor.is_running() {
            Phase::Running
        } else if self.pulses.awaiting_settle {
            Phase::AwaitingPulseSettle
        } else {
            Phase::Idle
        }
    }

    /// Automation may only run while the motor is idle and no manual
    /// pulse is pending.
    pub fn automation_armed(&self) -> bool {
        !self.motor.is_running() && self.pulses.pending_count == 0
    }
}
