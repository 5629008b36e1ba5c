//! Motor actuator: the single owner of the motor resource.
//!
//! ## Safety contract
//!
//! There is no limit switch and no position feedback.  The travel-time
//! cutoff in [`MotorActuator::tick`] is the only thing that ends a run
//! on its own, so it must be called every cycle.
//!
//! Stopping the motor also clears the pending pulse count: a manual
//! sequence that straddles a stop is discarded rather than replayed.

use log::info;

use super::{ControllerState, Direction};
use crate::app::ports::MotorPort;
use crate::config::SystemConfig;
use crate::timing::{elapsed_ms, has_elapsed};

/// Motor run state.  The start timestamp only exists while running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MotorState {
    #[default]
    Stopped,
    Running { direction: Direction, started_ms: u32 },
}

impl MotorState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Running { direction, .. } => Some(*direction),
            Self::Stopped => None,
        }
    }
}

pub struct MotorActuator {
    rotation_time_ms: u32,
    speed: u8,
}

impl MotorActuator {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            rotation_time_ms: config.rotation_time_ms,
            speed: config.motor_speed,
        }
    }

    /// Energise the motor in `direction`.
    ///
    /// No-op if the motor is already running: neither the direction nor
    /// the start timestamp change.  Returns `true` if the motor started.
    pub fn start(
        &self,
        motor: &mut MotorState,
        direction: Direction,
        now_ms: u32,
        hw: &mut impl MotorPort,
    ) -> bool {
        if motor.is_running() {
            return false;
        }
        hw.drive(direction, self.speed);
        *motor = MotorState::Running {
            direction,
            started_ms: now_ms,
        };
        info!("Motor starting - Moving {}", direction.label());
        true
    }

    /// De-energise the motor and clear any pending pulse count.
    pub fn stop(&self, state: &mut ControllerState, hw: &mut impl MotorPort) {
        hw.release();
        state.motor = MotorState::Stopped;
        state.pulses.pending_count = 0;
        info!("Motor stopped");
    }

    /// Travel-time cutoff.  Returns `true` if the motor was stopped.
    pub fn tick(&self, state: &mut ControllerState, now_ms: u32, hw: &mut impl MotorPort) -> bool {
        let MotorState::Running { started_ms, .. } = state.motor else {
            return false;
        };
        if has_elapsed(now_ms, started_ms, self.rotation_time_ms) {
            info!(
                "Motor travel time reached ({} ms)",
                elapsed_ms(now_ms, started_ms)
            );
            self.stop(state, hw);
            return true;
        }
        false
    }
}
