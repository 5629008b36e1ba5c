//! Inbound commands to the application service.
//!
//! Actions requested by the host side of the firmware (bench console,
//! tests) rather than by the pulse line.  The
//! [`Controller`](super::service::Controller) applies them with the
//! same idleness rules as manual commands.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Retract if the motor is idle.
    Retract,

    /// Extend if the motor is idle.
    Extend,

    /// Stop the motor immediately (also discards pending pulses).
    Stop,
}
