//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (sensors, the motor, event sinks) implement these
//! traits.  The [`Controller`](super::service::Controller) consumes them
//! via generics, so the domain core never touches hardware directly.
//!
//! Port methods are infallible: adapters absorb and log hardware errors
//! so that one failed pin write never stalls the control loop.

use crate::control::Direction;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw inputs sampled once per control cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorSnapshot {
    /// Manual-command line level (`true` = HIGH).
    pub command_line: bool,
    /// Rain sensor, 0–1023.  Lower = wetter.
    pub rain_raw: u16,
    /// Light sensor, 0–1023.  Higher = brighter.
    pub light_raw: u16,
}

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Sample every input and return a unified snapshot.
    fn sample(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Motor port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single H-bridge motor.
pub trait MotorPort {
    /// Energise the motor in `direction` at `magnitude` (0–255).
    fn drive(&mut self, direction: Direction, magnitude: u8);

    /// De-energise: both direction outputs low, zero drive.
    fn release(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / status)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
