//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the arbiter that ties the pulse decoder, motor
//! actuator and environment policy together.  All interaction with
//! hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
