//! Clothesline controller library.
//!
//! Drives a single reversible line motor that retracts or extends a
//! clothesline.  Three inputs decide when it moves:
//!
//! - a pulse-coded command line from a companion controller
//!   (one pulse retracts, two extend),
//! - a light sensor (extend by day, retract at night),
//! - a rain sensor (retract when rain starts, extend when it stops).
//!
//! Every run is bounded by a fixed travel time.  The pure control logic
//! lives in [`control`] and [`app`]; all ESP-IDF-specific code is guarded
//! by `#[cfg(target_os = "espidf")]` within each module so the crate
//! builds and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod timing;
