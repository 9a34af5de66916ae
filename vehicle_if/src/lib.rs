//! # Vehicle interface library
//!
//! This crate defines the contract between the supervisory flight software
//! and the drone hardware. The [`Vehicle`](vehicle::Vehicle) trait is the
//! only seam through which commands reach the drone, and is implemented by
//! both the real UDP transport ([`tello`]) and a simulator ([`sim`]) so that
//! the rest of the software never has to care which one it is flying.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod cmd;
pub mod sim;
pub mod tello;
pub mod vehicle;

// ---------------------------------------------------------------------------
// REEXPORTS
// ---------------------------------------------------------------------------

pub use vehicle::{FlipDirection, Telemetry, Vehicle, VehicleError};
