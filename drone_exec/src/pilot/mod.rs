//! Pilot module
//!
//! The pilot is the supervisory layer between the operator (or a flight
//! script) and the vehicle's primitive command interface. It owns the
//! dead-reckoned pose, the mission safety envelope, and the planners which
//! decompose rotation and translation requests into hardware-bounded
//! primitives.
//!
//! All operations are synchronous blocking calls taking `&mut self`, so at
//! most one command can be in flight per vehicle, which is the discipline
//! the hardware's single request/response channel requires.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod envelope;
mod motion;
mod params;
mod pose;
mod rotation;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use envelope::*;
pub use params::*;
pub use pose::*;
pub use state::*;

use vehicle_if::vehicle;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Maximum distance of a single translation primitive, above which requests
/// are chunked.
///
/// Units: centimeters
pub const MAX_MOVE_CM: f64 = vehicle::MAX_MOVE_CM as f64;

/// Minimum distance of a single translation primitive. Remainders at or
/// below this are silently dropped.
///
/// Units: centimeters
pub const MIN_MOVE_CM: f64 = vehicle::MIN_MOVE_CM as f64;

/// Maximum rotation of a single rotation primitive.
///
/// Units: degrees
pub const MAX_ROT_DEG: i32 = vehicle::MAX_ROT_DEG as i32;

/// Step size used by the coarse ceiling/floor approach manoeuvres.
///
/// Units: centimeters
pub const ALT_STEP_CM: f64 = 20.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during pilot operation.
///
/// Envelope violations (battery, altitude) are not errors: they are
/// recovered locally by refusing the action or by landing, and only surface
/// through the log.
#[derive(Debug, thiserror::Error)]
pub enum PilotError {
    #[error("Could not connect to the drone: {0}")]
    ConnectionError(vehicle::VehicleError),

    #[error("A vehicle command failed: {0}")]
    CommandError(#[from] vehicle::VehicleError),
}
