//! # Vehicle command and telemetry contract
//!
//! The drone hardware only understands short, relative, bounded commands.
//! Everything the supervisory layer does is ultimately expressed through
//! the [`Vehicle`] trait defined here.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Minimum distance the hardware will accept for a single translation
/// command.
///
/// Units: centimeters
pub const MIN_MOVE_CM: u16 = 20;

/// Maximum distance the hardware will accept for a single translation
/// command.
///
/// Units: centimeters
pub const MAX_MOVE_CM: u16 = 500;

/// Maximum rotation the hardware will accept for a single rotation command.
///
/// Units: degrees
pub const MAX_ROT_DEG: u16 = 180;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A snapshot of the vehicle's telemetry, read on demand.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Telemetry {
    /// Remaining battery charge.
    ///
    /// Units: percent
    pub battery_pc: u8,

    /// Raw barometer reading. This is not zero-referenced, the supervisory
    /// layer captures a reference at connection time.
    ///
    /// Units: centimeters
    pub barometer_cm: f64,

    /// Height above the takeoff point as reported by the vehicle.
    ///
    /// Units: centimeters
    pub height_cm: f64,

    /// Current yaw as reported by the vehicle's IMU.
    ///
    /// Units: degrees
    pub yaw_deg: i32,

    /// Internal temperature of the vehicle.
    ///
    /// Units: degrees celsius
    pub temperature_c: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors raised by a vehicle transport.
#[derive(Debug, Error)]
pub enum VehicleError {
    #[error("Could not connect to the vehicle: {0}")]
    ConnectionFailed(String),

    #[error("The vehicle is not connected")]
    NotConnected,

    #[error("The vehicle rejected a command: {0}")]
    CommandRejected(String),

    #[error("Timed out waiting for the vehicle to respond")]
    ResponseTimeout,

    #[error("Could not parse the vehicle's response: {0}")]
    InvalidResponse(String),

    #[error("Transport IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Direction of a flip trick command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipDirection {
    Forward,
    Back,
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The contract a vehicle transport must fulfil.
///
/// All commands are synchronous: a call does not return until the vehicle
/// has acknowledged the command or the transport has timed out. Commands
/// take `&mut self` so that at most one command can be in flight per vehicle
/// instance, which is the concurrency discipline the single
/// request/response channel of the hardware requires.
///
/// Implementors must respect the hardware bounds: rotations are capped at
/// [`MAX_ROT_DEG`] per command, translations must lie in
/// [`MIN_MOVE_CM`]..=[`MAX_MOVE_CM`]. Callers (the supervisory layer) are
/// responsible for decomposing larger requests.
pub trait Vehicle {
    /// Establish the connection to the vehicle.
    fn connect(&mut self) -> Result<(), VehicleError>;

    /// Gracefully close the connection to the vehicle.
    fn disconnect(&mut self);

    fn takeoff(&mut self) -> Result<(), VehicleError>;

    fn land(&mut self) -> Result<(), VehicleError>;

    /// Rotate clockwise by up to [`MAX_ROT_DEG`] degrees.
    fn rotate_cw(&mut self, degrees: u16) -> Result<(), VehicleError>;

    /// Rotate counter-clockwise by up to [`MAX_ROT_DEG`] degrees.
    fn rotate_ccw(&mut self, degrees: u16) -> Result<(), VehicleError>;

    fn move_forward(&mut self, distance_cm: u16) -> Result<(), VehicleError>;

    fn move_back(&mut self, distance_cm: u16) -> Result<(), VehicleError>;

    fn move_left(&mut self, distance_cm: u16) -> Result<(), VehicleError>;

    fn move_right(&mut self, distance_cm: u16) -> Result<(), VehicleError>;

    fn move_up(&mut self, distance_cm: u16) -> Result<(), VehicleError>;

    fn move_down(&mut self, distance_cm: u16) -> Result<(), VehicleError>;

    /// Set the travel speed used by subsequent translation commands.
    fn set_speed(&mut self, speed_cms: u16) -> Result<(), VehicleError>;

    /// Send a raw velocity demand (left/right, forward/back, up/down, yaw
    /// rate), each in the -100..=100 range. Used by interactive harnesses,
    /// not by the planners.
    fn send_rc(
        &mut self,
        lr: i16,
        fb: i16,
        ud: i16,
        yaw: i16,
    ) -> Result<(), VehicleError>;

    /// Perform a flip trick in the given direction.
    fn flip(&mut self, direction: FlipDirection) -> Result<(), VehicleError>;

    /// Turn the video stream on. Frame retrieval is the presentation
    /// layer's business and happens outside this trait.
    fn stream_on(&mut self) -> Result<(), VehicleError>;

    fn battery_pc(&mut self) -> Result<u8, VehicleError>;

    fn barometer_cm(&mut self) -> Result<f64, VehicleError>;

    fn height_cm(&mut self) -> Result<f64, VehicleError>;

    fn yaw_deg(&mut self) -> Result<i32, VehicleError>;

    fn temperature_c(&mut self) -> Result<f64, VehicleError>;

    /// Read a full telemetry snapshot.
    fn telemetry(&mut self) -> Result<Telemetry, VehicleError> {
        Ok(Telemetry {
            battery_pc: self.battery_pc()?,
            barometer_cm: self.barometer_cm()?,
            height_cm: self.height_cm()?,
            yaw_deg: self.yaw_deg()?,
            temperature_c: self.temperature_c()?,
        })
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FlipDirection {
    /// Get the single-character direction code used by the hardware SDK.
    pub fn sdk_char(&self) -> char {
        match self {
            FlipDirection::Forward => 'f',
            FlipDirection::Back => 'b',
            FlipDirection::Left => 'l',
            FlipDirection::Right => 'r',
        }
    }
}
