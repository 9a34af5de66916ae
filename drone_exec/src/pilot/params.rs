//! Parameters structure for the pilot

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Mission parameters for the pilot.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- IDENTIFICATION ----

    /// Mission label, used to identify the session in logs.
    pub mission: String,

    /// Operator-visible name of the drone.
    pub name: String,

    // ---- ENVELOPE ----

    /// Maximum altitude above the connection point the drone may fly at.
    ///
    /// Units: centimeters
    pub ceiling_cm: f64,

    /// Minimum altitude above the connection point the drone may fly at.
    /// May be negative if the drone is allowed below its starting level.
    ///
    /// Units: centimeters
    pub floor_cm: f64,

    /// Minimum battery charge required to take off.
    ///
    /// Units: percent
    pub min_takeoff_battery_pc: u8,

    /// Minimum battery charge for continued operation. Falling below this
    /// in flight forces an immediate landing.
    ///
    /// Units: percent
    pub min_op_battery_pc: u8,

    // ---- SPEEDS ----

    /// Travel speed for directional moves.
    ///
    /// Units: centimeters/second
    pub move_speed_cms: u16,

    /// Travel speed for coordinate-targeted flights.
    ///
    /// Units: centimeters/second
    pub coord_speed_cms: u16,
}
