//! Safety envelope checks
//!
//! The envelope holds the mission's operating limits and evaluates whether
//! an action is permitted. All checks here are pure, the pilot decides what
//! to do with a refusal (refuse the action, or land).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::Params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The mission operating envelope. Immutable after construction.
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    /// Maximum permitted altitude above the connection point.
    ///
    /// Units: centimeters
    pub ceiling_cm: f64,

    /// Minimum permitted altitude above the connection point.
    ///
    /// Units: centimeters
    pub floor_cm: f64,

    /// Minimum battery charge required to take off.
    ///
    /// Units: percent
    pub min_takeoff_battery_pc: u8,

    /// Minimum battery charge for continued operation.
    ///
    /// Units: percent
    pub min_op_battery_pc: u8,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Result of an altitude limit check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AltitudeCheck {
    /// The move stays inside the envelope.
    Allowed,

    /// The move would cross the limit by `overshoot_cm` centimeters and
    /// must not be commanded.
    Rejected { overshoot_cm: f64 },
}

/// Result of the mandatory operating battery gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatteryGate {
    /// Battery is above the operating minimum, carry on.
    Clear,

    /// Battery fell below the operating minimum and a landing has been
    /// commanded. The operation that ran the gate must abort without
    /// sending its primitives.
    LandingTriggered,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Envelope {
    /// Build the envelope from the mission parameters.
    pub fn from_params(params: &Params) -> Self {
        Envelope {
            ceiling_cm: params.ceiling_cm,
            floor_cm: params.floor_cm,
            min_takeoff_battery_pc: params.min_takeoff_battery_pc,
            min_op_battery_pc: params.min_op_battery_pc,
        }
    }

    /// Check whether the battery allows takeoff.
    pub fn takeoff_battery_ok(&self, battery_pc: u8) -> bool {
        battery_pc >= self.min_takeoff_battery_pc
    }

    /// Check whether the battery allows continued operation.
    pub fn operating_battery_ok(&self, battery_pc: u8) -> bool {
        battery_pc >= self.min_op_battery_pc
    }

    /// Check an upward move of `delta_cm` from `altitude_cm` against the
    /// ceiling.
    pub fn check_ascent(&self, delta_cm: f64, altitude_cm: f64) -> AltitudeCheck {
        let end_cm = altitude_cm + delta_cm;

        if end_cm > self.ceiling_cm {
            AltitudeCheck::Rejected {
                overshoot_cm: end_cm - self.ceiling_cm,
            }
        }
        else {
            AltitudeCheck::Allowed
        }
    }

    /// Check a downward move of `delta_cm` from `altitude_cm` against the
    /// floor.
    pub fn check_descent(&self, delta_cm: f64, altitude_cm: f64) -> AltitudeCheck {
        let end_cm = altitude_cm - delta_cm;

        if end_cm < self.floor_cm {
            AltitudeCheck::Rejected {
                overshoot_cm: self.floor_cm - end_cm,
            }
        }
        else {
            AltitudeCheck::Allowed
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_envelope() -> Envelope {
        Envelope {
            ceiling_cm: 200.0,
            floor_cm: 30.0,
            min_takeoff_battery_pc: 25,
            min_op_battery_pc: 20,
        }
    }

    #[test]
    fn test_battery_thresholds() {
        let env = test_envelope();

        assert!(env.takeoff_battery_ok(25));
        assert!(!env.takeoff_battery_ok(24));
        assert!(env.operating_battery_ok(20));
        assert!(!env.operating_battery_ok(19));
    }

    #[test]
    fn test_ascent_check() {
        let env = test_envelope();

        assert_eq!(env.check_ascent(10.0, 190.0), AltitudeCheck::Allowed);
        assert_eq!(
            env.check_ascent(20.0, 190.0),
            AltitudeCheck::Rejected { overshoot_cm: 10.0 }
        );
    }

    #[test]
    fn test_descent_check() {
        let env = test_envelope();

        assert_eq!(env.check_descent(20.0, 50.0), AltitudeCheck::Allowed);
        assert_eq!(
            env.check_descent(50.0, 50.0),
            AltitudeCheck::Rejected { overshoot_cm: 30.0 }
        );
    }
}
