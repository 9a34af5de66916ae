//! Dead-reckoned pose tracking
//!
//! The pose is the drone's estimated 2-D position and heading, accumulated
//! purely from commanded displacements. It is advisory dead reckoning, not
//! ground truth, and is reset to the origin at each session start.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use util::maths::wrap_360;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The drone's dead-reckoned pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    /// World-frame X position relative to the session origin.
    ///
    /// Units: centimeters
    pub x_cm: f64,

    /// World-frame Y position relative to the session origin.
    ///
    /// Units: centimeters
    pub y_cm: f64,

    /// Heading, always normalised into [0, 360).
    ///
    /// Units: degrees
    pub heading_deg: i32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Pose {
    /// The pose at session start: at the origin, facing the zero bearing.
    fn default() -> Self {
        Pose {
            x_cm: 0.0,
            y_cm: 0.0,
            heading_deg: 0,
        }
    }
}

impl Pose {
    /// Accumulate a world-frame translation. No validation is performed,
    /// callers must have applied the envelope checks upstream.
    pub fn translate(&mut self, dx_cm: f64, dy_cm: f64) {
        self.x_cm += dx_cm;
        self.y_cm += dy_cm;
    }

    /// Overwrite the position exactly, discarding accumulated
    /// floating-point error. Used at the end of coordinate-targeted moves.
    pub fn set_position(&mut self, x_cm: f64, y_cm: f64) {
        self.x_cm = x_cm;
        self.y_cm = y_cm;
    }

    /// Store a new heading, normalised into [0, 360).
    pub fn set_heading(&mut self, heading_deg: i32) {
        self.heading_deg = wrap_360(heading_deg);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_starts_at_origin() {
        assert_eq!(
            Pose::default(),
            Pose {
                x_cm: 0.0,
                y_cm: 0.0,
                heading_deg: 0
            }
        );
    }

    #[test]
    fn test_translate_accumulates() {
        let mut pose = Pose::default();

        pose.translate(100.0, -50.0);
        pose.translate(-25.0, 10.0);

        assert_eq!(pose.x_cm, 75.0);
        assert_eq!(pose.y_cm, -40.0);
    }

    #[test]
    fn test_set_position_overrides_drift() {
        let mut pose = Pose::default();

        pose.translate(99.9999, 200.0001);
        pose.set_position(100.0, 200.0);

        assert_eq!(pose.x_cm, 100.0);
        assert_eq!(pose.y_cm, 200.0);
    }

    #[test]
    fn test_heading_always_normalised() {
        let mut pose = Pose::default();

        pose.set_heading(450);
        assert_eq!(pose.heading_deg, 90);

        pose.set_heading(-90);
        assert_eq!(pose.heading_deg, 270);

        pose.set_heading(360);
        assert_eq!(pose.heading_deg, 0);
    }
}
