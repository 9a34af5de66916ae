//! Utility maths functions
//!
//! All angles in the drone software are degrees with a clockwise-positive
//! bearing convention, so the helpers here work in integer degrees rather
//! than radians.

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Normalise an angle into the [0, 360) degree range.
pub fn wrap_360(angle_deg: i32) -> i32 {
    angle_deg.rem_euclid(360)
}

/// Get the signed shortest arc between two bearings in degrees.
///
/// The result is in the range (-180, 180]: positive for a clockwise turn
/// from `from_deg` to `to_deg`, negative for a counter-clockwise one.
pub fn shortest_arc_deg(from_deg: i32, to_deg: i32) -> i32 {
    let diff = (to_deg - from_deg).rem_euclid(360);

    if diff > 180 {
        diff - 360
    }
    else {
        diff
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wrap_360() {
        assert_eq!(wrap_360(0), 0);
        assert_eq!(wrap_360(360), 0);
        assert_eq!(wrap_360(725), 5);
        assert_eq!(wrap_360(-90), 270);
        assert_eq!(wrap_360(-360), 0);
    }

    #[test]
    fn test_shortest_arc_deg() {
        assert_eq!(shortest_arc_deg(0, 90), 90);
        assert_eq!(shortest_arc_deg(90, 0), -90);
        assert_eq!(shortest_arc_deg(0, 270), -90);
        assert_eq!(shortest_arc_deg(350, 10), 20);
        assert_eq!(shortest_arc_deg(10, 350), -20);
        assert_eq!(shortest_arc_deg(0, 180), 180);
        assert_eq!(shortest_arc_deg(45, 45), 0);
    }
}
