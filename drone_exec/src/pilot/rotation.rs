//! Rotation planning
//!
//! The hardware accepts at most 180 degrees per rotation primitive. The
//! planner picks the shorter arc for absolute bearing changes and
//! re-expresses over-cap primitive requests as the equivalent opposite
//! rotation.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;

// Internal
use super::{BatteryGate, Pilot, PilotError, MAX_ROT_DEG};
use util::maths::{shortest_arc_deg, wrap_360};
use vehicle_if::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<V: Vehicle> Pilot<V> {
    /// Rotate clockwise by the given number of degrees.
    ///
    /// The request is first normalised into [0, 360), so a negative or
    /// over-full-turn request becomes the equivalent single rotation.
    /// Requests over the 180 degree hardware cap are then issued as the
    /// equivalent counter-clockwise rotation of `degrees - 180`. The
    /// recorded heading always advances by the requested degrees, both
    /// rewrites being equivalent rotations.
    pub fn rotate_cw(&mut self, degrees: i32) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        // Normalise before the over-cap rewrite, the hardware only ever
        // sees 0 to 180
        let degrees = wrap_360(degrees);
        let new_heading_deg = wrap_360(self.pose.heading_deg + degrees);

        if degrees > MAX_ROT_DEG {
            self.vehicle.rotate_ccw((degrees - MAX_ROT_DEG) as u16)?;
        }
        else {
            self.vehicle.rotate_cw(degrees as u16)?;
        }

        self.pose.set_heading(new_heading_deg);
        info!(
            "Rotated clockwise {} degrees to heading {}",
            degrees, self.pose.heading_deg
        );

        Ok(())
    }

    /// Rotate counter-clockwise by the given number of degrees.
    ///
    /// The same normalisation and over-cap rewrite as [`Pilot::rotate_cw`]
    /// apply, in the opposite sense.
    pub fn rotate_ccw(&mut self, degrees: i32) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        let degrees = wrap_360(degrees);
        let new_heading_deg = wrap_360(self.pose.heading_deg - degrees);

        if degrees > MAX_ROT_DEG {
            self.vehicle.rotate_cw((degrees - MAX_ROT_DEG) as u16)?;
        }
        else {
            self.vehicle.rotate_ccw(degrees as u16)?;
        }

        self.pose.set_heading(new_heading_deg);
        info!(
            "Rotated counter-clockwise {} degrees to heading {}",
            degrees, self.pose.heading_deg
        );

        Ok(())
    }

    /// Rotate to an absolute bearing, taking the shorter arc.
    ///
    /// The heading is then set to the target directly rather than by
    /// accumulating the issued rotation, so repeated calls with the same
    /// target do not compound rounding error.
    pub fn rotate_to_bearing(&mut self, bearing_deg: i32) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        let difference_deg = shortest_arc_deg(self.pose.heading_deg, bearing_deg);

        if difference_deg > 0 {
            self.rotate_cw(difference_deg)?;
        }
        else if difference_deg < 0 {
            self.rotate_ccw(-difference_deg)?;
        }

        self.pose.set_heading(bearing_deg);
        info!("Rotated to bearing {}", self.pose.heading_deg);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::super::{Params, Pilot};
    use vehicle_if::sim::{SimCmd, SimVehicle};

    fn test_params() -> Params {
        Params {
            mission: "test_mission".into(),
            name: "testbed".into(),
            ceiling_cm: 200.0,
            floor_cm: 30.0,
            min_takeoff_battery_pc: 25,
            min_op_battery_pc: 20,
            move_speed_cms: 20,
            coord_speed_cms: 50,
        }
    }

    fn connected_pilot() -> Pilot<SimVehicle> {
        let mut pilot = Pilot::new(SimVehicle::new(), test_params());
        pilot.connect().unwrap();
        pilot
    }

    #[test]
    fn test_bearing_takes_shorter_arc() {
        let mut pilot = connected_pilot();

        pilot.rotate_to_bearing(270).unwrap();

        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::RotateCcw(90)]);
        assert_eq!(pilot.pose().heading_deg, 270);
    }

    #[test]
    fn test_bearing_idempotent() {
        let mut pilot = connected_pilot();

        pilot.rotate_to_bearing(135).unwrap();
        pilot.vehicle_mut().clear_cmd_log();

        pilot.rotate_to_bearing(135).unwrap();

        // Already on the bearing, no rotation issued
        assert!(pilot.vehicle().cmd_log().is_empty());
        assert_eq!(pilot.pose().heading_deg, 135);
    }

    #[test]
    fn test_bearing_normalises_target() {
        let mut pilot = connected_pilot();

        pilot.rotate_to_bearing(450).unwrap();

        assert_eq!(pilot.pose().heading_deg, 90);
    }

    #[test]
    fn test_bearing_never_exceeds_rotation_cap() {
        let mut pilot = connected_pilot();

        for bearing_deg in [0, 350, 170, 90, 271, 10, 181].iter() {
            pilot.rotate_to_bearing(*bearing_deg).unwrap();
        }

        for cmd in pilot.vehicle().cmd_log() {
            match cmd {
                SimCmd::RotateCw(d) | SimCmd::RotateCcw(d) => assert!(*d <= 180),
                other => panic!("Unexpected command {:?}", other),
            }
        }
    }

    #[test]
    fn test_primitive_over_cap_rewrite() {
        let mut pilot = connected_pilot();

        pilot.rotate_cw(270).unwrap();

        // Issued as the equivalent opposite rotation, heading still
        // advances by the requested amount
        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::RotateCcw(90)]);
        assert_eq!(pilot.pose().heading_deg, 270);

        pilot.vehicle_mut().clear_cmd_log();
        pilot.rotate_ccw(270).unwrap();

        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::RotateCw(90)]);
        assert_eq!(pilot.pose().heading_deg, 0);
    }

    #[test]
    fn test_primitive_normalises_negative_request() {
        let mut pilot = connected_pilot();

        // A negative clockwise request is the equivalent positive rotation,
        // never a sign-wrapped degree count on the wire
        pilot.rotate_cw(-90).unwrap();

        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::RotateCcw(90)]);
        assert_eq!(pilot.pose().heading_deg, 270);

        pilot.vehicle_mut().clear_cmd_log();
        pilot.rotate_ccw(-90).unwrap();

        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::RotateCw(90)]);
        assert_eq!(pilot.pose().heading_deg, 0);
    }

    #[test]
    fn test_primitive_normalises_over_full_turn() {
        let mut pilot = connected_pilot();

        pilot.rotate_cw(400).unwrap();

        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::RotateCw(40)]);
        assert_eq!(pilot.pose().heading_deg, 40);

        pilot.vehicle_mut().clear_cmd_log();
        pilot.rotate_ccw(720).unwrap();

        // A whole number of turns is a zero-degree rotation
        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::RotateCcw(0)]);
        assert_eq!(pilot.pose().heading_deg, 40);
    }

    #[test]
    fn test_battery_gate_blocks_rotation() {
        let mut pilot = connected_pilot();
        pilot.vehicle_mut().set_battery_pc(15);

        pilot.rotate_to_bearing(90).unwrap();

        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::Land]);
    }
}
