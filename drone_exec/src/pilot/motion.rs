//! Motion planning
//!
//! Decomposes directional move requests and absolute coordinate targets
//! into sequences of primitive commands the hardware accepts, consulting
//! the safety envelope before acting and the pose tracker after acting.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use std::fmt;

// Internal
use super::{
    AltitudeCheck, BatteryGate, Pilot, PilotError, ALT_STEP_CM, MAX_MOVE_CM,
    MIN_MOVE_CM,
};
use util::maths::wrap_360;
use vehicle_if::vehicle::{self, Vehicle};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Body-frame translation directions.
#[derive(Clone, Copy, Debug, PartialEq)]
enum MoveDir {
    Forward,
    Back,
    Left,
    Right,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MoveDir {
    /// Offset from the current heading to the world-frame direction of
    /// travel for this body direction.
    fn heading_offset_deg(&self) -> i32 {
        match self {
            MoveDir::Forward => 0,
            MoveDir::Back => 180,
            MoveDir::Left => 90,
            MoveDir::Right => -90,
        }
    }
}

impl fmt::Display for MoveDir {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveDir::Forward => write!(f, "forward"),
            MoveDir::Back => write!(f, "back"),
            MoveDir::Left => write!(f, "left"),
            MoveDir::Right => write!(f, "right"),
        }
    }
}

impl<V: Vehicle> Pilot<V> {
    // ---- DIRECTIONAL MOVES ----

    /// Fly forward along the body axis by the given distance.
    pub fn forward(&mut self, distance_cm: f64) -> Result<(), PilotError> {
        self.translate(MoveDir::Forward, distance_cm)
    }

    /// Fly backward along the body axis by the given distance.
    pub fn back(&mut self, distance_cm: f64) -> Result<(), PilotError> {
        self.translate(MoveDir::Back, distance_cm)
    }

    /// Fly left along the body axis by the given distance.
    pub fn left(&mut self, distance_cm: f64) -> Result<(), PilotError> {
        self.translate(MoveDir::Left, distance_cm)
    }

    /// Fly right along the body axis by the given distance.
    pub fn right(&mut self, distance_cm: f64) -> Result<(), PilotError> {
        self.translate(MoveDir::Right, distance_cm)
    }

    /// Shared shape of all lateral moves: battery gate, set speed, chunk
    /// the distance, then dead-reckon the portion actually commanded.
    fn translate(&mut self, dir: MoveDir, distance_cm: f64) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        self.vehicle.set_speed(self.params.move_speed_cms)?;

        let mut remaining_cm = distance_cm;
        let mut commanded_cm = 0.0;

        // Chunk distances beyond the per-command cap
        while remaining_cm > MAX_MOVE_CM {
            self.send_move(dir, vehicle::MAX_MOVE_CM)?;
            commanded_cm += MAX_MOVE_CM;
            remaining_cm -= MAX_MOVE_CM;
        }

        // Remainders at or below the hardware minimum are dropped, a known
        // source of small dead-reckoning drift the operator must tolerate
        if remaining_cm > MIN_MOVE_CM {
            self.send_move(dir, remaining_cm.round() as u16)?;
            commanded_cm += remaining_cm;
        }

        // World-frame update for the portion actually commanded
        let angle_rad =
            ((self.pose.heading_deg + dir.heading_offset_deg()) as f64).to_radians();
        self.pose
            .translate(commanded_cm * angle_rad.cos(), commanded_cm * angle_rad.sin());

        info!(
            "Moved {} {:.1}cm, position now ({:.1}, {:.1})",
            dir, distance_cm, self.pose.x_cm, self.pose.y_cm
        );

        Ok(())
    }

    fn send_move(&mut self, dir: MoveDir, distance_cm: u16) -> Result<(), PilotError> {
        match dir {
            MoveDir::Forward => self.vehicle.move_forward(distance_cm)?,
            MoveDir::Back => self.vehicle.move_back(distance_cm)?,
            MoveDir::Left => self.vehicle.move_left(distance_cm)?,
            MoveDir::Right => self.vehicle.move_right(distance_cm)?,
        }

        Ok(())
    }

    // ---- VERTICAL MOVES ----

    /// Fly up by the given distance, unless the move would cross the
    /// mission ceiling, in which case the whole move is refused with no
    /// command issued.
    pub fn fly_up(&mut self, distance_cm: f64) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        let altitude_cm = self.altitude_cm()?;

        if let AltitudeCheck::Rejected { overshoot_cm } =
            self.envelope.check_ascent(distance_cm, altitude_cm)
        {
            warn!(
                "Cannot fly above the mission ceiling, command ends {:.1}cm above it",
                overshoot_cm
            );
            return Ok(());
        }

        self.vehicle.set_speed(self.params.move_speed_cms)?;

        let mut remaining_cm = distance_cm;
        while remaining_cm > MAX_MOVE_CM {
            self.vehicle.move_up(vehicle::MAX_MOVE_CM)?;
            remaining_cm -= MAX_MOVE_CM;
        }
        if remaining_cm > MIN_MOVE_CM {
            self.vehicle.move_up(remaining_cm.round() as u16)?;
        }

        info!("Flew up {:.1}cm", distance_cm);

        Ok(())
    }

    /// Fly down by the given distance, unless the move would cross the
    /// mission floor, in which case the whole move is refused with no
    /// command issued.
    pub fn fly_down(&mut self, distance_cm: f64) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        let altitude_cm = self.altitude_cm()?;

        if let AltitudeCheck::Rejected { overshoot_cm } =
            self.envelope.check_descent(distance_cm, altitude_cm)
        {
            warn!(
                "Cannot fly below the mission floor, command ends {:.1}cm below it",
                overshoot_cm
            );
            return Ok(());
        }

        self.vehicle.set_speed(self.params.move_speed_cms)?;

        let mut remaining_cm = distance_cm;
        while remaining_cm > MAX_MOVE_CM {
            self.vehicle.move_down(vehicle::MAX_MOVE_CM)?;
            remaining_cm -= MAX_MOVE_CM;
        }
        if remaining_cm > MIN_MOVE_CM {
            self.vehicle.move_down(remaining_cm.round() as u16)?;
        }

        info!("Flew down {:.1}cm", distance_cm);

        Ok(())
    }

    /// Climb to the mission ceiling in coarse fixed-size steps.
    ///
    /// Intentionally overshoot-tolerant: the final altitude may exceed the
    /// ceiling by less than one step.
    pub fn fly_to_mission_ceiling(&mut self) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        let gap_cm = self.envelope.ceiling_cm - self.altitude_cm()?;

        if gap_cm <= 0.0 {
            info!("Already at or above the mission ceiling");
            return Ok(());
        }

        let steps = (gap_cm / ALT_STEP_CM) as u32 + 1;
        for _ in 0..steps {
            self.vehicle.move_up(ALT_STEP_CM as u16)?;
        }

        info!(
            "Reached the mission ceiling, altitude {:.1}cm",
            self.altitude_cm()?
        );

        Ok(())
    }

    /// Descend to the mission floor in coarse fixed-size steps, with the
    /// same overshoot tolerance as the ceiling approach.
    pub fn fly_to_mission_floor(&mut self) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        let gap_cm = self.altitude_cm()? - self.envelope.floor_cm;

        if gap_cm <= 0.0 {
            info!("Already at or below the mission floor");
            return Ok(());
        }

        let steps = (gap_cm / ALT_STEP_CM) as u32 + 1;
        for _ in 0..steps {
            self.vehicle.move_down(ALT_STEP_CM as u16)?;
        }

        info!(
            "Reached the mission floor, altitude {:.1}cm",
            self.altitude_cm()?
        );

        Ok(())
    }

    // ---- COORDINATE TARGETED MOVES ----

    /// Fly to absolute dead-reckoned coordinates.
    ///
    /// In direct flight the drone rotates to face the target and flies
    /// straight at it. Otherwise it strafes axis-aligned without changing
    /// heading, longer axis first (ties go to the Y axis). Either way the
    /// pose is set to the target exactly at the end, closing accumulated
    /// dead-reckoning error.
    pub fn fly_to_coordinates(
        &mut self,
        x_cm: f64,
        y_cm: f64,
        direct: bool,
    ) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        self.vehicle.set_speed(self.params.coord_speed_cms)?;

        let delta_x_cm = x_cm - self.pose.x_cm;
        let delta_y_cm = y_cm - self.pose.y_cm;

        if direct {
            // Face the target, then fly straight at it
            let bearing_deg =
                wrap_360(delta_y_cm.atan2(delta_x_cm).to_degrees().round() as i32);

            self.rotate_to_bearing(bearing_deg)?;
            self.forward(delta_x_cm.hypot(delta_y_cm))?;
        }
        else if delta_x_cm.abs() > delta_y_cm.abs() {
            self.strafe_x(delta_x_cm)?;
            self.strafe_y(delta_y_cm)?;
        }
        else {
            self.strafe_y(delta_y_cm)?;
            self.strafe_x(delta_x_cm)?;
        }

        // The target becomes the recorded position exactly
        self.pose.set_position(x_cm, y_cm);
        info!("Moved to coordinates ({:.1}, {:.1})", x_cm, y_cm);

        Ok(())
    }

    /// Return to the origin, then face the zero bearing.
    pub fn go_home(&mut self, direct: bool) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        self.fly_to_coordinates(0.0, 0.0, direct)?;
        self.rotate_to_bearing(0)?;

        // fly_to_coordinates has already closed the pose, reset it anyway
        self.pose.set_position(0.0, 0.0);
        info!("Returned home");

        Ok(())
    }

    fn strafe_x(&mut self, delta_x_cm: f64) -> Result<(), PilotError> {
        if delta_x_cm > 0.0 {
            self.right(delta_x_cm)
        }
        else if delta_x_cm < 0.0 {
            self.left(-delta_x_cm)
        }
        else {
            Ok(())
        }
    }

    fn strafe_y(&mut self, delta_y_cm: f64) -> Result<(), PilotError> {
        if delta_y_cm > 0.0 {
            self.forward(delta_y_cm)
        }
        else if delta_y_cm < 0.0 {
            self.back(-delta_y_cm)
        }
        else {
            Ok(())
        }
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
    fn test_forward_chunks_at_cap() {
        let mut pilot = connected_pilot();

        pilot.forward(1250.0).unwrap();

        assert_eq!(
            pilot.vehicle().cmd_log(),
            &[
                SimCmd::SetSpeed(20),
                SimCmd::Forward(500),
                SimCmd::Forward(500),
                SimCmd::Forward(250)
            ]
        );

        // Heading 0: forward is world +X
        assert_eq!(pilot.pose().x_cm, 1250.0);
        assert_eq!(pilot.pose().y_cm, 0.0);
    }

    #[test]
    fn test_sub_threshold_remainder_dropped() {
        let mut pilot = connected_pilot();

        pilot.forward(1020.0).unwrap();

        assert_eq!(
            pilot.vehicle().cmd_log(),
            &[
                SimCmd::SetSpeed(20),
                SimCmd::Forward(500),
                SimCmd::Forward(500)
            ]
        );

        // The 20cm remainder was dropped, pose only advances by the
        // commanded 1000cm
        assert_eq!(pilot.pose().x_cm, 1000.0);
    }

    #[test]
    fn test_directions_world_frame() {
        let mut pilot = connected_pilot();
        pilot.rotate_to_bearing(90).unwrap();
        pilot.vehicle_mut().clear_cmd_log();

        // Facing 90: forward is world +Y
        pilot.forward(100.0).unwrap();
        assert!(pilot.pose().x_cm.abs() < 1e-9);
        assert!((pilot.pose().y_cm - 100.0).abs() < 1e-9);

        // left at heading 90 is 180: world -X
        pilot.left(50.0).unwrap();
        assert!((pilot.pose().x_cm + 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_up_rejected_at_ceiling() {
        let mut pilot = connected_pilot();

        // Put the drone 190cm above its reference, 10cm below the ceiling
        let baro_cm = pilot.barometer_cm().unwrap();
        pilot.vehicle_mut().set_barometer_cm(baro_cm + 190.0);

        pilot.fly_up(20.0).unwrap();

        // Whole move refused, not even a speed command
        assert!(pilot.vehicle().cmd_log().is_empty());
    }

    #[test]
    fn test_down_rejected_at_floor() {
        let mut pilot = connected_pilot();

        let baro_cm = pilot.barometer_cm().unwrap();
        pilot.vehicle_mut().set_barometer_cm(baro_cm + 40.0);

        pilot.fly_down(20.0).unwrap();

        assert!(pilot.vehicle().cmd_log().is_empty());
    }

    #[test]
    fn test_battery_gate_forces_landing() {
        let mut pilot = connected_pilot();
        pilot.vehicle_mut().set_battery_pc(15);

        pilot.forward(100.0).unwrap();

        // A landing and nothing else
        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::Land]);
        assert_eq!(pilot.pose().x_cm, 0.0);
    }

    #[test]
    fn test_fly_to_coordinates_direct() {
        let mut pilot = connected_pilot();

        pilot.fly_to_coordinates(300.0, 400.0, true).unwrap();

        assert_eq!(
            pilot.vehicle().cmd_log(),
            &[
                SimCmd::SetSpeed(50),
                SimCmd::RotateCw(53),
                SimCmd::SetSpeed(20),
                SimCmd::Forward(500)
            ]
        );

        // Exact target, drift closed
        assert_eq!(pilot.pose().x_cm, 300.0);
        assert_eq!(pilot.pose().y_cm, 400.0);
        assert_eq!(pilot.pose().heading_deg, 53);
    }

    #[test]
    fn test_fly_to_coordinates_axis_aligned_tie_goes_to_y() {
        let mut pilot = connected_pilot();

        pilot.fly_to_coordinates(100.0, 100.0, false).unwrap();

        // Y axis first on a tie, X axis second, heading untouched
        assert_eq!(
            pilot.vehicle().cmd_log(),
            &[
                SimCmd::SetSpeed(50),
                SimCmd::SetSpeed(20),
                SimCmd::Forward(100),
                SimCmd::SetSpeed(20),
                SimCmd::Right(100)
            ]
        );
        assert_eq!(pilot.pose().x_cm, 100.0);
        assert_eq!(pilot.pose().y_cm, 100.0);
        assert_eq!(pilot.pose().heading_deg, 0);
    }

    #[test]
    fn test_fly_to_coordinates_axis_aligned_negative_deltas() {
        let mut pilot = connected_pilot();

        pilot.fly_to_coordinates(-200.0, -50.0, false).unwrap();

        // |dx| > |dy| so the X axis goes first, negative deltas use
        // left/back
        assert_eq!(
            pilot.vehicle().cmd_log(),
            &[
                SimCmd::SetSpeed(50),
                SimCmd::SetSpeed(20),
                SimCmd::Left(200),
                SimCmd::SetSpeed(20),
                SimCmd::Back(50)
            ]
        );
        assert_eq!(pilot.pose().x_cm, -200.0);
        assert_eq!(pilot.pose().y_cm, -50.0);
    }

    #[test]
    fn test_fly_to_coordinates_skips_zero_axis() {
        let mut pilot = connected_pilot();

        pilot.fly_to_coordinates(0.0, 150.0, false).unwrap();

        assert_eq!(
            pilot.vehicle().cmd_log(),
            &[
                SimCmd::SetSpeed(50),
                SimCmd::SetSpeed(20),
                SimCmd::Forward(150)
            ]
        );
    }

    #[test]
    fn test_mission_ceiling_coarse_steps() {
        let mut pilot = connected_pilot();

        pilot.fly_to_mission_ceiling().unwrap();

        // 200cm gap at 20cm per step, plus one
        let ups: Vec<_> = pilot
            .vehicle()
            .cmd_log()
            .iter()
            .filter(|c| matches!(c, SimCmd::Up(20)))
            .collect();
        assert_eq!(ups.len(), 11);
    }

    #[test]
    fn test_mission_floor_coarse_steps() {
        let mut pilot = connected_pilot();

        // 230cm above the reference, 200cm above the 30cm floor
        let baro_cm = pilot.barometer_cm().unwrap();
        pilot.vehicle_mut().set_barometer_cm(baro_cm + 230.0);

        pilot.fly_to_mission_floor().unwrap();

        // 200cm gap at 20cm per step, plus one
        let downs: Vec<_> = pilot
            .vehicle()
            .cmd_log()
            .iter()
            .filter(|c| matches!(c, SimCmd::Down(20)))
            .collect();
        assert_eq!(downs.len(), 11);
    }

    #[test]
    fn test_go_home_restores_origin() {
        let mut pilot = connected_pilot();

        pilot.rotate_to_bearing(90).unwrap();
        pilot.forward(300.0).unwrap();

        pilot.go_home(false).unwrap();

        assert_eq!(pilot.pose().x_cm, 0.0);
        assert_eq!(pilot.pose().y_cm, 0.0);
        assert_eq!(pilot.pose().heading_deg, 0);
    }
}
