//! # Simulated vehicle
//!
//! An in-memory implementation of the [`Vehicle`] trait. The simulator
//! records every primitive command it is asked to perform and keeps a crude
//! model of battery, barometer and height, which is enough for the
//! supervisory layer's tests and for dry-running flight scripts without
//! hardware.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use crate::vehicle::{FlipDirection, Vehicle, VehicleError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Height above the floor the simulated vehicle settles at after takeoff.
///
/// Units: centimeters
const TAKEOFF_HEIGHT_CM: f64 = 80.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A primitive command recorded by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum SimCmd {
    Takeoff,
    Land,
    RotateCw(u16),
    RotateCcw(u16),
    Forward(u16),
    Back(u16),
    Left(u16),
    Right(u16),
    Up(u16),
    Down(u16),
    SetSpeed(u16),
    Rc(i16, i16, i16, i16),
    Flip(FlipDirection),
    StreamOn,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A simulated vehicle.
pub struct SimVehicle {
    connected: bool,
    airborne: bool,

    battery_pc: u8,
    barometer_cm: f64,
    height_cm: f64,
    yaw_deg: i32,
    temperature_c: f64,

    /// Every primitive command issued since construction, in order.
    cmd_log: Vec<SimCmd>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SimVehicle {
    fn default() -> Self {
        SimVehicle {
            connected: false,
            airborne: false,
            battery_pc: 100,
            // Arbitrary non-zero absolute pressure altitude, the supervisory
            // layer zero-references it at connection time.
            barometer_cm: 50_000.0,
            height_cm: 0.0,
            yaw_deg: 0,
            temperature_c: 52.0,
            cmd_log: vec![],
        }
    }
}

impl SimVehicle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the simulated battery level, for exercising the safety checks.
    pub fn set_battery_pc(&mut self, battery_pc: u8) {
        self.battery_pc = battery_pc;
    }

    /// Set the simulated barometer reading directly.
    pub fn set_barometer_cm(&mut self, barometer_cm: f64) {
        self.barometer_cm = barometer_cm;
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    /// Get the log of all primitive commands issued so far.
    pub fn cmd_log(&self) -> &[SimCmd] {
        &self.cmd_log
    }

    /// Clear the command log, so a test can look at one operation in
    /// isolation.
    pub fn clear_cmd_log(&mut self) {
        self.cmd_log.clear();
    }

    fn record(&mut self, cmd: SimCmd) -> Result<(), VehicleError> {
        if !self.connected {
            return Err(VehicleError::NotConnected);
        }

        debug!("SimVehicle executing {:?}", cmd);
        self.cmd_log.push(cmd);

        Ok(())
    }
}

impl Vehicle for SimVehicle {
    fn connect(&mut self) -> Result<(), VehicleError> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn takeoff(&mut self) -> Result<(), VehicleError> {
        self.record(SimCmd::Takeoff)?;
        self.airborne = true;
        self.height_cm = TAKEOFF_HEIGHT_CM;
        self.barometer_cm += TAKEOFF_HEIGHT_CM;
        Ok(())
    }

    fn land(&mut self) -> Result<(), VehicleError> {
        self.record(SimCmd::Land)?;
        self.airborne = false;
        self.barometer_cm -= self.height_cm;
        self.height_cm = 0.0;
        Ok(())
    }

    fn rotate_cw(&mut self, degrees: u16) -> Result<(), VehicleError> {
        self.record(SimCmd::RotateCw(degrees))?;
        self.yaw_deg = (self.yaw_deg + degrees as i32).rem_euclid(360);
        Ok(())
    }

    fn rotate_ccw(&mut self, degrees: u16) -> Result<(), VehicleError> {
        self.record(SimCmd::RotateCcw(degrees))?;
        self.yaw_deg = (self.yaw_deg - degrees as i32).rem_euclid(360);
        Ok(())
    }

    fn move_forward(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.record(SimCmd::Forward(distance_cm))
    }

    fn move_back(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.record(SimCmd::Back(distance_cm))
    }

    fn move_left(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.record(SimCmd::Left(distance_cm))
    }

    fn move_right(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.record(SimCmd::Right(distance_cm))
    }

    fn move_up(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.record(SimCmd::Up(distance_cm))?;
        self.height_cm += distance_cm as f64;
        self.barometer_cm += distance_cm as f64;
        Ok(())
    }

    fn move_down(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.record(SimCmd::Down(distance_cm))?;
        self.height_cm -= distance_cm as f64;
        self.barometer_cm -= distance_cm as f64;
        Ok(())
    }

    fn set_speed(&mut self, speed_cms: u16) -> Result<(), VehicleError> {
        self.record(SimCmd::SetSpeed(speed_cms))
    }

    fn send_rc(
        &mut self,
        lr: i16,
        fb: i16,
        ud: i16,
        yaw: i16,
    ) -> Result<(), VehicleError> {
        self.record(SimCmd::Rc(lr, fb, ud, yaw))
    }

    fn flip(&mut self, direction: FlipDirection) -> Result<(), VehicleError> {
        self.record(SimCmd::Flip(direction))
    }

    fn stream_on(&mut self) -> Result<(), VehicleError> {
        self.record(SimCmd::StreamOn)
    }

    fn battery_pc(&mut self) -> Result<u8, VehicleError> {
        if !self.connected {
            return Err(VehicleError::NotConnected);
        }
        Ok(self.battery_pc)
    }

    fn barometer_cm(&mut self) -> Result<f64, VehicleError> {
        if !self.connected {
            return Err(VehicleError::NotConnected);
        }
        Ok(self.barometer_cm)
    }

    fn height_cm(&mut self) -> Result<f64, VehicleError> {
        if !self.connected {
            return Err(VehicleError::NotConnected);
        }
        Ok(self.height_cm)
    }

    fn yaw_deg(&mut self) -> Result<i32, VehicleError> {
        if !self.connected {
            return Err(VehicleError::NotConnected);
        }
        Ok(self.yaw_deg)
    }

    fn temperature_c(&mut self) -> Result<f64, VehicleError> {
        if !self.connected {
            return Err(VehicleError::NotConnected);
        }
        Ok(self.temperature_c)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_not_connected_rejected() {
        let mut sim = SimVehicle::new();

        assert!(matches!(
            sim.move_forward(100),
            Err(VehicleError::NotConnected)
        ));
        assert!(sim.cmd_log().is_empty());
    }

    #[test]
    fn test_cmds_recorded_in_order() {
        let mut sim = SimVehicle::new();
        sim.connect().unwrap();

        sim.takeoff().unwrap();
        sim.rotate_cw(90).unwrap();
        sim.move_forward(100).unwrap();
        sim.land().unwrap();

        assert_eq!(
            sim.cmd_log(),
            &[
                SimCmd::Takeoff,
                SimCmd::RotateCw(90),
                SimCmd::Forward(100),
                SimCmd::Land
            ]
        );
        assert_eq!(sim.yaw_deg().unwrap(), 90);
    }

    #[test]
    fn test_vertical_model() {
        let mut sim = SimVehicle::new();
        sim.connect().unwrap();

        let baro_ref = sim.barometer_cm().unwrap();

        sim.takeoff().unwrap();
        sim.move_up(100).unwrap();

        assert_eq!(sim.height_cm().unwrap(), 180.0);
        assert_eq!(sim.barometer_cm().unwrap(), baro_ref + 180.0);

        sim.land().unwrap();
        assert_eq!(sim.height_cm().unwrap(), 0.0);
        assert_eq!(sim.barometer_cm().unwrap(), baro_ref);
    }
}
