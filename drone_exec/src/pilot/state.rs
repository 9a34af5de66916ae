//! Implementations for the pilot state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error, info};

// Internal
use super::{BatteryGate, Envelope, Params, PilotError, Pose};
use vehicle_if::vehicle::{FlipDirection, Telemetry, Vehicle};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The supervisory pilot for one drone.
///
/// The vehicle is supplied, not subclassed, so the same pilot flies both
/// the real transport and the simulator. The pilot is the only component
/// that talks to the vehicle, and all of its operations take `&mut self`,
/// serialising command issuance.
pub struct Pilot<V: Vehicle> {
    pub(crate) params: Params,
    pub(crate) envelope: Envelope,
    pub(crate) pose: Pose,
    pub(crate) vehicle: V,

    /// Barometer reading captured at connection time, used to compute a
    /// zero-referenced altitude.
    baro_ref_cm: f64,

    connected: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<V: Vehicle> Pilot<V> {
    /// Create a new pilot for the given vehicle. No commands are sent until
    /// [`Pilot::connect`] is called.
    pub fn new(vehicle: V, params: Params) -> Self {
        let envelope = Envelope::from_params(&params);

        Pilot {
            params,
            envelope,
            pose: Pose::default(),
            vehicle,
            baro_ref_cm: 0.0,
            connected: false,
        }
    }

    /// Establish the connection to the drone and capture the barometer
    /// reference for zero-referenced altitude.
    pub fn connect(&mut self) -> Result<(), PilotError> {
        match self.vehicle.connect() {
            Ok(()) => (),
            Err(e) => {
                error!("Could not connect to the drone: {}", e);
                return Err(PilotError::ConnectionError(e));
            }
        }

        // Without the barometer reference the session has no altitude
        // datum, so a failed read here means the connection never became
        // usable
        self.baro_ref_cm = match self.vehicle.barometer_cm() {
            Ok(b) => b,
            Err(e) => {
                error!("Could not read the barometer reference: {}", e);
                self.vehicle.disconnect();
                return Err(PilotError::ConnectionError(e));
            }
        };
        self.connected = true;

        info!("{} connected to the drone", self.params.name);

        Ok(())
    }

    /// Gracefully close the connection with the drone.
    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }

        self.vehicle.disconnect();
        self.connected = false;

        info!("{} connection closed gracefully", self.params.name);
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Get the current dead-reckoned pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Get the mission parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Borrow the underlying vehicle, for telemetry-adjacent concerns the
    /// pilot does not own (video frames for instance).
    pub fn vehicle(&self) -> &V {
        &self.vehicle
    }

    pub fn vehicle_mut(&mut self) -> &mut V {
        &mut self.vehicle
    }

    // ---- LIFECYCLE COMMANDS ----

    /// Take off, provided the battery is above the takeoff minimum. A
    /// refusal is logged, not raised.
    pub fn takeoff(&mut self) -> Result<(), PilotError> {
        let battery_pc = self.vehicle.battery_pc()?;

        if !self.envelope.takeoff_battery_ok(battery_pc) {
            error!(
                "Battery at {}% is below the {}% takeoff minimum, refusing takeoff",
                battery_pc, self.envelope.min_takeoff_battery_pc
            );
            return Ok(());
        }

        debug!("Battery good: {}%", battery_pc);

        info!("{} is taking off", self.params.name);
        self.vehicle.takeoff()?;
        info!("{} took off", self.params.name);

        Ok(())
    }

    /// Land immediately.
    pub fn land(&mut self) -> Result<(), PilotError> {
        info!("{} is landing", self.params.name);
        self.vehicle.land()?;
        info!("{} has landed", self.params.name);

        Ok(())
    }

    // ---- TELEMETRY ----

    pub fn battery_pc(&mut self) -> Result<u8, PilotError> {
        Ok(self.vehicle.battery_pc()?)
    }

    /// Raw barometer reading, not zero-referenced.
    pub fn barometer_cm(&mut self) -> Result<f64, PilotError> {
        Ok(self.vehicle.barometer_cm()?)
    }

    /// Altitude above the connection point, from the barometer reference
    /// captured at connect.
    pub fn altitude_cm(&mut self) -> Result<f64, PilotError> {
        let altitude_cm = self.vehicle.barometer_cm()? - self.baro_ref_cm;

        debug!("Current zero-referenced altitude: {:.1}cm", altitude_cm);

        Ok(altitude_cm)
    }

    pub fn height_cm(&mut self) -> Result<f64, PilotError> {
        Ok(self.vehicle.height_cm()?)
    }

    pub fn yaw_deg(&mut self) -> Result<i32, PilotError> {
        Ok(self.vehicle.yaw_deg()?)
    }

    pub fn temperature_c(&mut self) -> Result<f64, PilotError> {
        Ok(self.vehicle.temperature_c()?)
    }

    pub fn telemetry(&mut self) -> Result<Telemetry, PilotError> {
        Ok(self.vehicle.telemetry()?)
    }

    // ---- PASS-THROUGH COMMANDS ----

    /// Send a raw velocity demand. Used by interactive harnesses, does not
    /// touch the dead-reckoned pose.
    pub fn send_rc(
        &mut self,
        lr: i16,
        fb: i16,
        ud: i16,
        yaw: i16,
    ) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        Ok(self.vehicle.send_rc(lr, fb, ud, yaw)?)
    }

    /// Perform a flip trick in the given direction.
    pub fn flip(&mut self, direction: FlipDirection) -> Result<(), PilotError> {
        if let BatteryGate::LandingTriggered = self.battery_gate()? {
            return Ok(());
        }

        Ok(self.vehicle.flip(direction)?)
    }

    /// Turn the video stream on.
    pub fn stream_on(&mut self) -> Result<(), PilotError> {
        Ok(self.vehicle.stream_on()?)
    }

    // ---- SAFETY ----

    /// The mandatory operating battery gate, run as the first step of every
    /// vehicle-moving operation. If the battery is below the operating
    /// minimum a landing is commanded immediately and the caller must abort
    /// its operation.
    ///
    /// The gate runs once per high-level operation, not before every chunk
    /// of a long move, so a long chunked move can complete even if the
    /// battery crosses the threshold mid-flight.
    pub(crate) fn battery_gate(&mut self) -> Result<BatteryGate, PilotError> {
        let battery_pc = self.vehicle.battery_pc()?;

        if self.envelope.operating_battery_ok(battery_pc) {
            Ok(BatteryGate::Clear)
        }
        else {
            error!(
                "Battery at {}% is below the {}% operating minimum, landing now",
                battery_pc, self.envelope.min_op_battery_pc
            );
            self.land()?;

            Ok(BatteryGate::LandingTriggered)
        }
    }
}

impl<V: Vehicle> Drop for Pilot<V> {
    /// Release the transport on every exit path of the owning session.
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use vehicle_if::sim::{SimCmd, SimVehicle};
    use vehicle_if::vehicle::VehicleError;

    /// A vehicle whose connection opens but whose barometer never answers.
    struct NoBaroVehicle;

    impl Vehicle for NoBaroVehicle {
        fn connect(&mut self) -> Result<(), VehicleError> {
            Ok(())
        }

        fn disconnect(&mut self) {}

        fn takeoff(&mut self) -> Result<(), VehicleError> {
            Ok(())
        }

        fn land(&mut self) -> Result<(), VehicleError> {
            Ok(())
        }

        fn rotate_cw(&mut self, _: u16) -> Result<(), VehicleError> {
            Ok(())
        }

        fn rotate_ccw(&mut self, _: u16) -> Result<(), VehicleError> {
            Ok(())
        }

        fn move_forward(&mut self, _: u16) -> Result<(), VehicleError> {
            Ok(())
        }

        fn move_back(&mut self, _: u16) -> Result<(), VehicleError> {
            Ok(())
        }

        fn move_left(&mut self, _: u16) -> Result<(), VehicleError> {
            Ok(())
        }

        fn move_right(&mut self, _: u16) -> Result<(), VehicleError> {
            Ok(())
        }

        fn move_up(&mut self, _: u16) -> Result<(), VehicleError> {
            Ok(())
        }

        fn move_down(&mut self, _: u16) -> Result<(), VehicleError> {
            Ok(())
        }

        fn set_speed(&mut self, _: u16) -> Result<(), VehicleError> {
            Ok(())
        }

        fn send_rc(
            &mut self,
            _: i16,
            _: i16,
            _: i16,
            _: i16,
        ) -> Result<(), VehicleError> {
            Ok(())
        }

        fn flip(&mut self, _: FlipDirection) -> Result<(), VehicleError> {
            Ok(())
        }

        fn stream_on(&mut self) -> Result<(), VehicleError> {
            Ok(())
        }

        fn battery_pc(&mut self) -> Result<u8, VehicleError> {
            Ok(100)
        }

        fn barometer_cm(&mut self) -> Result<f64, VehicleError> {
            Err(VehicleError::ResponseTimeout)
        }

        fn height_cm(&mut self) -> Result<f64, VehicleError> {
            Ok(0.0)
        }

        fn yaw_deg(&mut self) -> Result<i32, VehicleError> {
            Ok(0)
        }

        fn temperature_c(&mut self) -> Result<f64, VehicleError> {
            Ok(0.0)
        }
    }

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

    fn connected_pilot(battery_pc: u8) -> Pilot<SimVehicle> {
        let mut sim = SimVehicle::new();
        sim.set_battery_pc(battery_pc);

        let mut pilot = Pilot::new(sim, test_params());
        pilot.connect().unwrap();

        pilot
    }

    #[test]
    fn test_takeoff_refused_below_minimum() {
        let mut pilot = connected_pilot(24);

        pilot.takeoff().unwrap();

        assert!(pilot.vehicle().cmd_log().is_empty());
        assert!(!pilot.vehicle().is_airborne());
    }

    #[test]
    fn test_takeoff_at_minimum() {
        let mut pilot = connected_pilot(25);

        pilot.takeoff().unwrap();

        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::Takeoff]);
    }

    #[test]
    fn test_altitude_is_zero_referenced() {
        let mut pilot = connected_pilot(100);

        assert_eq!(pilot.altitude_cm().unwrap(), 0.0);

        let baro_cm = pilot.barometer_cm().unwrap();
        pilot.vehicle_mut().set_barometer_cm(baro_cm + 50.0);

        assert_eq!(pilot.altitude_cm().unwrap(), 50.0);
    }

    #[test]
    fn test_connect_fails_without_barometer_reference() {
        let mut pilot = Pilot::new(NoBaroVehicle, test_params());

        // No altitude datum means the session never became usable
        assert!(matches!(
            pilot.connect(),
            Err(PilotError::ConnectionError(_))
        ));
        assert!(!pilot.is_connected());
    }

    #[test]
    fn test_flip_gated_on_battery() {
        let mut pilot = connected_pilot(15);

        pilot.flip(FlipDirection::Forward).unwrap();

        // Landing only, no flip
        assert_eq!(pilot.vehicle().cmd_log(), &[SimCmd::Land]);
    }
}
