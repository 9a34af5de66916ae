//! # Flight command processor module
//!
//! The command processor handles flight commands coming from any source
//! (the interactive prompt or a flight script) and dispatches them to the
//! pilot.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};

// Internal
use drone_lib::pilot::Pilot;
use vehicle_if::cmd::FlightCmd;
use vehicle_if::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a flight command.
///
/// Failures here are almost always a rejected or timed-out vehicle command,
/// which the operator fixes at the prompt, so they are logged as warnings
/// rather than propagated.
pub(crate) fn exec<V: Vehicle>(pilot: &mut Pilot<V>, cmd: &FlightCmd) {
    let result = match *cmd {
        FlightCmd::Takeoff => pilot.takeoff(),
        FlightCmd::Land => pilot.land(),

        FlightCmd::Forward(d) => pilot.forward(d),
        FlightCmd::Back(d) => pilot.back(d),
        FlightCmd::Left(d) => pilot.left(d),
        FlightCmd::Right(d) => pilot.right(d),
        FlightCmd::Up(d) => pilot.fly_up(d),
        FlightCmd::Down(d) => pilot.fly_down(d),

        FlightCmd::RotateCw(deg) => pilot.rotate_cw(deg),
        FlightCmd::RotateCcw(deg) => pilot.rotate_ccw(deg),
        FlightCmd::RotateTo(deg) => pilot.rotate_to_bearing(deg),

        FlightCmd::Goto { x_cm, y_cm, direct } => {
            pilot.fly_to_coordinates(x_cm, y_cm, direct)
        }
        FlightCmd::Home { direct } => pilot.go_home(direct),
        FlightCmd::Ceiling => pilot.fly_to_mission_ceiling(),
        FlightCmd::Floor => pilot.fly_to_mission_floor(),

        FlightCmd::Flip(dir) => pilot.flip(dir),

        FlightCmd::Battery => match pilot.battery_pc() {
            Ok(pc) => {
                info!("Battery: {}%", pc);
                Ok(())
            }
            Err(e) => Err(e),
        },
        FlightCmd::Pose => {
            let pose = pilot.pose();
            info!(
                "Pose: ({:.1}, {:.1}) cm, heading {} deg",
                pose.x_cm, pose.y_cm, pose.heading_deg
            );
            Ok(())
        }
        FlightCmd::Telemetry => match pilot.telemetry() {
            Ok(tm) => {
                info!(
                    "Telemetry: battery {}%, baro {:.1}cm, height {:.1}cm, \
                    yaw {} deg, temp {:.1}C",
                    tm.battery_pc,
                    tm.barometer_cm,
                    tm.height_cm,
                    tm.yaw_deg,
                    tm.temperature_c
                );
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => (),
        Err(e) => warn!("Could not execute {:?}: {}", cmd, e),
    }
}
