//! # Tello UDP transport
//!
//! Implementation of the [`Vehicle`] trait over the DJI Tello's text SDK.
//! The protocol is a single UDP request/response channel: each command is an
//! ASCII string, the drone answers `ok`, `error ...`, or a value for `?`
//! queries. Translation and rotation commands block on the drone side until
//! the motion is complete, so the read timeout here is generous.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

// Internal
use crate::vehicle::{FlipDirection, Vehicle, VehicleError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The address the Tello listens on when acting as its own access point.
pub const TELLO_ADDR: &str = "192.168.10.1:8889";

/// How long to wait for a response before declaring a command timed out.
///
/// Motion commands do not respond until the motion has finished, which for
/// a full 500 cm translation at low speed can take tens of seconds.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A real Tello drone reached over UDP.
pub struct TelloVehicle {
    addr: SocketAddr,
    socket: Option<UdpSocket>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TelloVehicle {
    /// Create a new unconnected Tello transport targeting the given
    /// address (see [`TELLO_ADDR`] for the usual one).
    pub fn new(addr: &str) -> Result<Self, VehicleError> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| VehicleError::ConnectionFailed(
                format!("invalid vehicle address \"{}\"", addr)
            ))?;

        Ok(TelloVehicle { addr, socket: None })
    }

    /// Send a command string and wait for the response line.
    fn request(&mut self, cmd: &str) -> Result<String, VehicleError> {
        let socket = match self.socket {
            Some(ref s) => s,
            None => return Err(VehicleError::NotConnected),
        };

        debug!("Tello <- \"{}\"", cmd);
        socket.send(cmd.as_bytes())?;

        let mut buf = [0u8; 1024];
        let len = match socket.recv(&mut buf) {
            Ok(l) => l,
            Err(e) if e.kind() == ErrorKind::WouldBlock
                || e.kind() == ErrorKind::TimedOut =>
            {
                return Err(VehicleError::ResponseTimeout)
            }
            Err(e) => return Err(VehicleError::IoError(e)),
        };

        let response = String::from_utf8_lossy(&buf[..len])
            .trim()
            .to_string();
        debug!("Tello -> \"{}\"", response);

        Ok(response)
    }

    /// Send a command which is expected to be acknowledged with `ok`.
    fn command(&mut self, cmd: &str) -> Result<(), VehicleError> {
        let response = self.request(cmd)?;

        if response.eq_ignore_ascii_case("ok") {
            Ok(())
        }
        else {
            Err(VehicleError::CommandRejected(response))
        }
    }

    /// Send a `?` query and parse the numeric response.
    fn query_f64(&mut self, query: &str) -> Result<f64, VehicleError> {
        let response = self.request(query)?;

        // Strip a trailing unit suffix ("dm" on height for instance)
        let numeric: String = response
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();

        numeric
            .parse()
            .map_err(|_| VehicleError::InvalidResponse(response))
    }
}

impl Vehicle for TelloVehicle {
    fn connect(&mut self) -> Result<(), VehicleError> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.set_read_timeout(Some(RESPONSE_TIMEOUT))?;
        socket.connect(self.addr)?;

        self.socket = Some(socket);

        // Put the drone into SDK mode. If this exchange fails the drone is
        // unreachable and the session cannot continue.
        match self.command("command") {
            Ok(()) => {
                info!("Tello at {} entered SDK mode", self.addr);
                Ok(())
            }
            Err(e) => {
                self.socket = None;
                Err(VehicleError::ConnectionFailed(format!("{}", e)))
            }
        }
    }

    fn disconnect(&mut self) {
        // Dropping the socket closes the channel, the drone needs no
        // farewell message.
        self.socket = None;
    }

    fn takeoff(&mut self) -> Result<(), VehicleError> {
        self.command("takeoff")
    }

    fn land(&mut self) -> Result<(), VehicleError> {
        self.command("land")
    }

    fn rotate_cw(&mut self, degrees: u16) -> Result<(), VehicleError> {
        self.command(&format!("cw {}", degrees))
    }

    fn rotate_ccw(&mut self, degrees: u16) -> Result<(), VehicleError> {
        self.command(&format!("ccw {}", degrees))
    }

    fn move_forward(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.command(&format!("forward {}", distance_cm))
    }

    fn move_back(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.command(&format!("back {}", distance_cm))
    }

    fn move_left(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.command(&format!("left {}", distance_cm))
    }

    fn move_right(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.command(&format!("right {}", distance_cm))
    }

    fn move_up(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.command(&format!("up {}", distance_cm))
    }

    fn move_down(&mut self, distance_cm: u16) -> Result<(), VehicleError> {
        self.command(&format!("down {}", distance_cm))
    }

    fn set_speed(&mut self, speed_cms: u16) -> Result<(), VehicleError> {
        self.command(&format!("speed {}", speed_cms))
    }

    fn send_rc(
        &mut self,
        lr: i16,
        fb: i16,
        ud: i16,
        yaw: i16,
    ) -> Result<(), VehicleError> {
        let socket = match self.socket {
            Some(ref s) => s,
            None => return Err(VehicleError::NotConnected),
        };

        // rc demands are fire-and-forget, the drone never acknowledges them
        socket.send(format!("rc {} {} {} {}", lr, fb, ud, yaw).as_bytes())?;

        Ok(())
    }

    fn flip(&mut self, direction: FlipDirection) -> Result<(), VehicleError> {
        self.command(&format!("flip {}", direction.sdk_char()))
    }

    fn stream_on(&mut self) -> Result<(), VehicleError> {
        self.command("streamon")
    }

    fn battery_pc(&mut self) -> Result<u8, VehicleError> {
        let response = self.request("battery?")?;

        response
            .trim()
            .parse()
            .map_err(|_| VehicleError::InvalidResponse(response))
    }

    fn barometer_cm(&mut self) -> Result<f64, VehicleError> {
        // The SDK reports the barometer in metres
        Ok(self.query_f64("baro?")? * 100.0)
    }

    fn height_cm(&mut self) -> Result<f64, VehicleError> {
        // The SDK reports height in decimetres ("8dm")
        Ok(self.query_f64("height?")? * 10.0)
    }

    fn yaw_deg(&mut self) -> Result<i32, VehicleError> {
        let response = self.request("attitude?")?;

        // Response is of the form "pitch:0;roll:0;yaw:90;"
        let yaw = response
            .split(';')
            .find_map(|field| field.trim().strip_prefix("yaw:"))
            .and_then(|value| value.parse().ok());

        match yaw {
            Some(y) => Ok(y),
            None => Err(VehicleError::InvalidResponse(response)),
        }
    }

    fn temperature_c(&mut self) -> Result<f64, VehicleError> {
        let response = self.request("temp?")?;

        // Response is a range like "60~62C", take the midpoint
        let midpoint = {
            let trimmed = response.trim_end_matches(|c: char| !c.is_ascii_digit());
            let mut bounds = trimmed.splitn(2, '~');

            let low = bounds.next().and_then(|s| s.parse::<f64>().ok());
            let high = bounds.next().and_then(|s| s.parse::<f64>().ok());

            low.map(|l| (l + high.unwrap_or(l)) / 2.0)
        };

        midpoint.ok_or(VehicleError::InvalidResponse(response))
    }
}
