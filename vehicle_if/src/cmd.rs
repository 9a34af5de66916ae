//! # Flight command module
//!
//! This module provides the operator-facing flight command type. Commands
//! use the same one-line text format whether they come from the interactive
//! prompt or from a flight script, e.g. `forward 120`, `goto 100 200
//! direct`, `flip f`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// Internal
use crate::vehicle::FlipDirection;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A command issued by the operator (or a flight script) to the supervisory
/// layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FlightCmd {
    Takeoff,
    Land,

    /// Translate along a body axis by the given distance in centimeters.
    Forward(f64),
    Back(f64),
    Left(f64),
    Right(f64),
    Up(f64),
    Down(f64),

    /// Rotate by the given number of degrees.
    RotateCw(i32),
    RotateCcw(i32),

    /// Rotate to an absolute bearing in degrees.
    RotateTo(i32),

    /// Fly to absolute dead-reckoned coordinates in centimeters.
    Goto { x_cm: f64, y_cm: f64, direct: bool },

    /// Return to the origin and face the original bearing.
    Home { direct: bool },

    /// Climb to the mission ceiling in coarse steps.
    Ceiling,

    /// Descend to the mission floor in coarse steps.
    Floor,

    /// Perform a flip trick.
    Flip(FlipDirection),

    /// Report the current battery level.
    Battery,

    /// Report the current dead-reckoned pose.
    Pose,

    /// Report a full telemetry snapshot.
    Telemetry,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum CmdParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unrecognised command: {0}")]
    UnknownCommand(String),

    #[error("Command is missing its {0} argument")]
    MissingArgument(&'static str),

    #[error("Invalid value for the {0} argument: {1}")]
    InvalidArgument(&'static str, String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FromStr for FlightCmd {
    type Err = CmdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();

        let word = match parts.next() {
            Some(w) => w.to_lowercase(),
            None => return Err(CmdParseError::Empty),
        };

        let cmd = match word.as_str() {
            "takeoff" => FlightCmd::Takeoff,
            "land" => FlightCmd::Land,

            "forward" => FlightCmd::Forward(parse_dist(parts.next())?),
            "back" => FlightCmd::Back(parse_dist(parts.next())?),
            "left" => FlightCmd::Left(parse_dist(parts.next())?),
            "right" => FlightCmd::Right(parse_dist(parts.next())?),
            "up" => FlightCmd::Up(parse_dist(parts.next())?),
            "down" => FlightCmd::Down(parse_dist(parts.next())?),

            "cw" => FlightCmd::RotateCw(parse_deg(parts.next())?),
            "ccw" => FlightCmd::RotateCcw(parse_deg(parts.next())?),
            "bearing" => FlightCmd::RotateTo(parse_deg(parts.next())?),

            "goto" => {
                let x_cm = parse_coord(parts.next(), "x")?;
                let y_cm = parse_coord(parts.next(), "y")?;
                FlightCmd::Goto {
                    x_cm,
                    y_cm,
                    direct: parse_direct(parts.next())?,
                }
            }

            "home" => FlightCmd::Home {
                direct: parse_direct(parts.next())?,
            },

            "ceiling" => FlightCmd::Ceiling,
            "floor" => FlightCmd::Floor,

            "flip" => {
                let dir = match parts.next() {
                    Some("f") => FlipDirection::Forward,
                    Some("b") => FlipDirection::Back,
                    Some("l") => FlipDirection::Left,
                    Some("r") => FlipDirection::Right,
                    Some(other) => {
                        return Err(CmdParseError::InvalidArgument(
                            "direction",
                            other.to_string(),
                        ))
                    }
                    None => return Err(CmdParseError::MissingArgument("direction")),
                };
                FlightCmd::Flip(dir)
            }

            "battery" => FlightCmd::Battery,
            "pose" => FlightCmd::Pose,
            "telemetry" => FlightCmd::Telemetry,

            _ => return Err(CmdParseError::UnknownCommand(word)),
        };

        Ok(cmd)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn parse_dist(arg: Option<&str>) -> Result<f64, CmdParseError> {
    let arg = arg.ok_or(CmdParseError::MissingArgument("distance"))?;

    arg.parse()
        .map_err(|_| CmdParseError::InvalidArgument("distance", arg.to_string()))
}

fn parse_deg(arg: Option<&str>) -> Result<i32, CmdParseError> {
    let arg = arg.ok_or(CmdParseError::MissingArgument("degrees"))?;

    arg.parse()
        .map_err(|_| CmdParseError::InvalidArgument("degrees", arg.to_string()))
}

fn parse_coord(arg: Option<&str>, name: &'static str) -> Result<f64, CmdParseError> {
    let arg = arg.ok_or(CmdParseError::MissingArgument(name))?;

    arg.parse()
        .map_err(|_| CmdParseError::InvalidArgument(name, arg.to_string()))
}

/// An optional trailing `direct` keyword selects direct flight over
/// axis-aligned flight.
fn parse_direct(arg: Option<&str>) -> Result<bool, CmdParseError> {
    match arg {
        Some("direct") => Ok(true),
        Some(other) => Err(CmdParseError::InvalidArgument(
            "flight mode",
            other.to_string(),
        )),
        None => Ok(false),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_simple() {
        assert_eq!("takeoff".parse::<FlightCmd>().unwrap(), FlightCmd::Takeoff);
        assert_eq!("land".parse::<FlightCmd>().unwrap(), FlightCmd::Land);
        assert_eq!(
            "forward 120".parse::<FlightCmd>().unwrap(),
            FlightCmd::Forward(120.0)
        );
        assert_eq!(
            "cw 90".parse::<FlightCmd>().unwrap(),
            FlightCmd::RotateCw(90)
        );
        assert_eq!(
            "bearing 270".parse::<FlightCmd>().unwrap(),
            FlightCmd::RotateTo(270)
        );
        assert_eq!(
            "flip f".parse::<FlightCmd>().unwrap(),
            FlightCmd::Flip(FlipDirection::Forward)
        );
    }

    #[test]
    fn test_parse_goto() {
        assert_eq!(
            "goto 100 -200".parse::<FlightCmd>().unwrap(),
            FlightCmd::Goto {
                x_cm: 100.0,
                y_cm: -200.0,
                direct: false
            }
        );
        assert_eq!(
            "goto 50 50 direct".parse::<FlightCmd>().unwrap(),
            FlightCmd::Goto {
                x_cm: 50.0,
                y_cm: 50.0,
                direct: true
            }
        );
        assert_eq!(
            "home direct".parse::<FlightCmd>().unwrap(),
            FlightCmd::Home { direct: true }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "".parse::<FlightCmd>(),
            Err(CmdParseError::Empty)
        ));
        assert!(matches!(
            "warp 9".parse::<FlightCmd>(),
            Err(CmdParseError::UnknownCommand(_))
        ));
        assert!(matches!(
            "forward".parse::<FlightCmd>(),
            Err(CmdParseError::MissingArgument("distance"))
        ));
        assert!(matches!(
            "goto 10 fast".parse::<FlightCmd>(),
            Err(CmdParseError::InvalidArgument("y", _))
        ));
    }
}
