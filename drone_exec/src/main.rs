//! Main drone-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and mission parameters
//!     - Connect the pilot to the vehicle (real drone or simulator)
//!     - Command loop, from one of two sources:
//!         - A flight script, polled on a fixed cycle
//!         - The interactive prompt
//!
//! Every command passes through the pilot, which enforces the mission's
//! operating envelope and keeps the dead-reckoned pose.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::WrapErr,
    Report,
};
use log::{info, warn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use drone_lib::pilot::{Params, Pilot};
use util::{
    logger::{logger_init, LevelFilter},
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::Session,
};
use vehicle_if::cmd::FlightCmd;
use vehicle_if::sim::SimVehicle;
use vehicle_if::tello::{TelloVehicle, TELLO_ADDR};
use vehicle_if::vehicle::Vehicle;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one script-polling cycle.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Prompt shown in interactive mode.
const PROMPT: &str = "pilot $ ";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options for the executable.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "drone_exec",
    about = "Supervisory flight executable for the Heads-Up Flight drone"
)]
struct Opt {
    /// Path to a flight script to run. If omitted the interactive prompt is
    /// used instead.
    #[structopt(parse(from_os_str))]
    script: Option<PathBuf>,

    /// Fly the built-in simulator instead of a real drone.
    #[structopt(long)]
    sim: bool,

    /// Address of the drone's command channel.
    #[structopt(long, default_value = TELLO_ADDR)]
    addr: String,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Various sources for the flight commands incoming to the exec.
enum CmdSource {
    Script(ScriptInterpreter),
    Interactive,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("drone_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Heads-Up Flight Drone Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    let opt = Opt::from_args();

    // ---- LOAD PARAMETERS ----

    let params: Params =
        util::params::load("mission.toml").wrap_err("Could not load mission params")?;

    info!("Mission parameters loaded for \"{}\"", params.mission);

    // ---- INITIALISE COMMAND SOURCE ----

    // Command source determines whether we're getting commands from a script
    // or from the operator's prompt.
    let cmd_source = match opt.script {
        Some(ref script_path) => {
            info!("Loading script from {:?}", script_path);

            let si =
                ScriptInterpreter::new(script_path).wrap_err("Failed to load script")?;

            // Display some info
            info!(
                "Loaded script lasts {:.02} s and contains {} commands\n",
                si.get_duration(),
                si.get_num_cmds()
            );

            CmdSource::Script(si)
        }
        None => {
            info!("No script provided, the interactive prompt will be used\n");
            CmdSource::Interactive
        }
    };

    // ---- CONNECT AND RUN ----

    // The pilot is generic over the vehicle, so the same command loops fly
    // both the real transport and the simulator.
    if opt.sim {
        info!("Flying the simulator");
        let pilot = Pilot::new(SimVehicle::new(), params);
        run(pilot, cmd_source, &session)?;
    }
    else {
        let vehicle = TelloVehicle::new(&opt.addr)
            .wrap_err("Could not create the vehicle transport")?;
        let pilot = Pilot::new(vehicle, params);
        run(pilot, cmd_source, &session)?;
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    Ok(())
}

/// Connect the pilot and run the command loop for the given source.
fn run<V: Vehicle>(
    mut pilot: Pilot<V>,
    cmd_source: CmdSource,
    session: &Session,
) -> Result<(), Report> {
    pilot
        .connect()
        .wrap_err("Could not establish the vehicle connection")?;

    match cmd_source {
        CmdSource::Script(si) => run_script(&mut pilot, si),
        CmdSource::Interactive => run_interactive(&mut pilot, session),
    }
}

/// Poll the script interpreter on a fixed cycle, executing commands as they
/// come due.
fn run_script<V: Vehicle>(
    pilot: &mut Pilot<V>,
    mut si: ScriptInterpreter,
) -> Result<(), Report> {
    info!("Begining script execution\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        match si.get_pending_cmds() {
            PendingCmds::None => (),
            PendingCmds::Some(cmd_vec) => {
                for cmd in cmd_vec.iter() {
                    cmd_processor::exec(pilot, cmd);
                }
            }
            // Exit if end of script reached
            PendingCmds::EndOfScript => {
                info!("End of flight script reached, stopping");
                break;
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Motion commands block until complete, so overruns are routine
        // during a script and only worth a warning.
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
            ),
        }
    }

    // A script always ends with the drone on the ground
    if pilot.is_connected() {
        cmd_processor::exec(pilot, &FlightCmd::Land);
    }

    Ok(())
}

/// Read commands from the operator's prompt until they exit.
fn run_interactive<V: Vehicle>(
    pilot: &mut Pilot<V>,
    session: &Session,
) -> Result<(), Report> {
    let mut rl = DefaultEditor::new().wrap_err("Could not initialise the prompt")?;

    // History lives in the session directory alongside the log
    let history_path = session.session_root.join("history.txt");
    if rl.load_history(&history_path).is_err() {
        info!("No prompt history detected");
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }

                rl.add_history_entry(line).ok();

                match line.parse::<FlightCmd>() {
                    Ok(cmd) => cmd_processor::exec(pilot, &cmd),
                    Err(e) => warn!("{}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                warn!("Prompt error: {}", e);
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(&history_path) {
        warn!("Could not save the prompt history: {}", e);
    }

    Ok(())
}
