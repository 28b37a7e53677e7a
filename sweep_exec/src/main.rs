//! Main sweep rover executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logger and parameters
//!     - Initialise the mechanisms backend (simulated) and the explorer
//!     - Main loop, one explorer step per cycle:
//!         - Scan and map the current cell
//!         - Obstacle avoidance and movement
//!         - Battery monitoring, with return-to-home on low battery
//!     - Save the occupancy map into the session and report the final status

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use sweep_lib::auto::{AutoParams, CoverageExplorer, ExploreStatus, StepOutput};
use sweep_lib::mech::sim::{SimMech, SimParams};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one control cycle.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Default sweep geometry when no arguments are given.
const DEFAULT_WIDTH: u32 = 5;
const DEFAULT_HEIGHT: u32 = 5;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("sweep_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Sweep Rover Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- PARSE ARGUMENTS ----

    // Expected usage: sweep_exec [width height]
    let args: Vec<String> = env::args().collect();

    let (width, height) = match args.len() {
        1 => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
        3 => {
            let width = args[1]
                .parse::<u32>()
                .wrap_err("Could not parse the sweep width")?;
            let height = args[2]
                .parse::<u32>()
                .wrap_err("Could not parse the sweep height")?;
            (width, height)
        }
        _ => {
            return Err(eyre!(
                "Expected either zero or two arguments (width height), found {}",
                args.len() - 1
            ))
        }
    };

    info!("Sweep geometry: {} cells per row, {} rows\n", width, height);

    // ---- LOAD PARAMETERS ----

    let auto_params: AutoParams =
        util::params::load("auto.toml").wrap_err("Could not load autonomy params")?;

    let sim_params: SimParams =
        util::params::load("sim.toml").wrap_err("Could not load sim params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    let mut mech = SimMech::new(sim_params);
    info!("SimMech initialised");

    let mut explorer = CoverageExplorer::new(auto_params, width, height)
        .wrap_err("Failed to initialise the CoverageExplorer")?;
    info!("CoverageExplorer initialised\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let status = loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- AUTONOMY PROCESSING ----

        match explorer.step(&mut mech) {
            Ok(StepOutput::Continue) => (),
            Ok(StepOutput::Finished(status)) => break status,
            Err(e) => {
                // A fault here means position tracking or sensing can no
                // longer be trusted, abort the whole sweep.
                return Err(e).wrap_err("Fatal fault during the sweep");
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!("Cycle overran by {:.06} s", cycle_dur.as_secs_f64() - CYCLE_PERIOD_S),
        }
    };

    // ---- SHUTDOWN ----

    // Save the built map into the session for offline inspection
    session.save("occupancy_map.json", &explorer.map.dump());

    match status {
        ExploreStatus::Completed => info!("Sweep completed"),
        ExploreStatus::ReturnedHomeLowBattery(mode) => {
            info!("Low battery, rover returned home ({:?} mode)", mode)
        }
        ExploreStatus::FailedBoxedIn => warn!("Sweep failed: rover boxed in"),
    }

    info!("End of execution");

    Ok(())
}
