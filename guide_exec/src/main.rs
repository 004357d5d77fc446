//! Main guidance executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the guidance and the simulated vehicle
//!     - Main loop:
//!         - Telecommand processing from the script
//!         - Guidance processing via the driver
//!         - Archiving
//!         - Simulated vehicle propagation
//!     - Save the session summary
//!
//! The executable stops when the final waypoint is reached, the cycle limit
//! is hit, the script issues `Stop`, or the script ends before any waypoints
//! were set.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use guide_lib::{
    driver::{GuidanceDriver, TickOutcome},
    los::{LosGuidance, SharedGuidance, StatusReport},
    markers::{ArchiveMarkerSink, WaypointMarkers},
    params::GuideExecParams,
    sim_vehicle::{SimVehicle, SimVehicleState},
    tc::GuidanceTc,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Standard
use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

// External
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use util::{
    archive::{Archived, Archiver},
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Summary of the execution, saved into the session directory on exit.
#[derive(Debug, Serialize)]
struct ExecSummary {
    end_time: String,
    stop_reason: StopReason,
    num_cycles: u64,
    num_switches: usize,
    final_report: StatusReport,
    final_vehicle_state: SimVehicleState,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Reasons the main loop can stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
enum StopReason {
    MissionComplete,
    MaxCyclesReached,
    StopCommanded,
    ScriptEndedUninitialised,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "guide_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("LOS Guidance Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: GuideExecParams = util::params::load(
        "guide_exec.toml"
    ).wrap_err("Could not load exec params")?;

    if !(exec_params.cycle_period_s > 0.0) {
        return Err(eyre!(
            "Cycle period must be positive, found {}", exec_params.cycle_period_s
        ));
    }

    info!("Exec parameters loaded");

    // ---- INITIALISE SCRIPT ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // A single argument overrides the script in the params
    let script_path = match args.len() {
        1 => match exec_params.script_path {
            Some(ref p) => Some(
                host::get_sw_root()
                    .wrap_err("Could not find the software root")?
                    .join(p)
            ),
            None => None
        },
        2 => Some(PathBuf::from(&args[1])),
        n => return Err(eyre!(
            "Expected either zero or one argument, found {}", n - 1
        ))
    };

    let mut script = match script_path {
        Some(p) => {
            info!("Loading script from {:?}", p);

            let si: ScriptInterpreter<GuidanceTc> = ScriptInterpreter::new(&p)
                .wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} TCs\n",
                si.get_duration(),
                si.get_num_cmds()
            );

            Some(si)
        },
        None => {
            info!("No script provided\n");
            None
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut los_guidance = LosGuidance::default();
    los_guidance.init("los_guidance.toml", &session)
        .wrap_err("Failed to initialise LosGuidance")?;
    info!("LosGuidance init complete:\n{}", los_guidance);

    let guidance = SharedGuidance::new(los_guidance);

    let vehicle = SimVehicle::new(&exec_params.sim);
    info!("SimVehicle initialised at {:?}", exec_params.sim.initial_position_m);

    let marker_sink = match Archiver::from_path(&session, "markers/waypoints.csv") {
        Ok(a) => ArchiveMarkerSink::new(a),
        Err(e) => {
            warn!("Could not create the marker archive: {}", e);
            ArchiveMarkerSink::default()
        }
    };

    let mut driver = GuidanceDriver::new(
        guidance.clone(),
        vehicle.clone(),
        vehicle.clone(),
        WaypointMarkers::new(marker_sink)
    );

    if !exec_params.initial_waypoints_m.is_empty() {
        driver.set_waypoints(GuidanceTc::to_waypoints(&exec_params.initial_waypoints_m))
            .wrap_err("Invalid initial waypoints")?;
    }
    else if script.is_none() {
        return Err(eyre!("No initial waypoints and no script provided, nothing to do"));
    }

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let mut num_cycles: u64 = 0;

    let stop_reason = loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- TELECOMMAND PROCESSING ----

        let mut stop_reason = None;

        if let Some(ref mut si) = script {
            match si.get_pending_cmds() {
                PendingCmds::None => (),
                PendingCmds::Some(tc_vec) => {
                    for tc in tc_vec {
                        info!("Executing TC: {:?}", tc);

                        match tc {
                            GuidanceTc::SetWaypoints { waypoints_m } => {
                                if let Err(e) = driver.set_waypoints(
                                    GuidanceTc::to_waypoints(&waypoints_m)
                                ) {
                                    warn!("Could not set waypoints: {}", e);
                                }
                            },
                            GuidanceTc::Stop => stop_reason = Some(StopReason::StopCommanded)
                        }
                    }
                },
                PendingCmds::EndOfScript => {
                    if !guidance.with(|g| g.state().is_initialized()) {
                        info!("End of script reached without any waypoints, stopping");
                        stop_reason = Some(StopReason::ScriptEndedUninitialised);
                    }
                }
            }
        }

        if let Some(r) = stop_reason {
            break r;
        }

        // ---- GUIDANCE PROCESSING ----

        let outcome = driver.tick()
            .wrap_err("Error during guidance processing")?;

        // ---- WRITE ARCHIVES ----

        if let Err(e) = guidance.with_mut(|g| g.write()) {
            warn!("Could not write the guidance archive: {}", e);
        }

        // ---- SIMULATION ----

        vehicle.step(exec_params.cycle_period_s);

        num_cycles += 1;

        if outcome == TickOutcome::MissionComplete {
            info!("Mission complete after {} cycles", num_cycles);
            break StopReason::MissionComplete;
        }

        if let Some(max) = exec_params.max_cycles {
            if num_cycles >= max {
                info!("Maximum number of cycles ({}) reached", max);
                break StopReason::MaxCyclesReached;
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            )
        }
    };

    // ---- SHUTDOWN ----

    let summary = ExecSummary {
        end_time: chrono::Utc::now().to_rfc3339(),
        stop_reason,
        num_cycles,
        num_switches: driver.num_switches(),
        final_report: driver.last_report(),
        final_vehicle_state: vehicle.state(),
    };

    info!("Execution summary: {:#?}", summary);

    session.save("summary.json", &summary)
        .wrap_err("Failed to save the execution summary")?;

    info!("End of execution");

    Ok(())
}
