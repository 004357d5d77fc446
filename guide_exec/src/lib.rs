//! # Guidance library.
//!
//! Line-of-sight waypoint guidance and the pieces needed to run it as a
//! cyclic executable.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Collaborator interfaces - position input, command output and visualisation
pub mod collab;

/// Guidance driver - runs one guidance cycle against the collaborators
pub mod driver;

/// Line-of-sight guidance - computes heading and speed demands to follow waypoints
pub mod los;

/// Waypoint markers - draws the waypoint sequence as cylinders
pub mod markers;

/// Executable parameters
pub mod params;

/// Simulated vehicle - kinematic vehicle used to close the loop
pub mod sim_vehicle;

/// Telecommands - commands accepted by the executable
pub mod tc;
