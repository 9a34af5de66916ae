//! # Drone executable library
//!
//! Supervisory flight software for the Heads-Up Flight drone. The [`pilot`]
//! module turns the drone's primitive relative commands into a safe,
//! position-aware actor: it tracks a dead-reckoned pose, enforces the
//! mission's operating envelope and decomposes long or absolute movement
//! requests into sequences the hardware accepts.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod pilot;

// ---------------------------------------------------------------------------
// REEXPORTS
// ---------------------------------------------------------------------------

pub use pilot::{Params, Pilot, PilotError, Pose};
