//! Closed-loop simulation runs of a rotary inverted pendulum.
//!
//! A [`Setup`] (usually resolved from a [`SimulationConfig`]) is validated by
//! [`Simulation::new`] and integrated by [`Simulation::run`], which returns a
//! [`Run`]: the grid times, the trajectory, the reconciled control history
//! and the moment the controller switched to stabilization.
//!
//! Each run creates its own controller, so the swing-up latch never leaks
//! between runs.

mod closed_loop;
mod config;
mod error;
mod recorder;
mod simulation;

pub use config::{Setup, SimulationConfig, TimeConfig};
pub use error::{LoadError, SimError};
pub use recorder::{ControlHistory, ControlHistoryRecorder, ControlRecord, RecordingPolicy};
pub use simulation::{Run, Simulation};
