//! Plant model and hybrid controller for a rotary (Furuta) inverted pendulum.
//!
//! This crate defines the pieces a closed-loop simulation is assembled from:
//!
//! - [`State`]: pendulum and arm angles and rates
//! - [`PhysicalParameters`], [`ControllerGains`]: immutable per-run constants
//! - [`EnergyMonitor`]: the energy metric and the swing-up completion test
//! - [`ControlLaw`]: the swing-up/stabilize switch behind the [`Controller`] trait
//! - [`DynamicsModel`]: the right-hand side of the closed-loop ODE
//! - [`Preset`]: the bundled parameter sets
//!
//! Nothing here integrates anything; see the `furuta-sim` crate for runs.

mod control;
mod dynamics;
mod energy;
mod error;
mod params;
mod preset;
mod state;

pub use control::{ControlLaw, ControlMode, Controller};
pub use dynamics::DynamicsModel;
pub use energy::{ENERGY_THRESHOLD, EnergyMonitor, UPRIGHT_TOLERANCE};
pub use error::ConfigError;
pub use params::{ControllerGains, PhysicalParameters};
pub use preset::Preset;
pub use state::State;
