//! Grid-aligned ODE integration.
//!
//! An [`OdeSystem`] describes `dy/dt = f(t, y)` over `N` state variables.
//! [`integrate`] advances it across a fixed [`TimeGrid`] with one of the
//! [`Method`]s backed by `ode_solvers`, returning exactly one [`Sample`] per
//! grid point. Solvers are free to evaluate the system at any intermediate
//! time they choose; only the grid samples are reported.

mod error;
mod grid;
mod integrator;
mod method;
mod system;

pub use error::{Error, GridError};
pub use grid::TimeGrid;
pub use integrator::{Solution, Stats, integrate};
pub use method::{DEFAULT_TOLERANCE, Method};
pub use system::{OdeSystem, Sample};
