use std::error::Error as StdError;

use ode_solvers::dop_shared::IntegrationError;
use thiserror::Error;

/// Errors that can occur while integrating over a grid.
#[derive(Debug, Error)]
pub enum Error {
    #[error("solver failed: {0}")]
    Integration(#[from] IntegrationError),

    #[error("system evaluation failed at t = {t}")]
    System {
        t: f64,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("non-finite derivative at t = {t}")]
    NonFiniteDerivative { t: f64 },

    #[error("non-finite state at sample {index} (t = {t})")]
    NonFiniteState { index: usize, t: f64 },

    #[error("solver produced no output for sample {index} (t = {t})")]
    MissingSample { index: usize, t: f64 },
}

/// Errors that can occur when building a [`TimeGrid`](crate::TimeGrid).
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GridError {
    #[error("time step must be finite and positive, got {0}")]
    Step(f64),

    #[error("horizon must be finite and positive, got {0}")]
    Horizon(f64),

    #[error("horizon / time step = {0} exceeds the sample limit")]
    TooManySamples(f64),
}
