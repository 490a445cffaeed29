use std::path::PathBuf;

use furuta_ode::GridError;
use furuta_pendulum::ConfigError;
use thiserror::Error;

/// Errors that end a simulation run.
///
/// Both kinds are fatal. An invalid configuration is always reported before
/// the solver starts.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("integration diverged: {0}")]
    IntegrationDivergence(#[from] furuta_ode::Error),
}

/// Errors raised while reading a [`SimulationConfig`](crate::SimulationConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read configuration: {0}")]
    Read(String),

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl From<GridError> for SimError {
    fn from(error: GridError) -> Self {
        Self::InvalidConfiguration(grid_error(error))
    }
}

/// Restates a grid error in terms of the configured time values.
pub(crate) fn grid_error(error: GridError) -> ConfigError {
    match error {
        GridError::Step(value) => ConfigError::require_positive("dt", value)
            .err()
            .unwrap_or(ConfigError::OutOfRange { name: "dt", value }),
        GridError::Horizon(value) => ConfigError::require_positive("t_max", value)
            .err()
            .unwrap_or(ConfigError::OutOfRange {
                name: "t_max",
                value,
            }),
        GridError::TooManySamples(value) => ConfigError::OutOfRange {
            name: "t_max / dt",
            value,
        },
    }
}
