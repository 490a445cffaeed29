use std::path::Path;

use furuta_ode::{Method, TimeGrid};
use furuta_pendulum::{ConfigError, ControllerGains, PhysicalParameters, Preset, State};
use serde::{Deserialize, Serialize};

use crate::{LoadError, RecordingPolicy, error::grid_error};

/// Output spacing and horizon of a run, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeConfig {
    pub dt: f64,
    pub t_max: f64,
}

impl TimeConfig {
    #[must_use]
    pub fn for_preset(preset: Preset) -> Self {
        Self {
            dt: preset.time_step(),
            t_max: preset.horizon(),
        }
    }

    /// Builds the output grid `t[i] = i * dt` over `[0, t_max)`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `dt` or `t_max` is not finite and
    /// positive, or if the grid would be too large.
    pub fn grid(&self) -> Result<TimeGrid, ConfigError> {
        ConfigError::require_positive("dt", self.dt)?;
        ConfigError::require_positive("t_max", self.t_max)?;
        TimeGrid::new(self.dt, self.t_max).map_err(grid_error)
    }
}

/// Everything a run needs, before validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setup {
    pub plant: PhysicalParameters,
    pub gains: ControllerGains,
    pub initial: State,
    pub time: TimeConfig,
    pub method: Method,
    pub recording: RecordingPolicy,
}

impl Setup {
    /// Returns a preset's setup with the default solver and recording policy.
    #[must_use]
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            plant: preset.plant(),
            gains: preset.gains(),
            initial: preset.initial_state(),
            time: TimeConfig::for_preset(preset),
            method: Method::default(),
            recording: RecordingPolicy::default(),
        }
    }

    /// Validates every value and returns the output grid.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<TimeGrid, ConfigError> {
        self.plant.validate()?;
        self.gains.validate()?;

        let State {
            theta,
            dtheta,
            alpha,
            dalpha,
        } = self.initial;
        ConfigError::require_finite("initial.theta", theta)?;
        ConfigError::require_finite("initial.dtheta", dtheta)?;
        ConfigError::require_finite("initial.alpha", alpha)?;
        ConfigError::require_finite("initial.dalpha", dalpha)?;

        if let Some((abs_tol, rel_tol)) = self.method.tolerances() {
            ConfigError::require_positive("abs_tol", abs_tol)?;
            ConfigError::require_positive("rel_tol", rel_tol)?;
        }

        self.time.grid()
    }
}

/// A run configuration as read from TOML.
///
/// Every table is optional and falls back to the selected preset:
///
/// ```toml
/// preset = "pole-placed"
/// recording = "output-samples"
///
/// [time]
/// dt = 0.01
/// t_max = 10.0
///
/// [solver]
/// method = "dop853"
/// abs_tol = 1e-10
/// rel_tol = 1e-10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(default)]
    pub preset: Preset,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording: Option<RecordingPolicy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plant: Option<PhysicalParameters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gains: Option<ControllerGains>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<State>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<Method>,
}

impl SimulationConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] if the text is not a valid configuration.
    pub fn from_toml(text: &str) -> Result<Self, LoadError> {
        toml::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::FileNotFound`] if the file does not exist,
    /// [`LoadError::Read`] if it cannot be read and [`LoadError::Parse`] if it
    /// cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::FileNotFound(path.to_path_buf())
            } else {
                LoadError::Read(e.to_string())
            }
        })?;

        Self::from_toml(&content)
    }

    /// Fills the omitted tables from the preset.
    ///
    /// The result is not validated; [`Simulation::new`](crate::Simulation::new)
    /// does that.
    #[must_use]
    pub fn resolve(&self) -> Setup {
        let defaults = Setup::from_preset(self.preset);

        Setup {
            plant: self.plant.unwrap_or(defaults.plant),
            gains: self.gains.unwrap_or(defaults.gains),
            initial: self.initial.unwrap_or(defaults.initial),
            time: self.time.unwrap_or(defaults.time),
            method: self.solver.unwrap_or(defaults.method),
            recording: self.recording.unwrap_or(defaults.recording),
        }
    }
}
