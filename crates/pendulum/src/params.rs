use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Physical constants of the plant.
///
/// Immutable for the lifetime of a run. Lengths are in meters, masses in
/// kilograms and moments of inertia in kg·m².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhysicalParameters {
    /// Gravitational acceleration (m/s²).
    pub gravity: f64,

    /// Pendulum length, `L_p`.
    pub pendulum_length: f64,

    /// Arm length, `L_a`.
    pub arm_length: f64,

    /// Pendulum mass, `m_p`.
    pub pendulum_mass: f64,

    /// Arm mass, `m_a`.
    pub arm_mass: f64,

    /// Moment of inertia of the arm, `I_a`.
    pub arm_inertia: f64,

    /// Moment of inertia of the pendulum, `I_p`.
    pub pendulum_inertia: f64,

    /// Distance from the pivot to the pendulum's center of mass, `mc`.
    pub com_offset: f64,
}

impl PhysicalParameters {
    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if gravity is negative or non-finite, or if
    /// any length, mass or moment of inertia is not strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_non_negative("gravity", self.gravity)?;
        ConfigError::require_positive("pendulum_length", self.pendulum_length)?;
        ConfigError::require_positive("arm_length", self.arm_length)?;
        ConfigError::require_positive("pendulum_mass", self.pendulum_mass)?;
        ConfigError::require_positive("arm_mass", self.arm_mass)?;
        ConfigError::require_positive("arm_inertia", self.arm_inertia)?;
        ConfigError::require_positive("pendulum_inertia", self.pendulum_inertia)?;
        ConfigError::require_positive("com_offset", self.com_offset)?;
        Ok(())
    }
}

/// Gains of the swing-up and stabilization laws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerGains {
    /// Proportional gain on the pendulum angle, `Kp_theta`.
    pub kp_theta: f64,

    /// Derivative gain on the pendulum rate, `Kd_theta`.
    pub kd_theta: f64,

    /// Proportional gain on the arm position error, `Kp_alpha`.
    pub kp_alpha: f64,

    /// Derivative gain on the arm rate, `Kd_alpha`.
    pub kd_alpha: f64,

    /// Swing-up energy gain, `k`.
    pub energy_gain: f64,

    /// Target arm position, `x0`.
    pub arm_target: f64,
}

impl ControllerGains {
    /// Validates the gains.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] if any gain is NaN or infinite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::require_finite("kp_theta", self.kp_theta)?;
        ConfigError::require_finite("kd_theta", self.kd_theta)?;
        ConfigError::require_finite("kp_alpha", self.kp_alpha)?;
        ConfigError::require_finite("kd_alpha", self.kd_alpha)?;
        ConfigError::require_finite("energy_gain", self.energy_gain)?;
        ConfigError::require_finite("arm_target", self.arm_target)?;
        Ok(())
    }
}
