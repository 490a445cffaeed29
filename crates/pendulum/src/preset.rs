use std::{f64::consts::PI, fmt};

use serde::{Deserialize, Serialize};

use crate::{ControllerGains, PhysicalParameters, State};

/// Standard gravity (m/s²).
const STANDARD_GRAVITY: f64 = 9.806_65;

/// Bundled parameter sets.
///
/// Both presets share the plant, the swing-up gain and the initial condition.
/// They differ in the stabilization gains only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// The reference rig with its stock PD gains.
    ///
    /// These gains do not stabilize the reduced model: `Kp_theta` is below
    /// `g`, so after the switch the pendulum falls away from upright again.
    #[default]
    Reference,

    /// The reference rig with stabilization gains placing the poles of the
    /// model linearized about upright at `-2, -3, -4, -5`.
    PolePlaced,
}

impl Preset {
    /// Every preset, in declaration order.
    pub const ALL: [Preset; 2] = [Preset::Reference, Preset::PolePlaced];

    /// Returns the preset's name as used in configuration files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Preset::Reference => "reference",
            Preset::PolePlaced => "pole-placed",
        }
    }

    /// Returns the plant parameters.
    #[must_use]
    pub fn plant(self) -> PhysicalParameters {
        PhysicalParameters {
            gravity: STANDARD_GRAVITY,
            pendulum_length: 0.30,
            arm_length: 0.38,
            pendulum_mass: 0.5,
            arm_mass: 0.6,
            arm_inertia: 0.0025,
            pendulum_inertia: 0.006,
            com_offset: 0.15,
        }
    }

    /// Returns the controller gains.
    #[must_use]
    pub fn gains(self) -> ControllerGains {
        match self {
            Preset::Reference => ControllerGains {
                kp_theta: 4.091,
                kd_theta: 0.350,
                kp_alpha: 0.125,
                kd_alpha: 0.281,
                energy_gain: 0.4,
                arm_target: 0.0,
            },
            Preset::PolePlaced => ControllerGains {
                kp_theta: 32.208,
                kd_theta: 5.613,
                kp_alpha: 3.671,
                kd_alpha: 4.711,
                energy_gain: 0.4,
                arm_target: 0.0,
            },
        }
    }

    /// Returns the initial state: hanging just off bottom with a small arm drift.
    #[must_use]
    pub fn initial_state(self) -> State {
        State::new(PI - 0.1, 0.0, 0.0, -0.05)
    }

    /// Returns the output sample spacing (s).
    #[must_use]
    pub fn time_step(self) -> f64 {
        0.05
    }

    /// Returns the simulated horizon (s).
    #[must_use]
    pub fn horizon(self) -> f64 {
        35.0
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
