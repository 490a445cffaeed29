use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ControllerGains, EnergyMonitor, PhysicalParameters, State};

/// Regime of the hybrid controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlMode {
    /// Energy pumping toward upright.
    #[default]
    SwingUp,

    /// Linear state feedback about upright and the arm target.
    Stabilize,
}

/// Produces the control output `u` for a state.
///
/// [`ControlLaw`] is the controller used in simulation runs. The trait exists
/// so the dynamics can be driven by any other source of `u`, such as a fixed
/// command in tests.
pub trait Controller {
    /// Returns the control output for `state`, updating any internal regime.
    fn compute_control(&mut self, state: &State) -> f64;

    /// Returns the control output `mode` would produce for `state`.
    ///
    /// Must not change the controller's regime.
    fn control_for_mode(&self, mode: ControlMode, state: &State) -> f64;

    /// Returns the regime in force after the most recent call.
    fn mode(&self) -> ControlMode;
}

impl<C: Controller + ?Sized> Controller for &mut C {
    fn compute_control(&mut self, state: &State) -> f64 {
        (**self).compute_control(state)
    }

    fn control_for_mode(&self, mode: ControlMode, state: &State) -> f64 {
        (**self).control_for_mode(mode, state)
    }

    fn mode(&self) -> ControlMode {
        (**self).mode()
    }
}

/// Hybrid swing-up/stabilization law with a one-way latch.
///
/// A law starts in [`ControlMode::SwingUp`]. The first call that sees a state
/// satisfying [`EnergyMonitor::is_swing_up_complete`] latches it into
/// [`ControlMode::Stabilize`] for good. Create one law per run.
#[derive(Debug, Clone)]
pub struct ControlLaw {
    gains: ControllerGains,
    monitor: EnergyMonitor,
    mode: ControlMode,
}

impl ControlLaw {
    /// Creates a law in swing-up mode.
    #[must_use]
    pub fn new(plant: PhysicalParameters, gains: ControllerGains) -> Self {
        Self {
            gains,
            monitor: EnergyMonitor::new(plant),
            mode: ControlMode::SwingUp,
        }
    }

    #[must_use]
    pub fn gains(&self) -> &ControllerGains {
        &self.gains
    }

    #[must_use]
    pub fn monitor(&self) -> &EnergyMonitor {
        &self.monitor
    }

    /// `u = Kp_θ θ + Kd_θ θ̇ + Kp_α (α − x0) + Kd_α α̇`
    fn stabilizing(&self, state: &State) -> f64 {
        let ControllerGains {
            kp_theta,
            kd_theta,
            kp_alpha,
            kd_alpha,
            arm_target,
            ..
        } = self.gains;

        kp_theta * state.theta
            + kd_theta * state.dtheta
            + kp_alpha * (state.alpha - arm_target)
            + kd_alpha * state.dalpha
    }

    /// `u = k E θ̇ cos θ`
    fn swinging_up(&self, state: &State) -> f64 {
        self.gains.energy_gain * self.monitor.energy(state) * state.dtheta * state.theta.cos()
    }
}

impl Controller for ControlLaw {
    fn compute_control(&mut self, state: &State) -> f64 {
        if self.mode == ControlMode::SwingUp && self.monitor.is_swing_up_complete(state) {
            self.mode = ControlMode::Stabilize;
            info!(
                theta = state.theta,
                dtheta = state.dtheta,
                energy = self.monitor.energy(state),
                "swing-up complete, stabilizing"
            );
        }

        self.control_for_mode(self.mode, state)
    }

    fn control_for_mode(&self, mode: ControlMode, state: &State) -> f64 {
        match mode {
            ControlMode::SwingUp => self.swinging_up(state),
            ControlMode::Stabilize => self.stabilizing(state),
        }
    }

    fn mode(&self) -> ControlMode {
        self.mode
    }
}
