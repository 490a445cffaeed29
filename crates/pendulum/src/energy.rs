use std::f64::consts::PI;

use crate::{PhysicalParameters, State};

/// Largest distance from upright (rad) at which stabilization may take over.
pub const UPRIGHT_TOLERANCE: f64 = PI / 9.0;

/// Largest energy magnitude at which stabilization may take over.
pub const ENERGY_THRESHOLD: f64 = 0.5;

/// Computes the energy metric that drives the swing-up law and the switch.
///
/// The metric is
///
/// ```text
/// E = ½ (I_p + I_a) θ̇² + m_p g L_p (cos θ − 1)
/// ```
///
/// so it is zero with the pendulum at rest at `θ = 0` and negative below it.
/// Only the pendulum terms of the passed-in state are read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyMonitor {
    plant: PhysicalParameters,
}

impl EnergyMonitor {
    #[must_use]
    pub fn new(plant: PhysicalParameters) -> Self {
        Self { plant }
    }

    /// Returns the energy metric for `state`.
    #[must_use]
    pub fn energy(&self, state: &State) -> f64 {
        let PhysicalParameters {
            gravity,
            pendulum_length,
            pendulum_mass,
            arm_inertia,
            pendulum_inertia,
            ..
        } = self.plant;

        let kinetic = 0.5 * (pendulum_inertia + arm_inertia) * state.dtheta * state.dtheta;
        let potential = pendulum_mass * gravity * pendulum_length * (state.theta.cos() - 1.0);

        kinetic + potential
    }

    /// Returns `true` once the pendulum is close enough to upright, with
    /// little enough energy, for the stabilizer to take over.
    ///
    /// The angle is not wrapped: the stabilizing law feeds back the raw
    /// angle, so only `|θ| < π/9` counts as upright.
    #[must_use]
    pub fn is_swing_up_complete(&self, state: &State) -> bool {
        state.theta.abs() < UPRIGHT_TOLERANCE && self.energy(state).abs() < ENERGY_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use crate::Preset;

    fn monitor() -> EnergyMonitor {
        EnergyMonitor::new(Preset::Reference.plant())
    }

    #[test]
    fn energy_vanishes_at_rest_upright_for_any_arm_state() {
        let monitor = monitor();

        for (alpha, dalpha) in [(0.0, 0.0), (1.3, -0.7), (-25.0, 40.0)] {
            let state = State::new(0.0, 0.0, alpha, dalpha);
            assert_eq!(monitor.energy(&state), 0.0);
        }
    }

    #[test]
    fn energy_at_rest_hanging_is_twice_the_potential_drop() {
        let plant = Preset::Reference.plant();
        let state = State::new(PI, 0.0, 0.0, 0.0);

        let expected = -2.0 * plant.pendulum_mass * plant.gravity * plant.pendulum_length;
        assert_relative_eq!(monitor().energy(&state), expected, max_relative = 1e-12);
    }

    #[test]
    fn kinetic_term_uses_pendulum_and_arm_inertia() {
        let state = State::new(0.0, 2.0, 0.0, 0.0);

        // ½ · (0.006 + 0.0025) · 2²
        assert_relative_eq!(monitor().energy(&state), 0.017, max_relative = 1e-12);
    }

    #[test]
    fn energy_is_continuous_across_small_perturbations() {
        let monitor = monitor();
        let base = State::new(0.3, -1.2, 0.0, 0.0);
        let nudged = State::new(0.3 + 1e-9, -1.2 + 1e-9, 0.0, 0.0);

        assert_abs_diff_eq!(monitor.energy(&base), monitor.energy(&nudged), epsilon = 1e-7);
    }

    #[test]
    fn switch_boundary_sits_at_twenty_degrees() {
        let monitor = monitor();
        let epsilon = 1e-6;

        let outside = State::new(UPRIGHT_TOLERANCE + epsilon, 0.0, 0.0, 0.0);
        let inside = State::new(UPRIGHT_TOLERANCE - epsilon, 0.0, 0.0, 0.0);
        let mirrored = State::new(-(UPRIGHT_TOLERANCE - epsilon), 0.0, 0.0, 0.0);

        assert!(monitor.energy(&inside).abs() < ENERGY_THRESHOLD);
        assert!(!monitor.is_swing_up_complete(&outside));
        assert!(monitor.is_swing_up_complete(&inside));
        assert!(monitor.is_swing_up_complete(&mirrored));
    }

    #[test]
    fn fast_pendulum_near_upright_is_not_complete() {
        // Upright, but spinning: ½ · 0.0085 · 12² = 0.612 > 0.5
        let state = State::new(0.0, 12.0, 0.0, 0.0);

        assert!(!monitor().is_swing_up_complete(&state));
    }

    #[test]
    fn full_turns_do_not_count_as_upright() {
        let monitor = monitor();

        // Pointing up, with zero energy, but a full turn away from θ = 0.
        for theta in [2.0 * PI + 0.05, -2.0 * PI - 0.05, -4.0 * PI + 0.01] {
            let state = State::new(theta, 0.0, 0.0, 0.0);

            assert!(monitor.energy(&state).abs() < ENERGY_THRESHOLD);
            assert!(!monitor.is_swing_up_complete(&state));
        }
    }
}
