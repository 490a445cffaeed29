use crate::{Controller, PhysicalParameters, State};

/// Right-hand side of the closed-loop pendulum ODE.
///
/// This is the reduced planar model
///
/// ```text
/// θ̇  = θ̇
/// θ̈  = (g sin θ − u cos θ) / L_p
/// α̇  = α̇
/// α̈  = u
/// ```
///
/// in which the arm is commanded in acceleration and only the pendulum length
/// enters the pendulum equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsModel {
    plant: PhysicalParameters,
}

impl DynamicsModel {
    #[must_use]
    pub fn new(plant: PhysicalParameters) -> Self {
        Self { plant }
    }

    #[must_use]
    pub fn plant(&self) -> &PhysicalParameters {
        &self.plant
    }

    /// Asks `controller` for `u` at `state` and returns the state derivative.
    ///
    /// `t` is accepted for solver compatibility; the dynamics are autonomous.
    pub fn derivative<C>(&self, state: &State, _t: f64, controller: &mut C) -> State
    where
        C: Controller + ?Sized,
    {
        let u = controller.compute_control(state);
        self.derivative_with_control(state, u)
    }

    /// Returns the state derivative under a given control output `u`.
    #[must_use]
    pub fn derivative_with_control(&self, state: &State, u: f64) -> State {
        let (sin, cos) = state.theta.sin_cos();

        State {
            theta: state.dtheta,
            dtheta: (self.plant.gravity * sin - u * cos) / self.plant.pendulum_length,
            alpha: state.dalpha,
            dalpha: u,
        }
    }
}
