use serde::{Deserialize, Serialize};

/// State of the pendulum and arm.
///
/// `theta = 0` is the upright position the stabilizer holds and the reference
/// at which the energy metric vanishes. The same type doubles as the state
/// derivative, where each field holds the rate of change of its counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    /// Pendulum angle (rad).
    pub theta: f64,

    /// Pendulum angular velocity (rad/s).
    pub dtheta: f64,

    /// Arm angle (rad).
    pub alpha: f64,

    /// Arm angular velocity (rad/s).
    pub dalpha: f64,
}

impl State {
    /// Creates a state from its four components.
    #[must_use]
    pub const fn new(theta: f64, dtheta: f64, alpha: f64, dalpha: f64) -> Self {
        Self {
            theta,
            dtheta,
            alpha,
            dalpha,
        }
    }

    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|value| value.is_finite())
    }

    /// Returns the components in `[theta, dtheta, alpha, dalpha]` order.
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.theta, self.dtheta, self.alpha, self.dalpha]
    }
}

impl From<[f64; 4]> for State {
    fn from([theta, dtheta, alpha, dalpha]: [f64; 4]) -> Self {
        Self::new(theta, dtheta, alpha, dalpha)
    }
}

impl From<State> for [f64; 4] {
    fn from(state: State) -> Self {
        state.to_array()
    }
}
