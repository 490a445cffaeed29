/// A system of ordinary differential equations with `N` state variables.
///
/// Solvers evaluate the system through a shared reference, at times and
/// states of their own choosing, possibly more than once near the same time.
/// Systems that must remember something between evaluations (a controller
/// regime, a call log) keep it behind interior mutability.
pub trait OdeSystem<const N: usize> {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns `dy/dt` at time `t` and state `y`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be evaluated. The
    /// integration stops at the first failure.
    fn derivative(&self, t: f64, y: &[f64; N]) -> Result<[f64; N], Self::Error>;
}

/// The state of an ODE system at a grid time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<const N: usize> {
    /// The grid time.
    pub t: f64,

    /// The dependent variables at `t`, in the order used by [`OdeSystem`].
    pub y: [f64; N],
}
