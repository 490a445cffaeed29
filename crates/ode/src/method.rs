use serde::{Deserialize, Serialize};

/// Default tolerance of the adaptive methods, `sqrt(f64::EPSILON)` rounded.
pub const DEFAULT_TOLERANCE: f64 = 1.49012e-8;

/// Supported numerical integration methods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum Method {
    /// Classic fixed-step 4th-order Runge–Kutta method.
    ///
    /// Steps exactly once per grid interval and evaluates the system four
    /// times per step. Does not adapt step size based on local error.
    Rk4,

    /// Adaptive Dormand–Prince 5(4) Runge–Kutta method.
    ///
    /// An explicit embedded method that estimates the local error from its
    /// 5th and 4th order solutions and adjusts the internal step to keep it
    /// within `abs_tol` and `rel_tol`. Grid samples come from its dense
    /// output. Stops with an error when it detects stiffness.
    Dopri5 { abs_tol: f64, rel_tol: f64 },

    /// Adaptive Dormand–Prince 8(5,3) Runge–Kutta method.
    ///
    /// A higher-order embedded method, more expensive per step than
    /// [`Method::Dopri5`] but often cheaper overall at tight tolerances.
    Dop853 { abs_tol: f64, rel_tol: f64 },
}

impl Method {
    /// Returns a short lowercase name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Method::Rk4 => "rk4",
            Method::Dopri5 { .. } => "dopri5",
            Method::Dop853 { .. } => "dop853",
        }
    }

    /// Returns the `(abs_tol, rel_tol)` pair of an adaptive method.
    #[must_use]
    pub fn tolerances(&self) -> Option<(f64, f64)> {
        match *self {
            Method::Rk4 => None,
            Method::Dopri5 { abs_tol, rel_tol } | Method::Dop853 { abs_tol, rel_tol } => {
                Some((abs_tol, rel_tol))
            }
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::Dopri5 {
            abs_tol: DEFAULT_TOLERANCE,
            rel_tol: DEFAULT_TOLERANCE,
        }
    }
}
