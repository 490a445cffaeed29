use std::cell::RefCell;

use ode_solvers::{SVector, System, dop_shared};
use tracing::debug;

use crate::{Error, Method, OdeSystem, Sample, TimeGrid};

/// Fraction of the grid step within which a solver output counts as a sample.
const ALIGN_TOLERANCE: f64 = 1.0e-6;

/// Result of [`integrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<const N: usize> {
    /// One sample per grid point, in grid order.
    pub samples: Vec<Sample<N>>,

    /// Solver work counters.
    pub stats: Stats,
}

/// Solver work counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Number of system evaluations.
    pub evaluations: u32,

    /// Number of accepted steps.
    pub accepted_steps: u32,

    /// Number of rejected steps.
    pub rejected_steps: u32,
}

impl From<dop_shared::Stats> for Stats {
    fn from(stats: dop_shared::Stats) -> Self {
        Self {
            evaluations: stats.num_eval,
            accepted_steps: stats.accepted_steps,
            rejected_steps: stats.rejected_steps,
        }
    }
}

/// Integrates `system` from `initial` at `t = 0` across `grid`.
///
/// The solver chooses its own evaluation points between samples; the
/// adaptive methods may evaluate well beyond or short of a sample, reject
/// steps and re-evaluate near the same time. Sample `0` is `initial` itself.
/// A single-sample grid does not evaluate the system at all.
///
/// # Errors
///
/// Returns an error if the initial state is not finite, if the system fails
/// or yields a non-finite derivative, if the solver gives up, or if any grid
/// sample is missing from or non-finite in the solver output. No partial
/// solution is returned.
pub fn integrate<S, const N: usize>(
    system: &S,
    initial: [f64; N],
    grid: &TimeGrid,
    method: Method,
) -> Result<Solution<N>, Error>
where
    S: OdeSystem<N>,
{
    if !is_finite(&initial) {
        return Err(Error::NonFiniteState { index: 0, t: 0.0 });
    }

    if grid.len() <= 1 {
        return Ok(Solution {
            samples: vec![Sample { t: 0.0, y: initial }],
            stats: Stats::default(),
        });
    }

    let failure = RefCell::new(None);
    let stepper = Stepper {
        system,
        failure: &failure,
    };

    // Half a step past the last sample, so that float drift in the solver's
    // output times can never drop the final sample.
    let x_end = grid.last_time() + 0.5 * grid.dt();
    let y_start: SVector<f64, N> = initial.into();

    let outcome = match method {
        Method::Rk4 => {
            let mut solver = ode_solvers::Rk4::new(stepper, 0.0, y_start, x_end, grid.dt());
            solver
                .integrate()
                .map(|stats| (stats, solver.x_out().clone(), solver.y_out().clone()))
        }
        Method::Dopri5 { abs_tol, rel_tol } => {
            let mut solver = ode_solvers::Dopri5::new(
                stepper,
                0.0,
                x_end,
                grid.dt(),
                y_start,
                rel_tol,
                abs_tol,
            );
            solver
                .integrate()
                .map(|stats| (stats, solver.x_out().clone(), solver.y_out().clone()))
        }
        Method::Dop853 { abs_tol, rel_tol } => {
            let mut solver = ode_solvers::Dop853::new(
                stepper,
                0.0,
                x_end,
                grid.dt(),
                y_start,
                rel_tol,
                abs_tol,
            );
            solver
                .integrate()
                .map(|stats| (stats, solver.x_out().clone(), solver.y_out().clone()))
        }
    };

    // A failed evaluation usually also derails the solver; report the cause.
    if let Some(failure) = failure.into_inner() {
        return Err(failure.into_error());
    }

    let (stats, x_out, y_out) = outcome?;
    let stats = Stats::from(stats);

    debug!(
        method = method.name(),
        samples = grid.len(),
        evaluations = stats.evaluations,
        accepted = stats.accepted_steps,
        rejected = stats.rejected_steps,
        "integration finished"
    );

    let samples = align(grid, initial, &x_out, &y_out)?;

    Ok(Solution { samples, stats })
}

/// Picks the solver output matching each grid time.
fn align<const N: usize>(
    grid: &TimeGrid,
    initial: [f64; N],
    x_out: &[f64],
    y_out: &[SVector<f64, N>],
) -> Result<Vec<Sample<N>>, Error> {
    let tolerance = ALIGN_TOLERANCE * grid.dt();

    let mut samples = Vec::with_capacity(grid.len());
    samples.push(Sample { t: 0.0, y: initial });

    let mut outputs = x_out.iter().zip(y_out).peekable();

    for index in 1..grid.len() {
        let t = grid.time(index);

        while outputs.next_if(|(x, _)| **x < t - tolerance).is_some() {}

        let Some((x, y)) = outputs.next_if(|(x, _)| (**x - t).abs() <= tolerance) else {
            return Err(Error::MissingSample { index, t });
        };

        let y: [f64; N] = (*y).into();
        if !is_finite(&y) {
            return Err(Error::NonFiniteState { index, t: *x });
        }

        samples.push(Sample { t, y });
    }

    Ok(samples)
}

fn is_finite(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
}

/// Why the first failing evaluation failed.
enum Failure<E> {
    System { t: f64, error: E },
    NonFinite { t: f64 },
}

impl<E: std::error::Error + Send + Sync + 'static> Failure<E> {
    fn into_error(self) -> Error {
        match self {
            Failure::System { t, error } => Error::System {
                t,
                source: Box::new(error),
            },
            Failure::NonFinite { t } => Error::NonFiniteDerivative { t },
        }
    }
}

/// Adapts an [`OdeSystem`] to the `ode_solvers` interface.
///
/// After the first failure the stepper returns zero derivatives, which lets
/// the solver accept a step so that `solout` can stop it.
struct Stepper<'a, S: OdeSystem<N>, const N: usize> {
    system: &'a S,
    failure: &'a RefCell<Option<Failure<S::Error>>>,
}

impl<S: OdeSystem<N>, const N: usize> System<f64, SVector<f64, N>> for Stepper<'_, S, N> {
    fn system(&self, x: f64, y: &SVector<f64, N>, dy: &mut SVector<f64, N>) {
        if self.failure.borrow().is_some() {
            *dy = SVector::from_element(0.0);
            return;
        }

        let state: [f64; N] = (*y).into();

        match self.system.derivative(x, &state) {
            Ok(derivative) if is_finite(&derivative) => {
                *dy = derivative.into();
            }
            Ok(_) => {
                *self.failure.borrow_mut() = Some(Failure::NonFinite { t: x });
                *dy = SVector::from_element(0.0);
            }
            Err(error) => {
                *self.failure.borrow_mut() = Some(Failure::System { t: x, error });
                *dy = SVector::from_element(0.0);
            }
        }
    }

    fn solout(&mut self, _x: f64, _y: &SVector<f64, N>, _dy: &SVector<f64, N>) -> bool {
        // Stop integration early if an evaluation failed.
        self.failure.borrow().is_some()
    }
}
