use crate::GridError;

/// Upper bound on the number of samples in a grid.
const MAX_SAMPLES: f64 = 1.0e8;

/// A fixed-step grid of output times `t[i] = i * dt` spanning `[0, horizon)`.
///
/// The number of samples is `ceil(horizon / dt)`, so the horizon itself is
/// never a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    dt: f64,
    len: usize,
}

impl TimeGrid {
    /// Creates a grid with step `dt` covering `[0, horizon)`.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] if either value is non-finite or non-positive,
    /// or if the grid would be unreasonably large.
    pub fn new(dt: f64, horizon: f64) -> Result<Self, GridError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(GridError::Step(dt));
        }
        if !horizon.is_finite() || horizon <= 0.0 {
            return Err(GridError::Horizon(horizon));
        }

        let count = (horizon / dt).ceil();
        if count > MAX_SAMPLES {
            return Err(GridError::TooManySamples(count));
        }

        // `count` is a positive whole number below `MAX_SAMPLES`.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let len = count as usize;

        Ok(Self { dt, len })
    }

    /// Returns the spacing between samples.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the grid has no samples.
    ///
    /// Grids built with [`TimeGrid::new`] always hold at least one sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the time of sample `index`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn time(&self, index: usize) -> f64 {
        index as f64 * self.dt
    }

    /// Returns the time of the final sample.
    #[must_use]
    pub fn last_time(&self) -> f64 {
        self.time(self.len.saturating_sub(1))
    }

    /// Returns an iterator over the sample times.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(|index| self.time(index))
    }
}
