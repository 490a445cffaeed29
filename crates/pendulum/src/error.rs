use thiserror::Error;

/// Errors raised while validating plant, gain or run values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} is out of range, got {value}")]
    OutOfRange { name: &'static str, value: f64 },
}

impl ConfigError {
    /// Checks that `value` is finite.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] for NaN or infinite values.
    pub fn require_finite(name: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self::NonFinite { name, value })
        }
    }

    /// Checks that `value` is finite and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] or [`ConfigError::NonPositive`].
    pub fn require_positive(name: &'static str, value: f64) -> Result<(), Self> {
        Self::require_finite(name, value)?;
        if value > 0.0 {
            Ok(())
        } else {
            Err(Self::NonPositive { name, value })
        }
    }

    /// Checks that `value` is finite and not negative.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFinite`] or [`ConfigError::Negative`].
    pub fn require_non_negative(name: &'static str, value: f64) -> Result<(), Self> {
        Self::require_finite(name, value)?;
        if value >= 0.0 {
            Ok(())
        } else {
            Err(Self::Negative { name, value })
        }
    }
}
