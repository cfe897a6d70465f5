//! Error type shared by the thin-lens transform, the propagator and the sweep.

use thiserror::Error;

/// Errors raised by the beam computations.
///
/// Every failure is a domain-constraint violation on the inputs: there is no
/// transient condition to retry, and no partial result is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BeamError {
    #[error("Invalid parameter `{name}` = {value:e}{}: {reason}", lens_suffix(.lens))]
    InvalidParameter {
        /// Name of the offending argument or field.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Which constraint was violated.
        reason: &'static str,
        /// Index of the lens being processed, when raised during propagation.
        lens: Option<usize>,
    },
}

impl BeamError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        BeamError::InvalidParameter {
            name,
            value,
            reason,
            lens: None,
        }
    }

    /// Tag the error with the index of the lens it was raised for.
    pub fn at_lens(self, index: usize) -> Self {
        match self {
            BeamError::InvalidParameter {
                name, value, reason, ..
            } => BeamError::InvalidParameter {
                name,
                value,
                reason,
                lens: Some(index),
            },
        }
    }

    /// Name of the offending parameter.
    pub fn parameter(&self) -> &'static str {
        match self {
            BeamError::InvalidParameter { name, .. } => *name,
        }
    }

    /// Lens index the error is attributed to, if any.
    pub fn lens_index(&self) -> Option<usize> {
        match self {
            BeamError::InvalidParameter { lens, .. } => *lens,
        }
    }
}

fn lens_suffix(lens: &Option<usize>) -> String {
    match lens {
        Some(i) => format!(" (lens #{i})"),
        None => String::new(),
    }
}

/// Reject non-finite values before they can leak into the results as NaN/Inf.
pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64, BeamError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BeamError::invalid(name, value, "must be finite"))
    }
}

/// Require a finite, strictly positive value.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, BeamError> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(BeamError::invalid(name, value, "must be strictly positive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_name_value_and_lens() {
        let err = BeamError::invalid("focal_length", 0.0, "must be nonzero").at_lens(2);
        let msg = err.to_string();
        assert!(msg.contains("`focal_length`"), "{msg}");
        assert!(msg.contains("(lens #2)"), "{msg}");
        assert!(msg.contains("must be nonzero"), "{msg}");
        assert_eq!(err.lens_index(), Some(2));
        assert_eq!(err.parameter(), "focal_length");
    }

    #[test]
    fn test_display_without_lens() {
        let msg = BeamError::invalid("frequency", -1.0, "must be strictly positive").to_string();
        assert!(!msg.contains("lens #"), "{msg}");
    }

    #[test]
    fn test_require_positive_rejects_nan_and_zero() {
        assert!(require_positive("waist", f64::NAN).is_err());
        assert!(require_positive("waist", 0.0).is_err());
        assert!(require_positive("waist", f64::INFINITY).is_err());
        assert_eq!(require_positive("waist", 3e-3), Ok(3e-3));
    }
}
