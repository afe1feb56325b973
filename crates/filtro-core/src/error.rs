//! Error types for transfer-function and filter operations.

use thiserror::Error;

/// Errors raised while constructing, converting or realizing LTI systems.
///
/// Every error is returned at the offending call and leaves the receiver
/// unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum FilterError {
    /// The leading denominator coefficient is (numerically) zero.
    #[error("leading denominator coefficient cannot be zero")]
    InvalidCoefficients,

    /// A coefficient vector or section list was empty.
    #[error("coefficient list cannot be empty")]
    EmptyCoefficients,

    /// A coefficient is NaN or infinite.
    #[error("coefficient at index {index} is not finite")]
    NonFiniteCoefficient {
        /// Position of the offending coefficient.
        index: usize,
    },

    /// Runtime coefficients were replaced with a vector of a different length.
    #[error("expected {expected} coefficients, got {actual}")]
    LengthMismatch {
        /// Current coefficient count.
        expected: usize,
        /// Length of the rejected replacement.
        actual: usize,
    },

    /// The numerator degree exceeds the denominator degree.
    #[error(
        "improper system: numerator has {numerator} coefficients, denominator has {denominator}"
    )]
    UnsupportedDegree {
        /// Numerator coefficient count.
        numerator: usize,
        /// Denominator coefficient count.
        denominator: usize,
    },

    /// A non-recursive filter was requested for a system with feedback.
    #[error("denominator has {len} coefficients, a non-recursive filter needs exactly 1")]
    RecursiveDenominator {
        /// Denominator coefficient count.
        len: usize,
    },

    /// State-space matrices have inconsistent shapes.
    #[error("state-space dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A complex root has no conjugate partner, so no real-coefficient section exists.
    #[error("complex root {re}{im:+}i has no conjugate pair")]
    UnpairedRoot {
        /// Real part of the root.
        re: f64,
        /// Imaginary part of the root.
        im: f64,
    },
}

/// A specialized `Result` type for filter operations.
pub type Result<T> = core::result::Result<T, FilterError>;

impl FilterError {
    /// Returns `true` for errors caused by the coefficient values themselves.
    pub fn is_coefficient_error(&self) -> bool {
        matches!(
            self,
            FilterError::InvalidCoefficients
                | FilterError::EmptyCoefficients
                | FilterError::NonFiniteCoefficient { .. }
        )
    }
}

/// Checks a coefficient vector for emptiness and non-finite values.
pub(crate) fn check_coefficients(coeffs: &[f64]) -> Result<()> {
    check_finite(coeffs, f64::is_finite)
}

/// [`check_coefficients`] for runtime (f32) coefficients.
pub(crate) fn check_runtime_coefficients(coeffs: &[f32]) -> Result<()> {
    check_finite(coeffs, f32::is_finite)
}

fn check_finite<T: Copy>(coeffs: &[T], is_finite: impl Fn(T) -> bool) -> Result<()> {
    if coeffs.is_empty() {
        return Err(FilterError::EmptyCoefficients);
    }
    match coeffs.iter().position(|&c| !is_finite(c)) {
        Some(index) => Err(FilterError::NonFiniteCoefficient { index }),
        None => Ok(()),
    }
}
