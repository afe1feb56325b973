//! Realized runtime filters.
//!
//! A [`TransferFunction`] is designed and analysed at f64 precision; a
//! realized filter casts its coefficients down to f32 once and runs the
//! difference equation over [`DelayLine`](crate::DelayLine) state.
//!
//! [`LtiFilter`] is the closed set of realizations. Which variant a transfer
//! function gets is decided by [`FilterStructure::classify`].
//!
//! ## Processing paths
//!
//! - **Streaming** ([`Processor::process`]): one sample per call, state kept
//!   in the delay lines between calls.
//! - **Block** (`apply_block`, `apply_to`): runs the difference equation
//!   from rest over a whole buffer. Streaming state is not touched.
//!
//! Both paths agree sample for sample when streaming starts from rest.

mod fir;
mod iir;

pub use fir::FirFilter;
pub use iir::IirFilter;

use crate::error::Result;
use crate::processor::Processor;
use crate::signal::DiscreteSignal;
use crate::transfer_function::TransferFunction;

/// Structural class of a transfer function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterStructure {
    /// Denominator of length 1: output depends on inputs only.
    NonRecursive,
    /// Denominator longer than 1: output feeds back.
    Recursive,
}

impl FilterStructure {
    /// Classifies `tf` by its denominator length.
    pub fn classify(tf: &TransferFunction) -> Self {
        if tf.denominator().len() == 1 {
            Self::NonRecursive
        } else {
            Self::Recursive
        }
    }

    /// Short lowercase name (`"fir"` or `"iir"`).
    pub fn name(self) -> &'static str {
        match self {
            Self::NonRecursive => "fir",
            Self::Recursive => "iir",
        }
    }
}

/// What a coefficient replacement of the wrong length does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LengthPolicy {
    /// Reject with [`FilterError::LengthMismatch`](crate::FilterError::LengthMismatch).
    #[default]
    Strict,
    /// Leave the coefficients alone and report success.
    Ignore,
}

impl LengthPolicy {
    /// `Ok(true)` when the replacement should be applied, `Ok(false)` when
    /// it is silently dropped.
    pub(crate) fn admit(self, expected: usize, actual: usize) -> Result<bool> {
        if expected == actual {
            return Ok(true);
        }
        match self {
            Self::Strict => Err(crate::FilterError::LengthMismatch { expected, actual }),
            Self::Ignore => {
                #[cfg(feature = "tracing")]
                tracing::debug!(expected, actual, "ignoring coefficient replacement");
                Ok(false)
            }
        }
    }
}

/// A realized LTI filter: non-recursive or recursive.
#[derive(Debug, Clone, PartialEq)]
pub enum LtiFilter {
    /// Finite impulse response realization.
    Fir(FirFilter),
    /// Infinite impulse response realization.
    Iir(IirFilter),
}

impl LtiFilter {
    /// Realizes `tf` with the structure [`FilterStructure::classify`] picks.
    ///
    /// The transfer function stays attached at design precision.
    pub fn from_transfer_function(tf: TransferFunction) -> Self {
        match FilterStructure::classify(&tf) {
            FilterStructure::NonRecursive => Self::Fir(FirFilter::realize(tf)),
            FilterStructure::Recursive => Self::Iir(IirFilter::from_transfer_function(tf)),
        }
    }

    /// Structure of this realization.
    pub fn structure(&self) -> FilterStructure {
        match self {
            Self::Fir(_) => FilterStructure::NonRecursive,
            Self::Iir(_) => FilterStructure::Recursive,
        }
    }

    /// Runtime numerator coefficients.
    pub fn numerator(&self) -> &[f32] {
        match self {
            Self::Fir(f) => f.numerator(),
            Self::Iir(f) => f.numerator(),
        }
    }

    /// Runtime denominator coefficients (`[1.0]` for FIR).
    pub fn denominator(&self) -> &[f32] {
        match self {
            Self::Fir(_) => &UNIT_DENOMINATOR,
            Self::Iir(f) => f.denominator(),
        }
    }

    /// Design-precision transfer function.
    ///
    /// The attached one when present, otherwise widened from the runtime
    /// coefficients.
    pub fn transfer_function(&self) -> TransferFunction {
        match self {
            Self::Fir(f) => f.transfer_function(),
            Self::Iir(f) => f.transfer_function(),
        }
    }

    /// Transfer function attached at realization, if any.
    pub fn attached_transfer_function(&self) -> Option<&TransferFunction> {
        match self {
            Self::Fir(f) => f.attached_transfer_function(),
            Self::Iir(f) => f.attached_transfer_function(),
        }
    }

    /// Filters a whole buffer from rest.
    pub fn apply_block(&self, input: &[f32]) -> Vec<f32> {
        match self {
            Self::Fir(f) => f.apply_block(input),
            Self::Iir(f) => f.apply_block(input),
        }
    }

    /// Filters a signal from rest, keeping its sample rate.
    pub fn apply_to(&self, signal: &DiscreteSignal) -> DiscreteSignal {
        DiscreteSignal::new(signal.sample_rate, self.apply_block(&signal.samples))
    }

    /// Replaces the numerator coefficients in place.
    ///
    /// # Errors
    ///
    /// Non-finite values are always rejected; a length change follows the
    /// filter's [`LengthPolicy`].
    pub fn change_numerator_coefficients(&mut self, b: &[f32]) -> Result<()> {
        match self {
            Self::Fir(f) => f.change_numerator_coefficients(b),
            Self::Iir(f) => f.change_numerator_coefficients(b),
        }
    }

    /// Replaces the denominator coefficients in place.
    ///
    /// A non-recursive filter only accepts `[1.0]`.
    pub fn change_denominator_coefficients(&mut self, a: &[f32]) -> Result<()> {
        match self {
            Self::Fir(f) => f.change_denominator_coefficients(a),
            Self::Iir(f) => f.change_denominator_coefficients(a),
        }
    }

    /// Divides the coefficients by the leading denominator coefficient,
    /// including those of the attached transfer function.
    pub fn normalize(&mut self) -> Result<()> {
        match self {
            Self::Fir(f) => f.normalize(),
            Self::Iir(f) => f.normalize(),
        }
    }

    /// Current length policy.
    pub fn length_policy(&self) -> LengthPolicy {
        match self {
            Self::Fir(f) => f.length_policy(),
            Self::Iir(f) => f.length_policy(),
        }
    }

    /// Sets the length policy for later coefficient replacements.
    pub fn set_length_policy(&mut self, policy: LengthPolicy) {
        match self {
            Self::Fir(f) => f.set_length_policy(policy),
            Self::Iir(f) => f.set_length_policy(policy),
        }
    }

    /// Builder form of [`set_length_policy`](Self::set_length_policy).
    pub fn with_length_policy(mut self, policy: LengthPolicy) -> Self {
        self.set_length_policy(policy);
        self
    }
}

const UNIT_DENOMINATOR: [f32; 1] = [1.0];

impl Processor for LtiFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        match self {
            Self::Fir(f) => f.process(input),
            Self::Iir(f) => f.process(input),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Fir(f) => f.reset(),
            Self::Iir(f) => f.reset(),
        }
    }
}

impl From<FirFilter> for LtiFilter {
    fn from(filter: FirFilter) -> Self {
        Self::Fir(filter)
    }
}

impl From<IirFilter> for LtiFilter {
    fn from(filter: IirFilter) -> Self {
        Self::Iir(filter)
    }
}
