//! Non-recursive (FIR) realization.

use crate::delay::DelayLine;
use crate::error::{FilterError, Result, check_runtime_coefficients};
use crate::filter::LengthPolicy;
use crate::processor::Processor;
use crate::signal::DiscreteSignal;
use crate::transfer_function::TransferFunction;

/// Finite impulse response filter.
///
/// ```text
/// y[n] = b[0]·x[n] + b[1]·x[n-1] + ... + b[M]·x[n-M]
/// ```
///
/// # Example
///
/// ```rust
/// use filtro_core::{FirFilter, Processor};
///
/// let mut avg = FirFilter::new(vec![0.5, 0.5]).unwrap();
/// assert_eq!(avg.process(1.0), 0.5);
/// assert_eq!(avg.process(1.0), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FirFilter {
    b: Vec<f32>,
    delay_line: DelayLine,
    tf: Option<TransferFunction>,
    policy: LengthPolicy,
}

impl FirFilter {
    /// Creates a filter from runtime kernel coefficients.
    ///
    /// # Errors
    ///
    /// Fails on an empty kernel or non-finite coefficients.
    pub fn new(b: Vec<f32>) -> Result<Self> {
        check_runtime_coefficients(&b)?;
        Ok(Self::with_parts(b, None))
    }

    /// Realizes a non-recursive transfer function.
    ///
    /// A denominator `[c]` is folded into the kernel as `1/c`.
    ///
    /// # Errors
    ///
    /// [`FilterError::RecursiveDenominator`] if the denominator has more
    /// than one coefficient.
    pub fn from_transfer_function(tf: TransferFunction) -> Result<Self> {
        match tf.denominator().len() {
            1 => Ok(Self::realize(tf)),
            len => Err(FilterError::RecursiveDenominator { len }),
        }
    }

    /// Realization of a transfer function already known to be non-recursive.
    pub(crate) fn realize(tf: TransferFunction) -> Self {
        let a0 = tf.denominator()[0];
        let b = tf.numerator().iter().map(|&c| (c / a0) as f32).collect();
        Self::with_parts(b, Some(tf))
    }

    fn with_parts(b: Vec<f32>, tf: Option<TransferFunction>) -> Self {
        let delay_line = DelayLine::new(b.len());
        Self {
            b,
            delay_line,
            tf,
            policy: LengthPolicy::default(),
        }
    }

    /// Kernel coefficients.
    pub fn numerator(&self) -> &[f32] {
        &self.b
    }

    /// Kernel length.
    pub fn kernel_len(&self) -> usize {
        self.b.len()
    }

    /// Attached transfer function, or `b / [1]` widened to f64.
    pub fn transfer_function(&self) -> TransferFunction {
        match &self.tf {
            Some(tf) => tf.clone(),
            None => TransferFunction::from_runtime(&self.b, &[1.0]),
        }
    }

    /// Transfer function attached at realization, if any.
    pub fn attached_transfer_function(&self) -> Option<&TransferFunction> {
        self.tf.as_ref()
    }

    /// Convolves `input` with the kernel from rest.
    pub fn apply_block(&self, input: &[f32]) -> Vec<f32> {
        (0..input.len())
            .map(|n| {
                self.b
                    .iter()
                    .zip(input[..=n].iter().rev())
                    .map(|(&c, &x)| c * x)
                    .sum::<f32>()
            })
            .collect()
    }

    /// Filters a signal from rest, keeping its sample rate.
    pub fn apply_to(&self, signal: &DiscreteSignal) -> DiscreteSignal {
        DiscreteSignal::new(signal.sample_rate, self.apply_block(&signal.samples))
    }

    /// Replaces the kernel in place.
    ///
    /// The attached transfer function is left as it was.
    pub fn change_numerator_coefficients(&mut self, b: &[f32]) -> Result<()> {
        check_runtime_coefficients(b)?;
        if self.policy.admit(self.b.len(), b.len())? {
            self.b.copy_from_slice(b);
        }
        Ok(())
    }

    /// Accepts only `[1.0]`; there is no feedback path to change.
    pub fn change_denominator_coefficients(&mut self, a: &[f32]) -> Result<()> {
        check_runtime_coefficients(a)?;
        if !self.policy.admit(1, a.len())? {
            return Ok(());
        }
        if a[0] == 1.0 {
            Ok(())
        } else {
            Err(FilterError::InvalidCoefficients)
        }
    }

    /// Normalizes the attached transfer function.
    ///
    /// The kernel already has `1/a[0]` folded in, so only the design
    /// function changes.
    pub fn normalize(&mut self) -> Result<()> {
        match &mut self.tf {
            Some(tf) => tf.normalize(),
            None => Ok(()),
        }
    }

    /// Current length policy.
    pub fn length_policy(&self) -> LengthPolicy {
        self.policy
    }

    /// Sets the length policy for later coefficient replacements.
    pub fn set_length_policy(&mut self, policy: LengthPolicy) {
        self.policy = policy;
    }
}

impl Processor for FirFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.delay_line.write(input);
        let output = self.delay_line.dot_newest_first(&self.b);
        self.delay_line.advance();
        output
    }

    fn reset(&mut self) {
        self.delay_line.clear();
    }
}
