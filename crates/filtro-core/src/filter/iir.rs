//! Recursive (IIR) realization.

use crate::delay::DelayLine;
use crate::error::{FilterError, Result, check_runtime_coefficients};
use crate::filter::LengthPolicy;
use crate::processor::Processor;
use crate::signal::DiscreteSignal;
use crate::transfer_function::{NORMALIZE_TOLERANCE, TransferFunction};

/// Infinite impulse response filter in direct form I.
///
/// ```text
/// y[n] = b[0]·x[n] + ... + b[M]·x[n-M] - a[1]·y[n-1] - ... - a[N]·y[n-N]
/// ```
///
/// Processing assumes `a[0] = 1`; call [`IirFilter::normalize`] first for
/// any other leading coefficient.
///
/// # Example
///
/// ```rust
/// use filtro_core::{IirFilter, Processor};
///
/// let mut f = IirFilter::new(vec![1.0], vec![1.0, -0.5]).unwrap();
/// let out: Vec<f32> = [1.0, 0.0, 0.0].iter().map(|&x| f.process(x)).collect();
/// assert_eq!(out, [1.0, 0.5, 0.25]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IirFilter {
    b: Vec<f32>,
    a: Vec<f32>,
    delay_line_b: DelayLine,
    delay_line_a: DelayLine,
    tf: Option<TransferFunction>,
    policy: LengthPolicy,
}

impl IirFilter {
    /// Creates a filter from runtime coefficients.
    ///
    /// # Errors
    ///
    /// Fails on empty or non-finite coefficient vectors and on a leading
    /// denominator coefficient that is numerically zero.
    pub fn new(b: Vec<f32>, a: Vec<f32>) -> Result<Self> {
        check_runtime_coefficients(&b)?;
        check_runtime_coefficients(&a)?;
        if f64::from(a[0]).abs() < NORMALIZE_TOLERANCE {
            return Err(FilterError::InvalidCoefficients);
        }
        Ok(Self::with_parts(b, a, None))
    }

    /// Realizes `tf`, keeping it attached at design precision.
    ///
    /// The runtime coefficients are divided by `a[0]` before the cast, so
    /// the realized filter always runs with `a[0] = 1`.
    pub fn from_transfer_function(tf: TransferFunction) -> Self {
        let a0 = tf.denominator()[0];
        let b = tf.numerator().iter().map(|&c| (c / a0) as f32).collect();
        let a = tf.denominator().iter().map(|&c| (c / a0) as f32).collect();
        Self::with_parts(b, a, Some(tf))
    }

    fn with_parts(b: Vec<f32>, a: Vec<f32>, tf: Option<TransferFunction>) -> Self {
        let delay_line_b = DelayLine::new(b.len());
        let delay_line_a = DelayLine::new(a.len());
        Self {
            b,
            a,
            delay_line_b,
            delay_line_a,
            tf,
            policy: LengthPolicy::default(),
        }
    }

    /// Feed-forward coefficients.
    pub fn numerator(&self) -> &[f32] {
        &self.b
    }

    /// Feedback coefficients, `a[0]` first.
    pub fn denominator(&self) -> &[f32] {
        &self.a
    }

    /// Attached transfer function, or one widened from the runtime
    /// coefficients.
    pub fn transfer_function(&self) -> TransferFunction {
        match &self.tf {
            Some(tf) => tf.clone(),
            None => TransferFunction::from_runtime(&self.b, &self.a),
        }
    }

    /// Transfer function attached at realization, if any.
    pub fn attached_transfer_function(&self) -> Option<&TransferFunction> {
        self.tf.as_ref()
    }

    /// Runs the difference equation over `input` from rest.
    pub fn apply_block(&self, input: &[f32]) -> Vec<f32> {
        let mut output = vec![0.0f32; input.len()];
        for n in 0..input.len() {
            let mut acc: f32 = self
                .b
                .iter()
                .zip(input[..=n].iter().rev())
                .map(|(&c, &x)| c * x)
                .sum();
            for (m, &c) in self.a.iter().enumerate().skip(1).take(n) {
                acc -= c * output[n - m];
            }
            output[n] = acc;
        }
        output
    }

    /// Filters a signal from rest, keeping its sample rate.
    pub fn apply_to(&self, signal: &DiscreteSignal) -> DiscreteSignal {
        DiscreteSignal::new(signal.sample_rate, self.apply_block(&signal.samples))
    }

    /// Replaces the feed-forward coefficients in place.
    ///
    /// The attached transfer function is left as it was.
    pub fn change_numerator_coefficients(&mut self, b: &[f32]) -> Result<()> {
        check_runtime_coefficients(b)?;
        if self.policy.admit(self.b.len(), b.len())? {
            self.b.copy_from_slice(b);
        }
        Ok(())
    }

    /// Replaces the feedback coefficients in place.
    ///
    /// The attached transfer function is left as it was.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidCoefficients`] if `a[0]` is numerically zero,
    /// under any length policy.
    pub fn change_denominator_coefficients(&mut self, a: &[f32]) -> Result<()> {
        check_runtime_coefficients(a)?;
        if f64::from(a[0]).abs() < NORMALIZE_TOLERANCE {
            return Err(FilterError::InvalidCoefficients);
        }
        if self.policy.admit(self.a.len(), a.len())? {
            self.a.copy_from_slice(a);
        }
        Ok(())
    }

    /// Divides all runtime coefficients by `a[0]`, then normalizes the
    /// attached transfer function.
    ///
    /// `a[0]` is never numerically zero here: construction and
    /// [`change_denominator_coefficients`](Self::change_denominator_coefficients)
    /// both reject it.
    ///
    /// # Errors
    ///
    /// Propagates a failure to normalize the attached transfer function.
    /// Nothing is modified in that case.
    pub fn normalize(&mut self) -> Result<()> {
        let a0 = self.a[0];
        if let Some(tf) = &mut self.tf {
            tf.normalize()?;
        }
        if (f64::from(a0) - 1.0).abs() >= NORMALIZE_TOLERANCE {
            for c in self.b.iter_mut().chain(self.a.iter_mut()) {
                *c /= a0;
            }
        }
        Ok(())
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

impl Processor for IirFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.delay_line_b.write(input);
        let output = self.delay_line_b.dot_newest_first(&self.b)
            - self.delay_line_a.dot_history(&self.a);
        self.delay_line_a.write(output);
        self.delay_line_b.advance();
        self.delay_line_a.advance();
        output
    }

    fn reset(&mut self) {
        self.delay_line_b.clear();
        self.delay_line_a.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_pole() -> IirFilter {
        IirFilter::new(vec![1.0], vec![1.0, -0.5]).unwrap()
    }

    #[test]
    fn impulse_response_of_one_pole() {
        let mut f = one_pole();
        let out: Vec<f32> = [1.0, 0.0, 0.0, 0.0].iter().map(|&x| f.process(x)).collect();
        assert_eq!(out, vec![1.0, 0.5, 0.25, 0.125]);
        assert_eq!(one_pole().apply_block(&[1.0, 0.0, 0.0, 0.0]), out);
    }

    #[test]
    fn block_matches_streaming_second_order() {
        let input = [1.0, -0.5, 0.25, 0.0, 0.75, -1.0, 0.3, 0.0, 0.1, 0.9];
        let mut f = IirFilter::new(vec![0.2, 0.4, 0.2], vec![1.0, -0.6, 0.25]).unwrap();
        let block = f.apply_block(&input);
        for (x, y) in input.iter().zip(&block) {
            assert!((f.process(*x) - y).abs() < 1e-6, "{block:?}");
        }
    }

    #[test]
    fn numerator_longer_than_denominator() {
        let input = [1.0, 2.0, -1.0, 0.5, 0.0, 0.0];
        let mut f = IirFilter::new(vec![1.0, 0.5, -0.3, 0.2], vec![1.0, 0.4]).unwrap();
        let block = f.apply_block(&input);
        for (x, y) in input.iter().zip(&block) {
            assert!((f.process(*x) - y).abs() < 1e-6);
        }
    }

    #[test]
    fn reset_returns_to_rest() {
        let mut f = one_pole();
        f.process(1.0);
        f.process(1.0);
        f.reset();
        assert_eq!(f.process(1.0), 1.0);
        assert_eq!(f.process(0.0), 0.5);
    }

    #[test]
    fn zero_leading_denominator_is_rejected() {
        assert_eq!(
            IirFilter::new(vec![1.0], vec![0.0, 1.0]),
            Err(FilterError::InvalidCoefficients)
        );
    }

    #[test]
    fn normalize_scales_runtime_and_attached() {
        let tf = TransferFunction::new(vec![4.0, 2.0], vec![2.0, 1.0]).unwrap();
        let mut f = IirFilter::from_transfer_function(tf);
        f.normalize().unwrap();
        assert_eq!(f.numerator(), &[2.0, 1.0]);
        assert_eq!(f.denominator(), &[1.0, 0.5]);
        let attached = f.attached_transfer_function().unwrap();
        assert_eq!(attached.numerator(), &[2.0, 1.0]);
        assert_eq!(attached.denominator(), &[1.0, 0.5]);

        let before = f.clone();
        f.normalize().unwrap();
        assert_eq!(f, before);
    }

    #[test]
    fn zero_leading_denominator_replacement_is_rejected() {
        let mut f = IirFilter::new(vec![1.0, 0.5], vec![1.0, -0.5]).unwrap();
        let before = f.clone();
        assert_eq!(
            f.change_denominator_coefficients(&[0.0, -0.5]),
            Err(FilterError::InvalidCoefficients)
        );
        assert_eq!(f, before);

        f.set_length_policy(LengthPolicy::Ignore);
        assert_eq!(
            f.change_denominator_coefficients(&[0.0, -0.5]),
            Err(FilterError::InvalidCoefficients)
        );

        let tf = f.transfer_function();
        assert_eq!(tf.denominator(), &[1.0, -0.5]);
        assert!(tf.state_space().is_ok());
    }

    #[test]
    fn runtime_normalize_after_denominator_change() {
        let mut f = one_pole();
        f.change_denominator_coefficients(&[2.0, -1.0]).unwrap();
        f.normalize().unwrap();
        assert_eq!(f.numerator(), &[0.5]);
        assert_eq!(f.denominator(), &[1.0, -0.5]);
    }

    #[test]
    fn realization_folds_leading_denominator() {
        let tf = TransferFunction::new(vec![2.0], vec![2.0, -1.0]).unwrap();
        let f = IirFilter::from_transfer_function(tf.clone());
        assert_eq!(f.numerator(), &[1.0]);
        assert_eq!(f.denominator(), &[1.0, -0.5]);
        assert_eq!(f.attached_transfer_function(), Some(&tf));

        let realized = f.apply_block(&[1.0, 0.0, 0.0]);
        let design = tf.impulse_response(3);
        for (r, d) in realized.iter().zip(&design) {
            assert!((f64::from(*r) - d).abs() < 1e-7, "{realized:?} vs {design:?}");
        }
    }

    #[test]
    fn denominator_change_respects_policy() {
        let mut f = one_pole();
        assert_eq!(
            f.change_denominator_coefficients(&[1.0, 0.2, 0.1]),
            Err(FilterError::LengthMismatch {
                expected: 2,
                actual: 3
            })
        );
        f.set_length_policy(LengthPolicy::Ignore);
        f.change_denominator_coefficients(&[1.0, 0.2, 0.1]).unwrap();
        assert_eq!(f.denominator(), &[1.0, -0.5]);

        f.change_denominator_coefficients(&[1.0, 0.25]).unwrap();
        assert_eq!(f.denominator(), &[1.0, 0.25]);
        assert_eq!(f.process(1.0), 1.0);
        assert_eq!(f.process(0.0), -0.25);
    }

    #[test]
    fn attached_transfer_function_is_not_resynchronized() {
        let tf = TransferFunction::new(vec![1.0], vec![1.0, -0.5]).unwrap();
        let mut f = IirFilter::from_transfer_function(tf.clone());
        f.change_numerator_coefficients(&[2.0]).unwrap();
        assert_eq!(f.transfer_function(), tf);
    }
}
