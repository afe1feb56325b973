//! Rational transfer functions at design (f64) precision.
//!
//! A [`TransferFunction`] is the canonical model of an LTI system:
//!
//! ```text
//!          b[0] + b[1]·z^-1 + ... + b[M]·z^-M
//! H(z) = -------------------------------------
//!          a[0] + a[1]·z^-1 + ... + a[N]·z^-N
//! ```
//!
//! Zero/pole/gain and state-space views are computed from the coefficients
//! on every call; nothing derived is cached, so they can never go stale after
//! [`TransferFunction::normalize`].
//!
//! Systems compose with operators: `&f1 * &f2` cascades (series), `&f1 + &f2`
//! sums the outputs of both systems fed the same input (parallel).

use core::ops::{Add, Mul};

use rustfft::FftPlanner;
use rustfft::num_complex::Complex64;

use crate::error::{FilterError, Result, check_coefficients};
use crate::poly;
use crate::response::FrequencyResponse;

/// Tolerance used to decide whether `a[0]` is one or zero.
pub const NORMALIZE_TOLERANCE: f64 = 1e-10;

/// Zero/pole/gain description of a system.
#[derive(Debug, Clone, PartialEq)]
pub struct Zpk {
    /// Roots of the numerator.
    pub zeros: Vec<Complex64>,
    /// Roots of the denominator.
    pub poles: Vec<Complex64>,
    /// Ratio of leading coefficients.
    pub gain: f64,
}

impl Zpk {
    /// Builds the equivalent transfer function.
    pub fn to_transfer_function(&self) -> Result<TransferFunction> {
        TransferFunction::from_zpk(&self.zeros, &self.poles, self.gain)
    }
}

/// Transfer function of a causal discrete-time LTI system.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    numerator: Vec<f64>,
    denominator: Vec<f64>,
}

impl TransferFunction {
    /// Creates a transfer function from numerator and denominator coefficients.
    ///
    /// Both vectors are in delay order (index 0 is the undelayed term).
    ///
    /// # Errors
    ///
    /// Fails if either vector is empty or contains non-finite values, or if
    /// `denominator[0]` is numerically zero.
    pub fn new(numerator: Vec<f64>, denominator: Vec<f64>) -> Result<Self> {
        check_coefficients(&numerator)?;
        check_coefficients(&denominator)?;
        if denominator[0].abs() < NORMALIZE_TOLERANCE {
            return Err(FilterError::InvalidCoefficients);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Creates a non-recursive transfer function (denominator `[1]`).
    pub fn fir(numerator: Vec<f64>) -> Result<Self> {
        Self::new(numerator, vec![1.0])
    }

    /// Widens runtime coefficients that were validated when they were set.
    pub(crate) fn from_runtime(numerator: &[f32], denominator: &[f32]) -> Self {
        Self {
            numerator: numerator.iter().map(|&c| f64::from(c)).collect(),
            denominator: denominator.iter().map(|&c| f64::from(c)).collect(),
        }
    }

    /// Creates a transfer function from zeros, poles and gain.
    ///
    /// Complex roots must come in conjugate pairs for the result to be exact;
    /// only the real parts of the expanded polynomials are kept.
    pub fn from_zpk(zeros: &[Complex64], poles: &[Complex64], gain: f64) -> Result<Self> {
        if !gain.is_finite() {
            return Err(FilterError::NonFiniteCoefficient { index: 0 });
        }
        let numerator = poly::scale(&poly::from_roots(zeros), gain);
        let denominator = poly::from_roots(poles);
        Self::new(numerator, denominator)
    }

    /// Numerator coefficients.
    pub fn numerator(&self) -> &[f64] {
        &self.numerator
    }

    /// Denominator coefficients.
    pub fn denominator(&self) -> &[f64] {
        &self.denominator
    }

    /// Consumes the function and returns `(numerator, denominator)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.numerator, self.denominator)
    }

    /// System order: the larger of the numerator and denominator degrees.
    pub fn order(&self) -> usize {
        self.numerator.len().max(self.denominator.len()) - 1
    }

    /// Roots of the numerator.
    pub fn zeros(&self) -> Vec<Complex64> {
        poly::roots(&self.numerator)
    }

    /// Roots of the denominator.
    pub fn poles(&self) -> Vec<Complex64> {
        poly::roots(&self.denominator)
    }

    /// First non-zero numerator coefficient divided by `denominator[0]`.
    pub fn gain(&self) -> f64 {
        let lead = self
            .numerator
            .iter()
            .copied()
            .find(|&c| c != 0.0)
            .unwrap_or(0.0);
        lead / self.denominator[0]
    }

    /// Zero/pole/gain view.
    pub fn zpk(&self) -> Zpk {
        Zpk {
            zeros: self.zeros(),
            poles: self.poles(),
            gain: self.gain(),
        }
    }

    /// Returns `true` if `denominator[0]` is one (within tolerance).
    pub fn is_normalized(&self) -> bool {
        (self.denominator[0] - 1.0).abs() < NORMALIZE_TOLERANCE
    }

    /// Divides all coefficients by `denominator[0]` in place.
    ///
    /// Does nothing if the function is already normalized.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidCoefficients`] if `denominator[0]` is
    /// numerically zero; coefficients are left untouched.
    pub fn normalize(&mut self) -> Result<()> {
        let a0 = self.denominator[0];
        if (a0 - 1.0).abs() < NORMALIZE_TOLERANCE {
            return Ok(());
        }
        if a0.abs() < NORMALIZE_TOLERANCE {
            return Err(FilterError::InvalidCoefficients);
        }
        for c in self.numerator.iter_mut().chain(self.denominator.iter_mut()) {
            *c /= a0;
        }
        Ok(())
    }

    /// Returns `true` if every pole lies strictly inside the unit circle.
    pub fn is_stable(&self) -> bool {
        self.poles().iter().all(|p| p.norm() < 1.0)
    }

    /// Response at normalized angular frequency `omega` (radians per sample).
    pub fn response_at(&self, omega: f64) -> Complex64 {
        dtft(&self.numerator, omega) / dtft(&self.denominator, omega)
    }

    /// Frequency response over `[0, π]` from an FFT of size `fft_size`.
    ///
    /// The FFT grows to the longest coefficient vector if needed; the result
    /// has `size/2 + 1` bins.
    pub fn frequency_response(&self, fft_size: usize) -> FrequencyResponse {
        let size = fft_size
            .max(self.numerator.len())
            .max(self.denominator.len())
            .max(2);
        let num = spectrum(&self.numerator, size);
        let den = spectrum(&self.denominator, size);
        let values = num
            .iter()
            .zip(&den)
            .take(size / 2 + 1)
            .map(|(n, d)| n / d)
            .collect();
        FrequencyResponse::new(values)
    }

    /// Group delay in samples over `[0, π]` (`fft_size/2 + 1` values).
    ///
    /// Computed analytically from the coefficients rather than by
    /// differentiating a measured phase. Bins where the system response
    /// vanishes report 0.
    pub fn group_delay(&self, fft_size: usize) -> Vec<f64> {
        let (c, ramp) = self.group_delay_kernels();
        let size = fft_size.max(c.len()).max(2);
        let c_spec = spectrum(&c, size);
        let ramp_spec = spectrum(&ramp, size);
        let offset = (self.denominator.len() - 1) as f64;
        c_spec
            .iter()
            .zip(&ramp_spec)
            .take(size / 2 + 1)
            .map(|(c, r)| {
                if c.norm() < 1e-12 {
                    0.0
                } else {
                    (r / c).re - offset
                }
            })
            .collect()
    }

    /// Group delay in samples at one normalized angular frequency.
    pub fn group_delay_at(&self, omega: f64) -> f64 {
        let (c, ramp) = self.group_delay_kernels();
        let c_w = dtft(&c, omega);
        if c_w.norm() < 1e-12 {
            return 0.0;
        }
        (dtft(&ramp, omega) / c_w).re - (self.denominator.len() - 1) as f64
    }

    /// `c = conv(b, reverse(a))` and `n·c[n]`.
    fn group_delay_kernels(&self) -> (Vec<f64>, Vec<f64>) {
        let reversed: Vec<f64> = self.denominator.iter().rev().copied().collect();
        let c = poly::convolve(&self.numerator, &reversed);
        let ramp = c.iter().enumerate().map(|(n, &v)| n as f64 * v).collect();
        (c, ramp)
    }

    /// Phase delay `-φ(ω)/ω` in samples over `[0, π]`; the DC bin reports 0.
    pub fn phase_delay(&self, fft_size: usize) -> Vec<f64> {
        let response = self.frequency_response(fft_size);
        let phase = response.unwrapped_phase();
        response
            .omegas()
            .into_iter()
            .zip(phase)
            .map(|(w, p)| if w == 0.0 { 0.0 } else { -p / w })
            .collect()
    }

    /// First `length` samples of the impulse response, computed at f64.
    pub fn impulse_response(&self, length: usize) -> Vec<f64> {
        let b = &self.numerator;
        let a = &self.denominator;
        let a0 = a[0];
        let mut out = vec![0.0; length];
        for n in 0..length {
            let mut acc = if n < b.len() { b[n] } else { 0.0 };
            for m in 1..a.len().min(n + 1) {
                acc -= a[m] * out[n - m];
            }
            out[n] = acc / a0;
        }
        out
    }
}

/// Evaluates `sum p[k]·e^{-jωk}`.
fn dtft(p: &[f64], omega: f64) -> Complex64 {
    p.iter()
        .enumerate()
        .map(|(k, &c)| Complex64::from_polar(c, -omega * k as f64))
        .sum()
}

/// Forward FFT of `p` zero-padded to `size`.
fn spectrum(p: &[f64], size: usize) -> Vec<Complex64> {
    let mut buffer: Vec<Complex64> = p.iter().map(|&c| Complex64::new(c, 0.0)).collect();
    buffer.resize(size, Complex64::new(0.0, 0.0));
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(size).process(&mut buffer);
    buffer
}

impl Mul for &TransferFunction {
    type Output = TransferFunction;

    /// Series connection: numerators and denominators multiply.
    fn mul(self, rhs: &TransferFunction) -> TransferFunction {
        TransferFunction {
            numerator: poly::convolve(&self.numerator, &rhs.numerator),
            denominator: poly::convolve(&self.denominator, &rhs.denominator),
        }
    }
}

impl Mul for TransferFunction {
    type Output = TransferFunction;

    fn mul(self, rhs: TransferFunction) -> TransferFunction {
        &self * &rhs
    }
}

impl Add for &TransferFunction {
    type Output = TransferFunction;

    /// Parallel connection: `b1·a2 + b2·a1` over `a1·a2`.
    fn add(self, rhs: &TransferFunction) -> TransferFunction {
        let left = poly::convolve(&self.numerator, &rhs.denominator);
        let right = poly::convolve(&rhs.numerator, &self.denominator);
        TransferFunction {
            numerator: poly::add(&left, &right),
            denominator: poly::convolve(&self.denominator, &rhs.denominator),
        }
    }
}

impl Add for TransferFunction {
    type Output = TransferFunction;

    fn add(self, rhs: TransferFunction) -> TransferFunction {
        &self + &rhs
    }
}
