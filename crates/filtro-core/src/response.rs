//! Frequency response container.

use core::f64::consts::PI;
use rustfft::num_complex::Complex64;

/// Complex frequency response sampled on `[0, π]`.
///
/// Bin `k` of `n` corresponds to the normalized angular frequency
/// `ω = π·k/(n-1)`, i.e. the non-negative half of an FFT of size `2(n-1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponse {
    values: Vec<Complex64>,
}

impl FrequencyResponse {
    /// Wraps raw complex response values.
    pub fn new(values: Vec<Complex64>) -> Self {
        Self { values }
    }

    /// Complex response values.
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no bins.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Normalized angular frequency of every bin, in radians per sample.
    pub fn omegas(&self) -> Vec<f64> {
        let n = self.values.len();
        if n < 2 {
            return vec![0.0; n];
        }
        (0..n).map(|k| PI * k as f64 / (n - 1) as f64).collect()
    }

    /// Frequency of every bin in Hz for the given sample rate.
    pub fn frequencies(&self, sample_rate: f64) -> Vec<f64> {
        self.omegas()
            .into_iter()
            .map(|w| w * sample_rate / (2.0 * PI))
            .collect()
    }

    /// Linear magnitude.
    pub fn magnitude(&self) -> Vec<f64> {
        self.values.iter().map(|h| h.norm()).collect()
    }

    /// Magnitude in dB (floored at -240 dB).
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|h| 20.0 * h.norm().max(1e-12).log10())
            .collect()
    }

    /// Wrapped phase in radians.
    pub fn phase(&self) -> Vec<f64> {
        self.values.iter().map(|h| h.arg()).collect()
    }

    /// Phase with 2π discontinuities removed.
    pub fn unwrapped_phase(&self) -> Vec<f64> {
        unwrap_phase(&self.phase())
    }
}

/// Removes 2π jumps from a wrapped phase sequence.
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phase.len());
    let mut offset = 0.0;
    let mut prev: Option<f64> = None;
    for &p in phase {
        if let Some(last) = prev {
            let diff = p - last;
            if diff > PI {
                offset -= 2.0 * PI;
            } else if diff < -PI {
                offset += 2.0 * PI;
            }
        }
        out.push(p + offset);
        prev = Some(p);
    }
    out
}
