//! Polynomial and complex-number helpers.
//!
//! Two coefficient orders appear in this crate and every function here says
//! which one it expects:
//!
//! - **delay order**: `p[k]` multiplies `z^-k` (transfer-function numerators
//!   and denominators). Convolution and addition work in this order.
//! - **descending order**: `p[0]` multiplies the highest power of `z`. Root
//!   finding, evaluation and [`from_roots`] use this order. A delay-order
//!   vector of length `n` read in descending order is the same polynomial
//!   multiplied by `z^(n-1)`, so the two coincide for root finding.
//!
//! Roots are found with the Weierstrass (Durand–Kerner) simultaneous
//! iteration, polished with Newton steps, then made exactly
//! conjugate-symmetric so that downstream pairing yields real sections.

use rustfft::num_complex::Complex64;

use crate::error::{FilterError, Result};

/// Imaginary parts at or below this magnitude count as real.
pub const REAL_TOLERANCE: f64 = 1e-10;

const MAX_ITERATIONS: usize = 500;
const CONVERGENCE: f64 = 1e-15;
const POLISH_STEPS: usize = 3;

/// Multiplies two polynomials (discrete convolution).
///
/// Returns an empty vector if either operand is empty.
///
/// ```rust
/// use filtro_core::poly::convolve;
///
/// let p = convolve(&[1.0, -0.1], &[1.0, 0.4]);
/// assert_eq!(p.len(), 3);
/// assert!((p[1] - 0.3).abs() < 1e-12);
/// assert!((p[2] + 0.04).abs() < 1e-12);
/// ```
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Adds two delay-order polynomials, zero-padding the shorter one at the end.
pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len().max(b.len())];
    for (o, &x) in out.iter_mut().zip(a) {
        *o += x;
    }
    for (o, &y) in out.iter_mut().zip(b) {
        *o += y;
    }
    out
}

/// Multiplies every coefficient by `k`.
pub fn scale(p: &[f64], k: f64) -> Vec<f64> {
    p.iter().map(|&c| c * k).collect()
}

/// Evaluates a descending-order polynomial at `z` (Horner's scheme).
pub fn eval(p: &[f64], z: Complex64) -> Complex64 {
    p.iter()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z + c)
}

fn eval_complex(p: &[Complex64], z: Complex64) -> Complex64 {
    p.iter().fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z + c)
}

/// Derivative of a descending-order polynomial.
pub fn derivative(p: &[f64]) -> Vec<f64> {
    let n = p.len();
    if n <= 1 {
        return vec![0.0];
    }
    p[..n - 1]
        .iter()
        .enumerate()
        .map(|(i, &c)| c * (n - 1 - i) as f64)
        .collect()
}

/// Builds the monic descending-order polynomial `prod (z - r)`.
///
/// Only real parts are kept, which is exact when `roots` is closed under
/// conjugation. An empty root list gives `[1.0]`.
pub fn from_roots(roots: &[Complex64]) -> Vec<f64> {
    let mut acc = vec![Complex64::new(1.0, 0.0)];
    for &r in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); acc.len() + 1];
        for (i, &c) in acc.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * r;
        }
        acc = next;
    }
    acc.into_iter().map(|c| c.re).collect()
}

/// Returns `true` if `z` has a negligible imaginary part.
#[inline]
pub fn is_real(z: Complex64) -> bool {
    z.im.abs() <= REAL_TOLERANCE
}

/// Returns `true` if `z` has a non-negligible imaginary part.
#[inline]
pub fn is_complex(z: Complex64) -> bool {
    !is_real(z)
}

/// Removes the conjugate partner of every complex value, keeping the first
/// member of each pair in place.
///
/// Fails with [`FilterError::UnpairedRoot`] if a complex value has no
/// partner within a relative tolerance of `1e-8`.
pub fn remove_conjugates(values: &mut Vec<Complex64>) -> Result<()> {
    let mut i = 0;
    while i < values.len() {
        let z = values[i];
        if is_complex(z) {
            let tol = 1e-8 * z.norm().max(1.0);
            let partner = values
                .iter()
                .enumerate()
                .skip(i + 1)
                .find(|(_, w)| (z.conj() - **w).norm() <= tol)
                .map(|(j, _)| j);
            match partner {
                Some(j) => {
                    values.remove(j);
                }
                None => return Err(FilterError::UnpairedRoot { re: z.re, im: z.im }),
            }
        }
        i += 1;
    }
    Ok(())
}

/// Finds the roots of a descending-order polynomial.
///
/// Leading zero coefficients are ignored; trailing zero coefficients yield
/// exact roots at the origin. A constant (or all-zero) polynomial has no
/// roots. Complex roots are returned in exact conjugate pairs and near-real
/// roots are snapped onto the real axis.
pub fn roots(p: &[f64]) -> Vec<Complex64> {
    let Some(first) = p.iter().position(|&c| c != 0.0) else {
        return Vec::new();
    };
    let p = &p[first..];
    let trailing = p.iter().rev().take_while(|&&c| c == 0.0).count();
    let body = &p[..p.len() - trailing];

    let mut out = match body.len() {
        0 | 1 => Vec::new(),
        2 => vec![Complex64::new(-body[1] / body[0], 0.0)],
        3 => quadratic_roots(body[0], body[1], body[2]).to_vec(),
        _ => {
            let monic = scale(body, 1.0 / body[0]);
            let mut found = durand_kerner(&monic);
            polish(&monic, &mut found);
            found
        }
    };
    out.extend(std::iter::repeat_n(Complex64::new(0.0, 0.0), trailing));
    conjugate_symmetrize(&mut out);
    out
}

fn quadratic_roots(a: f64, b: f64, c: f64) -> [Complex64; 2] {
    let disc = b * b - 4.0 * a * c;
    if disc >= 0.0 {
        // Avoid cancellation: compute the larger-magnitude root first.
        let q = -0.5 * (b + b.signum() * disc.sqrt());
        if q == 0.0 {
            return [Complex64::new(0.0, 0.0); 2];
        }
        [Complex64::new(q / a, 0.0), Complex64::new(c / q, 0.0)]
    } else {
        let re = -b / (2.0 * a);
        let im = (-disc).sqrt() / (2.0 * a).abs();
        [Complex64::new(re, im), Complex64::new(re, -im)]
    }
}

fn durand_kerner(monic: &[f64]) -> Vec<Complex64> {
    let n = monic.len() - 1;
    let coeffs: Vec<Complex64> = monic.iter().map(|&c| Complex64::new(c, 0.0)).collect();

    // Fujiwara bound on root magnitude.
    let radius = monic
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, c)| c.abs().powf(1.0 / i as f64))
        .fold(0.0_f64, f64::max)
        .max(1e-3)
        * 2.0;

    let mut z: Vec<Complex64> = (0..n)
        .map(|k| Complex64::from_polar(radius, core::f64::consts::TAU * k as f64 / n as f64 + 0.4))
        .collect();

    for _iteration in 0..MAX_ITERATIONS {
        let prev = z.clone();
        let mut max_step = 0.0_f64;
        for i in 0..n {
            let mut denom = Complex64::new(1.0, 0.0);
            for (j, &w) in prev.iter().enumerate() {
                if i != j {
                    denom *= prev[i] - w;
                }
            }
            if denom.norm() == 0.0 {
                // Coincident estimates: nudge apart and let the next pass resolve them.
                z[i] = prev[i] + Complex64::new(1e-8, 1e-8);
                max_step = f64::INFINITY;
                continue;
            }
            let step = eval_complex(&coeffs, prev[i]) / denom;
            z[i] = prev[i] - step;
            max_step = max_step.max(step.norm() / (1.0 + z[i].norm()));
        }
        if max_step < CONVERGENCE {
            return z;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(degree = n, "root finder hit the iteration limit (clustered roots?)");

    z
}

fn polish(monic: &[f64], found: &mut [Complex64]) {
    let dp = derivative(monic);
    for z in found.iter_mut() {
        for _ in 0..POLISH_STEPS {
            let value = eval(monic, *z);
            let slope = eval(&dp, *z);
            if slope.norm() == 0.0 {
                break;
            }
            let candidate = *z - value / slope;
            if eval(monic, candidate).norm() < value.norm() {
                *z = candidate;
            } else {
                break;
            }
        }
    }
}

/// Snaps near-real values onto the real axis and replaces every remaining
/// complex value by an exact conjugate pair matched by proximity.
fn conjugate_symmetrize(values: &mut [Complex64]) {
    for z in values.iter_mut() {
        if z.im.abs() <= REAL_TOLERANCE * z.norm().max(1.0) {
            z.im = 0.0;
        }
    }

    let mut paired = vec![false; values.len()];
    for i in 0..values.len() {
        if paired[i] || values[i].im <= 0.0 {
            continue;
        }
        let upper = values[i];
        let partner = (0..values.len())
            .filter(|&j| !paired[j] && values[j].im < 0.0)
            .min_by(|&a, &b| {
                let da = (values[a] - upper.conj()).norm();
                let db = (values[b] - upper.conj()).norm();
                da.total_cmp(&db)
            });
        if let Some(j) = partner {
            let mean = (upper + values[j].conj()) * 0.5;
            values[i] = mean;
            values[j] = mean.conj();
            paired[i] = true;
            paired[j] = true;
        }
    }

    // An unbalanced leftover can only come from rounding; it belongs on the axis.
    for (z, done) in values.iter_mut().zip(&paired) {
        if !done && z.im != 0.0 {
            z.im = 0.0;
        }
    }
}
