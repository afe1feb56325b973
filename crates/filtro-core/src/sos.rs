//! Second-order-section (biquad cascade) codec.
//!
//! [`to_sos`] factors a transfer function into real-coefficient sections of
//! degree ≤ 2, [`from_sos`] multiplies a cascade back together.
//!
//! # Pairing
//!
//! Sections are filled from the last one to the first. Each step takes the
//! remaining pole closest to the unit circle and the zero nearest to it, then
//! completes the section with the conjugates (complex roots) or the next real
//! root by the same proximity rules. Ties resolve to the earliest candidate,
//! so identical input always yields the same cascade. Poles nearest the unit
//! circle end up in the last sections, where they see the least gain.
//!
//! The numerator and denominator root lists are balanced with roots at the
//! origin (factors of `1` in delay order), so unequal degrees never fail.
//! Pure delays (leading zero numerator coefficients) become trailing delay
//! sections.

use rustfft::num_complex::Complex64;

use crate::error::{FilterError, Result};
use crate::poly::{self, is_complex, is_real};
use crate::transfer_function::TransferFunction;

const ORIGIN: Complex64 = Complex64::new(0.0, 0.0);

/// Factors a transfer function into second-order sections.
///
/// Every section has three numerator and three denominator coefficients with
/// `denominator[0] == 1`; the overall gain sits in the first section only.
///
/// ```rust
/// use filtro_core::{TransferFunction, sos};
///
/// let tf = TransferFunction::new(vec![1.0, -1.0, 0.29], vec![1.0, -0.7, 0.1]).unwrap();
/// let sections = sos::to_sos(&tf).unwrap();
/// assert_eq!(sections.len(), 1);
/// ```
///
/// # Errors
///
/// [`FilterError::UnpairedRoot`] if a complex root has no conjugate, which
/// can only happen for badly conditioned coefficient vectors.
pub fn to_sos(tf: &TransferFunction) -> Result<Vec<TransferFunction>> {
    let Some(delay) = tf.numerator().iter().position(|&c| c != 0.0) else {
        return Ok(vec![TransferFunction::fir(vec![0.0])?]);
    };
    let gain = tf.gain();

    let mut zeros = tf.zeros();
    let mut poles = tf.poles();
    let count = zeros.len().max(poles.len());
    zeros.resize(count, ORIGIN);
    poles.resize(count, ORIGIN);

    let mut sections = Vec::with_capacity(count.div_ceil(2) + delay.div_ceil(2));
    if count == 0 {
        sections.push(TransferFunction::fir(vec![gain])?);
    } else {
        let section_count = count.div_ceil(2);
        if count % 2 == 1 {
            zeros.push(ORIGIN);
            poles.push(ORIGIN);
        }
        poly::remove_conjugates(&mut zeros)?;
        poly::remove_conjugates(&mut poles)?;

        let mut reversed = Vec::with_capacity(section_count);
        for index in (0..section_count).rev() {
            let (z1, z2, p1, p2) = next_section(&mut zeros, &mut poles);
            let section_gain = if index == 0 { gain } else { 1.0 };
            reversed.push(section(z1, z2, p1, p2, section_gain)?);
        }
        sections.extend(reversed.into_iter().rev());
    }

    let mut remaining = delay;
    while remaining > 0 {
        let step = remaining.min(2);
        let mut numerator = vec![0.0; step + 1];
        numerator[step] = 1.0;
        sections.push(TransferFunction::fir(numerator)?);
        remaining -= step;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        order = tf.order(),
        sections = sections.len(),
        "decomposed transfer function into second-order sections"
    );

    Ok(sections)
}

/// Multiplies a cascade of sections back into one transfer function.
///
/// # Errors
///
/// [`FilterError::EmptyCoefficients`] for an empty cascade.
pub fn from_sos(sections: &[TransferFunction]) -> Result<TransferFunction> {
    let (first, rest) = sections
        .split_first()
        .ok_or(FilterError::EmptyCoefficients)?;
    let mut numerator = first.numerator().to_vec();
    let mut denominator = first.denominator().to_vec();
    for s in rest {
        numerator = poly::convolve(&numerator, s.numerator());
        denominator = poly::convolve(&denominator, s.denominator());
    }
    TransferFunction::new(numerator, denominator)
}

impl TransferFunction {
    /// Second-order-section cascade of this function. See [`to_sos`].
    pub fn to_sos(&self) -> Result<Vec<TransferFunction>> {
        to_sos(self)
    }

    /// Product of a section cascade. See [`from_sos`].
    pub fn from_sos(sections: &[TransferFunction]) -> Result<Self> {
        from_sos(sections)
    }
}

/// Picks `(z1, z2, p1, p2)` for one section, removing them from the lists.
fn next_section(
    zeros: &mut Vec<Complex64>,
    poles: &mut Vec<Complex64>,
) -> (Complex64, Complex64, Complex64, Complex64) {
    let p1 = take(poles, closest_to_unit_circle(poles, any));

    if is_real(p1) && poles.iter().all(|&p| is_complex(p)) {
        let z1 = take(zeros, closest_to(zeros, p1, is_real));
        return (z1, ORIGIN, p1, ORIGIN);
    }

    let z1_pos = if is_complex(p1) && zeros.iter().filter(|&&z| is_real(z)).count() == 1 {
        closest_to(zeros, p1, is_complex)
    } else {
        closest_to(zeros, p1, any)
    };
    let z1 = take(zeros, z1_pos);

    if is_complex(p1) {
        let z2 = if is_complex(z1) {
            z1.conj()
        } else {
            take(zeros, closest_to(zeros, p1, is_real))
        };
        return (z1, z2, p1, p1.conj());
    }

    if is_complex(z1) {
        let p2 = take(poles, closest_to(poles, z1, is_real));
        return (z1, z1.conj(), p1, p2);
    }

    let p2 = take(poles, closest_to_unit_circle(poles, is_real));
    let z2 = take(zeros, closest_to(zeros, p2, is_real));
    (z1, z2, p1, p2)
}

fn any(_: Complex64) -> bool {
    true
}

/// Removes and returns the value at `pos`, or the origin if nothing matched.
fn take(values: &mut Vec<Complex64>, pos: Option<usize>) -> Complex64 {
    pos.map_or(ORIGIN, |i| values.remove(i))
}

fn closest_by(
    values: &[Complex64],
    accept: fn(Complex64) -> bool,
    distance: impl Fn(Complex64) -> f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        if !accept(v) {
            continue;
        }
        let d = distance(v);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

fn closest_to(values: &[Complex64], target: Complex64, accept: fn(Complex64) -> bool) -> Option<usize> {
    closest_by(values, accept, |v| (v - target).norm())
}

fn closest_to_unit_circle(values: &[Complex64], accept: fn(Complex64) -> bool) -> Option<usize> {
    closest_by(values, accept, |v| (v.norm() - 1.0).abs())
}

fn section(
    z1: Complex64,
    z2: Complex64,
    p1: Complex64,
    p2: Complex64,
    gain: f64,
) -> Result<TransferFunction> {
    let numerator = poly::scale(&poly::from_roots(&[z1, z2]), gain);
    let denominator = poly::from_roots(&[p1, p2]);
    TransferFunction::new(numerator, denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(
            actual.len(),
            expected.len(),
            "{actual:?} vs {expected:?}"
        );
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < tol, "{actual:?} vs {expected:?}");
        }
    }

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn reference_decomposition() {
        let zeros = [
            c(1.0, 0.0),
            c(0.5, 0.2),
            c(-0.3, 0.0),
            c(0.2, -0.9),
            c(0.5, -0.2),
            c(0.2, 0.9),
        ];
        let poles = [
            c(1.0, 0.0),
            c(0.2, 0.0),
            c(0.5, 0.0),
            c(-0.9, 0.2),
            c(0.6, 0.0),
            c(0.1, 0.0),
            c(-0.9, -0.2),
        ];
        let tf = TransferFunction::from_zpk(&zeros, &poles, 1.0).unwrap();
        let sos = to_sos(&tf).unwrap();

        assert_eq!(sos.len(), 4);
        assert_close(sos[0].numerator(), &[1.0, -0.4, 0.85], 1e-10);
        assert_close(sos[0].denominator(), &[1.0, -0.1, 0.0], 1e-10);
        assert_close(sos[1].numerator(), &[1.0, -1.0, 0.29], 1e-10);
        assert_close(sos[1].denominator(), &[1.0, -0.7, 0.1], 1e-10);
        assert_close(sos[2].numerator(), &[1.0, 0.3, 0.0], 1e-10);
        assert_close(sos[2].denominator(), &[1.0, 1.8, 0.85], 1e-10);
        assert_close(sos[3].numerator(), &[1.0, -1.0, 0.0], 1e-10);
        assert_close(sos[3].denominator(), &[1.0, -1.6, 0.6], 1e-10);
    }

    #[test]
    fn reference_product() {
        let sos = [
            TransferFunction::new(vec![1.0, -0.4, 0.85], vec![1.0, -0.1, 0.0]).unwrap(),
            TransferFunction::new(vec![1.0, -1.0, 0.29], vec![1.0, -0.7, 0.1]).unwrap(),
            TransferFunction::new(vec![1.0, 0.3, 0.0], vec![1.0, 1.8, 0.85]).unwrap(),
            TransferFunction::new(vec![1.0, -1.0, 0.0], vec![1.0, -1.6, 0.6]).unwrap(),
        ];
        let tf = from_sos(&sos).unwrap();
        assert_close(
            tf.numerator(),
            &[1.0, -2.1, 2.22, -1.624, 0.4607, 0.11725, -0.07395, 0.0, 0.0],
            1e-10,
        );
        assert_close(
            tf.denominator(),
            &[1.0, -0.6, -1.42, 0.888, 0.4889, -0.4413, 0.0895, -0.0051, 0.0],
            1e-10,
        );
    }

    #[test]
    fn gain_lives_in_first_section_only() {
        let tf = TransferFunction::new(
            vec![0.5, -0.5, 0.145, 0.0, 0.0],
            vec![2.0, -1.4, 0.2, 0.1, -0.02],
        )
        .unwrap();
        let sos = to_sos(&tf).unwrap();
        assert!((sos[0].numerator()[0] - 0.25).abs() < 1e-12);
        for s in &sos[1..] {
            assert!((s.numerator()[0] - 1.0).abs() < 1e-12);
        }
        for s in &sos {
            assert_eq!(s.denominator()[0], 1.0);
        }
    }

    #[test]
    fn pure_gain_is_one_section() {
        let tf = TransferFunction::new(vec![3.0], vec![2.0]).unwrap();
        let sos = to_sos(&tf).unwrap();
        assert_eq!(sos.len(), 1);
        assert_eq!(sos[0].numerator(), &[1.5]);
        assert_eq!(sos[0].denominator(), &[1.0]);
    }

    #[test]
    fn leading_delay_becomes_delay_sections() {
        let tf = TransferFunction::new(vec![0.0, 0.0, 0.0, 1.0, -0.5], vec![1.0, -0.3]).unwrap();
        let sos = to_sos(&tf).unwrap();
        let back = from_sos(&sos).unwrap();
        let mut expected_num = tf.numerator().to_vec();
        expected_num.resize(back.numerator().len(), 0.0);
        assert_close(back.numerator(), &expected_num, 1e-12);
        assert!((back.denominator()[1] + 0.3).abs() < 1e-12);
        assert!(back.denominator()[2..].iter().all(|c| c.abs() < 1e-12));
    }

    #[test]
    fn zero_numerator_is_silent_section() {
        let tf = TransferFunction::new(vec![0.0, 0.0], vec![1.0, 0.5]).unwrap();
        let sos = to_sos(&tf).unwrap();
        assert_eq!(sos.len(), 1);
        assert_eq!(sos[0].numerator(), &[0.0]);
    }

    #[test]
    fn output_is_deterministic() {
        let tf = TransferFunction::new(
            vec![1.0, 0.2, -0.3, 0.05, 0.01],
            vec![1.0, -0.5, 0.3, -0.1, 0.02],
        )
        .unwrap();
        assert_eq!(to_sos(&tf).unwrap(), to_sos(&tf).unwrap());
    }

    #[test]
    fn empty_cascade_is_rejected() {
        assert_eq!(from_sos(&[]), Err(FilterError::EmptyCoefficients));
    }
}
