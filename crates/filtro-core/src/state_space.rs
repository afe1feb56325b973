//! State-space realization of single-input single-output systems.
//!
//! ```text
//! x[n+1] = A·x[n] + B·u[n]
//! y[n]   = C·x[n] + D·u[n]
//! ```
//!
//! Conversions read coefficient vectors as polynomials in descending powers
//! of `z` aligned at the constant end, so a numerator shorter than the
//! denominator is front-padded with zeros. This is the usual controllable
//! canonical form convention.

use crate::error::{FilterError, Result, check_coefficients};
use crate::transfer_function::TransferFunction;

/// State-space matrices `A` (n×n), `B` (n), `C` (n) and scalar `D`.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    /// State transition matrix, row-major.
    pub a: Vec<Vec<f64>>,
    /// Input column.
    pub b: Vec<f64>,
    /// Output row.
    pub c: Vec<f64>,
    /// Direct feedthrough.
    pub d: f64,
}

impl StateSpace {
    /// Creates a state-space system after checking matrix shapes.
    pub fn new(a: Vec<Vec<f64>>, b: Vec<f64>, c: Vec<f64>, d: f64) -> Result<Self> {
        let ss = Self { a, b, c, d };
        ss.check_dimensions()?;
        Ok(ss)
    }

    /// Number of states.
    pub fn order(&self) -> usize {
        self.a.len()
    }

    fn check_dimensions(&self) -> Result<()> {
        let n = self.a.len();
        if let Some(row) = self.a.iter().position(|r| r.len() != n) {
            return Err(FilterError::DimensionMismatch(format!(
                "row {row} of A has {} entries, expected {n}",
                self.a[row].len()
            )));
        }
        if self.b.len() != n {
            return Err(FilterError::DimensionMismatch(format!(
                "B has {} entries, expected {n}",
                self.b.len()
            )));
        }
        if self.c.len() != n {
            return Err(FilterError::DimensionMismatch(format!(
                "C has {} entries, expected {n}",
                self.c.len()
            )));
        }
        Ok(())
    }
}

impl TransferFunction {
    /// Controllable canonical (companion) state-space form.
    ///
    /// `A` holds `-a[1..]/a[0]` in its first row and a shifted identity below,
    /// `B = [1, 0, ..., 0]`, `D` is `b[0]/a[0]` when numerator and denominator
    /// have equal length (0 otherwise) and `C = b[1..] - D·a[1..]` on the
    /// front-padded numerator.
    ///
    /// # Errors
    ///
    /// [`FilterError::UnsupportedDegree`] if the numerator is longer than the
    /// denominator.
    pub fn state_space(&self) -> Result<StateSpace> {
        let num = self.numerator();
        let den = self.denominator();
        if num.len() > den.len() {
            return Err(FilterError::UnsupportedDegree {
                numerator: num.len(),
                denominator: den.len(),
            });
        }

        let a0 = den[0];
        let n = den.len() - 1;
        let a: Vec<f64> = den.iter().map(|&c| c / a0).collect();
        let mut b = vec![0.0; den.len()];
        for (slot, &c) in b[den.len() - num.len()..].iter_mut().zip(num) {
            *slot = c / a0;
        }

        let d = b[0];
        let mut a_mat = vec![vec![0.0; n]; n];
        if n > 0 {
            for (j, &coef) in a[1..].iter().enumerate() {
                a_mat[0][j] = -coef;
            }
            for i in 1..n {
                a_mat[i][i - 1] = 1.0;
            }
        }
        let mut b_col = vec![0.0; n];
        if let Some(first) = b_col.first_mut() {
            *first = 1.0;
        }
        let c_row = (1..=n).map(|i| b[i] - d * a[i]).collect();

        Ok(StateSpace {
            a: a_mat,
            b: b_col,
            c: c_row,
            d,
        })
    }

    /// Recovers the transfer function of a state-space system.
    ///
    /// The denominator is the characteristic polynomial of `A` and the
    /// numerator is `C·adj(zI - A)·B + D·det(zI - A)`, both obtained with the
    /// Faddeev–LeVerrier recurrence. The numerator always has `n + 1`
    /// coefficients with `D` first.
    pub fn from_state_space(ss: &StateSpace) -> Result<Self> {
        ss.check_dimensions()?;
        check_coefficients(&[ss.d])?;
        for row in &ss.a {
            if row.iter().any(|v| !v.is_finite()) {
                return Err(FilterError::DimensionMismatch(
                    "A contains non-finite entries".to_string(),
                ));
            }
        }

        let n = ss.order();
        let mut den = vec![1.0; n + 1];
        let mut num = vec![ss.d; n + 1];

        // N_1 = I; c_k = -tr(A·N_k)/k; N_{k+1} = A·N_k + c_k·I
        let mut adj = identity(n);
        for k in 1..=n {
            let a_adj = mat_mul(&ss.a, &adj);
            let ck = -trace(&a_adj) / k as f64;
            den[k] = ck;
            num[k] = quadratic_form(&ss.c, &adj, &ss.b) + ss.d * ck;
            adj = a_adj;
            for (i, row) in adj.iter_mut().enumerate() {
                row[i] += ck;
            }
        }

        Self::new(num, den)
    }
}

fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

fn mat_mul(x: &[Vec<f64>], y: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = x.len();
    let mut out = vec![vec![0.0; n]; n];
    for i in 0..n {
        for k in 0..n {
            let xik = x[i][k];
            if xik == 0.0 {
                continue;
            }
            for j in 0..n {
                out[i][j] += xik * y[k][j];
            }
        }
    }
    out
}

fn trace(m: &[Vec<f64>]) -> f64 {
    m.iter().enumerate().map(|(i, row)| row[i]).sum()
}

/// `c · M · b`
fn quadratic_form(c: &[f64], m: &[Vec<f64>], b: &[f64]) -> f64 {
    c.iter()
        .zip(m)
        .map(|(&ci, row)| ci * row.iter().zip(b).map(|(&mij, &bj)| mij * bj).sum::<f64>())
        .sum()
}
