//! One stage of a filter description.

use filtro_core::{Complex64, Connection, FilterError, StateSpace, TransferFunction};
use serde::{Deserialize, Serialize};

/// How a stage joins the stages before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combine {
    /// Cascade after the previous stages.
    #[default]
    Series,
    /// Run alongside the previous stages and sum the outputs.
    Parallel,
}

impl Combine {
    fn is_series(&self) -> bool {
        *self == Combine::Series
    }
}

impl From<Combine> for Connection {
    fn from(combine: Combine) -> Self {
        match combine {
            Combine::Series => Connection::Series,
            Combine::Parallel => Connection::Parallel,
        }
    }
}

/// Coefficients of one second-order section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Numerator coefficients.
    pub numerator: Vec<f64>,
    /// Denominator coefficients.
    #[serde(default = "unit_denominator")]
    pub denominator: Vec<f64>,
}

/// System description of a stage, tagged by `form`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum StageForm {
    /// Numerator and denominator in delay order.
    Coefficients {
        /// Numerator coefficients.
        numerator: Vec<f64>,
        /// Denominator coefficients (defaults to `[1.0]`).
        #[serde(default = "unit_denominator")]
        denominator: Vec<f64>,
    },
    /// Zeros, poles (`[re, im]` pairs) and gain.
    Zpk {
        /// Numerator roots.
        #[serde(default)]
        zeros: Vec<[f64; 2]>,
        /// Denominator roots.
        #[serde(default)]
        poles: Vec<[f64; 2]>,
        /// Overall gain.
        #[serde(default = "unit_gain")]
        gain: f64,
    },
    /// State-space matrices.
    StateSpace {
        /// State transition matrix, row-major.
        a: Vec<Vec<f64>>,
        /// Input column.
        b: Vec<f64>,
        /// Output row.
        c: Vec<f64>,
        /// Direct feedthrough.
        #[serde(default)]
        d: f64,
    },
    /// Cascade of second-order sections.
    Sections {
        /// Sections in processing order.
        sections: Vec<SectionConfig>,
    },
}

fn unit_denominator() -> Vec<f64> {
    vec![1.0]
}

fn unit_gain() -> f64 {
    1.0
}

/// A stage: its system plus how it joins the chain.
///
/// The `combine` of the first stage is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Connection to the preceding stages.
    #[serde(default, skip_serializing_if = "Combine::is_series")]
    pub combine: Combine,
    /// The stage's system.
    #[serde(flatten)]
    pub form: StageForm,
}

impl StageConfig {
    /// Series stage from coefficients.
    pub fn coefficients(numerator: Vec<f64>, denominator: Vec<f64>) -> Self {
        StageForm::Coefficients {
            numerator,
            denominator,
        }
        .into()
    }

    /// Series stage from zeros, poles and gain.
    pub fn zpk(zeros: &[Complex64], poles: &[Complex64], gain: f64) -> Self {
        let pairs = |roots: &[Complex64]| roots.iter().map(|z| [z.re, z.im]).collect();
        StageForm::Zpk {
            zeros: pairs(zeros),
            poles: pairs(poles),
            gain,
        }
        .into()
    }

    /// Sets how the stage joins the previous ones.
    pub fn with_combine(mut self, combine: Combine) -> Self {
        self.combine = combine;
        self
    }

    /// Builds the stage's transfer function.
    pub fn transfer_function(&self) -> Result<TransferFunction, FilterError> {
        match &self.form {
            StageForm::Coefficients {
                numerator,
                denominator,
            } => TransferFunction::new(numerator.clone(), denominator.clone()),
            StageForm::Zpk { zeros, poles, gain } => {
                TransferFunction::from_zpk(&to_complex(zeros), &to_complex(poles), *gain)
            }
            StageForm::StateSpace { a, b, c, d } => {
                let ss = StateSpace::new(a.clone(), b.clone(), c.clone(), *d)?;
                TransferFunction::from_state_space(&ss)
            }
            StageForm::Sections { sections } => {
                let sections = sections
                    .iter()
                    .map(|s| TransferFunction::new(s.numerator.clone(), s.denominator.clone()))
                    .collect::<Result<Vec<_>, _>>()?;
                TransferFunction::from_sos(&sections)
            }
        }
    }

    /// Name of the stage form as written in TOML.
    pub fn form_name(&self) -> &'static str {
        match self.form {
            StageForm::Coefficients { .. } => "coefficients",
            StageForm::Zpk { .. } => "zpk",
            StageForm::StateSpace { .. } => "state_space",
            StageForm::Sections { .. } => "sections",
        }
    }
}

impl From<StageForm> for StageConfig {
    fn from(form: StageForm) -> Self {
        Self {
            combine: Combine::Series,
            form,
        }
    }
}

/// `[re, im]` pairs to complex values.
pub(crate) fn to_complex(pairs: &[[f64; 2]]) -> Vec<Complex64> {
    pairs.iter().map(|&[re, im]| Complex64::new(re, im)).collect()
}
