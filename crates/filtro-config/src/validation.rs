//! Filter description validation.
//!
//! Checks a [`FilterConfig`] before anything is built, so that a bad file is
//! reported with the stage and field at fault rather than as a bare
//! coefficient error.
//!
//! # Example
//!
//! ```rust
//! use filtro_config::{FilterConfig, StageConfig, ValidationError, validate_config};
//!
//! let config = FilterConfig::new("broken")
//!     .with_stage(StageConfig::coefficients(vec![1.0], vec![0.0, 1.0]));
//! assert_eq!(
//!     validate_config(&config),
//!     Err(ValidationError::ZeroLeadingDenominator { stage: 0 })
//! );
//! ```

use filtro_core::{NORMALIZE_TOLERANCE, poly};
use thiserror::Error;

use crate::config::FilterConfig;
use crate::stage::{StageConfig, StageForm, to_complex};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The description has no stages.
    #[error("description has no stages")]
    NoStages,

    /// Sample rate of zero.
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,

    /// A coefficient list is empty.
    #[error("stage {stage}: '{field}' is empty")]
    Empty {
        /// Stage index.
        stage: usize,
        /// Offending field.
        field: String,
    },

    /// A value is NaN or infinite.
    #[error("stage {stage}: '{field}' contains a non-finite value")]
    NonFinite {
        /// Stage index.
        stage: usize,
        /// Offending field.
        field: String,
    },

    /// Leading denominator coefficient is zero.
    #[error("stage {stage}: leading denominator coefficient is zero")]
    ZeroLeadingDenominator {
        /// Stage index.
        stage: usize,
    },

    /// State-space matrices have inconsistent shapes.
    #[error("stage {stage}: {reason}")]
    StateSpaceShape {
        /// Stage index.
        stage: usize,
        /// What does not line up.
        reason: String,
    },

    /// A complex root is listed without its conjugate.
    #[error("stage {stage}: complex value in '{field}' has no conjugate")]
    UnpairedRoot {
        /// Stage index.
        stage: usize,
        /// Offending field.
        field: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a whole description, collecting every problem found.
pub fn validate_config(config: &FilterConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();
    if config.sample_rate == 0 {
        errors.push(ValidationError::InvalidSampleRate);
    }
    if config.stages.is_empty() {
        errors.push(ValidationError::NoStages);
    }
    for (index, stage) in config.stages.iter().enumerate() {
        validate_stage(index, stage, &mut errors);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Validates one stage, pushing problems onto `errors`.
pub fn validate_stage(index: usize, stage: &StageConfig, errors: &mut Vec<ValidationError>) {
    match &stage.form {
        StageForm::Coefficients {
            numerator,
            denominator,
        } => {
            check_polynomial(index, "numerator", numerator, errors);
            check_denominator(index, "denominator", denominator, errors);
        }
        StageForm::Zpk { zeros, poles, gain } => {
            check_roots(index, "zeros", zeros, errors);
            check_roots(index, "poles", poles, errors);
            if !gain.is_finite() {
                errors.push(ValidationError::NonFinite {
                    stage: index,
                    field: "gain".to_string(),
                });
            }
        }
        StageForm::StateSpace { a, b, c, d } => {
            let n = a.len();
            if let Some(row) = a.iter().position(|r| r.len() != n) {
                errors.push(ValidationError::StateSpaceShape {
                    stage: index,
                    reason: format!("row {row} of 'a' has {} entries, expected {n}", a[row].len()),
                });
            }
            for (field, v) in [("b", b), ("c", c)] {
                if v.len() != n {
                    errors.push(ValidationError::StateSpaceShape {
                        stage: index,
                        reason: format!("'{field}' has {} entries, expected {n}", v.len()),
                    });
                }
            }
            let finite = a.iter().flatten().chain(b).chain(c).all(|v| v.is_finite());
            if !finite || !d.is_finite() {
                errors.push(ValidationError::NonFinite {
                    stage: index,
                    field: "state_space".to_string(),
                });
            }
        }
        StageForm::Sections { sections } => {
            if sections.is_empty() {
                errors.push(ValidationError::Empty {
                    stage: index,
                    field: "sections".to_string(),
                });
            }
            for (k, section) in sections.iter().enumerate() {
                check_polynomial(index, &format!("sections[{k}].numerator"), &section.numerator, errors);
                check_denominator(
                    index,
                    &format!("sections[{k}].denominator"),
                    &section.denominator,
                    errors,
                );
            }
        }
    }
}

/// Checks emptiness and finiteness. Returns `true` if both pass.
fn check_polynomial(stage: usize, field: &str, coeffs: &[f64], errors: &mut Vec<ValidationError>) -> bool {
    if coeffs.is_empty() {
        errors.push(ValidationError::Empty {
            stage,
            field: field.to_string(),
        });
        return false;
    }
    if coeffs.iter().any(|c| !c.is_finite()) {
        errors.push(ValidationError::NonFinite {
            stage,
            field: field.to_string(),
        });
        return false;
    }
    true
}

fn check_denominator(stage: usize, field: &str, coeffs: &[f64], errors: &mut Vec<ValidationError>) {
    if check_polynomial(stage, field, coeffs, errors) && coeffs[0].abs() < NORMALIZE_TOLERANCE {
        errors.push(ValidationError::ZeroLeadingDenominator { stage });
    }
}

fn check_roots(stage: usize, field: &str, roots: &[[f64; 2]], errors: &mut Vec<ValidationError>) {
    if roots.iter().flatten().any(|v| !v.is_finite()) {
        errors.push(ValidationError::NonFinite {
            stage,
            field: field.to_string(),
        });
        return;
    }
    let mut values = to_complex(roots);
    if poly::remove_conjugates(&mut values).is_err() {
        errors.push(ValidationError::UnpairedRoot {
            stage,
            field: field.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{SectionConfig, StageForm};

    fn config_with(stage: StageConfig) -> FilterConfig {
        FilterConfig::new("test").with_stage(stage)
    }

    #[test]
    fn valid_coefficients_pass() {
        let config = config_with(StageConfig::coefficients(vec![1.0, 0.5], vec![1.0, -0.5]));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_description_fails() {
        assert_eq!(
            validate_config(&FilterConfig::new("empty")),
            Err(ValidationError::NoStages)
        );
    }

    #[test]
    fn zero_sample_rate_and_no_stages_are_both_reported() {
        let config = FilterConfig::new("bad").with_sample_rate(0);
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::Multiple(vec![
                ValidationError::InvalidSampleRate,
                ValidationError::NoStages,
            ]))
        );
    }

    #[test]
    fn empty_numerator_names_field() {
        let config = config_with(StageConfig::coefficients(vec![], vec![1.0]));
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::Empty {
                stage: 0,
                field: "numerator".to_string()
            })
        );
    }

    #[test]
    fn non_finite_coefficient() {
        let config = config_with(StageConfig::coefficients(vec![1.0, f64::NAN], vec![1.0]));
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::NonFinite { stage: 0, .. })
        ));
    }

    #[test]
    fn unpaired_complex_pole() {
        let config = config_with(
            StageForm::Zpk {
                zeros: vec![],
                poles: vec![[0.5, 0.3]],
                gain: 1.0,
            }
            .into(),
        );
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::UnpairedRoot {
                stage: 0,
                field: "poles".to_string()
            })
        );
    }

    #[test]
    fn conjugate_pair_passes() {
        let config = config_with(
            StageForm::Zpk {
                zeros: vec![[-1.0, 0.0]],
                poles: vec![[0.5, 0.3], [0.5, -0.3]],
                gain: 0.5,
            }
            .into(),
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn state_space_shape() {
        let config = config_with(
            StageForm::StateSpace {
                a: vec![vec![0.5, 0.1], vec![0.0, 0.2]],
                b: vec![1.0],
                c: vec![1.0, 0.0],
                d: 0.0,
            }
            .into(),
        );
        let err = validate_config(&config).unwrap_err();
        assert_eq!(err.to_string(), "stage 0: 'b' has 1 entries, expected 2");
    }

    #[test]
    fn section_errors_name_the_section() {
        let config = config_with(
            StageForm::Sections {
                sections: vec![
                    SectionConfig {
                        numerator: vec![1.0],
                        denominator: vec![1.0],
                    },
                    SectionConfig {
                        numerator: vec![],
                        denominator: vec![1.0],
                    },
                ],
            }
            .into(),
        );
        assert_eq!(
            validate_config(&config),
            Err(ValidationError::Empty {
                stage: 0,
                field: "sections[1].numerator".to_string()
            })
        );
    }

    #[test]
    fn multiple_display_joins_messages() {
        let err = ValidationError::Multiple(vec![
            ValidationError::NoStages,
            ValidationError::InvalidSampleRate,
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: description has no stages; sample rate must be greater than zero"
        );
    }
}
