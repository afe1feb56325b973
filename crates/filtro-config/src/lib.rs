//! Filter descriptions for filtro.
//!
//! This crate loads, validates and saves TOML descriptions of LTI filters and
//! builds them into [`filtro_core`] transfer functions and runtime filters.
//!
//! # Features
//!
//! - **Descriptions**: a filter is a chain of stages joined in series or in
//!   parallel; each stage is given as coefficients, zeros/poles/gain,
//!   state-space matrices or a section cascade
//! - **Validation**: every problem is reported with its stage and field
//! - **Factory Filters**: built-in descriptions for common filters
//!
//! # Example
//!
//! ```rust
//! use filtro_config::{Combine, FilterConfig, StageConfig};
//!
//! let config = FilterConfig::new("smoothed-difference")
//!     .with_description("One-pole smoother followed by a first difference")
//!     .with_stage(StageConfig::coefficients(vec![0.1], vec![1.0, -0.9]))
//!     .with_stage(StageConfig::coefficients(vec![1.0, -1.0], vec![1.0]).with_combine(Combine::Series));
//!
//! let filter = config.build_filter().unwrap();
//! assert_eq!(filter.denominator(), &[1.0, -0.9]);
//!
//! let text = config.to_toml_string().unwrap();
//! assert_eq!(FilterConfig::from_toml(&text).unwrap(), config);
//! ```

mod config;
mod error;
mod stage;

/// Description validation.
pub mod validation;

/// Factory descriptions bundled with the library.
pub mod factory;

pub use config::FilterConfig;
pub use error::ConfigError;
pub use factory::{FACTORY_NAMES, factory_config, factory_configs, is_factory};
pub use stage::{Combine, SectionConfig, StageConfig, StageForm};
pub use validation::{ValidationError, ValidationResult, validate_config, validate_stage};
