//! Filter description file format and operations.

use std::path::Path;

use filtro_core::{Connection, LtiFilter, TransferFunction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::stage::{Combine, StageConfig};
use crate::validation::validate_config;

/// A filter described as a chain of stages.
///
/// Stages are folded left to right: each one is combined with everything
/// before it, in series or in parallel according to its `combine` field.
///
/// # TOML Format
///
/// ```toml
/// name = "warm-lowpass"
/// description = "One-pole smoother with a notch"
/// sample_rate = 48000
/// normalize = true
///
/// [[stages]]
/// form = "coefficients"
/// numerator = [0.1]
/// denominator = [1.0, -0.9]
///
/// [[stages]]
/// combine = "series"
/// form = "zpk"
/// zeros = [[0.0, 1.0], [0.0, -1.0]]
/// poles = []
/// gain = 0.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Name of the filter.
    pub name: String,

    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint in Hz; used for frequency axes, never by the filter.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Divide the built transfer function by its leading denominator coefficient.
    #[serde(default = "default_normalize")]
    pub normalize: bool,

    /// Stages in combination order.
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

fn default_sample_rate() -> u32 {
    48000
}

fn default_normalize() -> bool {
    true
}

impl FilterConfig {
    /// Create a new description with no stages.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            normalize: default_normalize(),
            stages: Vec::new(),
        }
    }

    /// Describes an existing transfer function as a single coefficient stage.
    pub fn from_transfer_function(name: impl Into<String>, tf: &TransferFunction) -> Self {
        Self::new(name).with_stage(StageConfig::coefficients(
            tf.numerator().to_vec(),
            tf.denominator().to_vec(),
        ))
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Enable or disable normalization after building.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Append a stage.
    pub fn with_stage(mut self, stage: StageConfig) -> Self {
        self.stages.push(stage);
        self
    }

    /// Load a description from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), name = %config.name, stages = config.stages.len(), "loaded filter description");
        Ok(config)
    }

    /// Parse a description from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the description to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        debug!(path = %path.display(), name = %self.name, "saved filter description");
        Ok(())
    }

    /// Render the description as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the description and folds its stages into one transfer function.
    pub fn build_transfer_function(&self) -> Result<TransferFunction, ConfigError> {
        validate_config(self)?;

        let mut stages = self.stages.iter();
        let Some(first) = stages.next() else {
            return Err(crate::validation::ValidationError::NoStages.into());
        };
        let mut tf = first.transfer_function()?;
        for stage in stages {
            let next = stage.transfer_function()?;
            tf = Connection::from(stage.combine).combine(&tf, &next);
        }
        if self.normalize {
            tf.normalize()?;
        }

        debug!(
            name = %self.name,
            stages = self.stages.len(),
            order = tf.order(),
            "built transfer function"
        );
        Ok(tf)
    }

    /// Builds and realizes the filter.
    pub fn build_filter(&self) -> Result<LtiFilter, ConfigError> {
        Ok(LtiFilter::from_transfer_function(self.build_transfer_function()?))
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if there are no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Number of stages joined in parallel.
    pub fn parallel_stages(&self) -> usize {
        self.stages
            .iter()
            .skip(1)
            .filter(|s| s.combine == Combine::Parallel)
            .count()
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
