//! Factory filter descriptions bundled with the library.
//!
//! Always available without external files; they double as format examples
//! for each stage form.

use crate::config::FilterConfig;
use crate::error::ConfigError;

/// Names of the factory descriptions.
pub static FACTORY_NAMES: &[&str] = &["one_pole", "moving_average_5", "dc_blocker", "resonator"];

static FACTORY_TOML: &[(&str, &str)] = &[
    ("one_pole", ONE_POLE),
    ("moving_average_5", MOVING_AVERAGE_5),
    ("dc_blocker", DC_BLOCKER),
    ("resonator", RESONATOR),
];

/// One-pole lowpass smoother.
const ONE_POLE: &str = r#"
name = "one_pole"
description = "One-pole lowpass smoother, y[n] = 0.1 x[n] + 0.9 y[n-1]"

[[stages]]
form = "coefficients"
numerator = [0.1]
denominator = [1.0, -0.9]
"#;

/// Five-tap moving average.
const MOVING_AVERAGE_5: &str = r#"
name = "moving_average_5"
description = "Five-tap moving average, constant group delay of 2 samples"

[[stages]]
form = "coefficients"
numerator = [0.2, 0.2, 0.2, 0.2, 0.2]
"#;

/// DC blocker as a single section.
const DC_BLOCKER: &str = r#"
name = "dc_blocker"
description = "DC blocking highpass, zero at z = 1 and pole at z = 0.995"

[[stages]]
form = "sections"

[[stages.sections]]
numerator = [1.0, -1.0]
denominator = [1.0, -0.995]
"#;

/// Two-pole resonator at an eighth of the sample rate.
const RESONATOR: &str = r#"
name = "resonator"
description = "Two-pole resonator at pi/4 with zeros at DC and Nyquist"

[[stages]]
form = "zpk"
zeros = [[1.0, 0.0], [-1.0, 0.0]]
poles = [[0.6717514421272201, 0.6717514421272201], [0.6717514421272201, -0.6717514421272201]]
gain = 0.05
"#;

/// All factory descriptions.
pub fn factory_configs() -> Vec<FilterConfig> {
    FACTORY_TOML
        .iter()
        .filter_map(|(_, toml)| FilterConfig::from_toml(toml).ok())
        .collect()
}

/// A factory description by name (case-insensitive).
///
/// ```rust
/// use filtro_config::factory_config;
///
/// let config = factory_config("one_pole").unwrap();
/// let tf = config.build_transfer_function().unwrap();
/// assert_eq!(tf.denominator(), &[1.0, -0.9]);
/// ```
pub fn factory_config(name: &str) -> Result<FilterConfig, ConfigError> {
    let wanted = name.to_lowercase();
    FACTORY_TOML
        .iter()
        .find(|(key, _)| *key == wanted)
        .map(|(_, toml)| FilterConfig::from_toml(toml))
        .unwrap_or_else(|| Err(ConfigError::UnknownFactory(name.to_string())))
}

/// Returns `true` if `name` is a factory description.
pub fn is_factory(name: &str) -> bool {
    let wanted = name.to_lowercase();
    FACTORY_NAMES.iter().any(|n| *n == wanted)
}
