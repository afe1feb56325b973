//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use anyhow::Context;
use filtro_config::{FilterConfig, factory_config, is_factory};
use filtro_core::Complex64;

/// Load a filter description by factory name or path.
///
/// Factory names win over files of the same name.
pub fn load_config(name: &str) -> anyhow::Result<FilterConfig> {
    if is_factory(name) {
        return Ok(factory_config(name)?);
    }

    let path = Path::new(name);
    if path.exists() {
        return FilterConfig::load(path).with_context(|| format!("loading '{name}'"));
    }

    anyhow::bail!(
        "Filter '{}' not found. Use 'filtro factory' to see built-in filters.",
        name
    )
}

/// Parse whitespace-separated samples.
pub fn parse_samples(text: &str) -> anyhow::Result<Vec<f32>> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            token
                .parse::<f32>()
                .with_context(|| format!("sample {i}: cannot parse '{token}' as a number"))
        })
        .collect()
}

/// Format a complex value as `re+imi`, dropping a zero imaginary part.
pub fn format_complex(z: Complex64) -> String {
    if z.im == 0.0 {
        format!("{:.6}", z.re)
    } else {
        format!("{:.6}{:+.6}i", z.re, z.im)
    }
}

/// Format a coefficient list as `[a, b, c]`.
pub fn format_coefficients<T: std::fmt::Display>(values: &[T]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v}")).collect();
    format!("[{}]", parts.join(", "))
}
