//! Integration tests for filtro-config.
//!
//! File round trips, descriptions mixing every stage form, and factory
//! descriptions driven through the runtime filters.

use filtro_config::{
    Combine, ConfigError, FACTORY_NAMES, FilterConfig, StageConfig, factory_config,
    factory_configs,
};
use filtro_core::{Complex64, FilterStructure, Processor, TransferFunction};
use tempfile::TempDir;

const MIXED: &str = r#"
name = "mixed"
description = "Every stage form in one chain"
sample_rate = 44100

[[stages]]
form = "coefficients"
numerator = [1.0, 0.4]
denominator = [1.0, -0.6]

[[stages]]
combine = "parallel"
form = "coefficients"
numerator = [1.0, -0.1]

[[stages]]
form = "zpk"
zeros = [[-1.0, 0.0]]
poles = [[0.2, 0.3], [0.2, -0.3]]
gain = 0.5

[[stages]]
form = "state_space"
a = [[0.25]]
b = [1.0]
c = [0.5]
d = 1.0

[[stages]]
form = "sections"

[[stages.sections]]
numerator = [1.0, 0.0, -1.0]
denominator = [1.0, -0.5, 0.25]
"#;

#[test]
fn save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("filter.toml");

    let config = FilterConfig::from_toml(MIXED).unwrap();
    config.save(&path).unwrap();
    assert!(path.exists());

    let loaded = FilterConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn load_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");
    match FilterConfig::load(&path) {
        Err(ConfigError::ReadFile { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected ReadFile error, got {other:?}"),
    }
}

#[test]
fn mixed_description_matches_manual_algebra() {
    let config = FilterConfig::from_toml(MIXED).unwrap();
    assert_eq!(config.sample_rate, 44100);
    assert_eq!(config.len(), 5);
    assert_eq!(config.stages[1].combine, Combine::Parallel);

    let iir = TransferFunction::new(vec![1.0, 0.4], vec![1.0, -0.6]).unwrap();
    let fir = TransferFunction::fir(vec![1.0, -0.1]).unwrap();
    let zpk = TransferFunction::from_zpk(
        &[Complex64::new(-1.0, 0.0)],
        &[Complex64::new(0.2, 0.3), Complex64::new(0.2, -0.3)],
        0.5,
    )
    .unwrap();
    // a = 0.25, c = 0.5, d = 1: H = (z - 0.25 + 0.5) / (z - 0.25)
    let ss = TransferFunction::new(vec![1.0, 0.25], vec![1.0, -0.25]).unwrap();
    let section = TransferFunction::new(vec![1.0, 0.0, -1.0], vec![1.0, -0.5, 0.25]).unwrap();
    let expected = &(&(&(&iir + &fir) * &zpk) * &ss) * &section;

    let built = config.build_transfer_function().unwrap();
    assert_eq!(built.numerator().len(), expected.numerator().len());
    for (a, e) in built.numerator().iter().zip(expected.numerator()) {
        assert!((a - e).abs() < 1e-10);
    }
    for (a, e) in built.denominator().iter().zip(expected.denominator()) {
        assert!((a - e).abs() < 1e-10);
    }
}

#[test]
fn combined_description_saved_from_transfer_function() {
    let a = factory_config("one_pole").unwrap().build_transfer_function().unwrap();
    let b = factory_config("dc_blocker").unwrap().build_transfer_function().unwrap();
    let combined = &a * &b;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("combined.toml");
    FilterConfig::from_transfer_function("combined", &combined)
        .with_description("one_pole then dc_blocker")
        .save(&path)
        .unwrap();

    let rebuilt = FilterConfig::load(&path).unwrap().build_transfer_function().unwrap();
    assert_eq!(rebuilt, combined);
}

#[test]
fn factory_filters_process_finite_output() {
    assert_eq!(factory_configs().len(), FACTORY_NAMES.len());
    for config in factory_configs() {
        let mut filter = config.build_filter().unwrap();
        let mut buffer: Vec<f32> = (0..512).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
        filter.process_block_inplace(&mut buffer);
        assert!(
            buffer.iter().all(|s| s.is_finite()),
            "factory filter '{}' produced non-finite output",
            config.name
        );
    }
}

#[test]
fn one_pole_impulse() {
    let filter = factory_config("one_pole").unwrap().build_filter().unwrap();
    assert_eq!(filter.structure(), FilterStructure::Recursive);
    let out = filter.apply_block(&[1.0, 0.0, 0.0]);
    let expected = [0.1, 0.09, 0.081];
    for (o, e) in out.iter().zip(expected) {
        assert!((o - e).abs() < 1e-6);
    }
}

#[test]
fn invalid_file_is_a_validation_error() {
    let config = FilterConfig::from_toml(
        r#"
name = "bad"

[[stages]]
form = "zpk"
poles = [[0.5, 0.5]]
"#,
    )
    .unwrap();
    let err = config.build_filter().unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("stage 0"));
}

#[test]
fn stage_builder_matches_toml() {
    let built = FilterConfig::new("mixed")
        .with_stage(StageConfig::coefficients(vec![1.0, 0.4], vec![1.0, -0.6]))
        .with_stage(
            StageConfig::coefficients(vec![1.0, -0.1], vec![1.0]).with_combine(Combine::Parallel),
        );
    let parsed = FilterConfig::from_toml(
        r#"
name = "mixed"

[[stages]]
form = "coefficients"
numerator = [1.0, 0.4]
denominator = [1.0, -0.6]

[[stages]]
combine = "parallel"
form = "coefficients"
numerator = [1.0, -0.1]
"#,
    )
    .unwrap();
    assert_eq!(built, parsed);
}
