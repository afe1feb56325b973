//! Integration tests for filtro-cli.
//!
//! Tests invoke the built binary against factory filters and temporary
//! description files.

use std::io::Write;
use std::process::{Command, Stdio};

use filtro_config::FilterConfig;

/// Helper to get the path to the `filtro` binary built by cargo.
fn filtro_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_filtro"))
}

fn stdout_of(args: &[&str]) -> String {
    let output = filtro_bin()
        .args(args)
        .output()
        .expect("failed to run filtro");
    assert!(
        output.status.success(),
        "filtro {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Last whitespace-separated column of each non-empty line, parsed as f64.
fn last_column(stdout: &str) -> Vec<f64> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().last())
        .map(|token| token.parse().expect("numeric output"))
        .collect()
}

// ---------------------------------------------------------------------------
// `filtro factory`
// ---------------------------------------------------------------------------

#[test]
fn cli_factory_lists_all_filters() {
    let stdout = stdout_of(&["factory"]);
    assert!(stdout.contains("Factory filters"));
    for name in filtro_config::FACTORY_NAMES {
        assert!(stdout.contains(name), "listing should contain '{name}'");
    }
}

#[test]
fn cli_factory_prints_loadable_toml() {
    let stdout = stdout_of(&["factory", "resonator"]);
    let config = FilterConfig::from_toml(&stdout).unwrap();
    assert_eq!(config.name, "resonator");
    assert_eq!(config.build_transfer_function().unwrap().order(), 2);
}

#[test]
fn cli_factory_unknown_name_fails() {
    let output = filtro_bin()
        .args(["factory", "no_such_filter"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no_such_filter"));
}

// ---------------------------------------------------------------------------
// `filtro info`
// ---------------------------------------------------------------------------

#[test]
fn cli_info_reports_structure_and_poles() {
    let stdout = stdout_of(&["info", "one_pole"]);
    assert!(stdout.contains("IIR (order 1)"));
    assert!(stdout.contains("Poles:"));
    assert!(stdout.contains("0.900000"));
    assert!(stdout.contains("Stable:      yes"));
}

#[test]
fn cli_info_json_is_parseable() {
    let stdout = stdout_of(&["info", "moving_average_5", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["structure"], "fir");
    assert_eq!(report["numerator"].as_array().unwrap().len(), 5);
    assert_eq!(report["stable"], true);
}

#[test]
fn cli_missing_filter_fails() {
    let output = filtro_bin()
        .args(["info", "/nonexistent/filter.toml"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

// ---------------------------------------------------------------------------
// `filtro impulse` / `filtro run` / `filtro response`
// ---------------------------------------------------------------------------

#[test]
fn cli_impulse_one_pole_decays_geometrically() {
    for extra in [&[][..], &["--streaming"][..]] {
        let mut args = vec!["impulse", "one_pole", "--length", "4"];
        args.extend_from_slice(extra);
        let h = last_column(&stdout_of(&args));
        assert_eq!(h.len(), 4);
        for (n, value) in h.iter().enumerate() {
            let expected = 0.1 * 0.9f64.powi(n as i32);
            assert!((value - expected).abs() < 1e-6, "h[{n}] = {value}");
        }
    }
}

#[test]
fn cli_run_reads_stdin() {
    let mut child = filtro_bin()
        .args(["run", "moving_average_5", "--streaming"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"1 1 1\n1 1 1\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let y = last_column(&String::from_utf8_lossy(&output.stdout));
    let expected = [0.2, 0.4, 0.6, 0.8, 1.0, 1.0];
    assert_eq!(y.len(), expected.len());
    for (got, want) in y.iter().zip(expected) {
        assert!((got - want).abs() < 1e-6);
    }
}

#[test]
fn cli_run_reads_input_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("input.txt");
    std::fs::write(&path, "1 0 0 0").unwrap();

    let y = last_column(&stdout_of(&[
        "run",
        "dc_blocker",
        "--input",
        path.to_str().unwrap(),
    ]));
    assert_eq!(y.len(), 4);
    assert!((y[0] - 1.0).abs() < 1e-6);
    assert!((y[1] - (-0.005)).abs() < 1e-6);
}

#[test]
fn cli_run_rejects_bad_sample() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("input.txt");
    std::fs::write(&path, "1 abc").unwrap();

    let output = filtro_bin()
        .args(["run", "one_pole", "--input", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("abc"));
}

#[test]
fn cli_response_dc_gain_of_moving_average() {
    let stdout = stdout_of(&["response", "moving_average_5", "--points", "5"]);
    let rows: Vec<Vec<f64>> = stdout
        .lines()
        .skip(1)
        .map(|line| {
            line.split_whitespace()
                .map(|t| t.parse().unwrap())
                .collect()
        })
        .collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0][0], 0.0);
    assert!((rows[0][1] - 1.0).abs() < 1e-6);
    assert!((rows[4][0] - 24000.0).abs() < 1e-6);
    for row in &rows {
        assert!((row[3] - 2.0).abs() < 1e-6, "group delay {}", row[3]);
    }
}

// ---------------------------------------------------------------------------
// `filtro combine`
// ---------------------------------------------------------------------------

#[test]
fn cli_combine_parallel_prints_combined_description() {
    let stdout = stdout_of(&["combine", "one_pole", "moving_average_5", "--mode", "parallel"]);
    let config = FilterConfig::from_toml(&stdout).unwrap();
    let tf = config.build_transfer_function().unwrap();

    assert_eq!(tf.denominator(), &[1.0, -0.9]);
    assert!((tf.numerator()[0] - 0.3).abs() < 1e-12);
    assert!(config.description.unwrap().contains("parallel"));
}

#[test]
fn cli_combine_saves_to_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("out").join("chain.toml");

    stdout_of(&[
        "combine",
        "dc_blocker",
        "one_pole",
        "--output",
        path.to_str().unwrap(),
    ]);

    let config = FilterConfig::load(&path).unwrap();
    let tf = config.build_transfer_function().unwrap();
    assert_eq!(tf.order(), 2);
    assert_eq!(config.sample_rate, 48000);
}

#[test]
fn cli_help_works() {
    let stdout = stdout_of(&["--help"]);
    for command in ["info", "response", "impulse", "run", "combine", "factory"] {
        assert!(stdout.contains(command));
    }
}
