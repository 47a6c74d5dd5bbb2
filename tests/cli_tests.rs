//! Integration tests for the CLI application
//!
//! These tests run the compiled binary against a synthetic penguins file.

mod common;

use common::write_penguins;
use regsweep::SweepReport;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_regsweep"))
        .args(args)
        .output()
        .expect("Failed to run CLI binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["sweep", "fit", "inspect", "report"] {
        assert!(text.contains(command), "help lacks {command}: {text}");
    }
}

#[test]
fn test_inspect_command() {
    let dir = TempDir::new().unwrap();
    let data = write_penguins(dir.path());

    let output = run_cli(&["inspect", "--data", data.to_str().unwrap()]);
    assert!(output.status.success(), "inspect failed: {output:?}");

    let text = stdout(&output);
    assert!(text.contains("Samples: 90"));
    assert!(text.contains("Adelie: 60"));
    assert!(text.contains("Chinstrap: 30"));
    assert!(text.contains("train: 67"));
    assert!(text.contains("test: 23"));
}

#[test]
fn test_fit_command() {
    let dir = TempDir::new().unwrap();
    let data = write_penguins(dir.path());

    let output = run_cli(&["fit", "--data", data.to_str().unwrap(), "-C", "0.1"]);
    assert!(output.status.success(), "fit failed: {output:?}");

    let text = stdout(&output);
    assert!(text.contains("C = 0.1"));
    assert!(text.contains("Culmen Length (mm):"));
    assert!(text.contains("Test accuracy:"));
    assert!(text.contains("positive class Chinstrap"));
}

#[test]
fn test_fit_command_plots_boundary() {
    let dir = TempDir::new().unwrap();
    let data = write_penguins(dir.path());
    let figure = dir.path().join("boundary.svg");

    let output = run_cli(&[
        "fit",
        "--data",
        data.to_str().unwrap(),
        "--plot",
        figure.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "fit failed: {output:?}");

    let svg = std::fs::read_to_string(&figure).expect("Figure should exist");
    assert!(svg.contains("Culmen Length (mm)"));
    assert!(svg.contains("Culmen Depth (mm)"));
}

#[test]
fn test_sweep_writes_report() {
    let dir = TempDir::new().unwrap();
    let data = write_penguins(dir.path());
    let report_path = dir.path().join("sweep.json");

    let output = run_cli(&[
        "sweep",
        "--data",
        data.to_str().unwrap(),
        "--step",
        "0.1",
        "--no-plots",
        "--report",
        report_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "sweep failed: {output:?}");

    let text = stdout(&output);
    for label in ["C: 0.01", "C: 0.1", "C: 1", "C: 10"] {
        assert!(text.contains(label), "missing {label}: {text}");
    }

    let report = SweepReport::load_from_file(&report_path).expect("Report should load");
    assert_eq!(report.candidates.len(), 4);
    assert_eq!(report.metadata.n_test, 23);

    let output = run_cli(&["report", report_path.to_str().unwrap()]);
    assert!(output.status.success(), "report failed: {output:?}");
    assert!(stdout(&output).contains("Regularization Sweep Report"));
}

#[test]
fn test_sweep_custom_candidates() {
    let dir = TempDir::new().unwrap();
    let data = write_penguins(dir.path());
    let report_path = dir.path().join("sweep.json");

    let output = run_cli(&[
        "sweep",
        "--data",
        data.to_str().unwrap(),
        "--candidates",
        "0.5,5",
        "--step",
        "0.2",
        "--label-encoding",
        "per-call",
        "--no-plots",
        "--report",
        report_path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "sweep failed: {output:?}");

    let report = SweepReport::load_from_file(&report_path).unwrap();
    let labels: Vec<&str> = report.candidates.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["C: 0.5", "C: 5"]);
}

#[test]
fn test_invalid_inputs_fail() {
    let dir = TempDir::new().unwrap();
    let data = write_penguins(dir.path());
    let data = data.to_str().unwrap();

    let missing = dir.path().join("missing.csv");
    let output = run_cli(&["inspect", "--data", missing.to_str().unwrap()]);
    assert!(!output.status.success());

    let output = run_cli(&["sweep", "--data", data, "--candidates", "0,1", "--no-plots"]);
    assert!(!output.status.success());

    let output = run_cli(&["inspect", "--data", data, "--test-fraction", "1.5"]);
    assert!(!output.status.success());
}
