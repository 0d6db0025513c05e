//! Tests for CLI argument parsing functionality
//!
//! These tests verify that command line arguments are properly parsed and
//! merged over configuration files and defaults.

use production_line_simulator::types::config::{BufferSweep, CliArgs, SimulationConfig};
use production_line_simulator::types::OutputFormat;
use clap::Parser;
use std::io::Write;

/// Test parsing with no arguments
#[test]
fn test_defaults_when_no_arguments() {
    let cli_args = CliArgs::try_parse_from(["test"]).unwrap();
    assert!(cli_args.horizon.is_none());
    assert!(cli_args.sweep_buffer2.is_none());
    assert!(!cli_args.verbose);
    assert!(!cli_args.dry_run);

    let config = SimulationConfig::from_cli_args(cli_args).unwrap();
    assert_eq!(config, SimulationConfig::default());
    config.validate().unwrap();
}

/// Test parsing of the line parameters
#[test]
fn test_line_parameter_parsing() {
    let args = [
        "test",
        "--horizon",
        "250.5",
        "--mean-arrival-time",
        "0.8",
        "--mean-service-time1",
        "1.5",
        "--mean-service-time2",
        "0.25",
        "--buffer1-capacity",
        "0",
        "--buffer2-capacity",
        "12",
        "--seed",
        "42",
    ];
    let config = SimulationConfig::from_cli_args(CliArgs::try_parse_from(args).unwrap()).unwrap();

    assert_eq!(config.horizon, 250.5);
    assert_eq!(config.line.mean_arrival_time, 0.8);
    assert_eq!(config.line.mean_service_time1, 1.5);
    assert_eq!(config.line.mean_service_time2, 0.25);
    assert_eq!(config.line.buffer1_capacity, 0);
    assert_eq!(config.line.buffer2_capacity, 12);
    assert_eq!(config.seed, Some(42));
}

/// Test the buffer sweep argument
#[test]
fn test_sweep_argument_parsing() {
    let cli_args = CliArgs::try_parse_from(["test", "--sweep-buffer2", "0:10"]).unwrap();
    assert_eq!(cli_args.sweep_buffer2, Some(BufferSweep::new(0, 10)));

    let cli_args = CliArgs::try_parse_from(["test", "--sweep-buffer2", "2:8:3"]).unwrap();
    assert_eq!(cli_args.sweep_buffer2, Some(BufferSweep::new(2, 8).with_step(3)));

    assert!(CliArgs::try_parse_from(["test", "--sweep-buffer2", "ten"]).is_err());
    assert!(CliArgs::try_parse_from(["test", "--sweep-buffer2", "1"]).is_err());
}

/// Reversed sweeps parse but fail validation
#[test]
fn test_invalid_sweep_fails_validation() {
    let cli_args = CliArgs::try_parse_from(["test", "--sweep-buffer2", "5:1"]).unwrap();
    let config = SimulationConfig::from_cli_args(cli_args).unwrap();
    assert!(config.validate().is_err());
}

/// Test rejected values for means and horizon
#[test]
fn test_invalid_values_fail_validation() {
    let cli_args = CliArgs::try_parse_from(["test", "--mean-arrival-time", "0"]).unwrap();
    let config = SimulationConfig::from_cli_args(cli_args).unwrap();
    assert!(config.validate().is_err());

    let cli_args = CliArgs::try_parse_from(["test", "--horizon=-10"]).unwrap();
    let config = SimulationConfig::from_cli_args(cli_args).unwrap();
    assert!(config.validate().is_err());

    // Negative capacities are rejected by the parser itself
    assert!(CliArgs::try_parse_from(["test", "--buffer1-capacity", "-1"]).is_err());
}

/// Test output options
#[test]
fn test_output_arguments() {
    let args = ["test", "--format", "csv", "-o", "results.csv", "-v"];
    let cli_args = CliArgs::try_parse_from(args).unwrap();
    assert!(cli_args.verbose);

    let config = SimulationConfig::from_cli_args(cli_args).unwrap();
    assert_eq!(config.get_output_format().unwrap(), OutputFormat::Csv);
    assert_eq!(config.output.as_deref(), Some("results.csv"));

    let cli_args = CliArgs::try_parse_from(["test", "--format", "yaml"]).unwrap();
    let config = SimulationConfig::from_cli_args(cli_args).unwrap();
    assert!(config.validate().is_err());
}

/// Test flags
#[test]
fn test_flag_parsing() {
    let cli_args = CliArgs::try_parse_from(["test", "--dry-run", "--print-config", "-d"]).unwrap();
    assert!(cli_args.dry_run);
    assert!(cli_args.print_config);
    assert!(cli_args.debug);
}

/// CLI values win over the configuration file
#[test]
fn test_cli_overrides_config_file() {
    let mut temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    temp_file
        .write_all(br#"{ "horizon": 50.0, "buffer1_capacity": 9, "seed": 1 }"#)
        .unwrap();
    temp_file.flush().unwrap();

    let path = temp_file.path().to_str().unwrap();
    let cli_args = CliArgs::try_parse_from(["test", "--config", path, "--seed", "2"]).unwrap();
    let config = SimulationConfig::from_cli_args(cli_args).unwrap();

    assert_eq!(config.horizon, 50.0);
    assert_eq!(config.line.buffer1_capacity, 9);
    assert_eq!(config.seed, Some(2));
}

/// A missing configuration file is reported
#[test]
fn test_missing_config_file() {
    let cli_args = CliArgs::try_parse_from(["test", "-c", "/no/such/line.json"]).unwrap();
    assert!(SimulationConfig::from_cli_args(cli_args).is_err());
}
