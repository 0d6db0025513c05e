//! Configuration structures for the production line simulator
//!
//! This module contains the per-run line configuration, the whole-program
//! simulation configuration and the validation logic that guards both.

use super::OutputFormat;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Default parameters of the modelled line
pub mod defaults {
    /// Mean time between arrivals
    pub const MEAN_ARRIVAL_TIME: f64 = 0.4;

    /// Mean service time at station 1
    pub const MEAN_SERVICE_TIME_1: f64 = 1.25;

    /// Mean service time at station 2
    pub const MEAN_SERVICE_TIME_2: f64 = 0.5;

    /// Waiting places in front of station 1
    pub const BUFFER1_CAPACITY: usize = 4;

    /// Waiting places in front of station 2
    pub const BUFFER2_CAPACITY: usize = 2;

    /// Simulated time span of a run
    pub const HORIZON: f64 = 1000.0;
}

/// Immutable configuration of one engine run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    /// Mean time between arrivals
    pub mean_arrival_time: f64,
    /// Mean service time at station 1
    pub mean_service_time1: f64,
    /// Mean service time at station 2
    pub mean_service_time2: f64,
    /// Waiting places in front of station 1
    pub buffer1_capacity: usize,
    /// Waiting places in front of station 2
    pub buffer2_capacity: usize,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            mean_arrival_time: defaults::MEAN_ARRIVAL_TIME,
            mean_service_time1: defaults::MEAN_SERVICE_TIME_1,
            mean_service_time2: defaults::MEAN_SERVICE_TIME_2,
            buffer1_capacity: defaults::BUFFER1_CAPACITY,
            buffer2_capacity: defaults::BUFFER2_CAPACITY,
        }
    }
}

impl LineConfig {
    /// Create a configuration from its five parameters
    pub fn new(
        mean_arrival_time: f64,
        mean_service_time1: f64,
        mean_service_time2: f64,
        buffer1_capacity: usize,
        buffer2_capacity: usize,
    ) -> Self {
        Self {
            mean_arrival_time,
            mean_service_time1,
            mean_service_time2,
            buffer1_capacity,
            buffer2_capacity,
        }
    }

    /// Same configuration with a different buffer-2 capacity
    pub fn with_buffer2_capacity(&self, buffer2_capacity: usize) -> Self {
        Self { buffer2_capacity, ..self.clone() }
    }

    /// Validate the mean times
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        validate_mean("mean_arrival_time", self.mean_arrival_time)?;
        validate_mean("mean_service_time1", self.mean_service_time1)?;
        validate_mean("mean_service_time2", self.mean_service_time2)?;
        Ok(())
    }
}

fn validate_mean(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigValidationError::InvalidMeanTime { field: field.to_string(), value });
    }
    Ok(())
}

/// Check that a horizon is usable for a run
pub fn validate_horizon(horizon: f64) -> Result<(), ConfigValidationError> {
    if !horizon.is_finite() || horizon < 0.0 {
        return Err(ConfigValidationError::InvalidHorizon(horizon));
    }
    Ok(())
}

/// Range of buffer-2 capacities to sweep over, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferSweep {
    /// First capacity
    pub start: usize,
    /// Last capacity
    pub end: usize,
    /// Distance between consecutive capacities
    pub step: usize,
}

impl BufferSweep {
    /// Create a sweep with unit step
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end, step: 1 }
    }

    /// Set the step
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Validate the range and step
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.step == 0 {
            return Err(ConfigValidationError::InvalidSweepStep(self.step));
        }
        if self.start > self.end {
            return Err(ConfigValidationError::InvalidSweepRange(self.start, self.end));
        }
        Ok(())
    }

    /// Capacities covered by the sweep
    pub fn capacities(&self) -> Vec<usize> {
        if self.step == 0 || self.start > self.end {
            return Vec::new();
        }
        (self.start..=self.end).step_by(self.step).collect()
    }
}

impl fmt::Display for BufferSweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.end, self.step)
    }
}

impl FromStr for BufferSweep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let parse = |part: &str| {
            part.parse::<usize>()
                .map_err(|e| format!("Invalid sweep bound '{}' in '{}': {}", part, s, e))
        };

        match parts.as_slice() {
            [start, end] => Ok(Self::new(parse(start)?, parse(end)?)),
            [start, end, step] => Ok(Self::new(parse(start)?, parse(end)?).with_step(parse(step)?)),
            _ => Err(format!("Invalid sweep '{}': expected START:END or START:END:STEP", s)),
        }
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "production-line-simulator",
    version = "0.1.0",
    about = "Production Line Simulator - Discrete-event model of a two-station line with finite buffers",
    long_about = "Simulates items arriving at random, passing through two stations separated by bounded buffers, and blocking station 1 when buffer 2 is full. Reports throughput, utilization and sojourn time for one configuration or a sweep over buffer-2 capacities.

EXAMPLES:
    # Run with default settings
    production-line-simulator

    # Use a configuration file
    production-line-simulator --config line.json

    # Override specific settings
    production-line-simulator --horizon 5000 --buffer2-capacity 5 --seed 42

    # Compare buffer-2 capacities 0 through 10
    production-line-simulator --sweep-buffer2 0:10 --format csv

    # Generate configuration template
    production-line-simulator --print-config > my-line.json

    # Validate configuration without running
    production-line-simulator --config my-line.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Simulated time span
    #[arg(
        long,
        help = "Simulated time span",
        long_help = "Length of the simulated run in model time units. Must be finite and not negative. Default: 1000"
    )]
    pub horizon: Option<f64>,

    /// Mean time between arrivals
    #[arg(long, help = "Mean inter-arrival time")]
    pub mean_arrival_time: Option<f64>,

    /// Mean service time at station 1
    #[arg(long, help = "Mean service time at station 1")]
    pub mean_service_time1: Option<f64>,

    /// Mean service time at station 2
    #[arg(long, help = "Mean service time at station 2")]
    pub mean_service_time2: Option<f64>,

    /// Waiting places in front of station 1
    #[arg(long, help = "Buffer capacity in front of station 1")]
    pub buffer1_capacity: Option<usize>,

    /// Waiting places in front of station 2
    #[arg(long, help = "Buffer capacity in front of station 2")]
    pub buffer2_capacity: Option<usize>,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Sweep buffer-2 capacity over a range
    #[arg(
        long,
        value_name = "START:END[:STEP]",
        help = "Sweep buffer-2 capacity over a range",
        long_help = "Run once per buffer-2 capacity in START..=END (optionally every STEP) and report the runs side by side. Overrides --buffer2-capacity."
    )]
    pub sweep_buffer2: Option<BufferSweep>,

    /// Output format for the report
    #[arg(
        long,
        help = "Output format (text, json or csv)",
        long_help = "Output format for the report. Supported formats: text, json, csv. Default: text"
    )]
    pub format: Option<String>,

    /// Output file for the report
    #[arg(short, long, help = "Write the report to a file instead of stdout")]
    pub output: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Simulated time span
    pub horizon: Option<f64>,

    /// Mean time between arrivals
    pub mean_arrival_time: Option<f64>,

    /// Mean service time at station 1
    pub mean_service_time1: Option<f64>,

    /// Mean service time at station 2
    pub mean_service_time2: Option<f64>,

    /// Waiting places in front of station 1
    pub buffer1_capacity: Option<usize>,

    /// Waiting places in front of station 2
    pub buffer2_capacity: Option<usize>,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Buffer-2 capacity sweep
    pub buffer2_sweep: Option<BufferSweep>,

    /// Output format for the report
    pub output_format: Option<String>,

    /// Output file for the report
    pub output: Option<String>,
}

/// Configuration for a simulator invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Line parameters, stored flat so saved files load back through [`ConfigFile`]
    #[serde(flatten)]
    pub line: LineConfig,

    /// Simulated time span
    pub horizon: f64,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Buffer-2 capacity sweep, if the run compares capacities
    pub buffer2_sweep: Option<BufferSweep>,

    /// Output format for the report
    pub output_format: String,

    /// Output file for the report
    pub output: Option<String>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    /// A mean time is not a positive finite number
    #[error("Invalid mean time for {field}: {value} (must be a positive finite number)")]
    InvalidMeanTime {
        /// Name of the offending field
        field: String,
        /// The invalid value
        value: f64,
    },

    /// Horizon is negative or not finite
    #[error("Horizon must be a finite number >= 0, got {0}")]
    InvalidHorizon(f64),

    /// Sweep step is zero
    #[error("Sweep step must be greater than 0, got {0}")]
    InvalidSweepStep(usize),

    /// Sweep range is reversed
    #[error("Invalid sweep range: start ({0}) must be <= end ({1})")]
    InvalidSweepRange(usize, usize),

    /// Output format is not recognised
    #[error("Unknown output format: {0} (supported: text, json, csv)")]
    InvalidOutputFormat(String),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            line: LineConfig::default(),
            horizon: defaults::HORIZON,
            seed: None,
            buffer2_sweep: None,
            output_format: "text".to_string(),
            output: None,
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // CLI takes precedence over the file
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            line: LineConfig {
                mean_arrival_time: config_file
                    .mean_arrival_time
                    .unwrap_or(defaults.line.mean_arrival_time),
                mean_service_time1: config_file
                    .mean_service_time1
                    .unwrap_or(defaults.line.mean_service_time1),
                mean_service_time2: config_file
                    .mean_service_time2
                    .unwrap_or(defaults.line.mean_service_time2),
                buffer1_capacity: config_file
                    .buffer1_capacity
                    .unwrap_or(defaults.line.buffer1_capacity),
                buffer2_capacity: config_file
                    .buffer2_capacity
                    .unwrap_or(defaults.line.buffer2_capacity),
            },
            horizon: config_file.horizon.unwrap_or(defaults.horizon),
            seed: config_file.seed.or(defaults.seed),
            buffer2_sweep: config_file.buffer2_sweep.or(defaults.buffer2_sweep),
            output_format: config_file.output_format.unwrap_or(defaults.output_format),
            output: config_file.output.or(defaults.output),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.horizon {
            config.horizon = value;
        }
        if let Some(value) = args.mean_arrival_time {
            config.line.mean_arrival_time = value;
        }
        if let Some(value) = args.mean_service_time1 {
            config.line.mean_service_time1 = value;
        }
        if let Some(value) = args.mean_service_time2 {
            config.line.mean_service_time2 = value;
        }
        if let Some(value) = args.buffer1_capacity {
            config.line.buffer1_capacity = value;
        }
        if let Some(value) = args.buffer2_capacity {
            config.line.buffer2_capacity = value;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if let Some(value) = args.sweep_buffer2 {
            config.buffer2_sweep = Some(value);
        }
        if let Some(value) = args.format {
            config.output_format = value;
        }
        if let Some(value) = args.output {
            config.output = Some(value);
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.line.validate()?;
        validate_horizon(self.horizon)?;

        if let Some(sweep) = &self.buffer2_sweep {
            sweep.validate()?;
        }

        self.get_output_format()?;

        Ok(())
    }

    /// Get the output format as an enum value
    pub fn get_output_format(&self) -> Result<OutputFormat, ConfigValidationError> {
        self.output_format
            .parse::<OutputFormat>()
            .map_err(|_| ConfigValidationError::InvalidOutputFormat(self.output_format.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs::try_parse_from(["test"]).unwrap()
    }

    #[test]
    fn test_simulation_config_default() {
        let config = SimulationConfig::default();

        assert_eq!(config.line.mean_arrival_time, 0.4);
        assert_eq!(config.line.mean_service_time1, 1.25);
        assert_eq!(config.line.mean_service_time2, 0.5);
        assert_eq!(config.line.buffer1_capacity, 4);
        assert_eq!(config.line.buffer2_capacity, 2);
        assert_eq!(config.horizon, 1000.0);
        assert!(config.seed.is_none());
        assert!(config.buffer2_sweep.is_none());
        assert_eq!(config.output_format, "text");
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_line_config_rejects_non_positive_means() {
        let mut line = LineConfig::default();
        line.mean_service_time1 = 0.0;
        match line.validate() {
            Err(ConfigValidationError::InvalidMeanTime { field, value }) => {
                assert_eq!(field, "mean_service_time1");
                assert_eq!(value, 0.0);
            }
            other => panic!("Expected InvalidMeanTime error, got {:?}", other),
        }

        let mut line = LineConfig::default();
        line.mean_arrival_time = -1.0;
        assert!(line.validate().is_err());

        let mut line = LineConfig::default();
        line.mean_service_time2 = f64::NAN;
        assert!(line.validate().is_err());

        let mut line = LineConfig::default();
        line.mean_service_time2 = f64::INFINITY;
        assert!(line.validate().is_err());
    }

    #[test]
    fn test_horizon_validation() {
        assert!(validate_horizon(0.0).is_ok());
        assert!(validate_horizon(1000.0).is_ok());
        assert_eq!(validate_horizon(-1.0), Err(ConfigValidationError::InvalidHorizon(-1.0)));
        assert!(validate_horizon(f64::NAN).is_err());
        assert!(validate_horizon(f64::INFINITY).is_err());
    }

    #[test]
    fn test_with_buffer2_capacity() {
        let line = LineConfig::default().with_buffer2_capacity(9);
        assert_eq!(line.buffer2_capacity, 9);
        assert_eq!(line.buffer1_capacity, 4);
    }

    #[test]
    fn test_buffer_sweep_parsing() {
        assert_eq!("0:5".parse::<BufferSweep>().unwrap(), BufferSweep::new(0, 5));
        assert_eq!("1:9:2".parse::<BufferSweep>().unwrap(), BufferSweep::new(1, 9).with_step(2));
        assert!("5".parse::<BufferSweep>().is_err());
        assert!("a:b".parse::<BufferSweep>().is_err());
        assert!("1:2:3:4".parse::<BufferSweep>().is_err());
    }

    #[test]
    fn test_buffer_sweep_capacities() {
        assert_eq!(BufferSweep::new(0, 3).capacities(), vec![0, 1, 2, 3]);
        assert_eq!(BufferSweep::new(1, 9).with_step(4).capacities(), vec![1, 5, 9]);
        assert_eq!(BufferSweep::new(2, 2).capacities(), vec![2]);
        assert!(BufferSweep::new(3, 1).capacities().is_empty());
        assert!(BufferSweep::new(0, 3).with_step(0).capacities().is_empty());
    }

    #[test]
    fn test_buffer_sweep_validation() {
        assert!(BufferSweep::new(0, 10).validate().is_ok());
        assert_eq!(
            BufferSweep::new(0, 10).with_step(0).validate(),
            Err(ConfigValidationError::InvalidSweepStep(0))
        );
        assert_eq!(
            BufferSweep::new(5, 1).validate(),
            Err(ConfigValidationError::InvalidSweepRange(5, 1))
        );
    }

    #[test]
    fn test_config_file_loading() {
        use std::io::Write;
        use tempfile::Builder;

        let mut temp_file = Builder::new().suffix(".json").tempfile().unwrap();
        let config_json = r#"{
            "horizon": 250.0,
            "mean_arrival_time": 0.5,
            "buffer2_capacity": 7,
            "seed": 12345,
            "buffer2_sweep": { "start": 0, "end": 4, "step": 2 },
            "output_format": "json"
        }"#;

        temp_file.write_all(config_json.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = SimulationConfig::from_file(temp_file.path()).unwrap();

        assert_eq!(config.horizon, 250.0);
        assert_eq!(config.line.mean_arrival_time, 0.5);
        assert_eq!(config.line.buffer2_capacity, 7);
        assert_eq!(config.seed, Some(12345));
        assert_eq!(config.buffer2_sweep, Some(BufferSweep::new(0, 4).with_step(2)));
        assert_eq!(config.output_format, "json");
        // Unset fields keep their defaults
        assert_eq!(config.line.mean_service_time1, 1.25);
        assert_eq!(config.line.buffer1_capacity, 4);
    }

    #[test]
    fn test_config_file_errors() {
        assert!(matches!(
            SimulationConfig::from_file("/definitely/not/here.json"),
            Err(ConfigError::FileNotFound(_))
        ));

        let temp_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            SimulationConfig::from_file(temp_file.path()),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let mut args = empty_args();
        args.horizon = Some(500.0);
        args.buffer1_capacity = Some(1);
        args.mean_service_time2 = Some(0.75);
        args.seed = Some(54321);
        args.format = Some("csv".to_string());

        let config = SimulationConfig::from_cli_args(args).unwrap();

        assert_eq!(config.horizon, 500.0);
        assert_eq!(config.line.buffer1_capacity, 1);
        assert_eq!(config.line.mean_service_time2, 0.75);
        assert_eq!(config.seed, Some(54321));
        assert_eq!(config.output_format, "csv");
        // Default values should remain for non-overridden fields
        assert_eq!(config.line.buffer2_capacity, 2);
        assert_eq!(config.line.mean_arrival_time, 0.4);
    }

    #[test]
    fn test_output_format_validation() {
        let mut config = SimulationConfig::default();
        config.output_format = "xml".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidOutputFormat("xml".to_string()))
        );

        config.output_format = "JSON".to_string();
        assert_eq!(config.get_output_format(), Ok(OutputFormat::Json));
    }

    #[test]
    fn test_print_json_round_trips() {
        let config = SimulationConfig::default();
        let json = config.print_json().unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.json");

        let mut config = SimulationConfig::default();
        config.line.buffer2_capacity = 6;
        config.seed = Some(3);
        config.buffer2_sweep = Some(BufferSweep::new(0, 2));
        config.save_to_file(&path).unwrap();

        assert_eq!(SimulationConfig::from_file(&path).unwrap(), config);
    }
}
