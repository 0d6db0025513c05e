// Production Line Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/production-line-simulator
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/production-line-simulator --horizon 5000 --sweep-buffer2 0:10 --seed 42 --verbose
// ```

use anyhow::Context;
use clap::Parser;
use production_line_simulator::simulation::{
    execute, LoggingConfig, LoggingGuard, SimulationError, SimulationReport,
};
use production_line_simulator::types::{CliArgs, OutputFormat, SimulationConfig};
use std::process;
use std::time::Instant;
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let _logging_guard = match init_logging(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Production Line Simulator");

    if let Err(e) = run(args) {
        error!(category = failure_category(&e), "Simulation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    info!("Production Line Simulator completed successfully");
}

fn init_logging(args: &CliArgs) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
    if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        LoggingConfig::init_quiet()
    }
}

/// Load, validate, run and report
fn run(args: CliArgs) -> anyhow::Result<()> {
    let dry_run = args.dry_run;

    let config = SimulationConfig::from_cli_args(args)
        .map_err(SimulationError::from)
        .context("Failed to load configuration")?;
    config
        .validate()
        .map_err(SimulationError::from)
        .context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return Ok(());
    }

    print_configuration_summary(&config);

    let start_time = Instant::now();
    let report = execute(&config).context("Simulation run failed")?;
    info!(
        "Completed {} run(s) in {:.2?} (report {})",
        report.runs.len(),
        start_time.elapsed(),
        report.report_id
    );

    if report.runs.len() > 1 {
        let best = report.best_throughput()?;
        info!(
            "Best throughput {:.4} at buffer-2 capacity {}",
            best.throughput,
            best.buffer2_capacity()
        );
    }

    let format = config.get_output_format()?;
    emit_report(&report, format, config.output.as_deref())
}

/// Failure class of the first [`SimulationError`] in the error chain
fn failure_category(error: &anyhow::Error) -> &'static str {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<SimulationError>())
        .map_or("Unknown", SimulationError::category)
}

fn emit_report(report: &SimulationReport, format: OutputFormat, output: Option<&str>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            report
                .write_to_file(path, format)
                .with_context(|| format!("Failed to write report to '{}'", path))?;
            eprintln!("Report written to: {}", path);
        }
        None => {
            let rendered = report.render(format).context("Failed to render report")?;
            println!("{}", rendered);
        }
    }
    Ok(())
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Horizon: {}", config.horizon);
    eprintln!("  Mean Inter-arrival Time: {}", config.line.mean_arrival_time);
    eprintln!("  Mean Service Time (Station 1): {}", config.line.mean_service_time1);
    eprintln!("  Mean Service Time (Station 2): {}", config.line.mean_service_time2);
    eprintln!("  Buffer 1 Capacity: {}", config.line.buffer1_capacity);
    match &config.buffer2_sweep {
        Some(sweep) => eprintln!("  Buffer 2 Capacity: sweep {}", sweep),
        None => eprintln!("  Buffer 2 Capacity: {}", config.line.buffer2_capacity),
    }
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}
