//! Single runs and buffer-capacity sweeps
//!
//! A sweep is nothing more than repeated calls to [`ProductionLine::run`] with
//! a different buffer-2 capacity each time. Every run gets a fresh engine.
//! When a seed is given, every run uses that same seed, so capacities are
//! compared on a common stream of random numbers.

use crate::simulation::engine::ProductionLine;
use crate::simulation::error::{SimulationError, SimulationResult};
use crate::simulation::report::SimulationReport;
use crate::simulation::statistics::RunStatistics;
use crate::types::{BufferSweep, LineConfig, SimulationConfig};
use tracing::{info, instrument};

/// Run one configuration once
pub fn run_single(config: &LineConfig, horizon: f64, seed: Option<u64>) -> SimulationResult<RunStatistics> {
    match seed {
        Some(seed) => ProductionLine::seeded(config.clone(), seed)?.run(horizon),
        None => ProductionLine::from_entropy(config.clone())?.run(horizon),
    }
}

/// Run `base` once per buffer-2 capacity in `sweep`
#[instrument(skip(base, sweep), fields(sweep = %sweep))]
pub fn run_buffer2_sweep(
    base: &LineConfig,
    sweep: &BufferSweep,
    horizon: f64,
    seed: Option<u64>,
) -> SimulationResult<SimulationReport> {
    sweep.validate()?;

    let capacities = sweep.capacities();
    info!("Sweeping buffer-2 capacity over {} values", capacities.len());

    let runs = capacities
        .into_iter()
        .map(|capacity| run_single(&base.with_buffer2_capacity(capacity), horizon, seed))
        .collect::<SimulationResult<Vec<_>>>()?;

    Ok(SimulationReport::new(horizon, seed, Some(*sweep), runs))
}

/// Execute whatever a validated [`SimulationConfig`] asks for
pub fn execute(config: &SimulationConfig) -> SimulationResult<SimulationReport> {
    config.validate()?;

    match &config.buffer2_sweep {
        Some(sweep) => run_buffer2_sweep(&config.line, sweep, config.horizon, config.seed),
        None => {
            let statistics = run_single(&config.line, config.horizon, config.seed)?;
            Ok(SimulationReport::new(config.horizon, config.seed, None, vec![statistics]))
        }
    }
}

impl SimulationReport {
    /// Run with the highest throughput, ties going to the smaller capacity
    pub fn best_throughput(&self) -> SimulationResult<&RunStatistics> {
        self.runs
            .iter()
            .reduce(|best, run| if run.throughput > best.throughput { run } else { best })
            .ok_or_else(|| SimulationError::report_error("report contains no runs"))
    }
}
