//! Report rendering
//!
//! A [`SimulationReport`] bundles the statistics of one or more runs with
//! the metadata needed to tell reports apart, and renders them as text,
//! JSON or CSV.

use crate::simulation::error::SimulationResult;
use crate::simulation::statistics::RunStatistics;
use crate::types::{BufferSweep, OutputFormat, ReportId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

const CSV_HEADER: &str = "buffer1_capacity,buffer2_capacity,horizon,items_arrived,items_lost,items_processed,items_in_system,average_sojourn_time,station1_utilization,station2_utilization,station1_blocked_fraction,throughput,average_buffer1_len,average_buffer2_len";

/// Results of one simulator invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Unique identifier of this report
    pub report_id: ReportId,
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Simulated time span of every run
    pub horizon: f64,
    /// Seed shared by every run, if any
    pub seed: Option<u64>,
    /// Sweep that produced the runs, if any
    pub sweep: Option<BufferSweep>,
    /// Statistics of each run, in execution order
    pub runs: Vec<RunStatistics>,
}

impl SimulationReport {
    /// Create a report stamped with a fresh id and the current time
    pub fn new(horizon: f64, seed: Option<u64>, sweep: Option<BufferSweep>, runs: Vec<RunStatistics>) -> Self {
        Self { report_id: ReportId::new(), generated_at: Utc::now(), horizon, seed, sweep, runs }
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> SimulationResult<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Csv => Ok(self.render_csv()),
        }
    }

    /// Render and write to `path`
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, format: OutputFormat) -> SimulationResult<()> {
        let content = self.render(format)?;
        fs::write(path.as_ref(), content)?;
        info!("Report {} written to {}", self.report_id, path.as_ref().display());
        Ok(())
    }

    /// Plain text: the full summary for a single run, a table for a sweep
    pub fn render_text(&self) -> String {
        match (self.sweep, self.runs.as_slice()) {
            (None, [run]) => run.generate_summary_output(),
            _ => self.render_table(),
        }
    }

    fn render_table(&self) -> String {
        let mut output = String::new();
        output.push_str("=== Buffer Sweep Results ===\n");
        output.push_str(&format!("Total simulated time: {:.2}\n", self.horizon));
        if let Some(sweep) = &self.sweep {
            output.push_str(&format!("Buffer 2 capacities: {}\n", sweep));
        }
        output.push('\n');
        output.push_str(&format!(
            "{:>4} {:>4} {:>9} {:>9} {:>8} {:>11} {:>8} {:>8} {:>8} {:>10}\n",
            "B1", "B2", "Arrived", "Processed", "Lost%", "AvgSojourn", "Util1%", "Util2%", "Block%", "Throughput"
        ));
        for run in &self.runs {
            output.push_str(&format!(
                "{:>4} {:>4} {:>9} {:>9} {:>8.2} {:>11.3} {:>8.2} {:>8.2} {:>8.2} {:>10.4}\n",
                run.buffer1_capacity(),
                run.buffer2_capacity(),
                run.items_arrived,
                run.items_processed,
                run.loss_percentage(),
                run.average_sojourn_time,
                run.station1_utilization_percentage(),
                run.station2_utilization_percentage(),
                run.station1_blocked_fraction * 100.0,
                run.throughput
            ));
        }
        output
    }

    /// One header line and one line per run
    pub fn render_csv(&self) -> String {
        let mut output = String::from(CSV_HEADER);
        output.push('\n');
        for run in &self.runs {
            output.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                run.buffer1_capacity(),
                run.buffer2_capacity(),
                run.horizon,
                run.items_arrived,
                run.items_lost,
                run.items_processed,
                run.items_in_system,
                run.average_sojourn_time,
                run.station1_utilization,
                run.station2_utilization,
                run.station1_blocked_fraction,
                run.throughput,
                run.average_buffer1_len,
                run.average_buffer2_len
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::line::LineState;
    use crate::simulation::statistics::StatisticsAccumulator;
    use crate::types::LineConfig;

    fn sample_run(buffer2_capacity: usize) -> RunStatistics {
        let config = LineConfig::default().with_buffer2_capacity(buffer2_capacity);
        let mut acc = StatisticsAccumulator::new();
        acc.items_arrived = 10;
        acc.items_processed = 8;
        acc.total_sojourn_time = 16.0;
        acc.station1_busy_time = 50.0;
        acc.station2_busy_time = 25.0;
        acc.finish(100.0, &config, &LineState::new(4, buffer2_capacity))
    }

    #[test]
    fn test_single_run_text_uses_summary() {
        let report = SimulationReport::new(100.0, Some(1), None, vec![sample_run(2)]);
        let text = report.render(OutputFormat::Text).unwrap();
        assert!(text.starts_with("=== Simulation Results ==="));
        assert!(text.contains("Items processed: 8"));
        assert!(text.contains("Station 1 utilization: 50.00%"));
    }

    #[test]
    fn test_sweep_text_is_a_table() {
        let report = SimulationReport::new(
            100.0,
            Some(1),
            Some(BufferSweep::new(1, 2)),
            vec![sample_run(1), sample_run(2)],
        );
        let text = report.render_text();
        assert!(text.starts_with("=== Buffer Sweep Results ==="));
        assert!(text.contains("Buffer 2 capacities: 1:2:1"));
        // title, horizon, sweep, blank line, header, two rows
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let report = SimulationReport::new(100.0, None, None, vec![sample_run(0), sample_run(3)]);
        let csv = report.render(OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("4,0,100,10,0,8,0,2,0.5,0.25,"));
        assert!(lines[2].starts_with("4,3,"));
        let columns = CSV_HEADER.split(',').count();
        assert!(lines.iter().all(|line| line.split(',').count() == columns));
    }

    #[test]
    fn test_json_round_trip() {
        let report = SimulationReport::new(100.0, Some(9), None, vec![sample_run(2)]);
        let json = report.render(OutputFormat::Json).unwrap();
        let parsed: SimulationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.report_id, report.report_id);
        assert_eq!(parsed.runs, report.runs);
        assert_eq!(parsed.seed, Some(9));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let report = SimulationReport::new(100.0, None, None, vec![sample_run(2)]);
        report.write_to_file(&path, OutputFormat::Csv).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, report.render_csv());
    }
}
