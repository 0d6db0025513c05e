//! Statistics collection and reporting
//!
//! This module contains the running accumulator updated by the event loop
//! and the immutable [`RunStatistics`] snapshot produced at the horizon.

use crate::simulation::line::{Item, LineState};
use crate::types::LineConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Running counters and time integrals for one simulation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsAccumulator {
    /// Items that reached the line, admitted or not
    pub items_arrived: u64,
    /// Items turned away at the entrance
    pub items_lost: u64,
    /// Items released by station 2
    pub items_processed: u64,
    /// Sum of arrival-to-exit times of processed items
    pub total_sojourn_time: f64,
    /// Sum of arrival-to-station-1-exit times of processed items
    pub total_station1_passage_time: f64,
    /// Time station 1 held an item, blocked or not
    pub station1_busy_time: f64,
    /// Time station 2 held an item
    pub station2_busy_time: f64,
    /// Time station 1 spent blocked
    pub station1_blocked_time: f64,
    /// Integral of buffer-1 length over time
    pub buffer1_area: f64,
    /// Integral of buffer-2 length over time
    pub buffer2_area: f64,
    /// Longest buffer-1 queue observed
    pub peak_buffer1_len: usize,
    /// Longest buffer-2 queue observed
    pub peak_buffer2_len: usize,
    /// Events handled before the horizon
    pub events_dispatched: u64,
}

impl StatisticsAccumulator {
    /// Fresh accumulator with everything zeroed
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate time-weighted quantities over `[from, to)` using the state
    /// the line was in during that interval
    pub fn integrate(&mut self, line: &LineState, from: f64, to: f64) {
        let elapsed = to - from;
        if elapsed <= 0.0 {
            return;
        }
        if line.station1.is_some() {
            self.station1_busy_time += elapsed;
            if line.station1_blocked {
                self.station1_blocked_time += elapsed;
            }
        }
        if line.station2.is_some() {
            self.station2_busy_time += elapsed;
        }
        self.buffer1_area += line.buffer1.len() as f64 * elapsed;
        self.buffer2_area += line.buffer2.len() as f64 * elapsed;
    }

    /// Count an arrival
    pub fn record_arrival(&mut self) {
        self.items_arrived += 1;
    }

    /// Count an arrival that could not enter the line
    pub fn record_loss(&mut self) {
        self.items_lost += 1;
    }

    /// Count an item leaving station 2
    pub fn record_completion(&mut self, item: &Item) {
        self.items_processed += 1;
        if let Some(sojourn) = item.sojourn_time() {
            self.total_sojourn_time += sojourn;
        }
        if let Some(passage) = item.station1_passage_time() {
            self.total_station1_passage_time += passage;
        }
    }

    /// Count a dispatched event
    pub fn record_event(&mut self) {
        self.events_dispatched += 1;
    }

    /// Track peak buffer lengths after a state change
    pub fn observe_buffers(&mut self, line: &LineState) {
        self.peak_buffer1_len = self.peak_buffer1_len.max(line.buffer1.len());
        self.peak_buffer2_len = self.peak_buffer2_len.max(line.buffer2.len());
    }

    /// Normalize the accumulated values into a result snapshot
    pub fn finish(&self, horizon: f64, config: &LineConfig, line: &LineState) -> RunStatistics {
        let per_horizon = |value: f64| if horizon > 0.0 { value / horizon } else { 0.0 };
        let per_processed = |value: f64| {
            if self.items_processed == 0 {
                0.0
            } else {
                value / self.items_processed as f64
            }
        };

        // Summed intervals can overshoot the horizon by a rounding error
        let station1_busy_time = self.station1_busy_time.min(horizon);
        let station2_busy_time = self.station2_busy_time.min(horizon);
        let station1_blocked_time = self.station1_blocked_time.min(station1_busy_time);

        RunStatistics {
            horizon,
            items_arrived: self.items_arrived,
            items_lost: self.items_lost,
            items_processed: self.items_processed,
            items_in_system: line.items_in_system() as u64,
            average_sojourn_time: per_processed(self.total_sojourn_time),
            average_station1_passage_time: per_processed(self.total_station1_passage_time),
            station1_busy_time,
            station2_busy_time,
            station1_utilization: per_horizon(station1_busy_time),
            station2_utilization: per_horizon(station2_busy_time),
            station1_blocked_fraction: per_horizon(station1_blocked_time),
            throughput: per_horizon(self.items_processed as f64),
            average_buffer1_len: per_horizon(self.buffer1_area),
            average_buffer2_len: per_horizon(self.buffer2_area),
            peak_buffer1_len: self.peak_buffer1_len,
            peak_buffer2_len: self.peak_buffer2_len,
            events_dispatched: self.events_dispatched,
            config: config.clone(),
        }
    }
}

/// Immutable summary of one finite-horizon run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Simulated time span
    pub horizon: f64,
    /// Items that reached the line
    pub items_arrived: u64,
    /// Items turned away at the entrance
    pub items_lost: u64,
    /// Items that left station 2
    pub items_processed: u64,
    /// Items still inside the line at the horizon
    pub items_in_system: u64,
    /// Mean arrival-to-exit time of processed items (0 if none)
    pub average_sojourn_time: f64,
    /// Mean arrival-to-station-1-exit time of processed items (0 if none)
    pub average_station1_passage_time: f64,
    /// Time station 1 held an item
    pub station1_busy_time: f64,
    /// Time station 2 held an item
    pub station2_busy_time: f64,
    /// Fraction of the horizon station 1 was busy (including blocked time)
    pub station1_utilization: f64,
    /// Fraction of the horizon station 2 was busy
    pub station2_utilization: f64,
    /// Fraction of the horizon station 1 was blocked
    pub station1_blocked_fraction: f64,
    /// Processed items per unit of time
    pub throughput: f64,
    /// Time-averaged buffer-1 length
    pub average_buffer1_len: f64,
    /// Time-averaged buffer-2 length
    pub average_buffer2_len: f64,
    /// Longest buffer-1 queue observed
    pub peak_buffer1_len: usize,
    /// Longest buffer-2 queue observed
    pub peak_buffer2_len: usize,
    /// Events handled before the horizon
    pub events_dispatched: u64,
    /// Configuration the run used
    pub config: LineConfig,
}

impl RunStatistics {
    /// Buffer-1 capacity the run used
    pub fn buffer1_capacity(&self) -> usize {
        self.config.buffer1_capacity
    }

    /// Buffer-2 capacity the run used
    pub fn buffer2_capacity(&self) -> usize {
        self.config.buffer2_capacity
    }

    /// Share of arrivals that were turned away, as a percentage
    pub fn loss_percentage(&self) -> f64 {
        if self.items_arrived == 0 {
            0.0
        } else {
            (self.items_lost as f64 / self.items_arrived as f64) * 100.0
        }
    }

    /// Station-1 utilization as a percentage
    pub fn station1_utilization_percentage(&self) -> f64 {
        self.station1_utilization * 100.0
    }

    /// Station-2 utilization as a percentage
    pub fn station2_utilization_percentage(&self) -> f64 {
        self.station2_utilization * 100.0
    }

    /// Generate the plain-text summary printed after a single run
    pub fn generate_summary_output(&self) -> String {
        let mut output = String::new();
        output.push_str("=== Simulation Results ===\n");
        output.push_str(&format!("Total simulated time: {:.2}\n", self.horizon));
        output.push_str(&format!(
            "Buffer capacities: {} / {}\n",
            self.buffer1_capacity(),
            self.buffer2_capacity()
        ));
        output.push_str(&format!("Items arrived: {}\n", self.items_arrived));
        output.push_str(&format!(
            "Items lost: {} ({:.1}%)\n",
            self.items_lost,
            self.loss_percentage()
        ));
        output.push_str(&format!("Items processed: {}\n", self.items_processed));
        output.push_str(&format!("Items in system at end: {}\n", self.items_in_system));
        output.push_str(&format!("Average sojourn time: {:.2}\n", self.average_sojourn_time));
        output.push_str(&format!("Throughput: {:.4} items/unit\n", self.throughput));
        output.push_str(&format!(
            "Station 1 utilization: {:.2}% (blocked {:.2}%)\n",
            self.station1_utilization_percentage(),
            self.station1_blocked_fraction * 100.0
        ));
        output.push_str(&format!(
            "Station 2 utilization: {:.2}%\n",
            self.station2_utilization_percentage()
        ));
        output.push_str(&format!(
            "Average buffer lengths: {:.2} / {:.2} (peak {} / {})",
            self.average_buffer1_len,
            self.average_buffer2_len,
            self.peak_buffer1_len,
            self.peak_buffer2_len
        ));
        output
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "horizon={:.2} arrived={} processed={} avg_sojourn={:.3} util1={:.3} util2={:.3}",
            self.horizon,
            self.items_arrived,
            self.items_processed,
            self.average_sojourn_time,
            self.station1_utilization,
            self.station2_utilization
        )
    }
}
