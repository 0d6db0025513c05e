//! Production Line Simulator
//!
//! A discrete-event simulation of a two-stage production line: items arrive
//! at random, are processed by two stations in sequence, wait in bounded
//! buffers in between, and block station 1 when the downstream buffer is full.
//!
//! # Overview
//!
//! The engine advances time straight to the next event (an arrival or a
//! station completion), integrates station busy time over every elapsed
//! interval, and reports throughput, utilization and sojourn-time statistics
//! at a fixed horizon. It is intended for capacity-planning comparisons such
//! as sweeping the size of the buffer in front of station 2.
//!
//! ## Quick Start
//!
//! ```rust
//! use production_line_simulator::*;
//!
//! let config = LineConfig {
//!     buffer2_capacity: 5,
//!     ..Default::default()
//! };
//!
//! let mut engine = ProductionLine::seeded(config, 7)?;
//! let stats = engine.run(1000.0)?;
//! println!("Processed {} of {} items", stats.items_processed, stats.items_arrived);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Configuration, output formats and identifiers
//! - [`simulation`]: Engine, clock, line state, variates, statistics, sweeps and reports
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────────────────────────────────┐
//! │    Types     │    │                  Simulation                  │
//! │              │    │                                              │
//! │ LineConfig   │◄───┤ ProductionLine ──► EventClock                │
//! │ SimConfig    │    │       │        ──► LineState                 │
//! │ OutputFormat │    │       │        ──► VariateSource             │
//! │ ReportId     │    │       ▼                                      │
//! └──────────────┘    │ StatisticsAccumulator ──► RunStatistics      │
//!                     │                              │               │
//!                     │ Sweep ──────────────────► SimulationReport   │
//!                     └──────────────────────────────────────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod simulation;
pub mod types;

// Configuration types
pub use types::{
    BufferSweep, CliArgs, ConfigError, ConfigValidationError, LineConfig, OutputFormat, ReportId,
    SimulationConfig,
};

// Engine and results
pub use simulation::{
    execute, run_buffer2_sweep, run_single, EventClock, EventKind, EventTime, Item, LineState,
    LoggingConfig, ProductionLine, RngVariates, RunStatistics, ScriptedVariates, SimulationError,
    SimulationReport, SimulationResult, StatisticsAccumulator, VariateSource,
};
