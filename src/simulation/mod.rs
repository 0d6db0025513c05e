//! Simulation engine and its supporting pieces
//!
//! # Overview
//!
//! - **ProductionLine**: the event loop and the arrival / completion handlers
//! - **EventClock**: current time and the three pending event times
//! - **LineState**: bounded buffers, station slots and the blocking flag
//! - **VariateSource**: exponential durations, seeded or scripted
//! - **StatisticsAccumulator / RunStatistics**: time integrals, counters and the final snapshot
//! - **Sweep / Report**: repeated runs over buffer capacities and their rendering
//! - **SimulationError**: error handling for configuration and reporting
//!
//! # Usage Example
//!
//! ```rust
//! use production_line_simulator::simulation::*;
//! use production_line_simulator::types::*;
//!
//! let mut engine = ProductionLine::seeded(LineConfig::default(), 42).unwrap();
//! let stats = engine.run(1000.0).unwrap();
//!
//! assert!(stats.items_processed <= stats.items_arrived);
//! assert!((0.0..=1.0).contains(&stats.station1_utilization));
//! ```

pub mod clock;
pub mod engine;
pub mod error;
pub mod line;
pub mod logging;
pub mod report;
pub mod statistics;
pub mod sweep;
pub mod variates;

// Re-export all public types for convenience
pub use clock::*;
pub use engine::*;
pub use error::*;
pub use line::*;
pub use logging::*;
pub use report::*;
pub use statistics::*;
pub use sweep::*;
pub use variates::*;
