//! Core types and configuration for the production line simulator
//!
//! # Overview
//!
//! - **Configuration**: line parameters, run configuration, CLI arguments and validation
//! - **Enums**: output formats
//! - **Identifiers**: UUID-based report identifiers
//!
//! # Usage Example
//!
//! ```rust
//! use production_line_simulator::types::*;
//!
//! let line = LineConfig {
//!     buffer2_capacity: 5,
//!     ..Default::default()
//! };
//! assert!(line.validate().is_ok());
//!
//! let config = SimulationConfig {
//!     line,
//!     horizon: 500.0,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
