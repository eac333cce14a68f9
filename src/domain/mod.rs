//! Domain types used throughout the client.
//!
//! This module defines:
//!
//! - the fixed parameter schema and snapshot type (`Field`, `ParameterSet`)
//! - backend results (`ModelInfo`, `PredictionResult`, `HealthStatus`)

pub mod params;
pub mod types;

pub use params::*;
pub use types::*;
