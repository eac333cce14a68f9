//! `vma-mix` library crate.
//!
//! The binary (`vma`) is a thin wrapper around this library so that:
//!
//! - the parameter/validation/curve/prediction pipeline is testable without a terminal
//! - the HTTP client can be swapped for a scripted `PredictionService` in tests
//! - presentation (CLI output, TUI) stays separate from the session semantics

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod curve;
pub mod domain;
pub mod error;
pub mod logging;
pub mod plot;
pub mod report;
pub mod session;
pub mod store;
pub mod tui;
pub mod validate;
