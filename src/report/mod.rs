//! Reporting utilities: plain-text summaries of parameters, curves, and backend results.

pub mod format;

pub use format::*;
