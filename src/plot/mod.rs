//! Terminal plotting helpers (ASCII, for non-interactive output).

pub mod ascii;

pub use ascii::*;
