//! Command-line parsing for the VMA prediction client.
//!
//! Argument parsing and command dispatch are kept apart from the parameter,
//! client, and session code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Field;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vma", version, about = "Asphalt mix design VMA prediction client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form with a live gradation chart (default).
    Tui(TuiArgs),
    /// Submit one prediction from the defaults plus `--set` overrides.
    Predict(PredictArgs),
    /// Print the gradation table and an ASCII chart (no backend needed).
    Curve(CurveArgs),
    /// Print the backend's model metadata.
    Info(BackendArgs),
    /// Check whether the backend is up and has a model loaded.
    Health(BackendArgs),
}

/// Where to reach the backend. Unset flags fall back to the environment.
#[derive(Debug, Args, Clone, Default)]
pub struct BackendArgs {
    /// Backend base URL (default: $VMA_BACKEND_URL, then http://localhost:8000).
    #[arg(long, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Request timeout in seconds (default: $VMA_TIMEOUT_SECS, then 30).
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Write logs to this file (the TUI does not log otherwise).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Override a parameter, e.g. `--set AC=5.4 --set PASS_4_75=48`.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<Assignment>,

    /// Also print the submitted parameters.
    #[arg(long)]
    pub show_params: bool,
}

#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Override a parameter, e.g. `--set PASS_0_6=18`.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<Assignment>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u16).range(10..=400))]
    pub width: u16,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(5..=200))]
    pub height: u16,
}

/// A `FIELD=VALUE` override. The value is validated when applied, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub field: Field,
    pub raw: String,
}

fn parse_assignment(s: &str) -> Result<Assignment, String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
    let field = key.parse::<Field>().map_err(|e| e.to_string())?;
    Ok(Assignment {
        field,
        raw: raw.to_string(),
    })
}
