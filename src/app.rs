//! Command dispatch for the `vma` binary.
//!
//! Each subcommand picks its log sink, then either starts the TUI or runs one
//! command against a fresh `Session` and prints the outcome.

use clap::Parser;

use crate::cli::{BackendArgs, Command, CurveArgs, PredictArgs};
use crate::client::PredictionService;
use crate::error::AppError;
use crate::session::Session;

pub mod pipeline;

/// Entry point for the `vma` binary.
pub fn run() -> Result<(), AppError> {
    // `vma` and `vma --backend-url ...` behave like `vma tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => {
            crate::logging::init_file(args.log_file.as_deref())?;
            crate::tui::run(args)
        }
        Command::Predict(args) => {
            crate::logging::init_stderr();
            handle_predict(args)
        }
        Command::Curve(args) => {
            crate::logging::init_stderr();
            handle_curve(args)
        }
        Command::Info(args) => {
            crate::logging::init_stderr();
            handle_info(args)
        }
        Command::Health(args) => {
            crate::logging::init_stderr();
            handle_health(args)
        }
    }
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let mut session = Session::new();
    let params = pipeline::apply_assignments(&mut session, &args.set)?;
    let client = pipeline::connect(&args.backend)?;

    if args.show_params {
        println!("{}", crate::report::format_parameters(&params));
    }

    let result = session.submit(&client)?;
    print!("{}", crate::report::format_prediction(&result));
    Ok(())
}

fn handle_curve(args: CurveArgs) -> Result<(), AppError> {
    let mut session = Session::new();
    pipeline::apply_assignments(&mut session, &args.set)?;

    let curve = session.curve();
    println!("{}", crate::report::format_gradation_summary(&curve));
    print!("{}", crate::plot::render_gradation_plot(&curve, args.width.into(), args.height.into()));
    Ok(())
}

fn handle_info(args: BackendArgs) -> Result<(), AppError> {
    let client = pipeline::connect(&args)?;
    match client.fetch_model_info()? {
        Some(info) => print!("{}", crate::report::format_model_info(&info)),
        None => println!("Model information not available."),
    }
    Ok(())
}

fn handle_health(args: BackendArgs) -> Result<(), AppError> {
    let client = pipeline::connect(&args)?;
    let health = client.fetch_health()?;
    print!("{}", crate::report::format_health(&health));
    if health.is_healthy() {
        Ok(())
    } else {
        Err(AppError::runtime("Backend is up but reports no model loaded."))
    }
}

/// A bare `vma`, or one whose first token is a flag other than help/version,
/// runs the TUI.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let runs_tui = match argv.get(1).map(String::as_str) {
        None => true,
        Some("-h" | "--help" | "-V" | "--version" | "help") => false,
        Some(first) => first.starts_with('-'),
    };
    if runs_tui {
        argv.insert(1.min(argv.len()), "tui".to_string());
    }
    argv
}
