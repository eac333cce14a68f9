//! Shared session setup used by both the one-shot commands and the TUI.
//!
//! Keeping this in one place avoids duplicating:
//! config resolution -> HTTP client -> session with overrides applied

use crate::cli::{Assignment, BackendArgs};
use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::domain::ParameterSet;
use crate::error::AppError;
use crate::session::Session;

/// Resolve configuration (env + flags) and build the backend client.
pub fn connect(args: &BackendArgs) -> Result<HttpClient, AppError> {
    let config = ClientConfig::from_env()?.with_overrides(args.backend_url.as_deref(), args.timeout_secs)?;
    tracing::debug!(backend = %config.backend_url, timeout_secs = config.timeout.as_secs(), "client configured");
    HttpClient::new(config)
}

/// Apply `FIELD=VALUE` overrides in order. The first invalid one aborts.
pub fn apply_assignments(session: &mut Session, assignments: &[Assignment]) -> Result<ParameterSet, AppError> {
    for a in assignments {
        session.set_field(a.field, &a.raw)?;
    }
    Ok(session.params())
}
