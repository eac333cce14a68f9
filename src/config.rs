//! Client configuration: where the prediction backend lives and how long to wait for it.
//!
//! Resolution order (later wins):
//! 1. built-in defaults
//! 2. environment (a `.env` file in the working directory is loaded first)
//! 3. command-line overrides

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BACKEND_URL: &str = "VMA_BACKEND_URL";
/// Variable name used by the web frontend deployment; honored as a fallback.
pub const ENV_BACKEND_URL_COMPAT: &str = "NEXT_PUBLIC_BACKEND_URL";
pub const ENV_TIMEOUT_SECS: &str = "VMA_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub backend_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        let url = lookup(ENV_BACKEND_URL)
            .or_else(|| lookup(ENV_BACKEND_URL_COMPAT))
            .filter(|v| !v.trim().is_empty());
        if let Some(url) = url {
            config.backend_url = normalize_url(&url)?;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                AppError::usage(format!("Invalid {ENV_TIMEOUT_SECS} '{raw}': {e}"))
            })?;
            config.timeout = timeout_from_secs(secs)?;
        }

        Ok(config)
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, backend_url: Option<&str>, timeout_secs: Option<u64>) -> Result<Self, AppError> {
        if let Some(url) = backend_url {
            self.backend_url = normalize_url(url)?;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = timeout_from_secs(secs)?;
        }
        Ok(self)
    }

    /// Full URL for an absolute endpoint path such as `/predict`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_url, path)
    }
}

fn normalize_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AppError::usage(format!(
            "Backend URL must start with http:// or https:// (got '{raw}')."
        )));
    }
    Ok(trimmed.to_string())
}

fn timeout_from_secs(secs: u64) -> Result<Duration, AppError> {
    if secs == 0 {
        return Err(AppError::usage("Timeout must be at least 1 second."));
    }
    Ok(Duration::from_secs(secs))
}
