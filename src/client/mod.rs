//! Prediction backend client.
//!
//! - `PredictionService`: the seam the session talks to
//! - `HttpClient`: the reqwest-backed implementation (`http`)
//! - payload checks that turn response bodies into domain results (`wire`)
//!
//! Endpoints:
//!
//! - `POST /predict` with the 13-field parameter object
//! - `GET /api/model-info`
//! - `GET /health`

use crate::domain::{HealthStatus, ModelInfo, ParameterSet, PredictionResult};

pub mod http;
pub mod wire;

pub use http::HttpClient;

pub const PATH_PREDICT: &str = "/predict";
pub const PATH_MODEL_INFO: &str = "/api/model-info";
pub const PATH_HEALTH: &str = "/health";

/// Failure of a single backend request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Connection failure, timeout, or a body that could not be read.
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend returned HTTP {status}")]
    ServerError { status: u16 },

    /// A 2xx response whose payload lacks or mistypes an expected field.
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

/// Operations offered by a prediction backend.
///
/// Every call issues at most one request and never retries.
pub trait PredictionService: Send + Sync {
    /// Submit a full parameter snapshot and return the model's estimate.
    fn predict(&self, params: &ParameterSet) -> Result<PredictionResult, RequestError>;

    /// Fetch model metadata. `Ok(None)` means the backend has none to offer.
    fn fetch_model_info(&self) -> Result<Option<ModelInfo>, RequestError>;

    fn fetch_health(&self) -> Result<HealthStatus, RequestError>;
}
