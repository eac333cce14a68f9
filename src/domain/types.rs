//! Backend-derived result types.
//!
//! These are produced by the client layer after the wire payload has been
//! checked. None of them is ever mutated after construction.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Static metadata describing the backend's prediction model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub r2_score: f64,
    pub rmse: f64,
    /// Mean absolute error, when the backend reports it.
    #[serde(default)]
    pub mae: Option<f64>,
    #[serde(default)]
    pub feature_count: Option<usize>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// A single successful prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// Predicted VMA (%).
    pub predicted_vma: f64,
    /// Confidence label as reported by the backend (`High`, `Medium`, `Low`).
    pub confidence: String,
    /// Backend-side timestamp string, displayed verbatim.
    pub timestamp: String,
    /// When this client accepted the response.
    pub received_at: DateTime<Local>,
}

/// Backend liveness report (`GET /health`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.model_loaded
    }
}
