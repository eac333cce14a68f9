//! Response payload decoding.
//!
//! Decoding is all-or-nothing: a body either yields a complete domain value or
//! a `RequestError::MalformedResponse`, never a partially filled one.

use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::client::RequestError;
use crate::domain::{HealthStatus, ModelInfo, PredictionResult};

#[derive(Debug, Deserialize)]
struct PredictPayload {
    #[serde(default)]
    success: Option<bool>,
    predicted_vma: f64,
    confidence: String,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct ModelInfoEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    model_info: Option<ModelInfo>,
}

/// Decode a `POST /predict` success body.
pub fn decode_prediction(body: &str, received_at: DateTime<Local>) -> Result<PredictionResult, RequestError> {
    let payload: PredictPayload =
        serde_json::from_str(body).map_err(|e| RequestError::MalformedResponse(format!("predict: {e}")))?;

    if payload.success == Some(false) {
        return Err(RequestError::MalformedResponse(
            "predict: backend reported success=false".to_string(),
        ));
    }
    if payload.confidence.trim().is_empty() {
        return Err(RequestError::MalformedResponse("predict: empty confidence".to_string()));
    }

    Ok(PredictionResult {
        predicted_vma: payload.predicted_vma,
        confidence: payload.confidence,
        timestamp: payload.timestamp,
        received_at,
    })
}

/// Decode a `GET /api/model-info` body.
///
/// `success: false` or a missing `model_info` object both mean "no metadata".
pub fn decode_model_info(body: &str) -> Result<Option<ModelInfo>, RequestError> {
    let envelope: ModelInfoEnvelope =
        serde_json::from_str(body).map_err(|e| RequestError::MalformedResponse(format!("model-info: {e}")))?;
    if !envelope.success {
        return Ok(None);
    }
    Ok(envelope.model_info)
}

/// Decode a `GET /health` body.
pub fn decode_health(body: &str) -> Result<HealthStatus, RequestError> {
    serde_json::from_str(body).map_err(|e| RequestError::MalformedResponse(format!("health: {e}")))
}
