//! reqwest-backed `PredictionService`.

use chrono::Local;
use reqwest::blocking::{Client, RequestBuilder};

use crate::client::{PATH_HEALTH, PATH_MODEL_INFO, PATH_PREDICT, PredictionService, RequestError, wire};
use crate::config::ClientConfig;
use crate::domain::{HealthStatus, ModelInfo, ParameterSet, PredictionResult};
use crate::error::AppError;

pub struct HttpClient {
    client: Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send once and return the body of a 2xx response.
    fn send(&self, req: RequestBuilder, path: &str) -> Result<String, RequestError> {
        let resp = req.send().map_err(|e| {
            tracing::warn!(path, error = %e, "backend request failed");
            RequestError::Unreachable(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "backend returned error status");
            return Err(RequestError::ServerError {
                status: status.as_u16(),
            });
        }

        // A timeout while streaming the body is still a transport failure.
        resp.text().map_err(|e| RequestError::Unreachable(format!("reading response body: {e}")))
    }
}

impl PredictionService for HttpClient {
    fn predict(&self, params: &ParameterSet) -> Result<PredictionResult, RequestError> {
        let url = self.config.endpoint(PATH_PREDICT);
        tracing::info!(%url, "submitting prediction request");
        let body = self.send(self.client.post(&url).json(params), PATH_PREDICT)?;
        let result = wire::decode_prediction(&body, Local::now())?;
        tracing::info!(
            predicted_vma = result.predicted_vma,
            confidence = %result.confidence,
            "prediction received"
        );
        Ok(result)
    }

    fn fetch_model_info(&self) -> Result<Option<ModelInfo>, RequestError> {
        let url = self.config.endpoint(PATH_MODEL_INFO);
        tracing::debug!(%url, "fetching model info");
        let body = self.send(self.client.get(&url), PATH_MODEL_INFO)?;
        wire::decode_model_info(&body)
    }

    fn fetch_health(&self) -> Result<HealthStatus, RequestError> {
        let url = self.config.endpoint(PATH_HEALTH);
        tracing::debug!(%url, "checking backend health");
        let body = self.send(self.client.get(&url), PATH_HEALTH)?;
        wire::decode_health(&body)
    }
}
