use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde_json::Value;

use crate::errors::PredictError;
use crate::form::PredictionRequest;

/// Thin wrapper around the prediction endpoint. Cheap to clone.
#[derive(Clone, Debug)]
pub struct PredictionClient {
    http: Client,
    endpoint: String,
}

impl PredictionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("could not build HTTP client")?;
        Ok(Self::with_http_client(endpoint, http))
    }

    pub fn with_http_client(endpoint: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the laptop specification and returns the price in the service's base currency.
    pub async fn predict(&self, request: &PredictionRequest) -> Result<f64, PredictError> {
        tracing::debug!(endpoint = %self.endpoint, ?request, "sending prediction request");
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(PredictError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Status(status));
        }

        let body: Value = response.json().await.map_err(PredictError::Decode)?;
        extract_prediction(&body).ok_or(PredictError::MissingPrediction)
    }
}

fn extract_prediction(body: &Value) -> Option<f64> {
    body.get("prediction")
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
}
