use crate::interfaces::http::dto::{BatchPredictionResponse, ErrorBody, PredictionResponse};
use anyhow::{Context, bail};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

/// `GET /health` as seen by a client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub model_loaded: bool,
}

/// `GET /model-info` as seen by a client
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelInfoReport {
    pub model_type: String,
    pub features: Vec<String>,
    pub num_features: usize,
    pub target_classes: Vec<u8>,
    pub target_description: BTreeMap<String, String>,
}

/// Demo patients used by the CLI when no input file is given
pub fn sample_patients() -> Vec<Value> {
    vec![
        json!({
            "age": 65.0, "sex": 1.0, "cp": 3, "trestbps": 140, "chol": 250, "fbs": 0,
            "restecg": 1, "thalach": 150, "exang": 0, "oldpeak": 2.0, "slope": 1,
            "ca": 0, "thal": 3
        }),
        json!({
            "age": 45.0, "sex": 0.0, "cp": 1, "trestbps": 120, "chol": 200, "fbs": 0,
            "restecg": 0, "thalach": 160, "exang": 0, "oldpeak": 0.0, "slope": 1,
            "ca": 0, "thal": 2
        }),
        json!({
            "age": 55.0, "sex": 1.0, "cp": 2, "trestbps": 130, "chol": 220, "fbs": 1,
            "restecg": 1, "thalach": 140, "exang": 1, "oldpeak": 1.5, "slope": 2,
            "ca": 1, "thal": 3
        }),
    ]
}

/// Async client for the prediction API
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> anyhow::Result<HealthReport> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .context("Failed to send health request")?;
        Self::parse(response).await
    }

    pub async fn model_info(&self) -> anyhow::Result<ModelInfoReport> {
        let response = self
            .client
            .get(self.url("/model-info"))
            .send()
            .await
            .context("Failed to send model-info request")?;
        Self::parse(response).await
    }

    pub async fn predict(&self, patient: &Value) -> anyhow::Result<PredictionResponse> {
        let response = self
            .client
            .post(self.url("/predict"))
            .json(patient)
            .send()
            .await
            .context("Failed to send predict request")?;
        let prediction: PredictionResponse = Self::parse(response).await?;
        info!(
            "Prediction: {}, Probability: {:.3}, Confidence: {}",
            prediction.prediction, prediction.probability, prediction.confidence
        );
        Ok(prediction)
    }

    pub async fn predict_batch(&self, patients: &[Value]) -> anyhow::Result<BatchPredictionResponse> {
        let response = self
            .client
            .post(self.url("/predict-batch"))
            .json(patients)
            .send()
            .await
            .context("Failed to send predict-batch request")?;
        let batch: BatchPredictionResponse = Self::parse(response).await?;
        info!("Batch prediction returned {} results", batch.total_patients);
        Ok(batch)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> anyhow::Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            match serde_json::from_str::<ErrorBody>(&body) {
                Ok(error) => bail!(
                    "API returned status {} ({}): {}",
                    status,
                    error.error,
                    error.detail
                ),
                Err(_) => bail!("API returned status {}: {}", status, body),
            }
        }
        response
            .json::<T>()
            .await
            .context("Failed to parse API response")
    }
}
