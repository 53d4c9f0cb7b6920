//! Forecasting collaborator: asks a prediction service for N interval values.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sc_protocol::{IntervalCount, PredictionSeries};

use crate::error::{AgentError, AgentResult};

/// A service producing one value per 15-minute interval.
#[async_trait]
pub trait ForecastService: Send + Sync {
    /// Request `intervals` predictions.
    ///
    /// `Ok(None)` means the service had nothing to offer; the series length
    /// is checked by the report formatter, not here.
    async fn predict(&self, intervals: IntervalCount) -> AgentResult<Option<PredictionSeries>>;

    /// Name of this backend (for logging).
    fn name(&self) -> &str;
}

/// Configuration for the HTTP prediction endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecasterConfig {
    /// Full URL of the predict endpoint.
    #[serde(default = "default_url")]
    pub url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:8000/predict".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for ForecasterConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ForecasterConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Serialize)]
struct PredictRequest {
    intervals: u64,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Option<Vec<f64>>,
}

/// JSON-over-HTTP client for the prediction service.
///
/// POSTs `{"intervals": n}` and expects `{"predictions": [..]}`; a null or
/// missing `predictions` field means "not available".
pub struct HttpForecastClient {
    client: reqwest::Client,
    config: ForecasterConfig,
}

impl HttpForecastClient {
    pub fn new(config: ForecasterConfig) -> AgentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AgentError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ForecastService for HttpForecastClient {
    async fn predict(&self, intervals: IntervalCount) -> AgentResult<Option<PredictionSeries>> {
        let body = PredictRequest {
            intervals: intervals.get(),
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Http(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "forecaster returned non-200");
            return Err(AgentError::Forecast(format!(
                "forecaster returned {}",
                response.status()
            )));
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Forecast(format!("invalid response body: {e}")))?;

        tracing::debug!(
            requested = intervals.get(),
            received = parsed.predictions.as_ref().map(Vec::len),
            "forecaster responded"
        );
        Ok(parsed.predictions.map(PredictionSeries::new))
    }

    fn name(&self) -> &str {
        "http"
    }
}
