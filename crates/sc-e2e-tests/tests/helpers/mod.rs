//! Shared test harness for E2E integration tests.
//!
//! Stands up wiremock servers for Ollama and the prediction service and
//! wires the real clients into a `ChatPipeline`.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sc_chat_agent::completion::CompletionService;
use sc_chat_agent::{
    AgentConfig, ChatPipeline, ConversationLog, ForecasterConfig, HttpForecastClient,
    OllamaChatClient, OllamaConfig,
};

/// Harness around one pipeline and its two mock backends.
pub struct TestHarness {
    pub ollama: MockServer,
    pub forecaster: MockServer,
    pub pipeline: ChatPipeline,
}

impl TestHarness {
    /// Pipeline with both collaborators enabled and the default greeting seed.
    pub async fn start() -> Self {
        Self::build(true).await
    }

    /// Pipeline with the language model disabled.
    pub async fn without_model() -> Self {
        Self::build(false).await
    }

    async fn build(model_enabled: bool) -> Self {
        let ollama = MockServer::start().await;
        let forecaster = MockServer::start().await;

        let config = AgentConfig {
            ollama: OllamaConfig {
                host: ollama.uri(),
                timeout_secs: 2,
                enabled: model_enabled,
                ..OllamaConfig::default()
            },
            forecaster: ForecasterConfig {
                url: format!("{}/predict", forecaster.uri()),
                timeout_secs: 2,
            },
            ..AgentConfig::default()
        };

        let completion: Option<Arc<dyn CompletionService>> = if config.ollama.enabled {
            Some(Arc::new(OllamaChatClient::new(config.ollama.clone()).unwrap()))
        } else {
            None
        };
        let forecast_client = Arc::new(HttpForecastClient::new(config.forecaster.clone()).unwrap());

        let pipeline = ChatPipeline::new(
            completion,
            forecast_client,
            ConversationLog::with_seed(config.seed_turns()),
        )
        .with_params(config.ollama.params())
        .with_timeouts(Duration::from_secs(3), Duration::from_secs(3));

        Self {
            ollama,
            forecaster,
            pipeline,
        }
    }

    /// Serve `predictions` (or null) for every predict request.
    pub async fn mount_predictions(&self, predictions: Option<Vec<f64>>) {
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "predictions": predictions })),
            )
            .mount(&self.forecaster)
            .await;
    }

    /// Serve one value per requested interval: 1.0, 2.0, ...
    pub async fn mount_ramp(&self, intervals: u64) {
        let values: Vec<f64> = (1..=intervals).map(|i| i as f64).collect();
        self.mount_predictions(Some(values)).await;
    }

    /// Stream `fragments` as the Ollama reply to every chat request.
    pub async fn mount_reply(&self, fragments: &[&str]) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ollama_stream(fragments)))
            .mount(&self.ollama)
            .await;
    }

    /// Request bodies the forecaster received, parsed as JSON.
    pub async fn forecast_requests(&self) -> Vec<serde_json::Value> {
        received_json(&self.forecaster).await
    }

    /// Request bodies Ollama received, parsed as JSON.
    pub async fn chat_requests(&self) -> Vec<serde_json::Value> {
        received_json(&self.ollama).await
    }
}

async fn received_json(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

/// NDJSON body as Ollama streams it.
pub fn ollama_stream(fragments: &[&str]) -> String {
    let mut body = String::new();
    for f in fragments {
        body.push_str(
            &json!({"message": {"role": "assistant", "content": f}, "done": false}).to_string(),
        );
        body.push('\n');
    }
    body.push_str(r#"{"message":{"role":"assistant","content":""},"done":true}"#);
    body.push('\n');
    body
}
