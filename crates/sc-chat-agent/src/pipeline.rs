//! Chat pipeline: turns one raw user message into conversation turns.
//!
//! Routes each message by intent:
//! - forecast request with a readable horizon → forecaster → formatted report
//! - forecast request without one → clarification prompt
//! - anything else → chat-completion backend
//!
//! Collaborator failures and timeouts become a system turn; nothing here
//! propagates an error to the caller.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use sc_horizon::{CLARIFICATION, Intent, classify, format_report};
use sc_protocol::{ChatTurn, Duration};

use crate::completion::{CompletionParams, CompletionService, collect_reply};
use crate::conversation::ConversationLog;
use crate::error::{AgentError, AgentResult};
use crate::forecast::ForecastService;

/// Shown for chat messages when no language model is available.
pub const MODEL_NOT_LOADED: &str = "The language model is not loaded yet.";

const DEFAULT_COMPLETION_TIMEOUT: StdDuration = StdDuration::from_secs(120);
const DEFAULT_FORECAST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Per-message orchestration over the two collaborators.
pub struct ChatPipeline {
    completion: Option<Arc<dyn CompletionService>>,
    forecaster: Arc<dyn ForecastService>,
    log: ConversationLog,
    params: CompletionParams,
    completion_timeout: StdDuration,
    forecast_timeout: StdDuration,
}

impl ChatPipeline {
    /// `completion` is `None` when the language model is disabled or failed
    /// to initialize; chat messages then get a "not loaded" notice.
    pub fn new(
        completion: Option<Arc<dyn CompletionService>>,
        forecaster: Arc<dyn ForecastService>,
        log: ConversationLog,
    ) -> Self {
        Self {
            completion,
            forecaster,
            log,
            params: CompletionParams::default(),
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            forecast_timeout: DEFAULT_FORECAST_TIMEOUT,
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_timeouts(mut self, completion: StdDuration, forecast: StdDuration) -> Self {
        self.completion_timeout = completion;
        self.forecast_timeout = forecast;
        self
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Handle one raw user message.
    ///
    /// Returns the turns produced (user turn first, then the reply), which
    /// have also been appended to the log. Blank input produces nothing.
    pub async fn handle(&self, raw: &str) -> Vec<ChatTurn> {
        let input = raw.trim();
        if input.is_empty() {
            return Vec::new();
        }

        let history = self.log.snapshot().await;
        let user = ChatTurn::user(input);
        self.log.append(user.clone()).await;

        let reply = match classify(input) {
            Intent::Forecast {
                horizon: Some(duration),
            } => self.forecast(duration).await,
            Intent::Forecast { horizon: None } => {
                tracing::info!("forecast requested without a time span, asking to clarify");
                ChatTurn::assistant(CLARIFICATION)
            }
            Intent::Chat => self.chat(&history, &user).await,
        };

        self.log.append(reply.clone()).await;
        vec![user, reply]
    }

    async fn forecast(&self, duration: Duration) -> ChatTurn {
        let intervals = duration.intervals();
        tracing::info!(
            minutes = duration.minutes(),
            intervals = intervals.get(),
            backend = self.forecaster.name(),
            "requesting forecast"
        );

        let result = tokio::time::timeout(self.forecast_timeout, self.forecaster.predict(intervals))
            .await
            .unwrap_or(Err(AgentError::Timeout("forecast", self.forecast_timeout)));

        match result {
            Ok(series) => ChatTurn::assistant(format_report(duration, series.as_ref())),
            Err(e) => failure_turn(&e),
        }
    }

    async fn chat(&self, history: &[ChatTurn], user: &ChatTurn) -> ChatTurn {
        let Some(engine) = &self.completion else {
            tracing::info!("chat message received but no language model is loaded");
            return ChatTurn::system(MODEL_NOT_LOADED);
        };

        let started = std::time::Instant::now();
        let result = tokio::time::timeout(self.completion_timeout, self.complete(engine.as_ref(), history, user))
            .await
            .unwrap_or(Err(AgentError::Timeout("completion", self.completion_timeout)));

        match result {
            Ok(text) => {
                tracing::info!(
                    backend = engine.name(),
                    latency_ms = started.elapsed().as_millis() as u64,
                    chars = text.len(),
                    "completion finished"
                );
                ChatTurn::assistant(text)
            }
            Err(e) => failure_turn(&e),
        }
    }

    async fn complete(
        &self,
        engine: &dyn CompletionService,
        history: &[ChatTurn],
        user: &ChatTurn,
    ) -> AgentResult<String> {
        let fragments = engine.complete(history, user, &self.params).await?;
        collect_reply(fragments, &self.params.stop_sequences).await
    }
}

fn failure_turn(error: &AgentError) -> ChatTurn {
    tracing::warn!(error = %error, "request failed");
    ChatTurn::system(format!("Error executing request: {error}"))
}
