//! Mock collaborators for testing without Ollama or a prediction service.
//!
//! Both record what they were asked so tests can assert on it.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Mutex;

use sc_protocol::{ChatTurn, IntervalCount, PredictionSeries};

use crate::completion::{CompletionParams, CompletionService, FragmentStream};
use crate::error::{AgentError, AgentResult};
use crate::forecast::ForecastService;

/// What a `MockCompletion` does when called.
enum CompletionBehavior {
    Reply(Vec<String>),
    /// Streams these fragments, then fails mid-stream.
    BreakAfter(Vec<String>, String),
    Fail(String),
    Hang,
}

/// Mock chat backend serving canned fragments.
pub struct MockCompletion {
    behavior: CompletionBehavior,
    /// History length and user text of each call.
    calls: Mutex<Vec<(usize, String)>>,
}

impl MockCompletion {
    fn with(behavior: CompletionBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply with the given fragments in order.
    pub fn replying<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with(CompletionBehavior::Reply(
            fragments.into_iter().map(Into::into).collect(),
        ))
    }

    /// Stream `fragments`, then yield an error.
    pub fn breaking_after<I, S>(fragments: I, error: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with(CompletionBehavior::BreakAfter(
            fragments.into_iter().map(Into::into).collect(),
            error.into(),
        ))
    }

    /// Fail before streaming anything.
    pub fn failing(error: impl Into<String>) -> Self {
        Self::with(CompletionBehavior::Fail(error.into()))
    }

    /// Never answer.
    pub fn hanging() -> Self {
        Self::with(CompletionBehavior::Hang)
    }

    /// Recorded `(history_len, user_text)` pairs.
    pub fn calls(&self) -> Vec<(usize, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn complete(
        &self,
        history: &[ChatTurn],
        turn: &ChatTurn,
        _params: &CompletionParams,
    ) -> AgentResult<FragmentStream> {
        self.calls
            .lock()
            .unwrap()
            .push((history.len(), turn.text.clone()));

        match &self.behavior {
            CompletionBehavior::Reply(fragments) => {
                let items: Vec<AgentResult<String>> = fragments.iter().cloned().map(Ok).collect();
                Ok(stream::iter(items).boxed())
            }
            CompletionBehavior::BreakAfter(fragments, error) => {
                let mut items: Vec<AgentResult<String>> =
                    fragments.iter().cloned().map(Ok).collect();
                items.push(Err(AgentError::Completion(error.clone())));
                Ok(stream::iter(items).boxed())
            }
            CompletionBehavior::Fail(error) => Err(AgentError::Completion(error.clone())),
            CompletionBehavior::Hang => futures::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// What a `MockForecaster` does when called.
enum ForecastBehavior {
    Fixed(Option<Vec<f64>>),
    /// 1.0, 2.0, ... one value per requested interval.
    Ramp,
    Fail(String),
    Hang,
}

/// Mock prediction service.
pub struct MockForecaster {
    behavior: ForecastBehavior,
    requested: Mutex<Vec<u64>>,
}

impl MockForecaster {
    fn with(behavior: ForecastBehavior) -> Self {
        Self {
            behavior,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Always return these values, whatever was requested.
    pub fn fixed(values: Vec<f64>) -> Self {
        Self::with(ForecastBehavior::Fixed(Some(values)))
    }

    /// Always report "not available".
    pub fn unavailable() -> Self {
        Self::with(ForecastBehavior::Fixed(None))
    }

    /// Return exactly as many values as requested: 1.0, 2.0, ...
    pub fn ramp() -> Self {
        Self::with(ForecastBehavior::Ramp)
    }

    pub fn failing(error: impl Into<String>) -> Self {
        Self::with(ForecastBehavior::Fail(error.into()))
    }

    pub fn hanging() -> Self {
        Self::with(ForecastBehavior::Hang)
    }

    /// Interval counts requested so far.
    pub fn requested(&self) -> Vec<u64> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ForecastService for MockForecaster {
    async fn predict(&self, intervals: IntervalCount) -> AgentResult<Option<PredictionSeries>> {
        self.requested.lock().unwrap().push(intervals.get());

        match &self.behavior {
            ForecastBehavior::Fixed(values) => Ok(values.clone().map(PredictionSeries::new)),
            ForecastBehavior::Ramp => Ok(Some(PredictionSeries::new(
                (1..=intervals.get()).map(|i| i as f64).collect(),
            ))),
            ForecastBehavior::Fail(error) => Err(AgentError::Forecast(error.clone())),
            ForecastBehavior::Hang => futures::future::pending().await,
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
