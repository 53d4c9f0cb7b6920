//! Agent error types.

use thiserror::Error;

/// Failures talking to the chat-completion or forecasting collaborators.
///
/// None of these are fatal: the pipeline turns them into a system turn.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("completion failed: {0}")]
    Completion(String),

    #[error("forecast failed: {0}")]
    Forecast(String),

    #[error("{0} timed out after {1:?}")]
    Timeout(&'static str, std::time::Duration),
}

/// Convenience alias for agent results.
pub type AgentResult<T> = Result<T, AgentError>;
