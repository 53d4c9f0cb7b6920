//! SolarCast chat agent library.
//!
//! Wires the horizon interpreter to its two collaborators (an Ollama chat
//! endpoint and a forecasting endpoint) behind `ChatPipeline`, and keeps the
//! conversation in a subscribable `ConversationLog`. Modules are public so
//! `sc-e2e-tests` can drive the real code paths.

pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod forecast;
pub mod mock;
pub mod pipeline;

pub use completion::{CompletionParams, CompletionService, OllamaChatClient, OllamaConfig};
pub use config::AgentConfig;
pub use conversation::ConversationLog;
pub use error::{AgentError, AgentResult};
pub use forecast::{ForecastService, ForecasterConfig, HttpForecastClient};
pub use pipeline::ChatPipeline;
