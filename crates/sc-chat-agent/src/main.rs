//! SolarCast chat agent: a terminal chat front end for solar output
//! forecasts.
//!
//! Reads one message per stdin line, routes it through `ChatPipeline`, and
//! prints every non-user turn as it lands in the conversation log. Logs go
//! to stderr as JSON so they do not interleave with the conversation.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use sc_chat_agent::completion::CompletionService;
use sc_chat_agent::{AgentConfig, ChatPipeline, ConversationLog, HttpForecastClient, OllamaChatClient};
use sc_protocol::Role;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sc-chat-agent starting");

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/etc/solarcast/agent.toml".to_string());

    let config = AgentConfig::from_file(&config_path)?;
    tracing::info!(
        path = %config_path,
        forecaster = %config.forecaster.url,
        "config loaded"
    );

    // ── Collaborators ───────────────────────────────────────────
    let completion: Option<Arc<dyn CompletionService>> = if config.ollama.enabled {
        match OllamaChatClient::new(config.ollama.clone()) {
            Ok(client) => {
                tracing::info!(
                    host = %config.ollama.host,
                    model = %config.ollama.model,
                    "ollama chat enabled"
                );
                Some(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(error = %e, "ollama client unavailable, chat disabled");
                None
            }
        }
    } else {
        tracing::info!("ollama chat disabled");
        None
    };

    let forecaster = Arc::new(HttpForecastClient::new(config.forecaster.clone())?);

    // ── Conversation ────────────────────────────────────────────
    let log = ConversationLog::with_seed(config.seed_turns());
    let printer = spawn_printer(&log);

    let pipeline = ChatPipeline::new(completion, forecaster, log)
        .with_params(config.ollama.params())
        .with_timeouts(config.ollama.timeout(), config.forecaster.timeout());

    tracing::info!("sc-chat-agent ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => {
                    pipeline.handle(&line).await;
                }
                None => {
                    tracing::info!("stdin closed");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown signal received");
                break;
            }
        }
    }

    // Dropping the last sender closes the printer's channel.
    drop(pipeline);
    printer.await?;

    tracing::info!("sc-chat-agent stopped");
    Ok(())
}

/// Print assistant and system turns as they are appended.
fn spawn_printer(log: &ConversationLog) -> tokio::task::JoinHandle<()> {
    let mut rx = log.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(turn) if turn.role == Role::User => {}
                Ok(turn) => println!("[{}] {}\n", turn.role, turn.text),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "printer lagged behind the conversation");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
