//! Chat-completion collaborator: Ollama `/api/chat` with streamed replies.
//!
//! The model answers everything that is not a forecast request. Replies
//! arrive as newline-delimited JSON chunks; each chunk's `message.content`
//! is one fragment. The caller concatenates fragments and strips any stop
//! sequence the model echoed at the end (e.g. a dangling "User:").

use async_trait::async_trait;
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sc_protocol::{ChatTurn, Role};

use crate::error::{AgentError, AgentResult};

/// Croatian-speaking solar power plant assistant.
const DEFAULT_SYSTEM_PROMPT: &str = "Ti si hrvatski chatbot koji je specijaliziran za pomoć u \
vezi pitanja korisnika vezanih za solarne elektrane. Na usluzi si i imaš pristupačan ton. \
Ukoliko korisnik pita pitanje koje nema veze sa temom lijepo korisniku objasniš da to nije \
tvoje polje djelovanja.";

/// Lazily produced reply fragments, ending at end-of-generation.
pub type FragmentStream = BoxStream<'static, AgentResult<String>>;

/// Per-request generation limits.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Sequences at which generation stops.
    pub stop_sequences: Vec<String>,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            stop_sequences: default_stop_sequences(),
        }
    }
}

/// Something that continues a conversation with one assistant reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Start generating a reply to `turn`, given the prior `history`.
    async fn complete(
        &self,
        history: &[ChatTurn],
        turn: &ChatTurn,
        params: &CompletionParams,
    ) -> AgentResult<FragmentStream>;

    /// Name of this backend (for logging).
    fn name(&self) -> &str;
}

/// Drain a fragment stream into the final reply text.
pub async fn collect_reply(fragments: FragmentStream, stop_sequences: &[String]) -> AgentResult<String> {
    let text: String = fragments.try_collect::<Vec<_>>().await?.concat();
    Ok(strip_stop_sequences(&text, stop_sequences))
}

/// Remove stop sequences left dangling at the end of a reply.
///
/// Matching is case-insensitive and ignores whitespace around the sequence.
/// Repeats until no stop sequence remains at the end.
pub fn strip_stop_sequences(text: &str, stop_sequences: &[String]) -> String {
    let patterns: Vec<Regex> = stop_sequences
        .iter()
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| Regex::new(&format!(r"(?i)\s*{}\s*$", regex::escape(s.trim()))).ok())
        .collect();

    let mut out = text.trim_end().to_string();
    loop {
        let before = out.len();
        for re in &patterns {
            if let Some(m) = re.find(&out) {
                out.truncate(m.start());
            }
        }
        if out.len() == before {
            break;
        }
    }
    out
}

/// Configuration for the Ollama chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Ollama HTTP API base URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Model to chat with.
    #[serde(default = "default_model")]
    pub model: String,
    /// Whole-reply timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// When false the agent answers chat messages with a "not loaded" notice.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_stop_sequences")]
    pub stop_sequences: Vec<String>,
    /// Prepended to every request as the system message.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_host() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "mistral:7b".into()
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_enabled() -> bool {
    true
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_stop_sequences() -> Vec<String> {
    vec!["User:".into()]
}
fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            enabled: default_enabled(),
            max_tokens: default_max_tokens(),
            stop_sequences: default_stop_sequences(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl OllamaConfig {
    pub fn params(&self) -> CompletionParams {
        CompletionParams {
            max_tokens: self.max_tokens,
            stop_sequences: self.stop_sequences.clone(),
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

/// Ollama chat API request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions<'a>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions<'a> {
    num_predict: u32,
    stop: &'a [String],
}

/// One NDJSON line of a streamed chat response (only fields we need).
#[derive(Deserialize)]
struct ChatChunk {
    message: Option<ResponseMessage>,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for a local Ollama chat endpoint.
pub struct OllamaChatClient {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaChatClient {
    pub fn new(config: OllamaConfig) -> AgentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AgentError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionService for OllamaChatClient {
    async fn complete(
        &self,
        history: &[ChatTurn],
        turn: &ChatTurn,
        params: &CompletionParams,
    ) -> AgentResult<FragmentStream> {
        let url = format!("{}/api/chat", self.config.host);

        let mut messages = Vec::with_capacity(history.len() + 2);
        if !self.config.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: Role::System.as_str(),
                content: &self.config.system_prompt,
            });
        }
        // Agent notices (errors, "not loaded") are for the user, not the model.
        messages.extend(
            history
                .iter()
                .chain(std::iter::once(turn))
                .filter(|t| t.role != Role::System)
                .map(|t| ChatMessage {
                    role: t.role.as_str(),
                    content: &t.text,
                }),
        );

        let body = ChatRequest {
            model: &self.config.model,
            messages,
            stream: true,
            options: ChatOptions {
                num_predict: params.max_tokens,
                stop: &params.stop_sequences,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Http(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "ollama returned non-200");
            return Err(AgentError::Completion(format!(
                "ollama returned {}",
                response.status()
            )));
        }

        tracing::debug!(model = %self.config.model, "ollama stream opened");
        Ok(ndjson_fragments(response.bytes_stream()))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Outcome of decoding one NDJSON line.
enum Line {
    Skip,
    Fragment { text: String, done: bool },
    Failed(AgentError),
}

fn decode_line(raw: &[u8]) -> Line {
    let trimmed = raw.trim_ascii();
    if trimmed.is_empty() {
        return Line::Skip;
    }
    match serde_json::from_slice::<ChatChunk>(trimmed) {
        Ok(ChatChunk {
            error: Some(err), ..
        }) => Line::Failed(AgentError::Completion(err)),
        Ok(chunk) => Line::Fragment {
            text: chunk.message.map(|m| m.content).unwrap_or_default(),
            done: chunk.done,
        },
        Err(e) => Line::Failed(AgentError::Completion(format!(
            "invalid stream chunk: {e}"
        ))),
    }
}

struct NdjsonState<S> {
    inner: std::pin::Pin<Box<stream::Fuse<S>>>,
    buf: Vec<u8>,
    finished: bool,
}

/// Split a byte stream into NDJSON lines (lines may straddle chunks) and
/// yield each line's message content.
pub(crate) fn ndjson_fragments<S, B, E>(inner: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = NdjsonState {
        inner: Box::pin(inner.fuse()),
        buf: Vec::new(),
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if st.finished {
                return None;
            }
            if let Some(pos) = st.buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = st.buf.drain(..=pos).collect();
                match decode_line(&line) {
                    Line::Skip => continue,
                    Line::Fragment { text, done } => {
                        st.finished = done;
                        if text.is_empty() {
                            continue;
                        }
                        return Some((Ok(text), st));
                    }
                    Line::Failed(e) => {
                        st.finished = true;
                        return Some((Err(e), st));
                    }
                }
            }
            match st.inner.next().await {
                Some(Ok(chunk)) => st.buf.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((Err(AgentError::Http(e.to_string())), st));
                }
                None => {
                    if st.buf.trim_ascii().is_empty() {
                        return None;
                    }
                    // Last line arrived without a trailing newline.
                    st.buf.push(b'\n');
                }
            }
        }
    })
    .boxed()
}
