//! Chat agent configuration, loadable from TOML.

use serde::Deserialize;
use sc_protocol::{ChatTurn, Role};

use crate::completion::OllamaConfig;
use crate::forecast::ForecasterConfig;

/// Top-level configuration for the chat agent. Every section is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Ollama chat settings.
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Prediction service settings.
    #[serde(default)]
    pub forecaster: ForecasterConfig,
    /// Turns the conversation starts with.
    #[serde(default = "default_seed")]
    pub seed: Vec<SeedTurn>,
}

/// One pre-filled conversation turn.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeedTurn {
    pub role: Role,
    pub text: String,
}

fn default_seed() -> Vec<SeedTurn> {
    vec![
        SeedTurn {
            role: Role::User,
            text: "Hi".into(),
        },
        SeedTurn {
            role: Role::Assistant,
            text: "Hi, how can I help you?".into(),
        },
    ]
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            forecaster: ForecasterConfig::default(),
            seed: default_seed(),
        }
    }
}

impl AgentConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Seed turns as fresh conversation turns.
    pub fn seed_turns(&self) -> Vec<ChatTurn> {
        self.seed
            .iter()
            .map(|s| ChatTurn::new(s.role, s.text.clone()))
            .collect()
    }
}
