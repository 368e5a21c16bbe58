//! OllamaAgent - client for the local Ollama HTTP API.
//!
//! Probes server status, lists pulled models, and generates a short story
//! from a set of emojis. The target model is validated against the pulled
//! models before generation so a missing model fails fast instead of with an
//! opaque 404.

use std::time::Duration;

use async_trait::async_trait;
use fabula_core::config::OllamaConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{StoryAgent, StoryAgentError};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_WORD_COUNT: u32 = 150;
const DEFAULT_TEMPERATURE: f64 = 1.2;

const STATUS_TIMEOUT: Duration = Duration::from_secs(2);
const GENERATE_TIMEOUT: Duration = Duration::from_secs(300);

/// Reachability of the Ollama server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OllamaStatus {
    Running,
    Unreachable,
    Error { status: u16 },
}

impl std::fmt::Display for OllamaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OllamaStatus::Running => write!(f, "Ollama Running"),
            OllamaStatus::Unreachable => write!(f, "Ollama Not Detected"),
            OllamaStatus::Error { status } => write!(f, "Ollama Error (Status: {status})"),
        }
    }
}

/// Client for a local Ollama instance.
#[derive(Clone)]
pub struct OllamaAgent {
    client: Client,
    base_url: String,
    model: String,
    word_count: u32,
    temperature: f64,
}

impl OllamaAgent {
    /// Creates an agent against the default local endpoint and model.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            word_count: DEFAULT_WORD_COUNT,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Creates an agent from the application configuration.
    pub fn from_config(config: &OllamaConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            word_count: config.word_count,
            temperature: config.temperature,
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the approximate story length, in words.
    pub fn with_word_count(mut self, word_count: u32) -> Self {
        self.word_count = word_count;
        self
    }

    /// Overrides the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// The model this agent generates with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Checks whether the Ollama server is running and reachable.
    pub async fn status(&self) -> OllamaStatus {
        let request = self
            .client
            .get(self.tags_url())
            .timeout(STATUS_TIMEOUT)
            .send()
            .await;
        match request {
            Ok(response) if response.status().is_success() => OllamaStatus::Running,
            Ok(response) => OllamaStatus::Error {
                status: response.status().as_u16(),
            },
            Err(_) => OllamaStatus::Unreachable,
        }
    }

    /// Fetches the list of pulled models from the server.
    pub async fn available_models(&self) -> Result<Vec<String>, StoryAgentError> {
        let response = self
            .client
            .get(self.tags_url())
            .timeout(STATUS_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StoryAgentError::Api {
                status: response.status().as_u16(),
                message: "failed to list models".to_string(),
            });
        }
        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

impl Default for OllamaAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryAgent for OllamaAgent {
    async fn generate_story(&self, emojis: &[String]) -> Result<String, StoryAgentError> {
        let available = self.available_models().await?;
        if !available.iter().any(|m| model_matches(m, &self.model)) {
            return Err(StoryAgentError::ModelUnavailable {
                model: self.model.clone(),
                available,
            });
        }

        let prompt = build_prompt(emojis, self.word_count);
        let body = GenerateRequest {
            model: &self.model,
            prompt: &prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(self.generate_url())
            .timeout(GENERATE_TIMEOUT)
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(StoryAgentError::Api { status, message });
        }

        let parsed: GenerateResponse = response.json().await?;
        let story = parsed.response.trim().to_string();
        if story.is_empty() {
            return Err(StoryAgentError::EmptyStory);
        }

        tracing::info!(model = %self.model, chars = story.len(), "story generated");
        Ok(story)
    }
}

/// True when a pulled model name satisfies the requested one. Ollama tags
/// carry a `:latest`-style suffix, so `llama3.2` matches `llama3.2:latest`.
fn model_matches(available: &str, wanted: &str) -> bool {
    available == wanted || available.split(':').next() == Some(wanted)
}

/// Builds the story prompt for a set of emojis.
fn build_prompt(emojis: &[String], word_count: u32) -> String {
    let emoji_str = emojis.join(" ");
    format!(
        "Write a creative story with a beginning, middle, and end, inspired by these emojis: {emoji_str}. \
         The story should be about {word_count} words long."
    )
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_emojis_and_length() {
        let emojis = vec!["😀".to_string(), "🚀".to_string()];
        let prompt = build_prompt(&emojis, 150);
        assert!(prompt.contains("😀 🚀"));
        assert!(prompt.contains("about 150 words"));
    }

    #[test]
    fn test_generate_request_body_shape() {
        let body = GenerateRequest {
            model: "llama3.2",
            prompt: "a prompt",
            stream: false,
            options: GenerateOptions { temperature: 1.2 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 1.2);
    }

    #[test]
    fn test_model_matching_accepts_tag_suffix() {
        assert!(model_matches("llama3.2", "llama3.2"));
        assert!(model_matches("llama3.2:latest", "llama3.2"));
        assert!(!model_matches("mistral:latest", "llama3.2"));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(OllamaStatus::Running.to_string(), "Ollama Running");
        assert_eq!(OllamaStatus::Unreachable.to_string(), "Ollama Not Detected");
        assert_eq!(
            OllamaStatus::Error { status: 503 }.to_string(),
            "Ollama Error (Status: 503)"
        );
    }

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let config = OllamaConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..OllamaConfig::default()
        };
        let agent = OllamaAgent::from_config(&config);
        assert_eq!(agent.tags_url(), "http://localhost:11434/api/tags");
    }
}
