//! Interaction layer for Fabula: the language-model collaborator that turns
//! a set of emojis into a short story.

pub mod ollama;

use async_trait::async_trait;
use thiserror::Error;

pub use ollama::{OllamaAgent, OllamaStatus};

/// Errors from the story-generation collaborator.
#[derive(Error, Debug)]
pub enum StoryAgentError {
    #[error("request to Ollama failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ollama returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model '{model}' is not available; pulled models: {}", .available.join(", "))]
    ModelUnavailable {
        model: String,
        available: Vec<String>,
    },

    #[error("Ollama returned an empty story")]
    EmptyStory,
}

/// A collaborator that generates a story from a set of emojis.
///
/// Abstracting over the concrete client keeps the application layer testable
/// without a running server.
#[async_trait]
pub trait StoryAgent: Send + Sync {
    async fn generate_story(&self, emojis: &[String]) -> Result<String, StoryAgentError>;
}
