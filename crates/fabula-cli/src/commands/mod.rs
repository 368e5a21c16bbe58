pub mod history;
pub mod new;
pub mod status;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use fabula_application::StorySessionService;
use fabula_core::AppConfig;
use fabula_infrastructure::JsonSessionStore;
use fabula_interaction::{OllamaAgent, StoryAgent};

/// Builds the session service over the store at `data_dir`.
pub fn build_service(
    config: &AppConfig,
    data_dir: &Path,
    story_agent: Option<Arc<dyn StoryAgent>>,
) -> Result<StorySessionService> {
    let store = JsonSessionStore::new(data_dir)?
        .with_lock_timeout(Duration::from_millis(config.store.lock_timeout_ms));
    Ok(StorySessionService::new(Arc::new(store), story_agent))
}

/// Builds the Ollama agent, optionally overriding the configured model.
pub fn build_agent(config: &AppConfig, model: Option<String>) -> OllamaAgent {
    let agent = OllamaAgent::from_config(&config.ollama);
    match model {
        Some(model) => agent.with_model(model),
        None => agent,
    }
}
