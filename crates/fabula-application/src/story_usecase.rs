//! Story session use case.
//!
//! `StorySessionService` is the interaction controller: it draws emojis,
//! generates the optional story, builds the fully-populated record (id and
//! timestamp included), and persists it through the repository. Records are
//! immutable once written, so the story is generated before the append, never
//! patched in afterwards.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use fabula_core::emoji::{Draw, EmojiDeck};
use fabula_core::session::{SessionLogRepository, SessionRecord};
use fabula_interaction::StoryAgent;

/// Parameters for one new session.
#[derive(Debug, Clone)]
pub struct NewSessionRequest {
    /// How many emojis to draw, clamped to the record bounds.
    pub count: usize,
    /// The user's note, possibly empty.
    pub note: String,
    /// Whether to ask the story agent for a story before saving.
    pub with_story: bool,
}

/// Orchestrates emoji drawing, story generation, and persistence.
pub struct StorySessionService {
    repository: Arc<dyn SessionLogRepository>,
    deck: Mutex<EmojiDeck>,
    story_agent: Option<Arc<dyn StoryAgent>>,
}

impl StorySessionService {
    /// Creates a service over the given repository. Pass a story agent to
    /// enable generation; without one, `with_story` requests fail.
    pub fn new(
        repository: Arc<dyn SessionLogRepository>,
        story_agent: Option<Arc<dyn StoryAgent>>,
    ) -> Self {
        Self {
            repository,
            deck: Mutex::new(EmojiDeck::new()),
            story_agent,
        }
    }

    /// Replaces the deck, e.g. with a custom pool.
    pub fn with_deck(mut self, deck: EmojiDeck) -> Self {
        self.deck = Mutex::new(deck);
        self
    }

    /// Draws emojis for a new session and records them as shown.
    pub fn draw_emojis(&self, count: usize) -> Draw {
        let draw = self.deck.lock().expect("deck lock poisoned").draw(count);
        if draw.reset {
            tracing::info!("emoji pool exhausted, tracking reset");
        }
        draw
    }

    /// Forgets which emojis have been shown.
    pub fn reset_deck(&self) {
        self.deck.lock().expect("deck lock poisoned").reset();
    }

    /// Draws emojis, optionally generates a story, and persists one record.
    ///
    /// Story generation happens before the append; if it fails the session
    /// is not saved and the caller may retry without a story.
    pub async fn create_session(&self, request: NewSessionRequest) -> Result<SessionRecord> {
        let draw = self.draw_emojis(request.count);

        let story = if request.with_story {
            let agent = self
                .story_agent
                .as_ref()
                .context("story generation requested but no story agent is configured")?;
            let story = agent
                .generate_story(&draw.emojis)
                .await
                .context("story generation failed")?;
            Some(story)
        } else {
            None
        };

        let record = SessionRecord::new(draw.emojis, request.note, story);
        self.repository
            .append(&record)
            .context("could not save session")?;

        tracing::info!(id = %record.id, emojis = record.emojis.len(), "session saved");
        Ok(record)
    }

    /// Returns the full persisted history, oldest first.
    pub fn history(&self) -> Result<Vec<SessionRecord>> {
        self.repository
            .read_all()
            .context("could not load session history")
    }
}
