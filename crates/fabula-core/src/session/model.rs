//! Session domain model.
//!
//! One [`SessionRecord`] is one user interaction: the emojis that were shown,
//! the note the user attached, and optionally the story a local language
//! model generated for them. The [`SessionLog`] is the append-only aggregate
//! that gets persisted as a whole.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Minimum number of emojis in a record.
pub const MIN_EMOJIS: usize = 1;
/// Maximum number of emojis in a record.
pub const MAX_EMOJIS: usize = 10;

/// Timestamp format used for record timestamps: UTC with microsecond
/// precision and an explicit `Z` marker, lexically sortable.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Returns the current moment formatted with [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// One persisted user interaction.
///
/// Records are immutable once durably written: a record carries its story
/// (if any) at append time, it is never updated in place afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque unique identifier (UUID v4 text), never reused.
    #[serde(rename = "session_id")]
    pub id: String,
    /// Creation moment in [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// Displayed emojis, in display order, 1 to 10 entries.
    pub emojis: Vec<String>,
    /// Free-form user note, possibly empty.
    #[serde(rename = "notes")]
    pub note: String,
    /// Story generated by the language-model collaborator, absent until
    /// generation completed before the record was saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_story: Option<String>,
}

impl SessionRecord {
    /// Builds a fully-populated record with a fresh id and timestamp.
    pub fn new(emojis: Vec<String>, note: impl Into<String>, generated_story: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: now_timestamp(),
            emojis,
            note: note.into(),
            generated_story,
        }
    }

    /// Validates the structural shape of the record.
    ///
    /// Checked: non-empty id, a parseable timestamp, and an emoji count in
    /// `[MIN_EMOJIS, MAX_EMOJIS]` with no empty tokens. Emoji uniqueness is
    /// the producer's responsibility and is not re-checked here.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.id.is_empty() {
            return Err(StoreError::invalid("record id must not be empty"));
        }
        if chrono::DateTime::parse_from_rfc3339(&self.timestamp).is_err() {
            return Err(StoreError::invalid(format!(
                "timestamp '{}' is not a valid UTC timestamp",
                self.timestamp
            )));
        }
        if self.emojis.len() < MIN_EMOJIS || self.emojis.len() > MAX_EMOJIS {
            return Err(StoreError::invalid(format!(
                "emoji count must be between {} and {}, got {}",
                MIN_EMOJIS,
                MAX_EMOJIS,
                self.emojis.len()
            )));
        }
        if self.emojis.iter().any(|e| e.is_empty()) {
            return Err(StoreError::invalid("emoji tokens must not be empty"));
        }
        Ok(())
    }
}

/// The persisted aggregate: every record ever appended, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    pub sessions: Vec<SessionRecord>,
}

impl SessionLog {
    /// True if a record with the given id is already present.
    pub fn contains_id(&self, id: &str) -> bool {
        self.sessions.iter().any(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> SessionRecord {
        SessionRecord {
            id: "a1".to_string(),
            timestamp: "2025-01-01T00:00:00.000000Z".to_string(),
            emojis: vec!["😀".to_string(), "🚀".to_string()],
            note: "first".to_string(),
            generated_story: None,
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(valid_record().validate().is_ok());
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut record = valid_record();
        record.id = String::new();
        assert!(record.validate().unwrap_err().is_invalid_record());
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let mut record = valid_record();
        record.timestamp = "yesterday".to_string();
        assert!(record.validate().unwrap_err().is_invalid_record());
    }

    #[test]
    fn test_emoji_count_bounds() {
        let mut record = valid_record();
        record.emojis = vec![];
        assert!(record.validate().is_err());

        record.emojis = vec!["🎉".to_string(); 11];
        assert!(record.validate().is_err());

        record.emojis = vec!["🎉".to_string(); 10];
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_empty_emoji_token_rejected() {
        let mut record = valid_record();
        record.emojis = vec!["😀".to_string(), String::new()];
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_empty_note_is_fine() {
        let mut record = valid_record();
        record.note = String::new();
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_new_record_has_parseable_timestamp() {
        let record = SessionRecord::new(vec!["😀".to_string()], "", None);
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
        assert!(record.timestamp.ends_with('Z'));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_new_records_have_unique_ids() {
        let a = SessionRecord::new(vec!["😀".to_string()], "", None);
        let b = SessionRecord::new(vec!["😀".to_string()], "", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_json_field_names_and_story_omission() {
        let record = valid_record();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("session_id").is_some());
        assert!(json.get("notes").is_some());
        assert!(json.get("generated_story").is_none());

        let mut with_story = valid_record();
        with_story.generated_story = Some("Once upon a time".to_string());
        let json = serde_json::to_value(&with_story).unwrap();
        assert_eq!(
            json.get("generated_story").and_then(|v| v.as_str()),
            Some("Once upon a time")
        );
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let mut record = valid_record();
        record.generated_story = Some("A story".to_string());
        let json = serde_json::to_string(&record).unwrap();
        let back: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_timestamps_sort_lexically() {
        let earlier = "2025-01-01T00:00:00.000001Z";
        let later = "2025-01-01T00:00:00.000002Z";
        assert!(earlier < later);
    }

    #[test]
    fn test_log_contains_id() {
        let log = SessionLog {
            sessions: vec![valid_record()],
        };
        assert!(log.contains_id("a1"));
        assert!(!log.contains_id("a2"));
    }
}
