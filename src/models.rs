use super::{errors::ServerError, repo::NoteRepository};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
};

/// A single persisted note. The serialized form is the stored blob layout:
/// `{id, title, content, createdAt}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
            || self.content.to_lowercase().contains(needle_lower)
    }
}

/// Timestamps are written the way a browser's `Date.toISOString` writes
/// them, so existing blobs and ours stay interchangeable.
mod iso8601 {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer
            .serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc).trunc_subsecs(3))
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<Mutex<NoteRepository>>,
    pub assets_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(repo: NoteRepository, assets_dir: impl Into<PathBuf>) -> Self {
        AppState {
            notes: Arc::new(Mutex::new(repo)),
            assets_dir: Arc::new(assets_dir.into()),
        }
    }

    /// Lock the repository for the duration of one operation. The guard must
    /// not be held across an `.await`.
    pub fn repo(&self) -> Result<MutexGuard<'_, NoteRepository>, ServerError> {
        self.notes
            .lock()
            .map_err(|_| anyhow!("note repository lock was poisoned").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Note {
        Note {
            id: "1700000000000".into(),
            title: "Groceries".into(),
            content: "Milk, eggs".into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 5, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_serialized_layout() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "1700000000000",
                "title": "Groceries",
                "content": "Milk, eggs",
                "createdAt": "2025-01-05T12:30:00.000Z",
            })
        );
    }

    #[test]
    fn test_accepts_browser_timestamps() {
        let note: Note = serde_json::from_str(
            r#"{"id":"a","title":"t","content":"c","createdAt":"2024-03-01T08:15:30.250Z"}"#,
        )
        .unwrap();
        assert_eq!(note.created_at.timestamp_millis(), 1709280930250);
    }

    #[test]
    fn test_finer_timestamps_load_as_millis() {
        let blob = r#"{"id":"a","title":"t","content":"c","createdAt":"2024-03-01T08:15:30.250999Z"}"#;
        let note: Note = serde_json::from_str(blob).unwrap();
        let again: Note =
            serde_json::from_str(&serde_json::to_string(&note).unwrap()).unwrap();
        assert_eq!(note.created_at.timestamp_subsec_nanos(), 250_000_000);
        assert_eq!(again, note);
    }

    #[test]
    fn test_rejects_garbage_timestamp() {
        let parsed: Result<Note, _> = serde_json::from_str(
            r#"{"id":"a","title":"t","content":"c","createdAt":"yesterday"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_matches_title_or_content() {
        let note = sample();
        assert!(note.matches("grocer"));
        assert!(note.matches("milk"));
        assert!(!note.matches("bread"));
    }
}
