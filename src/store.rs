//! Persistence for the note collection.
//!
//! The collection lives as one JSON blob under one key of a [BlobStore].
//! [NoteStore] is the only thing that knows the blob layout; the repository
//! above it only ever hands over the complete collection.

use super::{errors::StoreError, models::Note};
use std::{
    fs,
    io::{ErrorKind, Write},
    path::PathBuf,
};

/// A key-value store of string blobs. Each `set` replaces the whole blob.
pub trait BlobStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Creates `dir` if it does not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileBlobStore { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        let target = self.path_for(key)?;
        // rename is atomic on the same filesystem: readers see either the old
        // blob or the new one, never a torn write
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(blob.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &target)?;
        Ok(())
    }
}

pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// In-process blob store; nothing survives the process.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    pub blobs: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Serializes the note collection under a single key.
pub struct NoteStore {
    blobs: Box<dyn BlobStore>,
    key: String,
}

impl NoteStore {
    pub fn new(
        blobs: Box<dyn BlobStore>,
        key: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let key = key.into();
        validate_key(&key)?;
        Ok(NoteStore { blobs, key })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Missing, unreadable and corrupt blobs all come back as an empty
    /// collection. The next `save` overwrites whatever was there.
    pub fn load(&self) -> Vec<Note> {
        let blob = match self.blobs.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored notes yet");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not read stored notes; starting empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Note>>(&blob) {
            Ok(notes) => notes,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "stored notes are corrupt; starting empty");
                Vec::new()
            }
        }
    }

    pub fn save(&mut self, notes: &[Note]) -> Result<(), StoreError> {
        let blob = serde_json::to_string(notes)?;
        self.blobs.set(&self.key, &blob)
    }

    #[cfg(test)]
    pub fn into_blobs(self) -> Box<dyn BlobStore> {
        self.blobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: id.into(),
            title: title.into(),
            content: format!("{title} body"),
            created_at: Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap(),
        }
    }

    fn memory_store() -> NoteStore {
        NoteStore::new(Box::<MemoryBlobStore>::default(), "notes").unwrap()
    }

    #[test]
    fn test_missing_blob_loads_empty() {
        assert!(memory_store().load().is_empty());
    }

    #[test]
    fn test_corrupt_blob_loads_empty() {
        let mut blobs = MemoryBlobStore::default();
        blobs.blobs.insert("notes".into(), "{not json".into());
        let store = NoteStore::new(Box::new(blobs), "notes").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        let mut blobs = MemoryBlobStore::default();
        blobs
            .blobs
            .insert("notes".into(), r#"[{"id": 1, "title": "x"}]"#.into());
        let store = NoteStore::new(Box::new(blobs), "notes").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = memory_store();
        let notes = vec![note("b", "Second"), note("a", "First")];
        store.save(&notes).unwrap();
        assert_eq!(store.load(), notes);
    }

    #[test]
    fn test_save_replaces_whole_blob() {
        let mut store = memory_store();
        store.save(&[note("a", "First"), note("b", "Second")]).unwrap();
        store.save(&[note("c", "Third")]).unwrap();
        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "c");
    }

    #[test]
    fn test_blob_is_a_plain_json_array() {
        let mut store = memory_store();
        store.save(&[note("a", "First")]).unwrap();
        let blobs = store.into_blobs();
        let raw = blobs.get("notes").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["createdAt"], "2025-02-01T09:00:00.000Z");
    }

    #[test]
    fn test_key_validation() {
        assert!(validate_key("notes").is_ok());
        assert!(validate_key("my_notes-2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../notes").is_err());
        assert!(validate_key("a b").is_err());
        assert!(NoteStore::new(Box::<MemoryBlobStore>::default(), "x/y").is_err());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut blobs = FileBlobStore::open(dir.path().join("nested")).unwrap();
        assert_eq!(blobs.get("notes").unwrap(), None);
        blobs.set("notes", "[]").unwrap();
        blobs.set("notes", "[1]").unwrap();
        assert_eq!(blobs.get("notes").unwrap().as_deref(), Some("[1]"));
        assert!(dir.path().join("nested").join("notes.json").exists());
        assert!(!dir.path().join("nested").join(".notes.json.tmp").exists());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let blobs = FileBlobStore::open(dir.path()).unwrap();
            let mut store = NoteStore::new(Box::new(blobs), "notes").unwrap();
            store.save(&[note("a", "First")]).unwrap();
        }
        let blobs = FileBlobStore::open(dir.path()).unwrap();
        let store = NoteStore::new(Box::new(blobs), "notes").unwrap();
        assert_eq!(store.load(), vec![note("a", "First")]);
    }

    #[test]
    fn test_file_store_rejects_bad_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut blobs = FileBlobStore::open(dir.path()).unwrap();
        assert!(matches!(
            blobs.set("../escape", "[]"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
