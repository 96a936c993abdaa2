//! The authoritative in-memory note collection.
//!
//! Every mutation writes the whole collection through to the [NoteStore].
//! If that write fails the mutation is undone, so memory and the stored blob
//! never disagree.

use super::{errors::NoteError, models::Note, store::NoteStore};
use chrono::{SubsecRound, Utc};
use std::collections::HashSet;
use uuid::Uuid;

pub struct NoteRepository {
    notes: Vec<Note>,
    store: NoteStore,
}

/// Trim both fields, rejecting the pair if either ends up empty.
pub fn validate(title: &str, content: &str) -> Result<(String, String), NoteError> {
    let (title, content) = (title.trim(), content.trim());
    if title.is_empty() || content.is_empty() {
        return Err(NoteError::Validation);
    }
    Ok((title.to_string(), content.to_string()))
}

impl NoteRepository {
    /// Load whatever the store holds (or nothing) and take ownership of it.
    pub fn init(store: NoteStore) -> Self {
        let notes = sanitize(store.load());
        let repo = NoteRepository { notes, store };
        if repo.is_empty() {
            tracing::info!(key = repo.store.key(), "starting with no notes");
        } else {
            tracing::info!(count = repo.len(), key = repo.store.key(), "loaded notes");
        }
        repo
    }

    /// Newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&Note, NoteError> {
        self.notes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))
    }

    /// Case-insensitive substring search over title and content. Order is
    /// the collection order; nothing is ranked.
    pub fn search(&self, query: &str) -> Vec<&Note> {
        if query.is_empty() {
            return self.notes.iter().collect();
        }
        let needle = query.to_lowercase();
        self.notes.iter().filter(|n| n.matches(&needle)).collect()
    }

    pub fn add(&mut self, title: &str, content: &str) -> Result<Note, NoteError> {
        let (title, content) = validate(title, content)?;
        let note = Note {
            id: self.fresh_id(),
            title,
            content,
            // the blob keeps milliseconds; so must memory
            created_at: Utc::now().trunc_subsecs(3),
        };
        self.mutate(|notes| notes.insert(0, note.clone()))?;
        tracing::debug!(id = %note.id, "added note");
        Ok(note)
    }

    pub fn update(
        &mut self,
        id: &str,
        title: &str,
        content: &str,
    ) -> Result<Note, NoteError> {
        let (title, content) = validate(title, content)?;
        let idx = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| NoteError::NotFound(id.to_string()))?;
        self.mutate(|notes| {
            notes[idx].title = title;
            notes[idx].content = content;
        })?;
        tracing::debug!(id, "updated note");
        Ok(self.notes[idx].clone())
    }

    /// Deleting an id that is not there is fine; the collection is still
    /// written back.
    pub fn delete(&mut self, id: &str) -> Result<(), NoteError> {
        let before = self.notes.len();
        self.mutate(|notes| notes.retain(|n| n.id != id))?;
        if self.notes.len() != before {
            tracing::debug!(id, "deleted note");
        }
        Ok(())
    }

    fn mutate<F>(&mut self, f: F) -> Result<(), NoteError>
    where
        F: FnOnce(&mut Vec<Note>),
    {
        let previous = self.notes.clone();
        f(&mut self.notes);
        if let Err(e) = self.store.save(&self.notes) {
            self.notes = previous;
            tracing::error!(error = %e, "write-through failed; change rolled back");
            return Err(e.into());
        }
        Ok(())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.notes.iter().any(|n| n.id == id) {
                return id;
            }
        }
    }
}

/// Drop entries that would break the collection invariants: repeated ids
/// (the first occurrence wins) and blank fields.
fn sanitize(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    let total = notes.len();
    let kept: Vec<Note> = notes
        .into_iter()
        .filter(|n| {
            !n.title.trim().is_empty()
                && !n.content.trim().is_empty()
                && seen.insert(n.id.clone())
        })
        .collect();
    if kept.len() != total {
        tracing::warn!(
            dropped = total - kept.len(),
            "ignored stored notes with blank fields or duplicate ids"
        );
    }
    kept
}
