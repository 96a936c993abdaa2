use super::{errors::NoteError, models::Note, repo::NoteRepository};

/// Where the detail page goes once its note is deleted.
pub const AFTER_DELETE: &str = "/notes";

/// A missing note is an ordinary state of the page, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailView {
    Found(Note),
    NotFound,
}

impl DetailView {
    pub fn resolve(repo: &NoteRepository, id: &str) -> Self {
        match repo.get(id) {
            Ok(note) => DetailView::Found(note.clone()),
            Err(_) => DetailView::NotFound,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            DetailView::Found(note) => &note.title,
            DetailView::NotFound => "Note not found",
        }
    }

    /// Remove the note and hand back the page to navigate to.
    pub fn delete(
        repo: &mut NoteRepository,
        id: &str,
    ) -> Result<&'static str, NoteError> {
        repo.delete(id)?;
        Ok(AFTER_DELETE)
    }
}
