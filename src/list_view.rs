//! State behind the notes list page: the search query and the create/edit
//! form. The page is rebuilt on every request, so the state is carried in
//! the URL (`q`, `edit`) and in the submitted form (`editing`).

use super::{
    errors::NoteError,
    models::Note,
    repo::{validate, NoteRepository},
};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormInput {
    pub title: String,
    pub content: String,
}

/// Query string of `GET /notes`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub edit: Option<String>,
}

/// Body of `POST /notes`.
#[derive(Debug, Deserialize)]
pub struct ListSubmission {
    pub title: String,
    pub content: String,
    pub editing: Option<String>,
    pub q: Option<String>,
}

/// Body of `POST /notes/:id/delete`; both fields describe the list page the
/// delete came from.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteSubmission {
    pub editing: Option<String>,
    pub q: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListView {
    pub mode: FormMode,
    pub form: FormInput,
    pub query: String,
}

/// Empty form fields arrive as `Some("")`; treat them like missing ones.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ListView {
    pub fn new(query: impl Into<String>) -> Self {
        ListView {
            mode: FormMode::Creating,
            form: FormInput::default(),
            query: query.into(),
        }
    }

    /// Rebuild the page state from the URL. An `edit` id that no longer
    /// resolves leaves the form in `Creating`.
    pub fn restore(repo: &NoteRepository, params: ListParams) -> Self {
        let mut view = ListView::new(params.q.unwrap_or_default());
        if let Some(id) = non_empty(params.edit) {
            match repo.get(&id) {
                Ok(note) => view.select_for_edit(note),
                Err(_) => tracing::debug!(id = %id, "edit target is gone"),
            }
        }
        view
    }

    /// Rebuild the page state from a submitted form, inputs included.
    pub fn from_submission(submission: ListSubmission) -> Self {
        ListView {
            mode: match non_empty(submission.editing) {
                Some(id) => FormMode::Editing(id),
                None => FormMode::Creating,
            },
            form: FormInput {
                title: submission.title,
                content: submission.content,
            },
            query: submission.q.unwrap_or_default(),
        }
    }

    pub fn select_for_edit(&mut self, note: &Note) {
        self.mode = FormMode::Editing(note.id.clone());
        self.form = FormInput {
            title: note.title.clone(),
            content: note.content.clone(),
        };
    }

    pub fn cancel(&mut self) {
        self.mode = FormMode::Creating;
        self.form = FormInput::default();
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Editing(id) => Some(id),
            FormMode::Creating => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        validate(&self.form.title, &self.form.content).is_ok()
    }

    /// `add` while creating, `update` while editing; blank inputs never reach
    /// the repository. A successful submit returns the form to `Creating` and
    /// clears it. A validation failure keeps everything as it was. If the note
    /// being edited has vanished the form drops back to `Creating` but keeps
    /// the inputs.
    pub fn submit(&mut self, repo: &mut NoteRepository) -> Result<Note, NoteError> {
        if !self.can_submit() {
            return Err(NoteError::Validation);
        }
        let result = match &self.mode {
            FormMode::Creating => repo.add(&self.form.title, &self.form.content),
            FormMode::Editing(id) => {
                repo.update(id, &self.form.title, &self.form.content)
            }
        };
        match &result {
            Ok(_) => self.cancel(),
            Err(NoteError::NotFound(_)) => self.mode = FormMode::Creating,
            Err(_) => {}
        }
        result
    }

    /// Deleting the note under edit resets the form.
    pub fn delete(
        &mut self,
        repo: &mut NoteRepository,
        id: &str,
    ) -> Result<(), NoteError> {
        repo.delete(id)?;
        if self.editing_id() == Some(id) {
            self.cancel();
        }
        Ok(())
    }

    pub fn visible<'a>(&self, repo: &'a NoteRepository) -> Vec<&'a Note> {
        repo.search(&self.query)
    }

    /// URL that reproduces this view with `GET /notes`. Form inputs are not
    /// part of it; they are refilled from the note when editing.
    pub fn href(&self) -> String {
        let mut params = Vec::new();
        if !self.query.is_empty() {
            params.push(format!("q={}", urlencoding::encode(&self.query)));
        }
        if let Some(id) = self.editing_id() {
            params.push(format!("edit={}", urlencoding::encode(id)));
        }
        if params.is_empty() {
            "/notes".to_string()
        } else {
            format!("/notes?{}", params.join("&"))
        }
    }
}
