// In many cases, we need to do a let binding to satisfy the borrow checker
// and for some reason, clippy identifies those as unnecessary.
#![allow(clippy::let_and_return)]

use super::{
    config::PREVIEW_CHARS,
    detail_view::DetailView,
    list_view::ListView,
    models::Note,
};
use ammonia::clean_text;
use std::fmt::Write;

pub trait Component {
    /// Render the component to a HTML string. By convention, the
    /// implementation should sanitize all string properties at render-time
    fn render(&self) -> String;
}

pub struct Page<'a> {
    pub title: &'a str,
    pub children: Box<dyn Component + 'a>,
}

impl Component for Page<'_> {
    fn render(&self) -> String {
        format!(
            r#"
            <!DOCTYPE html>
            <html lang="en">
                <head>
                    <meta charset="utf-8" />
                    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
                    <title>{title}</title>
                    <link rel="stylesheet" href="/static/style.css" />
                </head>
                <body hx-boost="true">
                    {body_html}
                    <script src="/static/htmx.min.js"></script>
                    <script>
                        // not-found pages and rejected forms are still pages
                        document.body.addEventListener("htmx:beforeSwap", (e) => {{
                            if ([404, 422].includes(e.detail.xhr.status)) {{
                                e.detail.shouldSwap = true;
                                e.detail.isError = false;
                            }}
                        }});
                    </script>
                </body>
            </html>
            "#,
            title = clean_text(self.title),
            body_html = self.children.render()
        )
    }
}

pub struct Home;
impl Component for Home {
    fn render(&self) -> String {
        r#"
        <main class="center">
            <div class="hero">
                <h1>Notes App</h1>
                <p class="muted">A beautiful place to capture your thoughts, ideas, and inspirations.</p>
                <a class="button" href="/notes">Start Writing</a>
            </div>
        </main>
        "#
        .to_string()
    }
}

/// `Jan 5, 2025`
pub fn short_date(note: &Note) -> String {
    note.created_at.format("%b %-d, %Y").to_string()
}

/// `Sunday, January 5, 2025`
pub fn long_date(note: &Note) -> String {
    note.created_at.format("%A, %B %-d, %Y").to_string()
}

fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

fn hidden(name: &str, value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => format!(
            r#"<input type="hidden" name="{name}" value="{}" />"#,
            clean_text(v)
        ),
        _ => "".to_string(),
    }
}

pub struct NoteForm<'a> {
    pub view: &'a ListView,
}
impl Component for NoteForm<'_> {
    fn render(&self) -> String {
        let editing = self.view.editing_id();
        let (heading, submit_label) = if editing.is_some() {
            ("Edit Note", "Update Note")
        } else {
            ("Create New Note", "Add Note")
        };
        let cancel = if editing.is_some() {
            let mut creating = self.view.clone();
            creating.cancel();
            format!(
                r#"<a class="button outline" href="{}">Cancel</a>"#,
                clean_text(&creating.href())
            )
        } else {
            "".to_string()
        };
        let editing_field = hidden("editing", editing);
        let query_field = hidden("q", Some(&self.view.query));
        let title = clean_text(&self.view.form.title);
        let content = clean_text(&self.view.form.content);
        format!(
            r#"
            <section class="card" id="note-form">
                <h2>{heading}</h2>
                <form method="post" action="/notes">
                    {editing_field}
                    {query_field}
                    <input
                        type="text"
                        name="title"
                        placeholder="Note title..."
                        value="{title}"
                        required
                    />
                    <textarea
                        name="content"
                        rows="6"
                        placeholder="Write your note here..."
                        required
                    >{content}</textarea>
                    <div class="row">
                        <button type="submit">{submit_label}</button>
                        {cancel}
                    </div>
                </form>
                <script>
                    (() => {{
                        const form = document.currentScript.previousElementSibling;
                        const button = form.querySelector("button[type=submit]");
                        const sync = () => {{
                            button.disabled = !form.elements["title"].value.trim()
                                || !form.elements["content"].value.trim();
                        }};
                        form.addEventListener("input", sync);
                        sync();
                    }})();
                </script>
            </section>
            "#
        )
    }
}

pub struct SearchBar<'a> {
    pub view: &'a ListView,
}
impl Component for SearchBar<'_> {
    fn render(&self) -> String {
        let query = clean_text(&self.view.query);
        let editing_field = hidden("edit", self.view.editing_id());
        format!(
            r#"
            <form class="search" method="get" action="/notes">
                {editing_field}
                <input type="search" name="q" placeholder="Search notes..." value="{query}" />
            </form>
            "#
        )
    }
}

pub struct NoteCard<'a> {
    pub note: &'a Note,
    pub view: &'a ListView,
}
impl Component for NoteCard<'_> {
    fn render(&self) -> String {
        let id = urlencode(&self.note.id);
        let mut edit_view = self.view.clone();
        edit_view.select_for_edit(self.note);
        let edit_href = clean_text(&edit_view.href());
        let title = clean_text(&self.note.title);
        let preview = clean_text(&preview(&self.note.content));
        let date = short_date(self.note);
        let editing_field = hidden("editing", self.view.editing_id());
        let query_field = hidden("q", Some(&self.view.query));
        format!(
            r#"
            <article class="card note">
                <a class="grow" href="/notes/{id}">
                    <h3>{title}</h3>
                    <p class="muted clamp">{preview}</p>
                    <p class="muted small">{date}</p>
                </a>
                <div class="actions">
                    <a class="button ghost" href="{edit_href}" title="Edit note">Edit</a>
                    <form method="post" action="/notes/{id}/delete">
                        {editing_field}
                        {query_field}
                        <button class="ghost danger" title="Delete note">Delete</button>
                    </form>
                </div>
            </article>
            "#
        )
    }
}

pub struct NoteList<'a> {
    pub notes: &'a [&'a Note],
    pub view: &'a ListView,
}
impl Component for NoteList<'_> {
    fn render(&self) -> String {
        if self.notes.is_empty() {
            let message = if self.view.query.is_empty() {
                "No notes yet. Create your first note above!"
            } else {
                "No notes found matching your search"
            };
            return format!(
                r#"
                <div class="empty">
                    <p class="muted">{message}</p>
                </div>
                "#
            );
        };
        let cards = self.notes.iter().fold(String::new(), |mut acc, &note| {
            let _ = write!(acc, "{}", NoteCard { note, view: self.view }.render());
            acc
        });
        format!(r#"<div class="grid">{cards}</div>"#)
    }
}

/// The whole list page: form, search (once there is anything to search) and
/// the filtered list.
pub struct NotesOverview<'a> {
    pub view: &'a ListView,
    pub notes: &'a [&'a Note],
    pub total: usize,
}
impl Component for NotesOverview<'_> {
    fn render(&self) -> String {
        let form = NoteForm { view: self.view }.render();
        let search = if self.total > 0 {
            SearchBar { view: self.view }.render()
        } else {
            "".to_string()
        };
        let list = NoteList {
            notes: self.notes,
            view: self.view,
        }
        .render();
        format!(
            r#"
            <main class="container">
                <header>
                    <h1>My Notes</h1>
                    <p class="muted">Capture your thoughts and ideas</p>
                </header>
                {form}
                {search}
                {list}
            </main>
            "#
        )
    }
}

impl Component for DetailView {
    fn render(&self) -> String {
        let note = match self {
            DetailView::Found(note) => note,
            DetailView::NotFound => {
                return r#"
                <main class="center">
                    <div class="card narrow">
                        <h2>Note not found</h2>
                        <p class="muted">The note you're looking for doesn't exist or has been deleted.</p>
                        <a class="button" href="/notes">Back to Notes</a>
                    </div>
                </main>
                "#
                .to_string();
            }
        };
        let id = urlencode(&note.id);
        let title = clean_text(&note.title);
        let content = clean_text(&note.content);
        let date = long_date(note);
        let rendered = format!(
            r#"
            <main class="container narrow">
                <a class="button ghost" href="/notes">Back to all notes</a>
                <div class="row spread">
                    <h1>{title}</h1>
                    <div class="actions">
                        <a class="button outline" href="/notes?edit={id}" title="Edit note">Edit</a>
                        <form method="post" action="/notes/{id}/delete">
                            <button
                                class="outline danger"
                                title="Delete note"
                                hx-delete="/notes/{id}"
                            >Delete</button>
                        </form>
                    </div>
                </div>
                <p class="muted"><time>{date}</time></p>
                <div class="card">
                    <p class="pre">{content}</p>
                </div>
            </main>
            "#
        );
        rendered
    }
}

fn urlencode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_view::FormMode;
    use chrono::{TimeZone, Utc};

    fn note() -> Note {
        Note {
            id: "n1".into(),
            title: "<b>Groceries</b>".into(),
            content: "Milk, eggs".into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_dates() {
        assert_eq!(short_date(&note()), "Jan 5, 2025");
        assert_eq!(long_date(&note()), "Sunday, January 5, 2025");
    }

    #[test]
    fn test_preview_truncates() {
        let long = "x".repeat(PREVIEW_CHARS + 10);
        let p = preview(&long);
        assert!(p.ends_with('…'));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_form_labels_follow_mode() {
        let mut view = ListView::new("");
        let creating = NoteForm { view: &view }.render();
        assert!(creating.contains("Create New Note"));
        assert!(creating.contains("Add Note"));
        assert!(!creating.contains("Cancel"));

        view.mode = FormMode::Editing("n1".into());
        let editing = NoteForm { view: &view }.render();
        assert!(editing.contains("Edit Note"));
        assert!(editing.contains("Update Note"));
        assert!(editing.contains("Cancel"));
        assert!(editing.contains(r#"name="editing" value="n1""#));
    }

    #[test]
    fn test_markup_is_escaped() {
        let n = note();
        let view = ListView::new("");
        let card = NoteCard {
            note: &n,
            view: &view,
        }
        .render();
        assert!(!card.contains("<b>"));
        assert!(card.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_empty_messages() {
        let view = ListView::new("");
        assert!(NoteList { notes: &[], view: &view }
            .render()
            .contains("No notes yet"));
        let searching = ListView::new("zzz");
        assert!(NoteList {
            notes: &[],
            view: &searching
        }
        .render()
        .contains("No notes found matching your search"));
    }

    #[test]
    fn test_search_hidden_without_notes() {
        let view = ListView::new("");
        let empty = NotesOverview {
            view: &view,
            notes: &[],
            total: 0,
        }
        .render();
        assert!(!empty.contains("Search notes..."));

        let n = note();
        let notes = [&n];
        let full = NotesOverview {
            view: &view,
            notes: &notes,
            total: 1,
        }
        .render();
        assert!(full.contains("Search notes..."));
        assert!(full.contains("/notes/n1"));
    }

    #[test]
    fn test_detail_states() {
        let found = DetailView::Found(note()).render();
        assert!(found.contains("Sunday, January 5, 2025"));
        assert!(found.contains(r#"hx-delete="/notes/n1""#));
        let missing = DetailView::NotFound.render();
        assert!(missing.contains("Note not found"));
        assert!(missing.contains("Back to Notes"));
    }
}
