use super::{
    components,
    components::{Component, Page},
    detail_view::DetailView,
    errors::{NoteError, ServerError},
    extractors::HxRequest,
    htmx,
    list_view::{DeleteSubmission, ListParams, ListSubmission, ListView},
    models::AppState,
    repo::NoteRepository,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use std::io::ErrorKind;

const HTMX_FILE: &str = "htmx.min.js";

/// Full page for normal navigation, the bare component for htmx partials.
fn page<'a>(
    hx: &HxRequest,
    title: &'a str,
    body: impl Component + 'a,
) -> Html<String> {
    Html(if hx.wants_fragment() {
        body.render()
    } else {
        Page {
            title,
            children: Box::new(body),
        }
        .render()
    })
}

fn render_list(
    repo: &NoteRepository,
    view: &ListView,
    hx: &HxRequest,
) -> Html<String> {
    let notes = view.visible(repo);
    page(
        hx,
        "My Notes",
        components::NotesOverview {
            view,
            notes: &notes,
            total: repo.len(),
        },
    )
}

pub async fn root(hx: HxRequest) -> impl IntoResponse {
    page(&hx, "Notes App", components::Home)
}

pub async fn pong() -> impl IntoResponse {
    "pong"
}

pub async fn get_stylesheet() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/css; charset=utf-8"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );
    (headers, include_str!("./style.css"))
}

/// htmx is read from the assets directory on each request; without it the
/// pages fall back to plain forms and links.
pub async fn get_htmx_js(
    State(state): State<AppState>,
) -> Result<Response, ServerError> {
    let path = state.assets_dir.join(HTMX_FILE);
    let js = match tokio::fs::read_to_string(&path).await {
        Ok(js) => js,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "htmx is not installed");
            return Ok(StatusCode::NOT_FOUND.into_response());
        }
        Err(e) => return Err(e.into()),
    };
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/javascript; charset=utf-8"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400"),
    );
    Ok((headers, js).into_response())
}

pub async fn list_notes(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    hx: HxRequest,
) -> Result<impl IntoResponse, ServerError> {
    let repo = state.repo()?;
    let view = ListView::restore(&repo, params);
    Ok(render_list(&repo, &view, &hx))
}

pub async fn submit_note(
    State(state): State<AppState>,
    hx: HxRequest,
    Form(submission): Form<ListSubmission>,
) -> Result<Response, ServerError> {
    let mut repo = state.repo()?;
    let mut view = ListView::from_submission(submission);
    match view.submit(&mut repo) {
        Ok(note) => {
            tracing::info!(id = %note.id, "saved note");
            Ok(Redirect::to(&view.href()).into_response())
        }
        Err(NoteError::Validation) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            render_list(&repo, &view, &hx),
        )
            .into_response()),
        Err(NoteError::NotFound(id)) => {
            // the form is back in create mode with the user's text intact
            tracing::info!(id = %id, "note under edit was deleted");
            Ok(render_list(&repo, &view, &hx).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_from_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<DeleteSubmission>,
) -> Result<impl IntoResponse, ServerError> {
    let mut repo = state.repo()?;
    let mut view = ListView::restore(
        &repo,
        ListParams {
            q: form.q,
            edit: form.editing,
        },
    );
    view.delete(&mut repo, &id)?;
    tracing::info!(id = %id, "deleted note");
    Ok(Redirect::to(&view.href()))
}

pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    hx: HxRequest,
) -> Result<impl IntoResponse, ServerError> {
    let view = DetailView::resolve(&*state.repo()?, &id);
    let status = match view {
        DetailView::Found(_) => StatusCode::OK,
        DetailView::NotFound => {
            tracing::debug!(id = %id, "no such note");
            StatusCode::NOT_FOUND
        }
    };
    let title = view.title().to_string();
    Ok((status, page(&hx, &title, view)))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    hx: HxRequest,
) -> Result<Response, ServerError> {
    let to = DetailView::delete(&mut *state.repo()?, &id)?;
    tracing::info!(id = %id, "deleted note");
    Ok(if hx.request {
        (htmx::redirect(to), "").into_response()
    } else {
        Redirect::to(to).into_response()
    })
}
