use super::{controllers, models};
use axum::routing::{delete, get, post, Router};
use tower_http::trace::TraceLayer;

#[rustfmt::skip]
pub fn get_routes() -> Router<models::AppState> {
    Router::new()
        .route("/", get(controllers::root))
        .route("/ping", get(controllers::pong))
        .route("/static/style.css", get(controllers::get_stylesheet))
        .route("/static/htmx.min.js", get(controllers::get_htmx_js))
        .route("/notes", get(controllers::list_notes))
        .route("/notes", post(controllers::submit_note))
        .route("/notes/:id", get(controllers::get_note))
        .route("/notes/:id", delete(controllers::delete_note))
        .route("/notes/:id/delete", post(controllers::delete_from_list))
}

pub fn app(state: models::AppState) -> Router {
    get_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
