/// HTMX utils
use axum::http::{HeaderMap, HeaderValue};

/// Client-side navigation for htmx requests, which do not follow a plain
/// `Location` the way a full page load does.
pub fn redirect(to: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Hx-Redirect",
        HeaderValue::from_str(to).unwrap_or(HeaderValue::from_static("/")),
    );
    headers
}
