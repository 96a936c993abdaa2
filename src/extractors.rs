use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// What htmx told us about the request. Boosted requests are ordinary page
/// navigations and still get a full page back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HxRequest {
    pub request: bool,
    pub boosted: bool,
}

impl HxRequest {
    pub fn wants_fragment(&self) -> bool {
        self.request && !self.boosted
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        req: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let headers = &req.headers;
        Ok(HxRequest {
            request: headers.contains_key("Hx-Request"),
            boosted: headers.contains_key("Hx-Boosted"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(builder: axum::http::request::Builder) -> HxRequest {
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        HxRequest::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_plain_request() {
        let hx = extract(Request::builder().uri("/notes")).await;
        assert_eq!(hx, HxRequest::default());
        assert!(!hx.wants_fragment());
    }

    #[tokio::test]
    async fn test_htmx_request() {
        let hx = extract(Request::builder().header("HX-Request", "true")).await;
        assert!(hx.request);
        assert!(hx.wants_fragment());
    }

    #[tokio::test]
    async fn test_boosted_request_gets_full_page() {
        let hx = extract(
            Request::builder()
                .header("HX-Request", "true")
                .header("HX-Boosted", "true"),
        )
        .await;
        assert!(!hx.wants_fragment());
    }
}
