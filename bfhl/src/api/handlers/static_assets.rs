//! HTTP handlers for the embedded companion page.

use axum::{
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::static_assets;

/// Serve embedded static assets, with `/` mapped to `index.html`.
#[instrument(skip_all, fields(path = uri.path()))]
pub async fn serve_embedded_asset(uri: Uri) -> Response {
    let mut path = uri.path().trim_start_matches('/');

    // If path is empty or ends with /, serve index.html
    if path.is_empty() || path.ends_with('/') {
        path = "index.html";
    }

    match static_assets::Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.to_string()),
                    // The page is tiny and ships with the binary; always revalidate
                    (header::CACHE_CONTROL, "no-cache".to_string()),
                ],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => {
            debug!("No embedded asset for {}", uri.path());
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode};
    use axum_test::TestServer;

    fn create_test_router() -> Router {
        Router::new().fallback(serve_embedded_asset)
    }

    #[tokio::test]
    async fn test_serve_root_returns_index_html() {
        let server = TestServer::new(create_test_router()).unwrap();

        let response = server.get("/").await;

        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").map(|v| v.to_str().unwrap()),
            Some("text/html")
        );
        assert_eq!(
            response.headers().get("cache-control").map(|v| v.to_str().unwrap()),
            Some("no-cache")
        );

        let text = response.text();
        assert!(text.contains("<!doctype html>") || text.contains("<!DOCTYPE html>"));
        assert!(text.contains("/app.js"));
    }

    #[tokio::test]
    async fn test_serve_script() {
        let server = TestServer::new(create_test_router()).unwrap();

        let response = server.get("/app.js").await;

        response.assert_status(StatusCode::OK);
        assert!(response
            .headers()
            .get("content-type")
            .map(|v| v.to_str().unwrap())
            .unwrap()
            .contains("javascript"));
        assert!(response.text().contains("highest_lowercase"));
    }

    #[tokio::test]
    async fn test_serve_favicon() {
        let server = TestServer::new(create_test_router()).unwrap();

        let response = server.get("/favicon.svg").await;

        response.assert_status(StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").map(|v| v.to_str().unwrap()),
            Some("image/svg+xml")
        );
    }

    #[tokio::test]
    async fn test_unknown_asset_is_not_found() {
        let server = TestServer::new(create_test_router()).unwrap();

        let response = server.get("/does/not/exist.txt").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
