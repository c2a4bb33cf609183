//! # bfhl: Token Classification Service
//!
//! `bfhl` is a small HTTP service that takes a list of string tokens and reports how they split
//! into numbers and alphabets, whether any number is prime, and which all-lowercase token sorts
//! highest. A request may also carry a base64-encoded file, which is checked against known file
//! signatures (currently PNG) and sized.
//!
//! ## Overview
//!
//! Every response echoes a fixed operator identity (`user_id`, `email`, `roll_number`) taken from
//! configuration. Classification itself is pure: identical requests always produce identical
//! responses, and a malformed file never fails the request, it is reported as invalid instead.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum). It holds no state beyond
//! its configuration, so there is nothing to set up or tear down besides the listener and
//! telemetry.
//!
//! ### Request Flow
//!
//! A `POST /api/bfhl` request is parsed into a [`classify::Payload`], run through
//! [`classify::assemble`] to produce a [`classify::Report`], counted in the service metrics, and
//! rendered as a [`api::models::bfhl::BfhlResponse`]. Shape errors (non-JSON body, missing or
//! mistyped `data`) are reported through [`errors::Error`] as `400` responses carrying
//! `{"is_success": false, "msg": ...}`.
//!
//! ### Core Modules
//!
//! - [`classify`]: token classification, prime detection, lowercase selection and file
//!   signature checks
//! - [`api`]: HTTP handlers and wire models
//! - [`config`]: YAML and environment configuration
//! - [`errors`]: error type and its HTTP mapping
//! - [`telemetry`]: tracing and optional OTLP export
//!
//! ## Getting Started
//!
//! ```bash
//! # Run with the default configuration
//! cargo run -p bfhl
//!
//! # Point at a config file and override the port
//! BFHL_PORT=8080 cargo run -p bfhl -- -f bfhl/config.yaml
//! ```
//!
//! The companion page is served at `/`, API docs at `/docs`, and Prometheus metrics at
//! `/internal/metrics` when `enable_metrics` is set.

pub mod api;
pub mod classify;
pub mod config;
pub mod errors;
mod metrics;
mod openapi;
mod static_assets;
pub mod telemetry;

#[cfg(test)]
pub mod test_utils;

use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, routing::get};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder().config(config).build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.cors;

    // A wildcard anywhere in the list opens the service to every origin
    let allow_origin = if cors_config.allowed_origins.contains(&CorsOrigin::Wildcard) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.origin().ascii_serialization().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the main application router with all endpoints and middleware.
///
/// This function constructs the complete Axum router with:
/// - Classification routes under `/api`
/// - Health check and OpenAPI documentation
/// - Static asset serving for the companion page
/// - Optional Prometheus metrics
/// - CORS configuration
/// - Tracing middleware
///
/// # Errors
///
/// Returns an error if the CORS configuration cannot be turned into header values.
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        .route(
            "/bfhl",
            get(api::handlers::bfhl::get_operation_code).post(api::handlers::bfhl::classify_payload),
        )
        .layer(DefaultBodyLimit::max(state.config.limits.max_body_size))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .fallback(api::handlers::static_assets::serve_embedded_asset);

    let cors_layer = create_cors_layer(&state.config)?;
    let mut router = router.layer(cors_layer);

    // Add Prometheus metrics if enabled
    if state.config.enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        router = router
            .route("/internal/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer);
    }

    // Add tracing layer
    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// The assembled service: a router plus the configuration it was built from.
///
/// 1. **Create**: [`Application::new`] builds the router from the configuration
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: when the shutdown future resolves, in-flight requests drain and telemetry
///    is flushed
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting bfhl with configuration: {:#?}", config);

        let app_state = AppState::builder().config(config.clone()).build();
        let router = build_router(&app_state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "bfhl listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        // Run the server with graceful shutdown
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{AppState, Application, build_router};
    use crate::config::CorsOrigin;
    use crate::test_utils::*;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use serde_json::{Value, json};

    #[test_log::test(tokio::test)]
    async fn test_healthz() {
        let server = create_test_app();

        let response = server.get("/healthz").await;

        response.assert_status_ok();
        response.assert_text("OK");
    }

    #[tokio::test]
    async fn test_openapi_json_endpoint() {
        let server = create_test_app();

        let response = server.get("/api-docs/openapi.json").await;

        response.assert_status_ok();
        let doc: Value = response.json();
        assert!(doc["paths"]["/api/bfhl"]["post"].is_object());
        assert!(doc["paths"]["/api/bfhl"]["get"].is_object());
    }

    #[tokio::test]
    async fn test_docs_page_is_served() {
        let server = create_test_app();

        let response = server.get("/docs").await;

        response.assert_status_ok();
        assert!(response.text().contains("<html"));
    }

    #[tokio::test]
    async fn test_build_router_with_metrics_disabled() {
        let app_state = AppState::builder().config(create_test_config()).build();
        let router = build_router(&app_state).expect("Failed to build router");
        let server = axum_test::TestServer::new(router).expect("Failed to create test server");

        // Metrics endpoint should not exist - falls through to the static asset fallback
        let metrics_response = server.get("/internal/metrics").await;
        metrics_response.assert_status(StatusCode::NOT_FOUND);
        let metrics_content = metrics_response.text();
        assert!(!metrics_content.contains("# HELP") && !metrics_content.contains("# TYPE"));
    }

    #[tokio::test]
    async fn test_build_router_with_metrics_enabled() {
        let mut config = create_test_config();
        config.enable_metrics = true;
        let server = Application::new(config).expect("Failed to build application").into_test_server();

        server
            .post("/api/bfhl")
            .json(&json!({ "data": ["2", "a"], "file_b64": png_base64(16) }))
            .await
            .assert_status_ok();

        let metrics_response = server.get("/internal/metrics").await;
        assert_eq!(metrics_response.status_code().as_u16(), 200);

        let metrics_content = metrics_response.text();
        assert!(metrics_content.contains("bfhl_classifications_total"));
        assert!(metrics_content.contains("bfhl_prime_found_total"));
        assert!(metrics_content.contains("bfhl_file_validations_total"));
    }

    #[tokio::test]
    async fn test_cors_wildcard_allows_any_origin() {
        let server = create_test_app();

        let response = server
            .get("/api/bfhl")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("https://somewhere.example"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("access-control-allow-origin"), "*");
    }

    #[tokio::test]
    async fn test_cors_allow_list() {
        let mut config = create_test_config();
        config.cors.allowed_origins = vec![CorsOrigin::Url("https://app.example.com".parse().unwrap())];
        config.cors.allow_credentials = true;
        let server = create_test_app_with_config(config);

        let allowed = server
            .get("/api/bfhl")
            .add_header(
                HeaderName::from_static("origin"),
                HeaderValue::from_static("https://app.example.com"),
            )
            .await;
        assert_eq!(allowed.header("access-control-allow-origin"), "https://app.example.com");
        assert_eq!(allowed.header("access-control-allow-credentials"), "true");

        let denied = server
            .get("/api/bfhl")
            .add_header(HeaderName::from_static("origin"), HeaderValue::from_static("https://evil.example"))
            .await;
        assert!(denied.maybe_header("access-control-allow-origin").is_none());
    }
}
