//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Classification** (`/api/bfhl`): `POST` classifies a token list, `GET` returns the
//!   operation code
//! - **Companion page** (`/`): embedded static assets
//!
//! # OpenAPI Documentation
//!
//! Endpoints are documented with `utoipa` annotations. The document is served at
//! `/api-docs/openapi.json` and rendered at `/docs`.

pub mod handlers;
pub mod models;
