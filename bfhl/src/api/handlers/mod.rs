//! HTTP request handlers.
//!
//! - [`bfhl`]: token classification and the operation-code probe
//! - [`static_assets`]: companion page serving
//!
//! Handlers return [`crate::errors::Error`] on failure, which converts to a status code and a
//! `{"is_success": false, "msg": ...}` body.

pub mod bfhl;
pub mod static_assets;
