//! API request and response data models.
//!
//! These define the public wire contract and are annotated with `utoipa` for the generated
//! API docs. The request body itself is [`crate::classify::Payload`], shared with the core.

pub mod bfhl;
