//! HTTP handlers for the classification endpoint.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::instrument;

use crate::{
    AppState,
    api::models::bfhl::{BfhlEnvelope, BfhlQuery, BfhlResponse, OperationCode, ResponseFilter},
    classify::{self, Payload},
    errors::{Error, ErrorBody, Result},
    metrics,
};

#[utoipa::path(
    post,
    path = "/api/bfhl",
    tag = "bfhl",
    summary = "Classify tokens",
    description = "Splits `data` into numbers and alphabets, reports whether any number is prime and which \
lowercase token is greatest, and validates an optional base64 PNG in `file_b64`.

A malformed `file_b64` never fails the request; it is reported as `file_valid: false`.

Pass `?filters=numbers,alphabets,highest_lowercase` to receive only the selected fields.",
    request_body = Payload,
    params(BfhlQuery),
    responses(
        (status = 200, description = "Classification result", body = BfhlEnvelope),
        (status = 400, description = "Body is not JSON, `data` is not an array of strings, or the query string is malformed or names an unknown filter", body = ErrorBody),
        (status = 413, description = "Body exceeds the configured size limit", body = ErrorBody),
        (status = 500, description = "Unexpected internal error", body = ErrorBody),
    )
)]
#[instrument(skip_all)]
pub async fn classify_payload(
    State(state): State<AppState>,
    query: std::result::Result<Query<BfhlQuery>, QueryRejection>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Response> {
    // Validate the filter list before doing any work
    let Query(query) = query?;
    let filters = query.filters.as_deref().map(ResponseFilter::parse_list).transpose()?;

    let Json(body) = body?;
    let payload = Payload::from_json(body)?;

    // Prime testing and base64 decoding are CPU-bound; keep them off the async workers
    let identity = state.config.identity.clone();
    let report = tokio::task::spawn_blocking(move || classify::assemble(payload, &identity))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn classification task: {e}"),
        })?;
    metrics::record_report(&report);

    let response = BfhlResponse::from(report);
    Ok(match filters {
        Some(filters) => Json(json!({ "response": response.project(&filters) })).into_response(),
        None => Json(BfhlEnvelope { response }).into_response(),
    })
}

#[utoipa::path(
    get,
    path = "/api/bfhl",
    tag = "bfhl",
    summary = "Operation code",
    description = "Fixed probe response used by clients to check the endpoint is reachable.",
    responses(
        (status = 200, description = "Endpoint is up", body = OperationCode),
    )
)]
#[instrument]
pub async fn get_operation_code() -> Json<OperationCode> {
    Json(OperationCode { operation_code: 1 })
}
