//! OpenAPI documentation for the HTTP surface.

use utoipa::OpenApi;

use crate::api::{self, models::bfhl::ResponseFilter};
use crate::classify::Payload;
use crate::errors::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "bfhl",
        description = "Classifies token lists into numbers and alphabets, detects primes, picks the highest \
lowercase token and validates base64 PNG payloads."
    ),
    paths(api::handlers::bfhl::classify_payload, api::handlers::bfhl::get_operation_code),
    components(schemas(
        Payload,
        api::models::bfhl::BfhlEnvelope,
        api::models::bfhl::BfhlResponse,
        api::models::bfhl::OperationCode,
        ResponseFilter,
        ErrorBody
    )),
    tags((name = "bfhl", description = "Token classification"))
)]
pub struct ApiDoc;
