//! Composition of the classifiers into a single per-request report.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use super::{
    lowercase::highest_lowercase,
    primes::contains_prime,
    signature::{FileVerdict, validate_file},
    tokens::classify_tokens,
};
use crate::errors::{Error, Result};

/// Identity fields echoed back in every response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub roll_number: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            user_id: "john_doe_17091999".to_string(),
            email: "john@xyz.com".to_string(),
            roll_number: "ABCD123".to_string(),
        }
    }
}

/// Request body for `POST /api/bfhl`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct Payload {
    /// Tokens to classify
    pub data: Vec<String>,
    /// Optional base64 file, bare or as a `data:<mime>;base64,` URI
    #[serde(default, deserialize_with = "string_or_none")]
    pub file_b64: Option<String>,
}

/// A `file_b64` of any non-string JSON type is treated as "no file" so that a bad attachment
/// never rejects the token list it came with.
fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        Value::Null => Ok(None),
        other => {
            debug!(kind = json_kind(&other), "Ignoring non-string file_b64");
            Ok(None)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Payload {
    /// Validates the shape of a JSON request body.
    ///
    /// The body must be an object whose `data` field is an array of strings; anything else is
    /// an [`Error::BadRequest`].
    pub fn from_json(body: Value) -> Result<Self> {
        if !body.is_object() {
            return Err(Error::BadRequest {
                message: format!("Request body must be a JSON object, found {}", json_kind(&body)),
            });
        }

        serde_json::from_value(body).map_err(|e| Error::BadRequest {
            message: format!("Invalid request payload: {e}"),
        })
    }
}

/// Output of the three string classifiers for one token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub numeric: Vec<String>,
    pub non_numeric: Vec<String>,
    pub has_prime: bool,
    pub max_lowercase: Vec<String>,
}

/// Runs the token classifier, then the prime scan and lowercase selection over its groups.
pub fn classify(tokens: Vec<String>) -> ClassificationResult {
    let classified = classify_tokens(tokens);
    let has_prime = contains_prime(&classified.numeric);
    let max_lowercase = highest_lowercase(&classified.non_numeric);

    ClassificationResult {
        numeric: classified.numeric,
        non_numeric: classified.non_numeric,
        has_prime,
        max_lowercase,
    }
}

/// Everything known about one request, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub identity: Identity,
    pub classification: ClassificationResult,
    pub file: FileVerdict,
    /// Whether the request carried a usable `file_b64` string
    pub file_supplied: bool,
}

/// Builds the report for one validated payload.
#[tracing::instrument(skip_all, fields(tokens = payload.data.len(), file_supplied = payload.file_b64.is_some()))]
pub fn assemble(payload: Payload, identity: &Identity) -> Report {
    let file_supplied = payload.file_b64.is_some();
    let file = validate_file(payload.file_b64.as_deref());
    let classification = classify(payload.data);

    debug!(
        numeric = classification.numeric.len(),
        non_numeric = classification.non_numeric.len(),
        has_prime = classification.has_prime,
        file_valid = file.valid,
        "Assembled classification report"
    );

    Report {
        identity: identity.clone(),
        classification,
        file,
        file_supplied,
    }
}
