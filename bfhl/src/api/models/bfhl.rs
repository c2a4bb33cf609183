//! Wire types for the `/api/bfhl` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::classify::Report;
use crate::errors::{Error, Result};

/// Flat response record for one classification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BfhlResponse {
    /// Always `true` for a completed classification
    pub is_success: bool,
    /// Identity of the service operator
    #[schema(example = "john_doe_17091999")]
    pub user_id: String,
    /// Contact email of the service operator
    #[schema(example = "john@xyz.com")]
    pub email: String,
    /// Roll number of the service operator
    #[schema(example = "ABCD123")]
    pub roll_number: String,
    /// Tokens that parsed as numbers, in input order
    pub numbers: Vec<String>,
    /// All other tokens, in input order
    pub alphabets: Vec<String>,
    /// The greatest all-lowercase token, or `[" "]` when there is none
    pub highest_lowercase_alphabet: Vec<String>,
    /// Whether any numeric token's integer part is prime
    pub is_prime_found: bool,
    /// Whether the supplied file starts with a recognised signature
    pub file_valid: bool,
    /// `image/png`, or `unknown`
    pub file_mime_type: String,
    /// Decoded file size in kilobytes, rounded, rendered as a decimal string
    #[schema(example = "2")]
    pub file_size_kb: String,
}

impl From<Report> for BfhlResponse {
    fn from(report: Report) -> Self {
        let Report {
            identity,
            classification,
            file,
            ..
        } = report;

        Self {
            is_success: true,
            user_id: identity.user_id,
            email: identity.email,
            roll_number: identity.roll_number,
            numbers: classification.numeric,
            alphabets: classification.non_numeric,
            highest_lowercase_alphabet: classification.max_lowercase,
            is_prime_found: classification.has_prime,
            file_valid: file.valid,
            file_mime_type: file.mime_type.to_string(),
            file_size_kb: file.size_kb.to_string(),
        }
    }
}

/// Successful response envelope: the record is nested under `response`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BfhlEnvelope {
    pub response: BfhlResponse,
}

/// Body of `GET /api/bfhl`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OperationCode {
    #[schema(example = 1)]
    pub operation_code: u8,
}

/// A subset of the response that a client can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFilter {
    Numbers,
    Alphabets,
    HighestLowercase,
}

impl ResponseFilter {
    /// Key of the response field this filter selects.
    pub fn field(self) -> &'static str {
        match self {
            ResponseFilter::Numbers => "numbers",
            ResponseFilter::Alphabets => "alphabets",
            ResponseFilter::HighestLowercase => "highest_lowercase_alphabet",
        }
    }

    /// Parses a comma-separated filter list such as `numbers,highest_lowercase`.
    ///
    /// Blank entries are skipped and repeats collapse, keeping first-seen order.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        let mut filters = Vec::new();
        for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let filter: ResponseFilter = name.parse()?;
            if !filters.contains(&filter) {
                filters.push(filter);
            }
        }
        Ok(filters)
    }
}

impl FromStr for ResponseFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "numbers" => Ok(ResponseFilter::Numbers),
            "alphabets" => Ok(ResponseFilter::Alphabets),
            "highest_lowercase" | "highest_lowercase_alphabet" => Ok(ResponseFilter::HighestLowercase),
            other => Err(Error::BadRequest {
                message: format!("Unknown filter '{other}', expected one of: numbers, alphabets, highest_lowercase"),
            }),
        }
    }
}

impl BfhlResponse {
    /// Projects the response onto the selected fields.
    pub fn project(&self, filters: &[ResponseFilter]) -> Map<String, Value> {
        filters
            .iter()
            .map(|filter| {
                let values = match filter {
                    ResponseFilter::Numbers => &self.numbers,
                    ResponseFilter::Alphabets => &self.alphabets,
                    ResponseFilter::HighestLowercase => &self.highest_lowercase_alphabet,
                };
                (filter.field().to_string(), Value::from(values.clone()))
            })
            .collect()
    }
}

/// Query parameters for `POST /api/bfhl`
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BfhlQuery {
    /// Comma-separated subset of `numbers`, `alphabets`, `highest_lowercase`. When present,
    /// only those fields are returned.
    pub filters: Option<String>,
}
