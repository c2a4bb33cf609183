use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Request payload is missing, not JSON, or has the wrong shape
    #[error("{message}")]
    BadRequest { message: String },

    /// Request body exceeded the configured size limit
    #[error("{message}")]
    PayloadTooLarge { message: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`
    pub is_success: bool,
    /// User-safe description of the failure
    pub msg: String,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } | Error::PayloadTooLarge { message } => message.clone(),
            Error::Internal { .. } | Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::BadRequest { .. } | Error::PayloadTooLarge { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let body = ErrorBody {
            is_success: false,
            msg: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Body extraction failures are the caller's fault, except for oversized bodies which keep
/// their own status.
impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge { message }
        } else {
            Error::BadRequest { message }
        }
    }
}

/// A query string that does not deserialize is always the caller's fault.
impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
