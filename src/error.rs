use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Faults raised by a cache backend.
///
/// A miss is not an error: backends return `Ok(None)` for that.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("cache connection lock poisoned")]
    Poisoned,

    #[error("cache task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors that fail a puzzle request.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to serialize request for fingerprinting: {0}")]
    Fingerprint(#[source] serde_json::Error),

    #[error("HTTP request to provider failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("failed to decode provider response: {source}. Raw response: {raw}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("provider response was empty or unexpected. Raw response: {raw}")]
    EmptyResponse { raw: String },
}

pub type Result<T> = std::result::Result<T, GatewayError>;

// Error surfaced to HTTP clients as plain text
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(GatewayError),
}

impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        ApiError::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::debug!("rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, format!("Invalid request payload: {}", msg))
            }
            ApiError::Internal(e) => {
                tracing::error!("request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to generate puzzle: {}", e),
                )
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}
