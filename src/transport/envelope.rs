use serde::Deserialize;

use crate::domain::{ApiCode, ApiFailure};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("successful response is missing field: {field}")]
    MissingField { field: &'static str },
}

/// Decoded `code`/`msg` envelope shared by every Open Platform endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Success(T),
    Failure(ApiFailure),
}

/// Troubleshooting block attached to error bodies (`"error": {"log_id": ...}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct ErrorDetail {
    #[serde(default)]
    pub log_id: Option<String>,
}

pub(super) fn failure(code: i64, msg: String, error: Option<ErrorDetail>) -> ApiFailure {
    ApiFailure {
        code: ApiCode::new(code),
        msg,
        log_id: error.and_then(|detail| detail.log_id),
    }
}
