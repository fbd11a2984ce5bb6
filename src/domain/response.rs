use std::fmt;

use crate::domain::value::ApiCode;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateMessageResponse {
    pub log_id: Option<String>,
    pub message_id: Option<String>,
    /// `data` object exactly as returned by the server.
    pub data: serde_json::Value,
}

/// Non-zero `code` returned by the Open Platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub code: ApiCode,
    pub msg: String,
    pub log_id: Option<String>,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code: {}, msg: {}, log_id: {}",
            self.code,
            self.msg,
            self.log_id.as_deref().unwrap_or("-")
        )
    }
}

/// What happened to a message handed to the sender.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Sent(CreateMessageResponse),
    Rejected(ApiFailure),
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent(_))
    }
}
