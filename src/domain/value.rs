use std::fmt;
use std::str::FromStr;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Feishu application id (`app_id`), e.g. `cli_a1b2c3`.
///
/// Invariant: non-empty after trimming.
pub struct AppId(String);

impl AppId {
    /// JSON field name used by the token endpoint (`app_id`).
    pub const FIELD: &'static str = "app_id";

    /// Create a validated [`AppId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated app id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Feishu application secret (`app_secret`).
///
/// Invariant: non-empty after trimming. `Debug` output never contains the value.
pub struct AppSecret(String);

impl AppSecret {
    /// JSON field name used by the token endpoint (`app_secret`).
    pub const FIELD: &'static str = "app_secret";

    /// Create a validated [`AppSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the secret.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AppSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppSecret(***)")
    }
}

#[derive(Clone, PartialEq, Eq)]
/// Bearer token returned by `auth/v3/tenant_access_token/internal`.
pub struct TenantAccessToken(String);

impl TenantAccessToken {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "tenant_access_token",
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TenantAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TenantAccessToken(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// How the recipient of a message is addressed (`receive_id_type`).
pub enum ReceiveIdType {
    OpenId,
    UserId,
    UnionId,
    Email,
    ChatId,
}

impl ReceiveIdType {
    /// Query parameter name used by `im/v1/messages` (`receive_id_type`).
    pub const FIELD: &'static str = "receive_id_type";

    pub const ALL: [Self; 5] = [
        Self::OpenId,
        Self::UserId,
        Self::UnionId,
        Self::Email,
        Self::ChatId,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenId => "open_id",
            Self::UserId => "user_id",
            Self::UnionId => "union_id",
            Self::Email => "email",
            Self::ChatId => "chat_id",
        }
    }
}

impl fmt::Display for ReceiveIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReceiveIdType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == trimmed)
            .ok_or_else(|| ValidationError::UnknownReceiveIdType {
                input: s.to_owned(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Recipient identifier (`receive_id`): an open id, user id, union id, email or chat id.
///
/// Invariant: non-empty. Sent exactly as given; the format is checked by the server.
pub struct ReceiveId(String);

impl ReceiveId {
    /// JSON field name used by `im/v1/messages` (`receive_id`).
    pub const FIELD: &'static str = "receive_id";

    /// Create a validated [`ReceiveId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the validated recipient id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Text message body (`text` inside `content`).
///
/// Invariant: non-empty. The value (including whitespace) is sent as provided.
pub struct MessageText(String);

impl MessageText {
    /// Key of the text inside the serialized `content` object.
    pub const FIELD: &'static str = "text";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Idempotency key for `im/v1/messages` (`uuid`).
///
/// The server drops a second message carrying the same key within one hour.
pub struct RequestUuid(String);

impl RequestUuid {
    pub const FIELD: &'static str = "uuid";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Open Platform response code (`code`).
///
/// `0` means success. Unknown codes are preserved as-is.
pub struct ApiCode(i64);

impl ApiCode {
    pub const SUCCESS: Self = Self(0);

    /// Construct a code from its integer representation.
    pub fn new(code: i64) -> Self {
        Self(code)
    }

    /// Get the integer code as provided by the server.
    pub fn as_i64(self) -> i64 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Map this code to a known variant, if one exists.
    pub fn known(self) -> Option<KnownApiCode> {
        KnownApiCode::from_code(self.0)
    }

    /// Returns `true` if the server asked the caller to slow down.
    pub fn is_retryable(self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_retryable())
    }

    /// Returns `true` if this code represents an authentication/authorization error.
    pub fn is_auth_error(self) -> bool {
        matches!(self.known(), Some(kind) if kind.is_auth_error())
    }
}

impl fmt::Display for ApiCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Response codes this crate knows how to classify.
pub enum KnownApiCode {
    /// 10003: invalid `app_id` or request parameter on the token endpoint.
    InvalidAppParam,
    /// 10014: `app_secret` does not match `app_id`.
    InvalidAppSecret,
    /// 99991400: request frequency limit.
    FrequencyLimit,
    /// 99991661: `Authorization` header missing.
    MissingAccessToken,
    /// 99991663: tenant access token invalid or expired.
    InvalidTenantAccessToken,
    /// 230001: invalid request parameter.
    InvalidRequestParam,
    /// 230002: the bot is not a member of the target chat.
    BotNotInChat,
    /// 230013: the bot is not visible to the target user.
    BotNotAvailableToUser,
    /// 230020: message sending rate limit.
    MessageRateLimit,
}

impl KnownApiCode {
    /// Map an integer code to a known variant.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            10003 => Self::InvalidAppParam,
            10014 => Self::InvalidAppSecret,
            99991400 => Self::FrequencyLimit,
            99991661 => Self::MissingAccessToken,
            99991663 => Self::InvalidTenantAccessToken,
            230001 => Self::InvalidRequestParam,
            230002 => Self::BotNotInChat,
            230013 => Self::BotNotAvailableToUser,
            230020 => Self::MessageRateLimit,
            _ => return None,
        })
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, Self::FrequencyLimit | Self::MessageRateLimit)
    }

    pub fn is_auth_error(self) -> bool {
        matches!(
            self,
            Self::InvalidAppParam
                | Self::InvalidAppSecret
                | Self::MissingAccessToken
                | Self::InvalidTenantAccessToken
        )
    }
}
