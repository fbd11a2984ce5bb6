use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{AppId, AppSecret, TenantAccessToken};
use crate::transport::envelope::{ErrorDetail, Reply, TransportError, failure};

pub const TENANT_ACCESS_TOKEN_PATH: &str = "/open-apis/auth/v3/tenant_access_token/internal";

#[derive(Debug, Serialize)]
struct TenantTokenJsonRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TenantTokenJsonResponse {
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    tenant_access_token: Option<String>,
    /// Seconds until the token expires.
    #[serde(default)]
    expire: Option<u64>,
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub token: TenantAccessToken,
    pub expires_in: Duration,
}

pub fn encode_tenant_token_body(
    app_id: &AppId,
    app_secret: &AppSecret,
) -> Result<serde_json::Value, TransportError> {
    Ok(serde_json::to_value(TenantTokenJsonRequest {
        app_id: app_id.as_str(),
        app_secret: app_secret.as_str(),
    })?)
}

pub fn decode_tenant_token_response(json: &str) -> Result<Reply<TokenGrant>, TransportError> {
    let parsed: TenantTokenJsonResponse = serde_json::from_str(json)?;
    if parsed.code != 0 {
        return Ok(Reply::Failure(failure(parsed.code, parsed.msg, parsed.error)));
    }

    let token = parsed
        .tenant_access_token
        .and_then(|raw| TenantAccessToken::new(raw).ok())
        .ok_or(TransportError::MissingField {
            field: "tenant_access_token",
        })?;
    let expire = parsed
        .expire
        .ok_or(TransportError::MissingField { field: "expire" })?;

    Ok(Reply::Success(TokenGrant {
        token,
        expires_in: Duration::from_secs(expire),
    }))
}
