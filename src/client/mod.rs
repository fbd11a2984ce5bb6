//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use url::Url;

use crate::config::Config;
use crate::domain::{
    ApiFailure, AppId, AppSecret, CreateMessage, CreateMessageResponse, KnownApiCode,
    ReceiveIdType, SendOutcome, TenantAccessToken, ValidationError,
};
use crate::transport::{Reply, TransportError};

#[cfg(test)]
pub(crate) mod testing;

pub const DEFAULT_BASE_URL: &str = "https://open.feishu.cn";

const LOG_ID_HEADER: &str = "x-tt-logid";

/// Tokens are replaced this long before the server-side expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(180);

/// Upper bound on how long a token is cached, whatever `expire` says.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpRequest {
    url: Url,
    bearer: Option<String>,
    body: serde_json::Value,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
    log_id: Option<String>,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = self.client.post(request.url).json(&request.body);
            if let Some(token) = request.bearer.as_deref() {
                builder = builder.bearer_auth(token);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let log_id = response
                .headers()
                .get(LOG_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                body,
                log_id,
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Application credentials exchanged for a tenant access token.
pub struct Credentials {
    app_id: AppId,
    app_secret: AppSecret,
}

impl Credentials {
    /// Validate both parts; neither may be empty.
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            app_id: AppId::new(app_id)?,
            app_secret: AppSecret::new(app_secret)?,
        })
    }

    pub fn from_parts(app_id: AppId, app_secret: AppSecret) -> Self {
        Self { app_id, app_secret }
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    pub fn app_secret(&self) -> &AppSecret {
        &self.app_secret
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`FeishuClient`].
///
/// This error preserves:
/// - transport failures and non-2xx responses without an API body,
/// - API-level failures (non-zero `code`),
/// - validation/parse failures.
pub enum FeishuError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code without a decodable API body.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The Open Platform answered with a non-zero `code`.
    #[error("API error: {0}")]
    Api(ApiFailure),

    /// The token endpoint rejected the application credentials.
    #[error("authentication failed: {0}")]
    Auth(ApiFailure),

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// Request body could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[source] Box<dyn StdError + Send + Sync>),

    /// The configured base URL does not form a valid endpoint.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`FeishuClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct FeishuClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl FeishuClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API base URL, e.g. `https://open.larksuite.com` for Lark.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`FeishuClient`]. Fails if the base URL does not parse.
    pub fn build(self) -> Result<FeishuClient, FeishuError> {
        Url::parse(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| FeishuError::Transport(Box::new(err)))?;

        Ok(FeishuClient::with_transport(
            self.credentials,
            &self.base_url,
            Arc::new(ReqwestTransport { client }),
        ))
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: TenantAccessToken,
    refresh_at: Instant,
}

#[derive(Clone)]
/// High-level Feishu/Lark IM client.
///
/// Holds the application credentials and a tenant access token cache shared by
/// all clones. Endpoints used:
/// - `POST /open-apis/auth/v3/tenant_access_token/internal`
/// - `POST /open-apis/im/v1/messages`
pub struct FeishuClient {
    credentials: Credentials,
    token_endpoint: String,
    message_endpoint: String,
    http: Arc<dyn HttpTransport>,
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl FeishuClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`FeishuClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(
            credentials,
            DEFAULT_BASE_URL,
            Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        )
    }

    /// Create a client from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Result<Self, FeishuError> {
        let mut builder = Self::builder(config.credentials.clone()).base_url(&config.base_url);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> FeishuClientBuilder {
        FeishuClientBuilder::new(credentials)
    }

    fn with_transport(
        credentials: Credentials,
        base_url: &str,
        http: Arc<dyn HttpTransport>,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            credentials,
            token_endpoint: format!("{base_url}{}", crate::transport::TENANT_ACCESS_TOKEN_PATH),
            message_endpoint: format!("{base_url}{}", crate::transport::CREATE_MESSAGE_PATH),
            http,
            token: Arc::new(Mutex::new(None)),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Return the cached tenant access token, exchanging the credentials for a
    /// new one when the cache is empty or about to expire.
    ///
    /// Errors:
    /// - [`FeishuError::Auth`] when the credentials are rejected,
    /// - [`FeishuError::Transport`] / [`FeishuError::HttpStatus`] / [`FeishuError::Parse`]
    ///   when the exchange does not complete.
    pub async fn tenant_access_token(&self) -> Result<TenantAccessToken, FeishuError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        log::debug!(
            "requesting tenant access token for app {}",
            self.credentials.app_id.as_str()
        );

        let body = crate::transport::encode_tenant_token_body(
            &self.credentials.app_id,
            &self.credentials.app_secret,
        )
        .map_err(|err| FeishuError::Encode(Box::new(err)))?;

        let response = self
            .http
            .post_json(HttpRequest {
                url: Url::parse(&self.token_endpoint)?,
                bearer: None,
                body,
            })
            .await
            .map_err(FeishuError::Transport)?;

        let reply = interpret(response, crate::transport::decode_tenant_token_response);
        let (grant, _) = match reply {
            Err(FeishuError::Api(failure)) => return Err(FeishuError::Auth(failure)),
            other => other?,
        };

        let refresh_in = grant
            .expires_in
            .min(MAX_TOKEN_LIFETIME)
            .saturating_sub(TOKEN_REFRESH_MARGIN);
        log::debug!("tenant access token valid for {}s", grant.expires_in.as_secs());
        self.store_token(CachedToken {
            token: grant.token.clone(),
            refresh_at: Instant::now() + refresh_in,
        });
        Ok(grant.token)
    }

    /// Send a message (`im/v1/messages`).
    ///
    /// Errors:
    /// - [`FeishuError::Api`] when the server returns a non-zero `code`,
    /// - [`FeishuError::Auth`] when no tenant access token could be obtained,
    /// - [`FeishuError::HttpStatus`] for non-2xx responses without an API body,
    /// - [`FeishuError::Transport`] / [`FeishuError::Parse`] otherwise.
    pub async fn create_message(
        &self,
        request: CreateMessage,
    ) -> Result<CreateMessageResponse, FeishuError> {
        let token = self.tenant_access_token().await?;

        let url = Url::parse_with_params(
            &self.message_endpoint,
            crate::transport::encode_create_message_query(&request),
        )?;
        let body = crate::transport::encode_create_message_body(&request)
            .map_err(|err| FeishuError::Encode(Box::new(err)))?;

        log::debug!(
            "creating {} message for {}={}",
            request.content().msg_type(),
            request.receive_id_type(),
            request.receive_id().as_str()
        );

        let response = self
            .http
            .post_json(HttpRequest {
                url,
                bearer: Some(token.as_str().to_owned()),
                body,
            })
            .await
            .map_err(FeishuError::Transport)?;

        match interpret(response, crate::transport::decode_create_message_response) {
            Ok((mut parsed, header_log_id)) => {
                parsed.log_id = header_log_id.or(parsed.log_id);
                Ok(parsed)
            }
            Err(FeishuError::Api(failure)) => {
                if failure.code.known() == Some(KnownApiCode::InvalidTenantAccessToken) {
                    self.clear_token();
                }
                Err(FeishuError::Api(failure))
            }
            Err(err) => Err(err),
        }
    }

    /// Send `message` as a text message and log the outcome.
    ///
    /// See [`crate::sender::send_text_message`].
    pub async fn send_text_message(
        &self,
        receive_id_type: ReceiveIdType,
        receive_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<SendOutcome, FeishuError> {
        crate::sender::send_text_message(self, receive_id_type, receive_id, message).await
    }

    fn cached_token(&self) -> Option<TenantAccessToken> {
        let guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|cached| Instant::now() < cached.refresh_at)
            .map(|cached| cached.token.clone())
    }

    fn store_token(&self, token: CachedToken) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear_token(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Decode an Open Platform envelope, returning the payload and the
/// `X-Tt-Logid` header value.
///
/// API bodies are honored even on 4xx/5xx since the platform reports
/// business errors that way.
fn interpret<T>(
    response: HttpResponse,
    decode: fn(&str) -> Result<Reply<T>, TransportError>,
) -> Result<(T, Option<String>), FeishuError> {
    let success_status = (200..=299).contains(&response.status);

    match decode(&response.body) {
        Ok(Reply::Failure(mut failure)) => {
            failure.log_id = response.log_id.or(failure.log_id);
            Err(FeishuError::Api(failure))
        }
        Ok(Reply::Success(value)) if success_status => Ok((value, response.log_id)),
        Err(err) if success_status => Err(FeishuError::Parse(Box::new(err))),
        _ => Err(FeishuError::HttpStatus {
            status: response.status,
            body: non_blank(response.body),
        }),
    }
}

fn non_blank(body: String) -> Option<String> {
    if body.trim().is_empty() {
        None
    } else {
        Some(body)
    }
}
