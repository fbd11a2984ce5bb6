//! Startup configuration read from environment variables.

use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;

use crate::client::{Credentials, DEFAULT_BASE_URL};
use crate::domain::{AppId, AppSecret};

pub const APP_ID_VAR: &str = "APP_ID";
pub const APP_SECRET_VAR: &str = "APP_SECRET";
pub const LOG_LEVEL_VAR: &str = "FEISHU_LOG_LEVEL";
pub const BASE_URL_VAR: &str = "FEISHU_BASE_URL";
pub const TIMEOUT_VAR: &str = "FEISHU_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} environment variable is required")]
    Missing { var: &'static str },

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    /// Defaults to `debug`.
    pub log_level: LevelFilter,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// Missing and blank credentials are rejected here so a client is never
    /// built without them.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_id = lookup(APP_ID_VAR)
            .and_then(|value| AppId::new(value).ok())
            .ok_or(ConfigError::Missing { var: APP_ID_VAR })?;
        let app_secret = lookup(APP_SECRET_VAR)
            .and_then(|value| AppSecret::new(value).ok())
            .ok_or(ConfigError::Missing {
                var: APP_SECRET_VAR,
            })?;

        let log_level = match non_empty(lookup(LOG_LEVEL_VAR)) {
            Some(value) => LevelFilter::from_str(value.trim()).map_err(|_| ConfigError::Invalid {
                var: LOG_LEVEL_VAR,
                value,
            })?,
            None => LevelFilter::Debug,
        };

        let base_url = match non_empty(lookup(BASE_URL_VAR)) {
            Some(value) => {
                if url::Url::parse(value.trim()).is_err() {
                    return Err(ConfigError::Invalid {
                        var: BASE_URL_VAR,
                        value,
                    });
                }
                value.trim().to_owned()
            }
            None => DEFAULT_BASE_URL.to_owned(),
        };

        let timeout = match non_empty(lookup(TIMEOUT_VAR)) {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: TIMEOUT_VAR,
                        value,
                    });
                }
            },
            None => None,
        };

        Ok(Self {
            credentials: Credentials::from_parts(app_id, app_secret),
            log_level,
            base_url,
            timeout,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
