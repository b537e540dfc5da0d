//! Purpose: Resolve client settings from explicit values or the process environment.
//! Exports: `ClientConfig`, `DEFAULT_BASE_URL`, `DEFAULT_TIMEOUT`.
//! Invariants: A project is always required; everything else has a default or is optional.

use crate::core::error::{Error, ErrorKind};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.cognitedata.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_BASE_URL: &str = "COGNITE_BASE_URL";
pub const ENV_PROJECT: &str = "COGNITE_PROJECT";
pub const ENV_TOKEN: &str = "COGNITE_TOKEN";
pub const ENV_APP_ID: &str = "COGNITE_APP_ID";
pub const ENV_TIMEOUT_MS: &str = "COGNITE_TIMEOUT_MS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub project: String,
    pub token: Option<String>,
    pub app_id: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project: project.into(),
            token: None,
            app_id: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let project = read(ENV_PROJECT).ok_or_else(|| {
            Error::new(ErrorKind::Usage)
                .with_message("missing CDF project")
                .with_hint(format!("Set {ENV_PROJECT} or pass --project."))
        })?;
        let mut config = Self::new(project);
        if let Some(base_url) = read(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        config.token = read(ENV_TOKEN);
        config.app_id = read(ENV_APP_ID);
        if let Some(raw) = read(ENV_TIMEOUT_MS) {
            let millis = raw.trim().parse::<u64>().map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("invalid {ENV_TIMEOUT_MS}: {raw}"))
                    .with_hint("Use a whole number of milliseconds.")
                    .with_source(err)
            })?;
            config.timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }
}
