use crate::IgpsportError;
use secrecy::SecretString;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str =
    "https://prod.zh.igpsport.com/service/web-gateway/web-analyze/activity";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration. Every optional field is resolved to its default
/// when the value is constructed.
#[derive(Clone, Debug)]
pub struct Config {
    pub auth_token: SecretString,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn new(auth_token: SecretString) -> Self {
        Self {
            auth_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn from_env() -> Result<Self, IgpsportError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    ///
    /// `IGPSPORT_AUTH_TOKEN` wins over the bare `AUTHORIZATION` key.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, IgpsportError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let token = get("IGPSPORT_AUTH_TOKEN")
            .or_else(|| get("AUTHORIZATION"))
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| IgpsportError::Config("IGPSPORT_AUTH_TOKEN missing".into()))?;
        let mut cfg = Self::new(SecretString::new(token.into()));
        if let Some(base_url) = get("IGPSPORT_BASE_URL") {
            cfg.base_url = base_url;
        }
        if let Some(secs) = get("IGPSPORT_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                IgpsportError::Config(format!("IGPSPORT_TIMEOUT_SECS invalid: {e}"))
            })?;
            cfg.timeout = Duration::from_secs(secs);
        }
        Ok(cfg)
    }
}
