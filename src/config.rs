use crate::constants::{
    ACCESS_TOKEN_VAR, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_UPSTREAM_BASE_URL, HOST_VAR, PORT_VAR,
    UPSTREAM_BASE_VAR,
};
use crate::error::ConfigError;
use std::fmt;

/// Everything the proxy needs to talk to HubSpot.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Property API base, e.g. `https://api.hubapi.com/crm/v3/properties`
    pub base_url: String,
    /// Private app access token sent as a bearer credential
    pub access_token: String,
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Process configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub upstream: UpstreamConfig,
}

impl ProxyConfig {
    /// Load from the process environment, reading `.env` first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup(ACCESS_TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingVar(ACCESS_TOKEN_VAR))?;

        let port = match lookup(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let host = lookup(HOST_VAR)
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let base_url = lookup(UPSTREAM_BASE_VAR)
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string());

        Ok(Self {
            host,
            port,
            upstream: UpstreamConfig {
                base_url,
                access_token,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
