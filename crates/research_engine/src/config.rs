use thiserror::Error;
use url::Url;

/// Environment variable the binary reads the API origin from.
pub const API_URL_ENV: &str = "RESEARCH_API_URL";
/// Origin used in development builds when nothing else is configured.
pub const DEV_API_URL: &str = "http://localhost:5000";
/// Origin used in release builds when nothing else is configured.
pub const PROD_API_URL: &str = "https://fusionai-backend-suul.onrender.com";

const RESEARCH_PATH: &str = "/api/research";
const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid API base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Where the research API lives. Built once at startup and handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    api_base_url: String,
}

impl ApiConfig {
    /// Validate `base` as an absolute http(s) origin. Trailing slashes are dropped.
    pub fn new(base: &str) -> Result<Self, ConfigError> {
        let trimmed = base.trim();
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason,
        };

        let parsed = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(format!("unsupported scheme '{other}'"))),
        }
        if parsed.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("query and fragment are not allowed".to_string()));
        }

        Ok(Self {
            api_base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    /// Pick the environment-provided origin if it is non-blank, else the
    /// development default when `dev_mode`, else the production fallback.
    pub fn resolve(env_value: Option<&str>, dev_mode: bool) -> Result<Self, ConfigError> {
        match env_value.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Self::new(value),
            None if dev_mode => Self::new(DEV_API_URL),
            None => Self::new(PROD_API_URL),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn research_endpoint(&self) -> String {
        format!("{}{}", self.api_base_url, RESEARCH_PATH)
    }

    pub fn health_endpoint(&self) -> String {
        format!("{}{}", self.api_base_url, HEALTH_PATH)
    }
}
