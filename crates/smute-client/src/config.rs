//! Client configuration.

/// Default base URL of the job service.
pub const DEFAULT_BASE_URL: &str = "https://groovy.audioshake.ai";

/// Configuration for the job service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the job service
    pub base_url: String,
    /// Bearer token for service calls
    pub token: String,
}

impl ClientConfig {
    /// Create a config with the default base URL.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
        }
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create config from environment variables.
    ///
    /// Reads the token from `TOKEN` and an optional base URL override from
    /// `SMUTE_BASE_URL`.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("TOKEN").ok()?;
        let mut config = Self::new(token);
        if let Ok(base_url) = std::env::var("SMUTE_BASE_URL") {
            config.base_url = base_url;
        }
        Some(config)
    }
}
