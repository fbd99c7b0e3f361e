//! Client configuration.

/// Default API origin used when no environment override is present.
pub const DEFAULT_API_URL: &str = "http://localhost:8008";

/// Configuration for the API client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base origin of the remote API (e.g. "http://localhost:8008").
    pub base_url: String,
}

impl ClientConfig {
    /// Create a configuration with an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable            | Default                 |
    /// |---------------------|-------------------------|
    /// | `MOCTEZUMA_API_URL` | `http://localhost:8008` |
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("MOCTEZUMA_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.into()),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
