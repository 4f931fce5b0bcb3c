//! Feed client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{FeedError, Result};

/// The public NWS active-alerts endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.weather.gov/alerts/active";

/// Content type the NWS API documents for alert features.
pub const GEO_JSON: &str = "application/geo+json";

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Endpoint to GET.
    pub endpoint: String,
    /// Value of the `User-Agent` header. The NWS API rejects anonymous clients.
    pub user_agent: String,
    /// Value of the `Accept` header.
    pub accept: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: default_user_agent(),
            accept: GEO_JSON.to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

impl FeedConfig {
    /// Create a configuration pointing at the given endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the accept header.
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the configuration and return the parsed endpoint.
    pub fn validate(&self) -> Result<Url> {
        if self.user_agent.trim().is_empty() {
            return Err(FeedError::InvalidConfig {
                reason: "user agent must not be empty".to_string(),
            });
        }
        if self.timeout.is_zero() {
            return Err(FeedError::InvalidConfig {
                reason: "timeout must be positive".to_string(),
            });
        }
        let url = Url::parse(&self.endpoint).map_err(|e| FeedError::InvalidConfig {
            reason: format!("endpoint {:?}: {e}", self.endpoint),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(FeedError::InvalidConfig {
                reason: format!("unsupported scheme: {other}"),
            }),
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "stormwatch/{} (https://github.com/stormwatch/stormwatch)",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();

        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.accept, "application/geo+json");
        assert!(config.user_agent.starts_with("stormwatch/"));
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = FeedConfig::new("http://127.0.0.1:9000/alerts")
            .with_user_agent("wx-wall (ops@example.com)")
            .with_accept("application/json")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.user_agent, "wx-wall (ops@example.com)");
        assert_eq!(config.accept, "application/json");
        assert_eq!(config.timeout, Duration::from_secs(5));
        let url = config.validate().unwrap();
        assert_eq!(url.port(), Some(9000));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let err = FeedConfig::new("not a url").validate().unwrap_err();
        assert!(matches!(err, FeedError::InvalidConfig { .. }));

        let err = FeedConfig::new("ftp://example.com/alerts").validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_validate_rejects_blank_user_agent() {
        let err = FeedConfig::default().with_user_agent("  ").validate().unwrap_err();
        assert!(err.to_string().contains("user agent"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let err = FeedConfig::default()
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }
}
