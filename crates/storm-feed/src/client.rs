//! HTTP client for the active-alerts feed.
//!
//! The client performs one GET per call. [`FeedClient::try_fetch`] reports
//! what went wrong; the [`AlertSource`] impl absorbs every failure into an
//! empty list, so a caller sees "no alerts" both when the feed is quiet and
//! when it is unreachable.

use std::future::Future;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, warn};
use url::Url;

use crate::config::FeedConfig;
use crate::error::{FeedError, Result};
use crate::types::{AlertRecord, FeedEnvelope};

/// Anything that can produce the current list of active alerts.
///
/// Implementations never fail: errors are logged and reported as an empty
/// list.
pub trait AlertSource: Send + Sync {
    /// Fetch the current alerts.
    fn fetch_alerts(&self) -> impl Future<Output = Vec<AlertRecord>> + Send;
}

/// Feed client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl FeedClient {
    /// Build a client from configuration.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let endpoint = config.validate()?;

        let mut headers = HeaderMap::new();
        let accept = HeaderValue::from_str(&config.accept).map_err(|e| {
            FeedError::InvalidConfig {
                reason: format!("accept header: {e}"),
            }
        })?;
        headers.insert(ACCEPT, accept);

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, endpoint })
    }

    /// The endpoint this client polls.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch and parse the feed, reporting failures.
    pub async fn try_fetch(&self) -> Result<Vec<AlertRecord>> {
        let response = self.http.get(self.endpoint.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: FeedEnvelope = serde_json::from_slice(&body)?;
        debug!(
            endpoint = %self.endpoint,
            alerts = envelope.features.len(),
            "fetched alert feed"
        );
        Ok(envelope.features)
    }
}

impl AlertSource for FeedClient {
    async fn fetch_alerts(&self) -> Vec<AlertRecord> {
        match self.try_fetch().await {
            Ok(alerts) => alerts,
            Err(err) => {
                warn!(endpoint = %self.endpoint, error = %err, "error fetching weather alerts");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_config() {
        let result = FeedClient::new(&FeedConfig::new("not a url"));
        assert!(matches!(result, Err(FeedError::InvalidConfig { .. })));
    }

    #[test]
    fn new_rejects_unencodable_accept() {
        let config = FeedConfig::default().with_accept("application/json\n");
        let result = FeedClient::new(&config);
        assert!(matches!(result, Err(FeedError::InvalidConfig { .. })));
    }

    #[test]
    fn endpoint_is_parsed() {
        let client = FeedClient::new(&FeedConfig::default()).unwrap();
        assert_eq!(client.endpoint().host_str(), Some("api.weather.gov"));
        assert_eq!(client.endpoint().path(), "/alerts/active");
    }
}
