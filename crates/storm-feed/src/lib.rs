//! Active weather-alert feed client for stormwatch.
//!
//! `storm-feed` fetches the National Weather Service active-alerts feed and
//! exposes the records the dashboard renders.
//!
//! # Failure policy
//!
//! [`AlertSource::fetch_alerts`] never returns an error. Transport failures,
//! non-success statuses and malformed bodies are logged through `tracing`
//! and reported as an empty list. [`FeedClient::try_fetch`] is available for
//! callers that need the underlying [`FeedError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use storm_feed::{AlertSource, FeedClient, FeedConfig};
//!
//! # async fn run() -> storm_feed::Result<()> {
//! let client = FeedClient::new(&FeedConfig::default())?;
//! for alert in client.fetch_alerts().await {
//!     println!("{}", alert.event().unwrap_or("Unknown Event"));
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{AlertSource, FeedClient};
pub use config::{DEFAULT_ENDPOINT, FeedConfig, GEO_JSON};
pub use error::{FeedError, Result};
pub use types::{AlertProperties, AlertRecord, FeedEnvelope, parse_timestamp};
