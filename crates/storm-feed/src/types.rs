//! Alert records as delivered by the active-alerts feed.
//!
//! Only the members the dashboard reads are modelled; everything else in the
//! GeoJSON feature is ignored during deserialization. Every property is
//! optional because the feed omits members freely. A malformed record never
//! sinks the document: null or wrongly typed members decode as absent.

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The top-level feed document: a GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEnvelope {
    /// One entry per active alert.
    #[serde(deserialize_with = "lenient_records")]
    pub features: Vec<AlertRecord>,
}

/// A single alert feature.
///
/// Records are immutable once fetched. The dashboard replaces its whole list
/// on every refresh, so there is no mutable access to the properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(default, deserialize_with = "lenient")]
    properties: AlertProperties,
}

/// The properties object of an alert feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertProperties {
    /// Event category, e.g. `Tornado Warning`.
    #[serde(default, deserialize_with = "lenient")]
    pub event: Option<String>,
    /// One-line human headline.
    #[serde(default, deserialize_with = "lenient")]
    pub headline: Option<String>,
    /// Issuing office, e.g. `NWS Peachtree City GA`.
    #[serde(default, deserialize_with = "lenient")]
    pub sender_name: Option<String>,
    /// Semicolon-delimited list of affected areas.
    #[serde(default, deserialize_with = "lenient")]
    pub area_desc: Option<String>,
    /// When the alert takes effect (RFC 3339).
    #[serde(default, deserialize_with = "lenient")]
    pub effective: Option<String>,
    /// When the alert expires (RFC 3339).
    #[serde(default, deserialize_with = "lenient")]
    pub expires: Option<String>,
}

impl AlertRecord {
    /// Wraps a properties object into a record.
    #[must_use]
    pub const fn new(properties: AlertProperties) -> Self {
        Self { properties }
    }

    /// Returns the full properties object.
    #[must_use]
    pub const fn properties(&self) -> &AlertProperties {
        &self.properties
    }

    /// Event category.
    #[must_use]
    pub fn event(&self) -> Option<&str> {
        self.properties.event.as_deref()
    }

    /// Headline text.
    #[must_use]
    pub fn headline(&self) -> Option<&str> {
        self.properties.headline.as_deref()
    }

    /// Issuing office.
    #[must_use]
    pub fn sender_name(&self) -> Option<&str> {
        self.properties.sender_name.as_deref()
    }

    /// Raw area description, still semicolon-delimited.
    #[must_use]
    pub fn area_desc(&self) -> Option<&str> {
        self.properties.area_desc.as_deref()
    }

    /// Raw effective timestamp.
    #[must_use]
    pub fn effective(&self) -> Option<&str> {
        self.properties.effective.as_deref()
    }

    /// Raw expiry timestamp.
    #[must_use]
    pub fn expires(&self) -> Option<&str> {
        self.properties.expires.as_deref()
    }
}

impl From<AlertProperties> for AlertRecord {
    fn from(properties: AlertProperties) -> Self {
        Self::new(properties)
    }
}

/// Decodes `T`, falling back to its default when the value is null or of the
/// wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// The `features` member must be an array, but each element decodes on its
/// own.
fn lenient_records<'de, D>(deserializer: D) -> Result<Vec<AlertRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap_or_default())
        .collect())
}

/// Parses a feed timestamp, returning `None` for anything that is not
/// RFC 3339.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim()).ok()
}
