//! Mapping from alert records to what a tile shows.
//!
//! Pure functions only. Missing or unparseable fields turn into literal
//! placeholder text instead of errors.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use ratatui::style::{Color, Modifier, Style};
use storm_feed::{AlertRecord, parse_timestamp};

/// Shown for an absent timestamp or area.
pub const UNKNOWN: &str = "Unknown";
/// Shown for an absent event type.
pub const UNKNOWN_EVENT: &str = "Unknown Event";
/// Shown for an absent headline.
pub const NO_HEADLINE: &str = "No headline available";
/// Shown for an absent sender.
pub const UNKNOWN_OFFICE: &str = "Unknown Office";

/// Visual bucket for an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertStyle {
    /// Pulsing red, reserved for tornado warnings.
    TornadoPulse,
    /// Solid red for other life-threatening warnings.
    Severe,
    /// Flooding.
    Flood,
    /// Snow and ice.
    Winter,
    /// Heat.
    Heat,
    /// Non-convective wind.
    Wind,
    /// Fire weather.
    Fire,
    /// Watches.
    Watch,
    /// Advisories and statements.
    Advisory,
    /// Anything not in the table.
    Neutral,
}

impl AlertStyle {
    /// Exact, case-sensitive lookup of an NWS event type.
    pub fn for_event(event: &str) -> Self {
        match event {
            "Tornado Warning" => Self::TornadoPulse,
            "Severe Thunderstorm Warning"
            | "Extreme Wind Warning"
            | "Hurricane Warning"
            | "Tsunami Warning"
            | "Storm Surge Warning" => Self::Severe,
            "Flash Flood Warning"
            | "Flood Warning"
            | "Flood Advisory"
            | "Coastal Flood Warning"
            | "Coastal Flood Advisory" => Self::Flood,
            "Winter Storm Warning"
            | "Blizzard Warning"
            | "Ice Storm Warning"
            | "Winter Weather Advisory"
            | "Freeze Warning"
            | "Frost Advisory" => Self::Winter,
            "Excessive Heat Warning" | "Extreme Heat Warning" | "Heat Advisory" => Self::Heat,
            "High Wind Warning" | "Wind Advisory" | "Lake Wind Advisory" => Self::Wind,
            "Red Flag Warning" | "Fire Weather Watch" | "Fire Warning" => Self::Fire,
            "Tornado Watch"
            | "Severe Thunderstorm Watch"
            | "Flood Watch"
            | "Flash Flood Watch"
            | "Winter Storm Watch"
            | "Hurricane Watch"
            | "Tropical Storm Watch" => Self::Watch,
            "Special Weather Statement"
            | "Dense Fog Advisory"
            | "Small Craft Advisory"
            | "Air Quality Alert"
            | "Beach Hazards Statement" => Self::Advisory,
            _ => Self::Neutral,
        }
    }

    /// Stable identifier for the bucket.
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::TornadoPulse => "pulse-red",
            Self::Severe => "red",
            Self::Flood => "green",
            Self::Winter => "blue",
            Self::Heat => "orange",
            Self::Wind => "amber",
            Self::Fire => "crimson",
            Self::Watch => "yellow",
            Self::Advisory => "teal",
            Self::Neutral => "neutral",
        }
    }

    /// Accent colour used for the tile border and title.
    pub const fn accent(self) -> Color {
        match self {
            Self::TornadoPulse | Self::Severe => Color::Red,
            Self::Flood => Color::Green,
            Self::Winter => Color::LightBlue,
            Self::Heat => Color::Rgb(255, 140, 0),
            Self::Wind => Color::Rgb(255, 191, 0),
            Self::Fire => Color::LightRed,
            Self::Watch => Color::Yellow,
            Self::Advisory => Color::Cyan,
            Self::Neutral => Color::Gray,
        }
    }

    /// Whether the tile should blink.
    pub const fn pulses(self) -> bool {
        matches!(self, Self::TornadoPulse)
    }

    /// Border style for the tile.
    pub fn border_style(self) -> Style {
        let style = Style::default().fg(self.accent());
        if self.pulses() {
            style.add_modifier(Modifier::SLOW_BLINK | Modifier::BOLD)
        } else {
            style
        }
    }
}

/// Feed timestamp as `10/16/2026, 3:04:05 PM EDT` in `zone`, or `Unknown`.
pub fn format_timestamp(raw: Option<&str>, zone: Tz) -> String {
    raw.and_then(parse_timestamp)
        .map(|ts| {
            ts.with_timezone(&zone)
                .format("%-m/%-d/%Y, %-I:%M:%S %p %Z")
                .to_string()
        })
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Local stamp without zone name, used for "Last Refreshed".
pub fn format_stamp(now: DateTime<Utc>, zone: Tz) -> String {
    now.with_timezone(&zone)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

/// Semicolon-delimited areas joined with `, `, or `Unknown`.
pub fn format_area(raw: Option<&str>) -> String {
    match raw {
        Some(areas) => areas
            .split(';')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(", "),
        None => UNKNOWN.to_string(),
    }
}

/// Everything a tile renders, derived from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertTile {
    /// Event type.
    pub title: String,
    /// Headline.
    pub headline: String,
    /// Issuing office.
    pub sender: String,
    /// Affected areas.
    pub areas: String,
    /// Effective time.
    pub effective: String,
    /// Expiry time.
    pub expires: String,
    /// Visual bucket.
    pub style: AlertStyle,
}

impl AlertTile {
    /// Build the tile for `alert`, rendering times in `zone`.
    pub fn from_record(alert: &AlertRecord, zone: Tz) -> Self {
        let style = alert.event().map_or(AlertStyle::Neutral, AlertStyle::for_event);
        Self {
            title: alert.event().unwrap_or(UNKNOWN_EVENT).to_string(),
            headline: alert.headline().unwrap_or(NO_HEADLINE).to_string(),
            sender: alert.sender_name().unwrap_or(UNKNOWN_OFFICE).to_string(),
            areas: format_area(alert.area_desc()),
            effective: format_timestamp(alert.effective(), zone),
            expires: format_timestamp(alert.expires(), zone),
            style,
        }
    }
}
