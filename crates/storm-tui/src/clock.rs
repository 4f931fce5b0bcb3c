//! Wall clock shown in the header.
//!
//! The daylight-saving suffix is decided by formatting the instant with the
//! zone's abbreviation and looking for `DT` in it. This is a string match,
//! not a rule lookup: zones whose summer abbreviation does not end in `DT`
//! (for example `BST`) are reported as standard time.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Marker searched for in the zone abbreviation.
const DAYLIGHT_MARKER: &str = "DT";

/// Current time plus how to label it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockState {
    now: DateTime<Utc>,
    zone: Tz,
    daylight_label: String,
    standard_label: String,
}

impl ClockState {
    /// Clock at `now` displayed in `zone`, labelled `EDT`/`EST`.
    pub fn new(now: DateTime<Utc>, zone: Tz) -> Self {
        Self {
            now,
            zone,
            daylight_label: "EDT".to_string(),
            standard_label: "EST".to_string(),
        }
    }

    /// Override the suffix labels.
    #[must_use]
    pub fn with_labels(mut self, daylight: impl Into<String>, standard: impl Into<String>) -> Self {
        self.daylight_label = daylight.into();
        self.standard_label = standard.into();
        self
    }

    /// Replace the current instant.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    /// Current instant.
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Display zone.
    pub const fn zone(&self) -> Tz {
        self.zone
    }

    /// Abbreviated zone name at the current instant, e.g. `EDT`.
    pub fn zone_abbreviation(&self) -> String {
        self.now.with_timezone(&self.zone).format("%Z").to_string()
    }

    /// Heuristic daylight-saving check on the zone abbreviation.
    pub fn is_daylight_saving(&self) -> bool {
        self.zone_abbreviation().contains(DAYLIGHT_MARKER)
    }

    /// `EDT` or `EST` (or the configured labels).
    pub fn time_suffix(&self) -> &str {
        if self.is_daylight_saving() {
            &self.daylight_label
        } else {
            &self.standard_label
        }
    }

    /// Time of day with suffix, e.g. `3:04:05 PM EDT`.
    pub fn display_time(&self) -> String {
        format!(
            "{} {}",
            self.now.with_timezone(&self.zone).format("%-I:%M:%S %p"),
            self.time_suffix()
        )
    }
}
