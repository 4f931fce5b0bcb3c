//! Dashboard configuration.

use std::time::Duration;

use chrono_tz::Tz;

use crate::pager::IssuerFilter;

/// Timing and display settings for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// How often the feed is polled.
    pub refresh_interval: Duration,
    /// Clock tick period.
    pub clock_interval: Duration,
    /// Auto-advance period for paged views.
    pub auto_advance_interval: Duration,
    /// Quiet period after user interaction before auto-advance resumes.
    pub quiet_period: Duration,
    /// Alerts per page in the office view.
    pub page_size: usize,
    /// Which alerts to show.
    pub filter: IssuerFilter,
    /// Zone used for the clock and all rendered timestamps.
    pub timezone: Tz,
    /// Clock suffix during daylight-saving time.
    pub daylight_label: String,
    /// Clock suffix otherwise.
    pub standard_label: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            clock_interval: Duration::from_secs(1),
            auto_advance_interval: Duration::from_secs(8),
            quiet_period: Duration::from_secs(10),
            page_size: 6,
            filter: IssuerFilter::All,
            timezone: chrono_tz::America::New_York,
            daylight_label: "EDT".to_string(),
            standard_label: "EST".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Office view for the given issuer.
    #[must_use]
    pub fn for_office(office: impl Into<String>) -> Self {
        Self {
            filter: IssuerFilter::office(office),
            ..Self::default()
        }
    }

    /// Set the refresh interval. Zero is ignored.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.refresh_interval = interval;
        }
        self
    }

    /// Set the clock tick period. Zero is ignored.
    #[must_use]
    pub fn with_clock_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.clock_interval = interval;
        }
        self
    }

    /// Set the auto-advance period. Zero is ignored.
    #[must_use]
    pub fn with_auto_advance_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.auto_advance_interval = interval;
        }
        self
    }

    /// Set the quiet period.
    #[must_use]
    pub const fn with_quiet_period(mut self, quiet: Duration) -> Self {
        self.quiet_period = quiet;
        self
    }

    /// Set the page size. Zero is treated as one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the display zone.
    #[must_use]
    pub const fn with_timezone(mut self, zone: Tz) -> Self {
        self.timezone = zone;
        self
    }

    /// Set the clock suffix labels.
    #[must_use]
    pub fn with_labels(mut self, daylight: impl Into<String>, standard: impl Into<String>) -> Self {
        self.daylight_label = daylight.into();
        self.standard_label = standard.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();

        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.clock_interval, Duration::from_secs(1));
        assert_eq!(config.auto_advance_interval, Duration::from_secs(8));
        assert_eq!(config.quiet_period, Duration::from_secs(10));
        assert_eq!(config.page_size, 6);
        assert_eq!(config.filter, IssuerFilter::All);
        assert_eq!(config.timezone, chrono_tz::America::New_York);
    }

    #[test]
    fn test_config_builder() {
        let config = DashboardConfig::for_office("NWS Peachtree City GA")
            .with_refresh_interval(Duration::from_secs(30))
            .with_auto_advance_interval(Duration::from_secs(5))
            .with_quiet_period(Duration::from_secs(3))
            .with_page_size(4)
            .with_timezone(chrono_tz::America::Chicago)
            .with_labels("CDT", "CST");

        assert_eq!(config.filter.office_name(), Some("NWS Peachtree City GA"));
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.auto_advance_interval, Duration::from_secs(5));
        assert_eq!(config.quiet_period, Duration::from_secs(3));
        assert_eq!(config.page_size, 4);
        assert_eq!(config.daylight_label, "CDT");
    }

    #[test]
    fn test_zero_values_are_guarded() {
        let config = DashboardConfig::default()
            .with_refresh_interval(Duration::ZERO)
            .with_clock_interval(Duration::ZERO)
            .with_auto_advance_interval(Duration::ZERO)
            .with_page_size(0);

        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.clock_interval, Duration::from_secs(1));
        assert_eq!(config.auto_advance_interval, Duration::from_secs(8));
        assert_eq!(config.page_size, 1);
    }
}
