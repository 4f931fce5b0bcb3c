//! Application state for the stormwatch TUI

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use storm_feed::AlertRecord;

use crate::clock::ClockState;
use crate::config::DashboardConfig;
use crate::pager::{IssuerFilter, Pager};

/// Main application state
///
/// Mutated only by [`crate::dashboard::Dashboard`].
#[derive(Debug)]
pub struct App {
    /// Is the app running
    pub running: bool,

    /// Latest alert list, replaced wholesale on every fetch
    alerts: Vec<AlertRecord>,

    /// Indices into `alerts` that pass the filter
    visible: Vec<usize>,

    filter: IssuerFilter,

    /// When the last fetch resolved, formatted for display
    last_updated: Option<String>,

    /// Header clock
    pub clock: ClockState,

    /// Paging state for the office view
    pager: Pager,

    /// Configured alerts per page, before fitting to the screen
    page_size: usize,

    /// First visible tile in the all-alerts view
    scroll: usize,
}

impl App {
    /// Empty app in the loading state.
    pub fn new(config: &DashboardConfig, now: DateTime<Utc>) -> Self {
        Self {
            running: true,
            alerts: Vec::new(),
            visible: Vec::new(),
            filter: config.filter.clone(),
            last_updated: None,
            clock: ClockState::new(now, config.timezone)
                .with_labels(&config.daylight_label, &config.standard_label),
            pager: Pager::new(config.page_size),
            page_size: config.page_size,
            scroll: 0,
        }
    }

    /// Replace the alert list and recompute the filtered view.
    pub fn replace_alerts(&mut self, alerts: Vec<AlertRecord>, stamp: String) {
        self.alerts = alerts;
        self.visible = self.filter.apply(&self.alerts);
        self.last_updated = Some(stamp);
        self.pager.normalize(self.visible.len());
        self.scroll = self.scroll.min(self.visible.len().saturating_sub(1));
    }

    /// Every fetched alert.
    pub fn alerts(&self) -> &[AlertRecord] {
        &self.alerts
    }

    /// Number of alerts passing the filter.
    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    /// Alerts passing the filter, in feed order.
    pub fn filtered(&self) -> impl Iterator<Item = &AlertRecord> + '_ {
        self.visible.iter().map(|&i| &self.alerts[i])
    }

    /// Alerts to draw: the current page when paged, otherwise everything
    /// from the scroll offset on.
    pub fn on_screen(&self) -> impl Iterator<Item = &AlertRecord> + '_ {
        let range = if self.filter.is_paged() {
            self.pager.window().range(self.visible.len())
        } else {
            self.scroll.min(self.visible.len())..self.visible.len()
        };
        self.visible[range].iter().map(|&i| &self.alerts[i])
    }

    /// Which alerts are shown.
    pub fn filter(&self) -> &IssuerFilter {
        &self.filter
    }

    /// Display stamp of the last applied fetch, `None` while loading.
    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    /// Office view paging state.
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Mutable paging state.
    pub fn pager_mut(&mut self) -> &mut Pager {
        &mut self.pager
    }

    /// Display zone for timestamps.
    pub fn zone(&self) -> Tz {
        self.clock.zone()
    }

    /// Shrink pages to what the tile grid can hold, so every alert on a page
    /// is drawn. Never grows past the configured page size. Returns whether
    /// the page size changed.
    pub fn fit_page_to(&mut self, capacity: usize) -> bool {
        let size = self.page_size.min(capacity).max(1);
        let len = self.visible.len();
        self.pager.set_page_size(size, len)
    }

    /// Whether next/previous controls are offered.
    pub fn shows_page_controls(&self) -> bool {
        self.filter.is_paged() && self.pager.needs_controls(self.visible.len())
    }

    /// First tile shown in the all-alerts view.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Scroll back by `rows` tiles.
    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    /// Scroll forward by `rows` tiles, stopping at the last one.
    pub fn scroll_down(&mut self, rows: usize) {
        let last = self.visible.len().saturating_sub(1);
        self.scroll = (self.scroll + rows).min(last);
    }
}
