//! Issuer filtering and paging over the filtered alerts.
//!
//! Everything here is plain state. Timers that drive auto-advance and the
//! quiet period live in [`crate::dashboard`].

use std::ops::Range;

use storm_feed::AlertRecord;

/// Which alerts the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuerFilter {
    /// Every active alert.
    All,
    /// Only alerts whose sender contains `name`, ignoring case.
    Office {
        /// Office name as configured.
        name: String,
        /// Lowercased `name`.
        needle: String,
    },
}

impl IssuerFilter {
    /// Filter to a single issuing office.
    pub fn office(name: impl Into<String>) -> Self {
        let name = name.into();
        let needle = name.to_lowercase();
        Self::Office { name, needle }
    }

    /// Whether `alert` passes. Alerts without a sender never match an office.
    pub fn matches(&self, alert: &AlertRecord) -> bool {
        match self {
            Self::All => true,
            Self::Office { needle, .. } => alert
                .sender_name()
                .is_some_and(|sender| sender.to_lowercase().contains(needle.as_str())),
        }
    }

    /// Indices of the matching alerts, in feed order.
    pub fn apply(&self, alerts: &[AlertRecord]) -> Vec<usize> {
        alerts
            .iter()
            .enumerate()
            .filter(|(_, alert)| self.matches(alert))
            .map(|(index, _)| index)
            .collect()
    }

    /// Configured office name, if filtering.
    pub fn office_name(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Office { name, .. } => Some(name),
        }
    }

    /// Office view pages and auto-rotates; the all-alerts view scrolls.
    pub const fn is_paged(&self) -> bool {
        matches!(self, Self::Office { .. })
    }
}

/// Manual navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward one page.
    Next,
    /// Back one page.
    Previous,
}

/// A `(start, size)` window over the filtered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    start: usize,
    size: usize,
}

impl PageWindow {
    /// Window at the first page. A zero size is treated as one.
    pub const fn new(size: usize) -> Self {
        Self {
            start: 0,
            size: if size == 0 { 1 } else { size },
        }
    }

    /// Index of the first visible alert.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Alerts per page.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Move forward one page, wrapping to 0 when the next start would reach
    /// or pass `len`.
    pub fn next(&mut self, len: usize) {
        let next = self.start + self.size;
        self.start = if next >= len { 0 } else { next };
    }

    /// Move back one page. Going below 0 wraps to `max(len - size, 0)`.
    pub fn prev(&mut self, len: usize) {
        self.start = if self.start < self.size {
            len.saturating_sub(self.size)
        } else {
            self.start - self.size
        };
    }

    /// Step in `direction`.
    pub fn step(&mut self, direction: Direction, len: usize) {
        match direction {
            Direction::Next => self.next(len),
            Direction::Previous => self.prev(len),
        }
    }

    /// Change the page size, keeping the current start. A zero size is
    /// treated as one.
    pub fn resize(&mut self, size: usize, len: usize) {
        self.size = size.max(1);
        self.normalize(len);
    }

    /// Reset to the first page if the list shrank below the window.
    pub fn normalize(&mut self, len: usize) {
        if self.start >= len {
            self.start = 0;
        }
    }

    /// Visible index range into a list of `len` items.
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = self.start.min(len);
        start..(self.start + self.size).min(len)
    }

    /// Total pages for `len` items.
    pub const fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.size)
    }

    /// One-based page number for display. A window that reaches the end of
    /// the list counts as the last page.
    pub const fn page_number(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else if self.start + self.size >= len {
            self.page_count(len)
        } else {
            self.start / self.size + 1
        }
    }
}

/// Page window plus the auto-scroll flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    window: PageWindow,
    auto_scroll: bool,
}

impl Pager {
    /// Pager at the first page with auto-scroll on.
    pub const fn new(page_size: usize) -> Self {
        Self {
            window: PageWindow::new(page_size),
            auto_scroll: true,
        }
    }

    /// Current window.
    pub const fn window(&self) -> &PageWindow {
        &self.window
    }

    /// Whether auto-advance is allowed right now.
    pub const fn is_auto_scrolling(&self) -> bool {
        self.auto_scroll
    }

    /// Navigation is only offered when there is more than one page.
    pub const fn needs_controls(&self, len: usize) -> bool {
        len > self.window.size
    }

    /// Whether the auto-advance timer should be running.
    pub const fn auto_advance_active(&self, len: usize) -> bool {
        self.auto_scroll && self.needs_controls(len)
    }

    /// Timer-driven advance. Inert when there is a single page.
    pub fn advance(&mut self, len: usize) {
        if self.needs_controls(len) {
            self.window.next(len);
        }
    }

    /// User-driven move. Returns `false` when navigation is not offered.
    pub fn step(&mut self, direction: Direction, len: usize) -> bool {
        if !self.needs_controls(len) {
            return false;
        }
        self.window.step(direction, len);
        true
    }

    /// Stop auto-advance.
    pub fn pause(&mut self) {
        self.auto_scroll = false;
    }

    /// Allow auto-advance again.
    pub fn resume(&mut self) {
        self.auto_scroll = true;
    }

    /// Keep the window inside a list of `len` items.
    pub fn normalize(&mut self, len: usize) {
        self.window.normalize(len);
    }

    /// Change the page size. Returns `false` if it was already `size`.
    pub fn set_page_size(&mut self, size: usize, len: usize) -> bool {
        if self.window.size == size.max(1) {
            return false;
        }
        self.window.resize(size, len);
        true
    }
}
