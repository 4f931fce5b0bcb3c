//! Dashboard controller.
//!
//! Owns the [`App`] state and every timer that mutates it. All state changes
//! go through [`Dashboard::handle`] on the event-loop task; timers and the
//! feed poller run as separate tasks that only post events. After
//! [`Dashboard::unmount`] every timer is cancelled and `handle` ignores all
//! input, so a firing that was already queued cannot touch the state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use storm_feed::{AlertRecord, AlertSource};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, trace};

use crate::app::App;
use crate::config::DashboardConfig;
use crate::events::{self, Action, AppEvent, DataEvent};
use crate::pager::Direction;
use crate::present;
use crate::scheduler::{RefreshScheduler, SchedulerState};
use crate::timer::{TimerFired, TimerKind, TimerSlot};
use crate::ui;

/// Dashboard state plus its timers.
#[derive(Debug)]
pub struct Dashboard<S> {
    app: App,
    config: DashboardConfig,
    tx: UnboundedSender<AppEvent>,
    scheduler: RefreshScheduler<S>,
    clock: TimerSlot,
    auto_advance: TimerSlot,
    resume: TimerSlot,
    viewport: Rect,
    mounted: bool,
    wall_clock: fn() -> DateTime<Utc>,
}

impl<S> Dashboard<S>
where
    S: AlertSource + 'static,
{
    /// Build an unmounted dashboard. Nothing runs until [`Self::mount`].
    pub fn new(config: DashboardConfig, source: Arc<S>, tx: UnboundedSender<AppEvent>) -> Self {
        let app = App::new(&config, Utc::now());
        let scheduler = RefreshScheduler::new(source, config.refresh_interval);
        let mut dashboard = Self {
            app,
            config,
            tx,
            scheduler,
            clock: TimerSlot::new(TimerKind::Clock),
            auto_advance: TimerSlot::new(TimerKind::AutoAdvance),
            resume: TimerSlot::new(TimerKind::Resume),
            viewport: Rect::default(),
            mounted: false,
            wall_clock: Utc::now,
        };
        dashboard.set_viewport(Rect::new(0, 0, 80, 24));
        dashboard
    }

    /// Read wall-clock time from `now` instead of the system clock.
    #[must_use]
    pub fn with_wall_clock(mut self, now: fn() -> DateTime<Utc>) -> Self {
        self.wall_clock = now;
        self.app.clock.tick(now());
        self
    }

    /// Current state.
    pub const fn app(&self) -> &App {
        &self.app
    }

    /// Whether the dashboard is live.
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Refresh schedule state.
    pub const fn refresh_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Whether the page auto-advance timer is pending.
    pub fn is_auto_advance_armed(&self) -> bool {
        self.auto_advance.is_armed()
    }

    /// Whether a quiet period is running.
    pub fn is_resume_pending(&self) -> bool {
        self.resume.is_armed()
    }

    /// Terminal size. Used to hit-test mouse clicks and to fit office pages
    /// to the tile grid.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        let capacity = ui::grid_capacity(viewport, &self.app);
        if self.app.fit_page_to(capacity) {
            debug!(page_size = self.app.pager().window().size(), "page size fitted to screen");
            if self.mounted {
                self.sync_auto_advance();
            }
        }
    }

    /// Start the refresh schedule and the clock. Idempotent.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.scheduler.start(self.tx.clone());
        self.clock.arm_repeating(self.config.clock_interval, self.tx.clone());
        self.sync_auto_advance();
        info!(
            office = self.app.filter().office_name().unwrap_or("all"),
            page_size = self.config.page_size,
            "dashboard mounted"
        );
    }

    /// Cancel every timer. Later events are ignored.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.scheduler.stop();
        self.clock.cancel();
        self.auto_advance.cancel();
        self.resume.cancel();
        self.mounted = false;
        info!("dashboard unmounted");
    }

    /// Apply one event.
    pub fn handle(&mut self, event: AppEvent) {
        if !self.mounted {
            trace!(?event, "event after unmount ignored");
            return;
        }
        match event {
            AppEvent::Key(key) => {
                if let Some(action) = events::key_action(key) {
                    self.dispatch(action);
                }
            }
            AppEvent::Mouse(mouse) => {
                let grid = ui::tile_grid_area(self.viewport, &self.app);
                if let Some(action) = events::mouse_action(mouse, grid) {
                    self.dispatch(action);
                }
            }
            AppEvent::Resize(width, height) => {
                self.set_viewport(Rect::new(0, 0, width, height));
            }
            AppEvent::Tick => {
                // Redraw only
            }
            AppEvent::Timer(fired) => self.on_timer(fired),
            AppEvent::Data(DataEvent::Alerts { generation, alerts }) => {
                if self.scheduler.accepts(generation) {
                    self.apply_alerts(alerts);
                } else {
                    debug!(generation, "stale alert result dropped");
                }
            }
        }
    }

    /// Apply a user intent.
    pub fn dispatch(&mut self, action: Action) {
        if !self.mounted {
            return;
        }
        match action {
            Action::Quit => self.app.running = false,
            Action::NextPage => self.navigate(Direction::Next),
            Action::PrevPage => self.navigate(Direction::Previous),
            Action::TileClick => self.pause(),
            Action::ScrollUp => {
                let columns = ui::grid_columns(self.viewport.width);
                self.app.scroll_up(columns);
            }
            Action::ScrollDown => {
                let columns = ui::grid_columns(self.viewport.width);
                self.app.scroll_down(columns);
            }
            Action::RefreshNow => self.scheduler.restart(self.tx.clone()),
        }
    }

    fn apply_alerts(&mut self, alerts: Vec<AlertRecord>) {
        // Stamped when the result is applied, not when it was requested.
        let stamp = present::format_stamp((self.wall_clock)(), self.app.zone());
        self.app.replace_alerts(alerts, stamp);
        debug!(
            total = self.app.alerts().len(),
            shown = self.app.filtered_len(),
            "alert list replaced"
        );
        // New filtered view, so the auto-advance countdown starts over.
        self.sync_auto_advance();
    }

    fn on_timer(&mut self, fired: TimerFired) {
        match fired.kind {
            TimerKind::Clock if self.clock.accepts(&fired) => {
                self.app.clock.tick((self.wall_clock)());
            }
            TimerKind::AutoAdvance if self.auto_advance.accepts(&fired) => {
                let len = self.app.filtered_len();
                self.app.pager_mut().advance(len);
                trace!(start = self.app.pager().window().start(), "page auto-advanced");
            }
            TimerKind::Resume if self.resume.accepts(&fired) => {
                self.resume.cancel();
                self.app.pager_mut().resume();
                debug!("auto-advance resumed");
                self.sync_auto_advance();
            }
            _ => trace!(?fired, "stale timer firing dropped"),
        }
    }

    fn navigate(&mut self, direction: Direction) {
        if !self.app.shows_page_controls() {
            return;
        }
        self.pause();
        let len = self.app.filtered_len();
        self.app.pager_mut().step(direction, len);
    }

    /// Stop auto-advance and (re)start the quiet period.
    fn pause(&mut self) {
        if !self.app.filter().is_paged() {
            return;
        }
        self.app.pager_mut().pause();
        self.resume.cancel();
        self.resume.arm_once(self.config.quiet_period, self.tx.clone());
        self.sync_auto_advance();
    }

    /// Arm auto-advance iff the pager wants it, restarting its period.
    fn sync_auto_advance(&mut self) {
        let len = self.app.filtered_len();
        if self.app.filter().is_paged() && self.app.pager().auto_advance_active(len) {
            self.auto_advance
                .arm_repeating(self.config.auto_advance_interval, self.tx.clone());
        } else if self.auto_advance.is_armed() {
            self.auto_advance.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use storm_feed::AlertProperties;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time;

    /// Returns the same list on every fetch after an optional delay.
    #[derive(Debug)]
    struct FixedSource {
        alerts: Vec<AlertRecord>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl AlertSource for FixedSource {
        async fn fetch_alerts(&self) -> Vec<AlertRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                time::sleep(self.delay).await;
            }
            self.alerts.clone()
        }
    }

    fn office_alert(i: usize) -> AlertRecord {
        AlertRecord::new(AlertProperties {
            event: Some(format!("Flood Warning {i}")),
            sender_name: Some("NWS Peachtree City GA".to_string()),
            area_desc: Some("Fulton; Cobb".to_string()),
            ..AlertProperties::default()
        })
    }

    fn source(count: usize, delay: Duration) -> Arc<FixedSource> {
        Arc::new(FixedSource {
            alerts: (0..count).map(office_alert).collect(),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    fn office_config(page_size: usize) -> DashboardConfig {
        DashboardConfig::for_office("Peachtree City").with_page_size(page_size)
    }

    struct Harness {
        dashboard: Dashboard<FixedSource>,
        rx: UnboundedReceiver<AppEvent>,
    }

    impl Harness {
        fn mounted(config: DashboardConfig, source: Arc<FixedSource>) -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            Self::mounted_with(Dashboard::new(config, source, tx), rx)
        }

        fn mounted_with(mut dashboard: Dashboard<FixedSource>, rx: UnboundedReceiver<AppEvent>) -> Self {
            // Roomy enough that no configured page gets shrunk.
            dashboard.set_viewport(Rect::new(0, 0, 160, 60));
            dashboard.mount();
            Self { dashboard, rx }
        }

        async fn settle(&mut self) {
            for _ in 0..4 {
                for _ in 0..8 {
                    tokio::task::yield_now().await;
                }
                while let Ok(event) = self.rx.try_recv() {
                    self.dashboard.handle(event);
                }
            }
        }

        /// Advance the paused clock, handling everything that fires.
        async fn run_for(&mut self, duration: Duration) {
            self.settle().await;
            time::advance(duration).await;
            self.settle().await;
        }

        fn start(&self) -> usize {
            self.dashboard.app().pager().window().start()
        }

        fn auto_scrolling(&self) -> bool {
            self.dashboard.app().pager().is_auto_scrolling()
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[tokio::test(start_paused = true)]
    async fn mount_fetches_immediately() {
        let mut h = Harness::mounted(office_config(4), source(10, Duration::ZERO));
        assert_eq!(h.dashboard.refresh_state(), SchedulerState::Active);
        h.settle().await;

        assert_eq!(h.dashboard.app().alerts().len(), 10);
        assert!(h.dashboard.app().last_updated().is_some());
        assert!(h.dashboard.is_auto_advance_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn last_updated_waits_for_resolution() {
        let mut h = Harness::mounted(office_config(4), source(3, Duration::from_secs(5)));
        h.run_for(ms(4_000)).await;
        assert!(h.dashboard.app().last_updated().is_none());
        assert!(h.dashboard.app().alerts().is_empty());

        h.run_for(ms(1_010)).await;
        assert!(h.dashboard.app().last_updated().is_some());
        assert_eq!(h.dashboard.app().alerts().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_result_still_stamps_refresh() {
        let mut h = Harness::mounted(DashboardConfig::default(), source(0, Duration::ZERO));
        h.settle().await;
        assert!(h.dashboard.app().alerts().is_empty());
        assert!(h.dashboard.app().last_updated().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn refreshes_every_minute() {
        let feed = source(2, Duration::ZERO);
        let mut h = Harness::mounted(DashboardConfig::default(), Arc::clone(&feed));
        h.settle().await;
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);

        h.run_for(ms(59_000)).await;
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);

        h.run_for(ms(1_010)).await;
        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.dashboard.app().alerts().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_now_fetches_and_restarts_period() {
        let feed = source(2, Duration::ZERO);
        let mut h = Harness::mounted(DashboardConfig::default(), Arc::clone(&feed));
        h.run_for(ms(30_000)).await;

        h.dashboard.dispatch(Action::RefreshNow);
        h.settle().await;
        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);

        // The old 60 s mark passes without a fetch.
        h.run_for(ms(30_500)).await;
        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
        h.run_for(ms(30_000)).await;
        assert_eq!(feed.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_advance_every_eight_seconds() {
        let mut h = Harness::mounted(office_config(4), source(10, Duration::ZERO));
        h.settle().await;
        assert_eq!(h.start(), 0);

        h.run_for(ms(7_990)).await;
        assert_eq!(h.start(), 0);
        h.run_for(ms(20)).await;
        assert_eq!(h.start(), 4);
        h.run_for(ms(8_000)).await;
        assert_eq!(h.start(), 8);
        h.run_for(ms(8_000)).await;
        assert_eq!(h.start(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn single_page_is_inert() {
        let mut h = Harness::mounted(office_config(6), source(6, Duration::ZERO));
        h.settle().await;
        assert!(!h.dashboard.app().shows_page_controls());
        assert!(!h.dashboard.is_auto_advance_armed());

        h.dashboard.dispatch(Action::NextPage);
        assert_eq!(h.start(), 0);
        assert!(h.auto_scrolling());

        h.run_for(ms(30_000)).await;
        assert_eq!(h.start(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn next_pauses_for_quiet_period() {
        let mut h = Harness::mounted(office_config(4), source(10, Duration::ZERO));
        h.settle().await;

        h.dashboard.dispatch(Action::NextPage);
        assert_eq!(h.start(), 4);
        assert!(!h.auto_scrolling());
        assert!(!h.dashboard.is_auto_advance_armed());
        assert!(h.dashboard.is_resume_pending());

        h.run_for(ms(9_990)).await;
        assert!(!h.auto_scrolling());
        assert_eq!(h.start(), 4);

        h.run_for(ms(20)).await;
        assert!(h.auto_scrolling());
        assert!(h.dashboard.is_auto_advance_armed());
        assert!(!h.dashboard.is_resume_pending());

        // Auto-advance restarts its full period from the resume.
        h.run_for(ms(7_990)).await;
        assert_eq!(h.start(), 4);
        h.run_for(ms(20)).await;
        assert_eq!(h.start(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn second_pause_resets_quiet_period() {
        let mut h = Harness::mounted(office_config(4), source(10, Duration::ZERO));
        h.settle().await;

        h.dashboard.dispatch(Action::NextPage);
        h.run_for(ms(6_000)).await;
        h.dashboard.dispatch(Action::TileClick);
        assert_eq!(h.start(), 4);

        // 10 s after the first pause: still quiet.
        h.run_for(ms(4_500)).await;
        assert!(!h.auto_scrolling());

        // 10 s after the second pause: resumed, exactly once.
        h.run_for(ms(5_510)).await;
        assert!(h.auto_scrolling());
        assert!(!h.dashboard.is_resume_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn queued_resume_from_cancelled_quiet_period_is_ignored() {
        let mut h = Harness::mounted(office_config(4), source(10, Duration::ZERO));
        h.settle().await;

        h.dashboard.dispatch(Action::TileClick);
        h.settle().await;
        // Let the resume fire but do not deliver it yet.
        time::advance(ms(10_010)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        // The user pauses again before the loop sees the queued resume.
        h.dashboard.dispatch(Action::TileClick);
        h.settle().await;

        assert!(!h.auto_scrolling());
        assert!(h.dashboard.is_resume_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn previous_from_first_page_wraps() {
        let mut h = Harness::mounted(office_config(4), source(10, Duration::ZERO));
        h.settle().await;

        h.dashboard.dispatch(Action::PrevPage);
        assert_eq!(h.start(), 6);
        h.dashboard.dispatch(Action::PrevPage);
        assert_eq!(h.start(), 2);
        h.dashboard.dispatch(Action::NextPage);
        assert_eq!(h.start(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn key_events_drive_navigation_and_quit() {
        let mut h = Harness::mounted(office_config(4), source(10, Duration::ZERO));
        h.settle().await;

        h.dashboard
            .handle(AppEvent::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)));
        assert_eq!(h.start(), 4);
        h.dashboard
            .handle(AppEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!h.dashboard.app().running);
    }

    #[tokio::test(start_paused = true)]
    async fn all_view_has_no_pager_timers() {
        let mut h = Harness::mounted(
            DashboardConfig::default().with_page_size(2),
            source(10, Duration::ZERO),
        );
        h.settle().await;
        assert!(!h.dashboard.is_auto_advance_armed());

        h.dashboard.dispatch(Action::TileClick);
        assert!(!h.dashboard.is_resume_pending());
        assert_eq!(h.dashboard.app().on_screen().count(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn unmount_stops_all_mutation() {
        let mut h = Harness::mounted(office_config(4), source(10, Duration::ZERO));
        h.settle().await;
        h.dashboard.dispatch(Action::NextPage);
        h.run_for(ms(10_010)).await;
        assert!(h.auto_scrolling());

        // Let the auto-advance fire and sit in the queue, then unmount.
        time::advance(ms(8_010)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        let start = h.start();
        let clock = h.dashboard.app().clock.now();
        h.dashboard.unmount();

        assert!(!h.dashboard.is_mounted());
        assert_eq!(h.dashboard.refresh_state(), SchedulerState::Idle);
        assert!(!h.dashboard.is_auto_advance_armed());
        assert!(!h.dashboard.is_resume_pending());

        h.run_for(ms(120_000)).await;
        h.dashboard.dispatch(Action::NextPage);
        h.dashboard.handle(AppEvent::Data(DataEvent::Alerts {
            generation: 0,
            alerts: Vec::new(),
        }));

        assert_eq!(h.start(), start);
        assert_eq!(h.dashboard.app().clock.now(), clock);
        assert_eq!(h.dashboard.app().alerts().len(), 10);
    }

    /// Wall clock that moves one second per reading.
    fn stepping_clock() -> DateTime<Utc> {
        static READS: AtomicUsize = AtomicUsize::new(0);
        let n = READS.fetch_add(1, Ordering::SeqCst);
        DateTime::from_timestamp(1_792_170_000 + n as i64, 0).unwrap_or_default()
    }

    #[tokio::test(start_paused = true)]
    async fn clock_ticks_every_second() {
        let (tx, rx) = mpsc::unbounded_channel();
        let dashboard = Dashboard::new(DashboardConfig::default(), source(0, Duration::ZERO), tx)
            .with_wall_clock(stepping_clock);
        let mut h = Harness::mounted_with(dashboard, rx);
        h.settle().await;
        let start = h.dashboard.app().clock.now();

        h.run_for(ms(1_010)).await;
        let first = h.dashboard.app().clock.now();
        assert!(first > start);

        h.run_for(ms(1_000)).await;
        assert!(h.dashboard.app().clock.now() > first);
    }

    #[tokio::test(start_paused = true)]
    async fn small_screen_pages_fit_the_grid() {
        let mut h = Harness::mounted(office_config(6), source(12, Duration::ZERO));
        h.settle().await;
        assert_eq!(h.dashboard.app().on_screen().count(), 6);

        h.dashboard.handle(AppEvent::Resize(80, 24));
        assert_eq!(h.dashboard.app().pager().window().size(), 2);
        assert_eq!(h.dashboard.app().on_screen().count(), 2);
        assert!(h.dashboard.is_auto_advance_armed());

        // Auto-advance walks every alert, two at a time.
        let mut starts = vec![h.start()];
        h.run_for(ms(10)).await;
        for _ in 0..6 {
            h.run_for(ms(8_000)).await;
            starts.push(h.start());
        }
        assert_eq!(starts, vec![0, 2, 4, 6, 8, 10, 0]);

        h.dashboard.handle(AppEvent::Resize(160, 60));
        assert_eq!(h.dashboard.app().pager().window().size(), 6);
    }
}
