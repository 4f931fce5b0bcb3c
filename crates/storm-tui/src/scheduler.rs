//! Feed refresh schedule.
//!
//! Two states. `start` moves Idle to Active exactly once: it fetches
//! immediately and then every `period`, posting each result to the event
//! loop. `stop` aborts the poller, including a fetch that is in flight.

use std::sync::Arc;
use std::time::Duration;

use storm_feed::AlertSource;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::events::{AppEvent, DataEvent};
use crate::timer::{TimerKind, TimerSlot};

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not polling.
    Idle,
    /// Polling on the configured period.
    Active,
}

/// Polls an [`AlertSource`] on a fixed period.
#[derive(Debug)]
pub struct RefreshScheduler<S> {
    source: Arc<S>,
    period: Duration,
    slot: TimerSlot,
    state: SchedulerState,
}

impl<S> RefreshScheduler<S>
where
    S: AlertSource + 'static,
{
    /// Idle scheduler for `source`.
    pub fn new(source: Arc<S>, period: Duration) -> Self {
        Self {
            source,
            period,
            slot: TimerSlot::new(TimerKind::Refresh),
            state: SchedulerState::Idle,
        }
    }

    /// Current state.
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Polling period.
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Start polling. Returns `false` if already active or the period is
    /// zero.
    pub fn start(&mut self, tx: UnboundedSender<AppEvent>) -> bool {
        if self.state == SchedulerState::Active {
            return false;
        }
        if self.period.is_zero() {
            warn!("zero refresh period, alert refresh not started");
            return false;
        }
        self.arm(tx);
        self.state = SchedulerState::Active;
        info!(period_secs = self.period.as_secs(), "alert refresh started");
        true
    }

    /// Fetch now and restart the period from this moment.
    pub fn restart(&mut self, tx: UnboundedSender<AppEvent>) {
        if self.period.is_zero() {
            return;
        }
        self.arm(tx);
        self.state = SchedulerState::Active;
        debug!("alert refresh restarted");
    }

    /// Stop polling and drop any result still in flight.
    pub fn stop(&mut self) {
        self.slot.cancel();
        if self.state == SchedulerState::Active {
            info!("alert refresh stopped");
        }
        self.state = SchedulerState::Idle;
    }

    /// Whether a result tagged `generation` came from the current poller.
    pub fn accepts(&self, generation: u64) -> bool {
        self.state == SchedulerState::Active && self.slot.accepts_generation(generation)
    }

    fn arm(&mut self, tx: UnboundedSender<AppEvent>) {
        let source = Arc::clone(&self.source);
        let period = self.period;
        self.slot.arm_with(move |generation| async move {
            // The first tick completes immediately.
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let alerts = source.fetch_alerts().await;
                debug!(count = alerts.len(), generation, "alert fetch resolved");
                let event = AppEvent::Data(DataEvent::Alerts { generation, alerts });
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
    }
}
