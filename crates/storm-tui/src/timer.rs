//! Cancellable timers with one active task per concern.
//!
//! Every firing carries the generation of the slot that produced it. A slot
//! bumps its generation whenever it is cancelled or re-armed, so a firing
//! that was already queued on the event channel before the cancel is
//! recognised as stale and dropped by [`TimerSlot::accepts`].

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::warn;

use crate::events::AppEvent;

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Feed refresh schedule.
    Refresh,
    /// One-second clock tick.
    Clock,
    /// Page auto-advance.
    AutoAdvance,
    /// End of the quiet period after user interaction.
    Resume,
}

/// A timer firing delivered through the event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    /// Which slot fired.
    pub kind: TimerKind,
    /// Slot generation at the time the timer was armed.
    pub generation: u64,
}

/// Holds at most one running timer task.
#[derive(Debug)]
pub struct TimerSlot {
    kind: TimerKind,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    /// Create an unarmed slot.
    #[must_use]
    pub const fn new(kind: TimerKind) -> Self {
        Self {
            kind,
            generation: 0,
            handle: None,
        }
    }

    /// The concern this slot serves.
    #[must_use]
    pub const fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Current generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a timer task is still pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel whatever is armed, then spawn `task` with the new generation.
    pub fn arm_with<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(task(self.generation)));
    }

    /// Fire once after `delay`.
    pub fn arm_once(&mut self, delay: Duration, tx: UnboundedSender<AppEvent>) {
        let kind = self.kind;
        let deadline = Instant::now() + delay;
        self.arm_with(move |generation| async move {
            time::sleep_until(deadline).await;
            let _ = tx.send(AppEvent::Timer(TimerFired { kind, generation }));
        });
    }

    /// Fire every `period`, starting one period from now. A zero period
    /// leaves the slot disarmed.
    pub fn arm_repeating(&mut self, period: Duration, tx: UnboundedSender<AppEvent>) {
        let kind = self.kind;
        if period.is_zero() {
            warn!(?kind, "zero timer period, not arming");
            self.cancel();
            return;
        }
        let start = Instant::now() + period;
        self.arm_with(move |generation| async move {
            let mut ticker = time::interval_at(start, period);
            // Stay on the original cadence if the event loop was slow.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(AppEvent::Timer(TimerFired { kind, generation })).is_err() {
                    break;
                }
            }
        });
    }

    /// Abort the pending task and invalidate its queued firings.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether `fired` came from the timer currently armed in this slot.
    #[must_use]
    pub fn accepts(&self, fired: &TimerFired) -> bool {
        fired.kind == self.kind && self.accepts_generation(fired.generation)
    }

    /// Whether `generation` belongs to the timer currently armed.
    #[must_use]
    pub fn accepts_generation(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }
}

impl Drop for TimerSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
