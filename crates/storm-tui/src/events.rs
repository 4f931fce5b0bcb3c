//! Event handling for the stormwatch TUI

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use storm_feed::AlertRecord;
use tokio::sync::mpsc;

use crate::timer::TimerFired;

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal key press
    Key(KeyEvent),
    /// Terminal mouse event
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Render tick
    Tick,
    /// A timer fired
    Timer(TimerFired),
    /// Data from the feed
    Data(DataEvent),
}

/// Data events from the alert feed
#[derive(Debug, Clone)]
pub enum DataEvent {
    /// A fetch resolved. Failures arrive here as an empty list.
    Alerts {
        /// Generation of the refresh schedule that produced this result.
        generation: u64,
        /// The full replacement alert list.
        alerts: Vec<AlertRecord>,
    },
}

/// User intents, decoupled from the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the dashboard.
    Quit,
    /// Next page of office alerts.
    NextPage,
    /// Previous page of office alerts.
    PrevPage,
    /// A tile was clicked.
    TileClick,
    /// Scroll the all-alerts grid up one row.
    ScrollUp,
    /// Scroll the all-alerts grid down one row.
    ScrollDown,
    /// Fetch now and restart the refresh schedule.
    RefreshNow,
}

/// Event handler that polls for terminal events
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    /// Spawn the terminal reader. `tick_rate` bounds how long a redraw can
    /// be delayed when nothing else happens.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        // crossterm polling blocks, keep it off the async workers
        tokio::task::spawn_blocking(move || {
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => AppEvent::Key(key),
                        Ok(Event::Mouse(mouse)) => AppEvent::Mouse(mouse),
                        Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                        _ => continue,
                    }
                } else {
                    AppEvent::Tick
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Sender shared with timers and the feed poller.
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }
}

/// Map a key press to an action.
pub fn key_action(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Right | KeyCode::Char('l' | 'n') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Left | KeyCode::Char('h' | 'p') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
        KeyCode::Char('r') => Some(Action::RefreshNow),
        _ => None,
    }
}

/// Map a mouse event to an action. Only left clicks inside the tile grid
/// count as tile clicks.
pub fn mouse_action(mouse: MouseEvent, tile_grid: Rect) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left)
            if tile_grid.contains(Position::new(mouse.column, mouse.row)) =>
        {
            Some(Action::TileClick)
        }
        MouseEventKind::ScrollDown => Some(Action::ScrollDown),
        MouseEventKind::ScrollUp => Some(Action::ScrollUp),
        _ => None,
    }
}
