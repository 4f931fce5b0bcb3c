//! Stormwatch Terminal UI Library
//!
//! Live dashboard of active weather alerts. The [`dashboard::Dashboard`]
//! owns all state and timers; [`ui::draw`] renders it with ratatui.

pub mod app;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod demo;
pub mod events;
pub mod pager;
pub mod present;
pub mod scheduler;
pub mod terminal;
pub mod timer;
pub mod ui;
