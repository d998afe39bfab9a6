//! Tracking controller and poll loop.
//!
//! - [`OverheadTracker`] - sessions, active path and export for one zone
//! - [`Monitor`] - feed polling, display updates and shutdown

mod controller;
mod runner;

pub use controller::{CycleReport, Handoff, OverheadTracker, TrackerConfig};
pub use runner::{Monitor, MonitorError, RunSummary, DEFAULT_POLL_INTERVAL};
