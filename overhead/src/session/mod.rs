//! Overhead sessions: one record per aircraft identity.
//!
//! The [`SessionTracker`] resolves each snapshot's identity, opens or
//! updates the matching [`FlightSession`], and rewrites the whole table to
//! its [`HistoryStore`] after every change.

mod history;
mod model;
mod tracker;

pub use history::{HistoryStore, JsonHistoryStore, SessionTable};
pub use model::FlightSession;
pub use tracker::{SessionTracker, TrackOutcome};
