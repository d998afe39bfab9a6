//! History command - list recorded overhead passes.

use std::path::PathBuf;

use overhead::session::{FlightSession, HistoryStore, JsonHistoryStore};

use crate::error::CliError;
use crate::runner::load_config;

/// Default number of sessions listed.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Arguments for the history command.
#[derive(Debug)]
pub struct HistoryArgs {
    pub config: Option<PathBuf>,
    pub limit: usize,
}

/// Run the history command.
pub fn run(args: HistoryArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let store = JsonHistoryStore::new(&config.storage.history_file);
    let sessions = store.load().map_err(CliError::History)?;

    if sessions.is_empty() {
        println!("No flights recorded yet ({}).", store.path().display());
        return Ok(());
    }

    let recent = most_recent(sessions.values(), args.limit);

    println!(
        "{:<10} {:<5} {:<9} {:>8} {:>8} {:>7}  {}",
        "IDENTITY", "TYPE", "ROUTE", "CLOSEST", "ALT FT", "SECS", "LAST SEEN"
    );
    for session in &recent {
        println!(
            "{:<10} {:<5} {:<9} {:>5.2} NM {:>8} {:>7}  {}",
            session.identity,
            session.type_code.as_deref().unwrap_or("-"),
            session.route().unwrap_or_else(|| "-".to_string()),
            session.closest_distance_nm,
            session.closest_altitude_ft,
            session.duration_secs,
            session.last_seen.format("%Y-%m-%d %H:%M"),
        );
    }
    println!();
    println!("{} of {} flights shown", recent.len(), sessions.len());
    Ok(())
}

/// Up to `limit` sessions, most recently seen first.
fn most_recent<'a>(
    sessions: impl Iterator<Item = &'a FlightSession>,
    limit: usize,
) -> Vec<&'a FlightSession> {
    let mut sorted: Vec<_> = sessions.collect();
    sorted.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
    sorted.truncate(limit);
    sorted
}
