//! Rate-limited export.
//!
//! Writes are suppressed while the last successful write is younger than
//! [`MIN_EXPORT_INTERVAL_SECS`], unless the caller forces a flush (the tracked
//! flight just left and its final closest approach must be published).

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::fs::PersistenceError;

use super::clock::Clock;
use super::model::{ExportSource, ExportStatus, WebExportSnapshot};
use super::store::ExportStore;

/// Minimum seconds between unforced writes.
pub const MIN_EXPORT_INTERVAL_SECS: i64 = 5;

/// Errors publishing the export document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result of an export attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The document was written with this status.
    Written(ExportStatus),
    /// Too soon since the last write.
    Throttled,
}

/// Publishes the closest-approach document at most once per interval.
pub struct ExportThrottle {
    store: Box<dyn ExportStore>,
    clock: Arc<dyn Clock>,
    min_interval: Duration,
    last_write: Option<DateTime<Utc>>,
}

impl ExportThrottle {
    pub fn new(store: Box<dyn ExportStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_interval(store, clock, Duration::seconds(MIN_EXPORT_INTERVAL_SECS))
    }

    pub fn with_interval(
        store: Box<dyn ExportStore>,
        clock: Arc<dyn Clock>,
        min_interval: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            min_interval,
            last_write: None,
        }
    }

    /// Project and write the document unless throttled.
    ///
    /// `force_flush` bypasses the interval and marks the flight completed.
    /// The interval restarts only after a successful write.
    pub fn export(
        &mut self,
        source: &ExportSource<'_>,
        force_flush: bool,
    ) -> Result<ExportOutcome, ExportError> {
        let now = self.clock.now();

        if !force_flush {
            if let Some(last) = self.last_write {
                if now - last < self.min_interval {
                    return Ok(ExportOutcome::Throttled);
                }
            }
        }

        let document = WebExportSnapshot::project(source, force_flush, now);
        self.store.write(&document)?;
        self.last_write = Some(now);

        if force_flush {
            if let Some(closest) = &document.closest_approach {
                info!(
                    distance_nm = closest.distance,
                    altitude_ft = closest.altitude,
                    precision = ?closest.precision,
                    "Published final closest approach"
                );
            }
        } else {
            debug!(status = ?document.status, "Export written");
        }

        Ok(ExportOutcome::Written(document.status))
    }

    /// Whether anything has been written by this process.
    pub fn has_written(&self) -> bool {
        self.last_write.is_some()
    }

    /// Time of the last successful write.
    pub fn last_write(&self) -> Option<DateTime<Utc>> {
        self.last_write
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::clock::ManualClock;
    use crate::path::ActivePath;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        writes: Arc<AtomicUsize>,
        fail: Arc<AtomicBool>,
    }

    impl ExportStore for CountingStore {
        fn write(&self, _snapshot: &WebExportSnapshot) -> Result<(), PersistenceError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(PersistenceError::Io {
                    path: "flights-web.json".into(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn setup() -> (ExportThrottle, Arc<ManualClock>, Arc<AtomicUsize>, Arc<AtomicBool>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 4, 20, 9, 0, 0).unwrap(),
        ));
        let store = CountingStore::default();
        let writes = Arc::clone(&store.writes);
        let fail = Arc::clone(&store.fail);
        let throttle = ExportThrottle::new(Box::new(store), clock.clone());
        (throttle, clock, writes, fail)
    }

    fn empty_source(path: &ActivePath) -> ExportSource<'_> {
        ExportSource {
            path,
            active_session: None,
            best_session: None,
        }
    }

    #[test]
    fn test_suppressed_within_interval() {
        let (mut throttle, clock, writes, _) = setup();
        let path = ActivePath::new();
        let source = empty_source(&path);

        assert_eq!(
            throttle.export(&source, false).unwrap(),
            ExportOutcome::Written(ExportStatus::Waiting)
        );

        clock.advance(Duration::seconds(4));
        assert_eq!(throttle.export(&source, false).unwrap(), ExportOutcome::Throttled);

        clock.advance(Duration::seconds(1));
        assert!(matches!(
            throttle.export(&source, false).unwrap(),
            ExportOutcome::Written(_)
        ));
        assert_eq!(writes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_force_flush_always_writes() {
        let (mut throttle, clock, writes, _) = setup();
        let path = ActivePath::new();
        let source = empty_source(&path);

        throttle.export(&source, false).unwrap();
        clock.advance(Duration::milliseconds(100));
        assert!(matches!(
            throttle.export(&source, true).unwrap(),
            ExportOutcome::Written(_)
        ));
        assert!(matches!(
            throttle.export(&source, true).unwrap(),
            ExportOutcome::Written(_)
        ));
        assert_eq!(writes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_failed_write_does_not_start_interval() {
        let (mut throttle, clock, writes, fail) = setup();
        let path = ActivePath::new();
        let source = empty_source(&path);

        fail.store(true, Ordering::SeqCst);
        assert!(throttle.export(&source, false).is_err());
        assert!(!throttle.has_written());

        fail.store(false, Ordering::SeqCst);
        clock.advance(Duration::seconds(1));
        assert!(matches!(
            throttle.export(&source, false).unwrap(),
            ExportOutcome::Written(_)
        ));
        assert_eq!(writes.load(Ordering::SeqCst), 1);
        assert_eq!(throttle.last_write(), Some(clock.now()));
    }
}
