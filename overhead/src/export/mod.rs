//! Closest-approach export for web consumers.
//!
//! The [`ExportThrottle`] projects the active path (or, failing that, the
//! best historical session) into a [`WebExportSnapshot`] and writes it via
//! an [`ExportStore`] at most once every five seconds, unless flushed.

mod clock;
mod model;
mod store;
mod throttle;

pub use clock::{Clock, ManualClock, SystemClock};
pub use model::{
    ClosestApproach, ExportFlight, ExportSource, ExportStatus, Precision, WebExportSnapshot,
    OVERHEAD_THRESHOLD_NM,
};
pub use store::{ExportStore, JsonExportStore};
pub use throttle::{ExportError, ExportOutcome, ExportThrottle, MIN_EXPORT_INTERVAL_SECS};
