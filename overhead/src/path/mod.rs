//! Active path of the aircraft currently in the zone.

mod active;

pub use active::{ActivePath, PathConfig, PathEntry, DEFAULT_PATH_CAPACITY};
