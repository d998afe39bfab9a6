//! Active path buffer and derived ground track.
//!
//! Holds the recent snapshots of the aircraft currently in the zone. The
//! closest entry drives closest-approach export; the oldest and newest
//! positions give a ground track when the feed omits heading.
//!
//! # Design
//!
//! - Capacity-bounded FIFO (100 entries by default), oldest evicted first
//! - Each entry keeps the enrichment result captured when it was appended
//! - Cleared when the tracked session ends, optionally seeded with one
//!   carried-over entry

use std::collections::VecDeque;

use chrono::Duration;

use crate::identity::{AircraftInfo, AircraftLookup};
use crate::snapshot::AircraftSnapshot;

/// Default maximum entries to retain.
pub const DEFAULT_PATH_CAPACITY: usize = 100;

/// Minimum displacement (in degrees) for a reliable derived track.
/// ~100m at the equator.
const MIN_DISTANCE_FOR_TRACK_DEG: f64 = 0.001;

/// One snapshot in the active path plus its enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEntry {
    pub snapshot: AircraftSnapshot,
    pub aircraft: Option<AircraftInfo>,
}

impl PathEntry {
    pub fn new(snapshot: AircraftSnapshot, aircraft: Option<AircraftInfo>) -> Self {
        Self { snapshot, aircraft }
    }

    /// Distance from the zone center.
    pub fn distance_nm(&self) -> f64 {
        self.snapshot.distance_nm
    }
}

/// Configuration for the active path.
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// Maximum entries to retain.
    pub capacity: usize,
    /// Minimum displacement for track calculation.
    pub min_distance_deg: f64,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_PATH_CAPACITY,
            min_distance_deg: MIN_DISTANCE_FOR_TRACK_DEG,
        }
    }
}

/// Bounded path of the session currently in the zone.
///
/// # Usage
///
/// ```ignore
/// let mut path = ActivePath::new();
///
/// path.append(snapshot, &database);
///
/// if let Some(entry) = path.closest() {
///     println!("Closest so far: {:.2} NM", entry.distance_nm());
/// }
/// ```
#[derive(Debug)]
pub struct ActivePath {
    /// Entries, oldest first.
    entries: VecDeque<PathEntry>,
    config: PathConfig,
}

impl Default for ActivePath {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivePath {
    /// Create an empty path with default configuration.
    pub fn new() -> Self {
        Self::with_config(PathConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: PathConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.capacity),
            config,
        }
    }

    /// Enrich a snapshot and append it, evicting the oldest entry at capacity.
    pub fn append(&mut self, snapshot: AircraftSnapshot, lookup: &dyn AircraftLookup) {
        let aircraft = lookup.lookup(snapshot.icao.as_deref(), snapshot.type_code.as_deref());
        self.push(PathEntry::new(snapshot, aircraft));
    }

    /// Append an already-enriched entry.
    pub fn push(&mut self, entry: PathEntry) {
        self.entries.push_back(entry);

        while self.entries.len() > self.config.capacity {
            self.entries.pop_front();
        }
    }

    /// Entry with the smallest distance. The first one wins on ties.
    pub fn closest(&self) -> Option<&PathEntry> {
        let mut best: Option<&PathEntry> = None;
        for entry in &self.entries {
            match best {
                Some(b) if entry.distance_nm() >= b.distance_nm() => {}
                _ => best = Some(entry),
            }
        }
        best
    }

    /// Clear the path, then optionally seed it with one carried-over entry.
    pub fn reset(&mut self, seed: Option<PathEntry>) {
        self.entries.clear();
        if let Some(entry) = seed {
            self.push(entry);
        }
    }

    /// Move every entry into a new path with the same configuration,
    /// leaving this one empty.
    pub fn split_off(&mut self) -> ActivePath {
        ActivePath {
            entries: std::mem::take(&mut self.entries),
            config: self.config.clone(),
        }
    }

    /// Ground track from the oldest to the newest position.
    ///
    /// Returns `None` with fewer than two entries or when the aircraft has
    /// not moved far enough for a stable bearing. Degrees 0-360, 0 = North.
    pub fn calculate_track(&self) -> Option<f64> {
        if self.entries.len() < 2 {
            return None;
        }

        let oldest = &self.entries.front()?.snapshot;
        let newest = &self.entries.back()?.snapshot;

        let dlat = newest.latitude - oldest.latitude;
        let dlon = newest.longitude - oldest.longitude;
        if (dlat * dlat + dlon * dlon).sqrt() < self.config.min_distance_deg {
            return None;
        }

        Some(calculate_bearing(
            oldest.latitude,
            oldest.longitude,
            newest.latitude,
            newest.longitude,
        ))
    }

    /// Feed heading of the newest entry, or the derived track.
    pub fn heading(&self) -> Option<f64> {
        self.latest()
            .and_then(|e| e.snapshot.heading)
            .or_else(|| self.calculate_track())
    }

    /// Time between the oldest and newest observation.
    pub fn time_span(&self) -> Option<Duration> {
        let oldest = self.entries.front()?;
        let newest = self.entries.back()?;
        Some(newest.snapshot.observed_at - oldest.snapshot.observed_at)
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&PathEntry> {
        self.entries.back()
    }

    /// Entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PathEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }
}

/// Initial great-circle bearing between two points.
///
/// Degrees 0-360, where 0 = North, 90 = East.
fn calculate_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let y = dlon.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}
