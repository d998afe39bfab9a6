//! Flight feed trait and FlightRadar24 zone-feed implementation.
//!
//! The [`FlightFeed`] trait abstracts over live position sources so the poll
//! loop can run against any of them (or a mock in tests). The
//! [`Fr24Client`] implementation queries a bounds-based JSON zone feed via
//! `reqwest` and decodes its positional arrays.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::error::FeedError;
use crate::geo::{BoundingBox, GeoPoint};
use crate::snapshot::RawObservation;

/// Default zone feed endpoint.
pub const DEFAULT_FEED_URL: &str = "https://data-cloud.flightradar24.com/zones/fcgi/feed.js";

/// Default HTTP timeout for the feed request.
pub const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(15);

/// Browser-like user agent; the public feed rejects bare clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.0";

/// Fixed query flags: every source type, airborne and ground traffic.
const FEED_FLAGS: [(&str, &str); 12] = [
    ("faa", "1"),
    ("satellite", "1"),
    ("mlat", "1"),
    ("flarm", "1"),
    ("adsb", "1"),
    ("gnd", "1"),
    ("air", "1"),
    ("vehicles", "0"),
    ("estimated", "1"),
    ("maxage", "14400"),
    ("gliders", "1"),
    ("stats", "1"),
];

/// Minimum array length of an aircraft record.
const MIN_RECORD_LEN: usize = 14;

/// Positional layout of an aircraft record.
mod field {
    pub const ICAO: usize = 0;
    pub const LATITUDE: usize = 1;
    pub const LONGITUDE: usize = 2;
    pub const HEADING: usize = 3;
    pub const ALTITUDE: usize = 4;
    pub const SPEED: usize = 5;
    pub const SQUAWK: usize = 6;
    pub const TYPE_CODE: usize = 8;
    pub const REGISTRATION: usize = 9;
    pub const TIMESTAMP: usize = 10;
    pub const ORIGIN: usize = 11;
    pub const DESTINATION: usize = 12;
    pub const FLIGHT_NUMBER: usize = 13;
    pub const ON_GROUND: usize = 14;
    pub const VERTICAL_RATE: usize = 15;
    pub const CALLSIGN: usize = 16;
}

/// Live source of aircraft positions around a point.
pub trait FlightFeed: Send + Sync {
    /// Fetch every aircraft the source reports near `center`.
    ///
    /// The result may include aircraft outside `radius_nm`; the snapshot
    /// filter does the exact cut.
    fn fetch(
        &self,
        center: GeoPoint,
        radius_nm: f64,
    ) -> impl Future<Output = Result<Vec<RawObservation>, FeedError>> + Send;
}

/// Client for a FlightRadar24-style zone feed.
pub struct Fr24Client {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,

    /// Feed endpoint.
    feed_url: String,
}

impl Fr24Client {
    /// Create a client for a feed URL with the default timeout.
    pub fn new(feed_url: impl Into<String>) -> Result<Self, FeedError> {
        Self::with_timeout(feed_url, DEFAULT_FEED_TIMEOUT)
    }

    pub fn with_timeout(feed_url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FeedError::Http(e.to_string()))?;

        Ok(Self {
            http,
            feed_url: feed_url.into(),
        })
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }
}

impl FlightFeed for Fr24Client {
    async fn fetch(
        &self,
        center: GeoPoint,
        radius_nm: f64,
    ) -> Result<Vec<RawObservation>, FeedError> {
        let bounds = bounds_param(&BoundingBox::around(center, radius_nm));

        let response = self
            .http
            .get(&self.feed_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("bounds", bounds.as_str())])
            .query(&FEED_FLAGS)
            .send()
            .await
            .map_err(|e| FeedError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| FeedError::Http(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FeedError::Http(e.to_string()))?;

        let observations = parse_feed(&bytes)?;

        tracing::debug!(
            bounds = %bounds,
            aircraft = observations.len(),
            "Zone feed fetched"
        );

        Ok(observations)
    }
}

/// `north,south,west,east` with four decimals.
fn bounds_param(bbox: &BoundingBox) -> String {
    format!(
        "{:.4},{:.4},{:.4},{:.4}",
        bbox.north, bbox.south, bbox.west, bbox.east
    )
}

/// Decode a zone-feed response body.
///
/// The body is a JSON object whose aircraft entries are arrays of at least
/// fourteen positional fields; everything else (counters, version, stats)
/// is ignored.
pub fn parse_feed(body: &[u8]) -> Result<Vec<RawObservation>, FeedError> {
    let root: Value = serde_json::from_slice(body).map_err(|e| FeedError::Json(e.to_string()))?;
    let object = root
        .as_object()
        .ok_or_else(|| FeedError::Json("expected a JSON object".to_string()))?;

    Ok(object
        .values()
        .filter_map(Value::as_array)
        .filter(|record| record.len() >= MIN_RECORD_LEN)
        .map(|record| parse_record(record))
        .collect())
}

fn parse_record(record: &[Value]) -> RawObservation {
    RawObservation {
        icao: text(record, field::ICAO),
        latitude: number(record, field::LATITUDE),
        longitude: number(record, field::LONGITUDE),
        heading: number(record, field::HEADING),
        altitude_ft: number(record, field::ALTITUDE).map(|v| v.round() as i32),
        ground_speed_kt: number(record, field::SPEED),
        squawk: text(record, field::SQUAWK),
        type_code: text(record, field::TYPE_CODE),
        registration: text(record, field::REGISTRATION),
        timestamp: number(record, field::TIMESTAMP)
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs as i64, 0)),
        origin: text(record, field::ORIGIN),
        destination: text(record, field::DESTINATION),
        flight_number: text(record, field::FLIGHT_NUMBER),
        on_ground: number(record, field::ON_GROUND).is_some_and(|v| v != 0.0),
        vertical_rate_fpm: number(record, field::VERTICAL_RATE).map(|v| v.round() as i32),
        callsign: text(record, field::CALLSIGN),
    }
}

/// Non-empty string at `index`.
fn text(record: &[Value], index: usize) -> Option<String> {
    let s = record.get(index)?.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Number at `index`, accepting numeric strings.
fn number(record: &[Value], index: usize) -> Option<f64> {
    match record.get(index)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}
