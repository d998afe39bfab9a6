//! Live aircraft position feeds.

mod client;
mod error;

pub use client::{parse_feed, FlightFeed, Fr24Client, DEFAULT_FEED_TIMEOUT, DEFAULT_FEED_URL};
pub use error::FeedError;
