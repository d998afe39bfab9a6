//! Overhead - aircraft proximity tracking for AWTRIX pixel clocks
//!
//! This library watches a small zone around a fixed point for aircraft,
//! keeps a session for every aircraft that passes through it, and drives an
//! AWTRIX-class LED clock with a rotating presentation of the closest one.
//!
//! # Pipeline
//!
//! ```text
//! feed -> snapshot filter -> session tracker -> active path -> export
//!                                  |
//!                                  +--> flight view --> display state machine
//! ```
//!
//! The [`monitor::Monitor`] owns every component and runs the poll loop.

pub mod config;
pub mod display;
pub mod export;
pub mod feed;
pub mod fs;
pub mod geo;
pub mod identity;
pub mod logging;
pub mod monitor;
pub mod path;
pub mod session;
pub mod snapshot;

/// Version of the overhead library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
