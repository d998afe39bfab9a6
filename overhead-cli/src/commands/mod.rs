//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`run`] - Main command (poll the feed, drive the display)
//! - [`device`] - Display health check
//! - [`history`] - Recorded overhead passes
//! - [`init`] - Configuration initialization

pub mod common;
pub mod device;
pub mod history;
pub mod init;
pub mod run;
