//! Pixel display output.
//!
//! # Components
//!
//! - [`DisplayDevice`] / [`AwtrixClient`] - transport to the LED clock
//! - [`CustomPayload`] - one declarative custom-app screen
//! - [`FlightView`] - presentation-ready data for the closest flight
//! - [`render`] - Distance, Route and Identity screens with proximity
//!   tiers and progress fill
//! - [`VersionedCell`] - latest view shared between poll loop and timer
//! - [`DisplayStateMachine`] - Idle/Active lifecycle and the rotation task

mod cell;
mod device;
mod machine;
mod payload;
mod screens;
mod view;

pub use cell::{Versioned, VersionedCell};
pub use device::{AwtrixClient, DeviceError, DeviceInfo, DisplayDevice};
pub use machine::{
    DisplayConfig, DisplayPhase, DisplayStateMachine, DisplayTransition, IdlePolicy,
    DEFAULT_APP_NAME, DEFAULT_ROTATION_INTERVAL, DEFAULT_SCREEN_LIFETIME_SECS,
    DEFAULT_SHUTDOWN_GRACE,
};
pub use payload::{CustomPayload, IconMotion};
pub use screens::{
    direction_arrow, progress_percent, render, ProximityTier, RenderOptions, Screen, ROUTE_UNKNOWN,
    SCREEN_COUNT,
};
pub use view::{FlightView, FALLBACK_TYPE_LABEL};
