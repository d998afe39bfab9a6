//! Aircraft observations and the snapshot filter.
//!
//! ```text
//! FlightFeed ──► Vec<RawObservation> ──► filter_observations() ──► Vec<AircraftSnapshot>
//!                (may be grounded,        (airborne, in radius,      (nearest first)
//!                 missing coordinates)     distance computed)
//! ```

mod filter;
mod model;

pub use filter::filter_observations;
pub use model::{AircraftSnapshot, RawObservation};
