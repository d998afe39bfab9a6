//! Aircraft identity: who is this, and what kind of aircraft is it?
//!
//! # Components
//!
//! - [`resolve`] - session key resolution from callsign/registration
//! - [`classify`] - commercial / private / unknown classification
//! - [`enrichment`] - `AircraftLookup` collaborator and the built-in database
//! - [`chain`] - priority-ordered field merging across sources

mod chain;
mod classify;
mod enrichment;
mod resolve;

pub use chain::{FieldChain, FieldSource};
pub use classify::{airline_code, classify_aircraft, is_general_aviation_type, AircraftClass};
pub use enrichment::{AircraftDatabase, AircraftInfo, AircraftLookup};
pub use resolve::{
    callsign_validity, is_registration_token, resolve_identity, CallsignValidity, IdentityBasis,
    ResolvedIdentity, UNKNOWN_IDENTITY,
};
