//! Session identity resolution.
//!
//! Feeds frequently report junk in the callsign slot: the aircraft type
//! ("C56X"), a bare number, or nothing at all. Resolution picks the most
//! trustworthy identifier available so that one airframe maps to one session.
//!
//! # Precedence
//!
//! ```text
//! 1. Valid callsign      "ASA416"
//! 2. National reg token  "N123AB", "G-EZAB", "C-FXYZ"
//! 3. Raw callsign/reg    whatever is present
//! 4. "UNKNOWN"
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::classify::is_general_aviation_type;

/// Session key used when an observation carries no identifier at all.
pub const UNKNOWN_IDENTITY: &str = "UNKNOWN";

/// Minimum length of a usable callsign.
const MIN_CALLSIGN_LEN: usize = 3;

/// Outcome of the callsign well-formedness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallsignValidity {
    Valid,
    Invalid,
}

/// Which identifier a session key was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityBasis {
    /// A well-formed callsign.
    Callsign,
    /// A registration matching a national format.
    Registration,
    /// A raw identifier that failed both checks.
    Raw,
    /// Nothing usable was reported.
    Unknown,
}

impl IdentityBasis {
    /// Whether the identity is reliable enough to tell two airframes apart.
    pub fn is_confident(&self) -> bool {
        matches!(self, IdentityBasis::Callsign | IdentityBasis::Registration)
    }
}

/// A resolved session key plus the basis it was resolved on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedIdentity {
    pub key: String,
    pub basis: IdentityBasis,
}

impl ResolvedIdentity {
    fn new(key: impl Into<String>, basis: IdentityBasis) -> Self {
        Self {
            key: key.into(),
            basis,
        }
    }
}

impl fmt::Display for ResolvedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Registration format: one or two prefix letters, optional dash, then
/// alphanumerics starting with a letter or digit ("N123AB", "G-EZAB", "D-AIBL").
fn registration_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]{1,2}-?[A-Z0-9]{1,5}$").unwrap())
}

/// Check whether a callsign is usable as a session key.
///
/// A valid callsign is at least three characters, starts with a letter, is
/// not purely numeric, and is neither the aircraft's own type code nor a
/// known general-aviation type code (feeds put "C56X" in the callsign slot).
pub fn callsign_validity(callsign: &str, own_type_code: Option<&str>) -> CallsignValidity {
    let cs = callsign.trim();

    let well_formed = cs.chars().count() >= MIN_CALLSIGN_LEN
        && cs.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && !cs.chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        return CallsignValidity::Invalid;
    }

    let is_own_type = own_type_code.is_some_and(|t| t.trim().eq_ignore_ascii_case(cs));
    if is_own_type || is_general_aviation_type(cs) {
        return CallsignValidity::Invalid;
    }

    CallsignValidity::Valid
}

/// Check whether a registration matches a national format token.
pub fn is_registration_token(registration: &str) -> bool {
    registration_pattern().is_match(&registration.trim().to_uppercase())
}

/// Resolve the session key for an observation.
///
/// # Arguments
///
/// * `callsign` - Reported callsign, if any
/// * `registration` - Reported registration, if any
/// * `type_code` - Reported aircraft type, used to reject type-as-callsign
pub fn resolve_identity(
    callsign: Option<&str>,
    registration: Option<&str>,
    type_code: Option<&str>,
) -> ResolvedIdentity {
    let callsign = non_empty(callsign);
    let registration = non_empty(registration);

    if let Some(cs) = callsign {
        if callsign_validity(cs, type_code) == CallsignValidity::Valid {
            return ResolvedIdentity::new(cs.to_uppercase(), IdentityBasis::Callsign);
        }
    }

    if let Some(reg) = registration {
        if is_registration_token(reg) {
            return ResolvedIdentity::new(reg.to_uppercase(), IdentityBasis::Registration);
        }
    }

    match callsign.or(registration) {
        Some(raw) => ResolvedIdentity::new(raw.to_uppercase(), IdentityBasis::Raw),
        None => ResolvedIdentity::new(UNKNOWN_IDENTITY, IdentityBasis::Unknown),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
