//! Aircraft classification for icon and effect selection.
//!
//! Pure functions over callsign and type code. The result is a closed set
//! so the display layer can match exhaustively.

use std::sync::OnceLock;

use regex::Regex;

/// Coarse operator class of an aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AircraftClass {
    /// Airline or cargo operator callsign ("ASA416", "FDX1203").
    Commercial,
    /// Private registration or general-aviation type.
    Private,
    /// Neither pattern matched.
    #[default]
    Unknown,
}

impl AircraftClass {
    /// Whether this class is drawn with the airliner icon.
    ///
    /// Unknown aircraft are drawn as airliners.
    pub fn uses_airliner_icon(&self) -> bool {
        !matches!(self, AircraftClass::Private)
    }
}

impl std::fmt::Display for AircraftClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AircraftClass::Commercial => write!(f, "commercial"),
            AircraftClass::Private => write!(f, "private"),
            AircraftClass::Unknown => write!(f, "unknown"),
        }
    }
}

/// Type designators of small, private and business aircraft.
const GENERAL_AVIATION_TYPES: &[&str] = &[
    "BE20", "BE35", "BE36", "BE58", "BE9L", "C150", "C152", "C172", "C182", "C206", "C208",
    "C210", "C25A", "C25B", "C25C", "C310", "C340", "C510", "C525", "C550", "C560", "C56X",
    "C680", "C68A", "C700", "CL30", "CL35", "CL60", "DA40", "DA42", "DA62", "E50P", "E55P",
    "FA50", "FA7X", "F2TH", "GA8", "GLEX", "GLF4", "GLF5", "GLF6", "H25B", "LJ35", "LJ45",
    "LJ60", "M20P", "M20T", "P28A", "P28B", "P32R", "PA24", "PA31", "PA34", "PA46", "PC12",
    "PC24", "RV7", "RV10", "S22T", "SR20", "SR22", "TBM7", "TBM8", "TBM9",
];

/// Airline callsign: two or three letters then a digit.
fn commercial_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]{2,3}[0-9]").unwrap())
}

/// National private-registration prefixes used as callsigns.
fn private_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // N-numbers (US), G- (UK), C-F/C-G (Canada), and other dash-style
        // European registrations (D-, F-, EC-, OE-, HB-...)
        Regex::new(r"^(N[0-9]|G-|C-[FG]|[DFI]-[A-Z]|[A-Z]{2}-[A-Z])").unwrap()
    })
}

/// Check whether a type code belongs to the general-aviation set.
pub fn is_general_aviation_type(type_code: &str) -> bool {
    let code = type_code.trim().to_uppercase();
    GENERAL_AVIATION_TYPES.contains(&code.as_str())
}

/// Classify an aircraft from its callsign and type code.
///
/// An airline-pattern callsign wins. Otherwise a private registration
/// pattern or a general-aviation type makes it private.
pub fn classify_aircraft(callsign: Option<&str>, type_code: Option<&str>) -> AircraftClass {
    let callsign = callsign.map(|c| c.trim().to_uppercase());

    if let Some(cs) = callsign.as_deref() {
        if commercial_pattern().is_match(cs) {
            return AircraftClass::Commercial;
        }
        if private_pattern().is_match(cs) {
            return AircraftClass::Private;
        }
    }

    if type_code.is_some_and(is_general_aviation_type) {
        return AircraftClass::Private;
    }

    AircraftClass::Unknown
}

/// ICAO airline designator from an airline-pattern callsign ("ASA416" → "ASA").
pub fn airline_code(callsign: &str) -> Option<String> {
    let cs = callsign.trim().to_uppercase();
    if !commercial_pattern().is_match(&cs) {
        return None;
    }
    Some(cs.chars().take_while(|c| c.is_ascii_alphabetic()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commercial_callsigns() {
        assert_eq!(classify_aircraft(Some("ASA416"), None), AircraftClass::Commercial);
        assert_eq!(classify_aircraft(Some("UA1"), None), AircraftClass::Commercial);
        assert_eq!(classify_aircraft(Some("fdx1203"), Some("B763")), AircraftClass::Commercial);
    }

    #[test]
    fn test_private_registrations() {
        assert_eq!(classify_aircraft(Some("N55ZZ"), None), AircraftClass::Private);
        assert_eq!(classify_aircraft(Some("G-EZAB"), None), AircraftClass::Private);
        assert_eq!(classify_aircraft(Some("C-FXYZ"), None), AircraftClass::Private);
        assert_eq!(classify_aircraft(Some("D-EABC"), None), AircraftClass::Private);
    }

    #[test]
    fn test_ga_type_makes_private() {
        assert_eq!(classify_aircraft(None, Some("C172")), AircraftClass::Private);
        assert_eq!(classify_aircraft(Some("LIFEGUARD"), Some("pc12")), AircraftClass::Private);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify_aircraft(None, None), AircraftClass::Unknown);
        assert_eq!(classify_aircraft(Some("LIFEGUARD"), Some("B739")), AircraftClass::Unknown);
        assert!(AircraftClass::Unknown.uses_airliner_icon());
        assert!(!AircraftClass::Private.uses_airliner_icon());
    }

    #[test]
    fn test_canadian_commercial_prefix_is_not_private() {
        // "C-" alone is not enough; C-F and C-G are the private blocks
        assert_ne!(classify_aircraft(Some("C-TEST"), None), AircraftClass::Private);
    }

    #[test]
    fn test_airline_code() {
        assert_eq!(airline_code("ASA416").as_deref(), Some("ASA"));
        assert_eq!(airline_code("UA1").as_deref(), Some("UA"));
        assert_eq!(airline_code("N55ZZ"), None);
    }
}
