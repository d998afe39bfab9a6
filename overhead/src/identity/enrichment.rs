//! Aircraft identity enrichment.
//!
//! Turns an ICAO address or type designator into human-friendly details.
//! A miss is never an error: callers fall back to the raw observation.
//!
//! The built-in table covers common airliner, regional and GA types. An
//! optional JSON file adds per-airframe records keyed by ICAO address:
//!
//! ```json
//! {
//!   "A1B2C3": { "typeCode": "B739", "registration": "N123AB", "model": "737-990ER" }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fs::{read_json, PersistenceError};

/// Enrichment result for one aircraft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AircraftInfo {
    pub type_code: Option<String>,
    pub registration: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub friendly_name: Option<String>,
    pub airline_code: Option<String>,
}

impl AircraftInfo {
    /// Fill unset fields from `other`, keeping existing values.
    pub fn merge_missing(&mut self, other: &AircraftInfo) {
        fill(&mut self.type_code, &other.type_code);
        fill(&mut self.registration, &other.registration);
        fill(&mut self.manufacturer, &other.manufacturer);
        fill(&mut self.model, &other.model);
        fill(&mut self.friendly_name, &other.friendly_name);
        fill(&mut self.airline_code, &other.airline_code);
    }
}

fn fill(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(value);
    }
}

/// Identity enrichment collaborator.
///
/// Lookups are pure and cheap enough to run on every poll tick.
pub trait AircraftLookup: Send + Sync {
    /// Look up a specific airframe by ICAO address.
    fn by_icao(&self, icao: &str) -> Option<AircraftInfo>;

    /// Look up generic details for a type designator.
    fn by_type_code(&self, type_code: &str) -> Option<AircraftInfo>;

    /// Combined lookup: airframe record first, then type details for
    /// whatever type the airframe record or observation names.
    fn lookup(&self, icao: Option<&str>, type_code: Option<&str>) -> Option<AircraftInfo> {
        let mut info = icao.and_then(|i| self.by_icao(i));

        let effective_type = info
            .as_ref()
            .and_then(|i| i.type_code.clone())
            .or_else(|| type_code.map(str::to_string));

        if let Some(type_info) = effective_type.as_deref().and_then(|t| self.by_type_code(t)) {
            match info.as_mut() {
                Some(existing) => existing.merge_missing(&type_info),
                None => info = Some(type_info),
            }
        }

        info
    }
}

/// (type code, manufacturer, friendly name)
const BUILTIN_TYPES: &[(&str, &str, &str)] = &[
    ("A306", "Airbus", "A300"),
    ("A30B", "Airbus", "A300"),
    ("A310", "Airbus", "A310"),
    ("A319", "Airbus", "A319"),
    ("A320", "Airbus", "A320"),
    ("A321", "Airbus", "A321"),
    ("A20N", "Airbus", "A320neo"),
    ("A21N", "Airbus", "A321neo"),
    ("A332", "Airbus", "A330"),
    ("A333", "Airbus", "A330"),
    ("A342", "Airbus", "A340"),
    ("A343", "Airbus", "A340"),
    ("A345", "Airbus", "A340"),
    ("A346", "Airbus", "A340"),
    ("A359", "Airbus", "A350"),
    ("A388", "Airbus", "A380"),
    ("BCS1", "Airbus", "A220"),
    ("BCS3", "Airbus", "A220"),
    ("B38M", "Boeing", "737 MAX"),
    ("B738", "Boeing", "737-800"),
    ("B739", "Boeing", "737-900"),
    ("B742", "Boeing", "747"),
    ("B744", "Boeing", "747-400"),
    ("B748", "Boeing", "747-8"),
    ("B74R", "Boeing", "747"),
    ("B752", "Boeing", "757"),
    ("B753", "Boeing", "757"),
    ("B763", "Boeing", "767"),
    ("B764", "Boeing", "767"),
    ("B772", "Boeing", "777"),
    ("B773", "Boeing", "777"),
    ("B77W", "Boeing", "777"),
    ("B788", "Boeing", "787-8"),
    ("B789", "Boeing", "787-9"),
    ("B78X", "Boeing", "787-10"),
    ("MD11", "McDonnell Douglas", "MD-11"),
    ("MD82", "McDonnell Douglas", "MD-82"),
    ("MD83", "McDonnell Douglas", "MD-83"),
    ("DC10", "McDonnell Douglas", "DC-10"),
    ("E75L", "Embraer", "E175"),
    ("E75S", "Embraer", "E175"),
    ("E190", "Embraer", "E190"),
    ("E195", "Embraer", "E195"),
    ("CRJ2", "Bombardier", "CRJ200"),
    ("CRJ7", "Bombardier", "CRJ700"),
    ("CRJ9", "Bombardier", "CRJ900"),
    ("DH8A", "De Havilland Canada", "Dash 8"),
    ("DH8B", "De Havilland Canada", "Dash 8"),
    ("DH8C", "De Havilland Canada", "Dash 8"),
    ("DH8D", "De Havilland Canada", "Dash 8 Q400"),
    ("AT75", "ATR", "ATR-72"),
    ("AT76", "ATR", "ATR-72"),
    ("B190", "Beechcraft", "Beech 1900"),
    ("SW4", "Fairchild", "Metroliner"),
    ("C172", "Cessna", "Cessna 172"),
    ("C182", "Cessna", "Cessna 182"),
    ("C208", "Cessna", "Caravan"),
    ("C56X", "Cessna", "Citation Excel"),
    ("PC12", "Pilatus", "Pilatus PC-12"),
    ("SR22", "Cirrus", "Cirrus SR22"),
    ("BE20", "Beechcraft", "King Air"),
    ("GLF4", "Gulfstream", "Gulfstream"),
    ("GLF5", "Gulfstream", "Gulfstream"),
    ("CL30", "Bombardier", "Challenger"),
    ("CL60", "Bombardier", "Challenger"),
    ("FA7X", "Dassault", "Falcon 7X"),
    ("C130", "Lockheed", "C-130"),
    ("C17", "Boeing", "C-17"),
    ("C5M", "Lockheed", "C-5"),
    ("K35R", "Boeing", "KC-135"),
    ("V22", "Bell Boeing", "V-22"),
    ("P8", "Boeing", "P-8"),
    ("E6", "Boeing", "E-6"),
    ("E3TF", "Boeing", "AWACS"),
    ("CONC", "Aerospatiale/BAC", "Concorde"),
];

/// Built-in type table plus optional per-airframe records.
#[derive(Debug, Clone, Default)]
pub struct AircraftDatabase {
    types: HashMap<String, AircraftInfo>,
    airframes: HashMap<String, AircraftInfo>,
}

impl AircraftDatabase {
    /// Database with only the built-in type table.
    pub fn builtin() -> Self {
        let types = BUILTIN_TYPES
            .iter()
            .map(|(code, manufacturer, name)| {
                let info = AircraftInfo {
                    type_code: Some(code.to_string()),
                    manufacturer: Some(manufacturer.to_string()),
                    model: Some(name.to_string()),
                    friendly_name: Some(name.to_string()),
                    ..Default::default()
                };
                (code.to_string(), info)
            })
            .collect();

        Self {
            types,
            airframes: HashMap::new(),
        }
    }

    /// Built-in types plus airframe records from a JSON file.
    ///
    /// A missing file yields the built-in table alone.
    pub fn with_airframe_file(path: &Path) -> Result<Self, PersistenceError> {
        let mut db = Self::builtin();
        let records: HashMap<String, AircraftInfo> = read_json(path)?.unwrap_or_default();
        tracing::info!(
            path = %path.display(),
            airframes = records.len(),
            "Loaded aircraft database"
        );
        for (icao, info) in records {
            db.insert_airframe(&icao, info);
        }
        Ok(db)
    }

    /// Add or replace a per-airframe record.
    pub fn insert_airframe(&mut self, icao: &str, info: AircraftInfo) {
        self.airframes.insert(icao.trim().to_uppercase(), info);
    }

    /// Number of known type designators.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

impl AircraftLookup for AircraftDatabase {
    fn by_icao(&self, icao: &str) -> Option<AircraftInfo> {
        self.airframes.get(&icao.trim().to_uppercase()).cloned()
    }

    fn by_type_code(&self, type_code: &str) -> Option<AircraftInfo> {
        self.types.get(&type_code.trim().to_uppercase()).cloned()
    }
}
