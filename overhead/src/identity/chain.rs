//! Priority-ordered field resolution.
//!
//! Several values shown to the user can come from more than one place: the
//! enrichment database, the live observation, or the stored session. A
//! [`FieldChain`] lists the candidates in priority order and returns the
//! first one that is present and non-empty.
//!
//! ```ignore
//! let aircraft = FieldChain::new()
//!     .then(FieldSource::Enrichment, info.map(|i| i.friendly_name.as_str()))
//!     .then(FieldSource::Observation, snapshot.type_code.as_deref())
//!     .value_or("Plane");
//! ```

/// Where a resolved field value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Aircraft database lookup.
    Enrichment,
    /// The live feed observation.
    Observation,
    /// A previously stored session record.
    Session,
}

/// An ordered list of `(source, value)` candidates for one field.
#[derive(Debug, Clone, Default)]
pub struct FieldChain<'a> {
    candidates: Vec<(FieldSource, Option<&'a str>)>,
}

impl<'a> FieldChain<'a> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }

    /// Append a lower-priority candidate.
    pub fn then(mut self, source: FieldSource, value: Option<&'a str>) -> Self {
        self.candidates.push((source, value));
        self
    }

    /// First present, non-blank candidate together with its source.
    pub fn resolve(&self) -> Option<(FieldSource, &'a str)> {
        self.candidates.iter().find_map(|(source, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (*source, v))
        })
    }

    /// First present value.
    pub fn value(&self) -> Option<&'a str> {
        self.resolve().map(|(_, v)| v)
    }

    /// First present value, or `default` if every candidate is empty.
    pub fn value_or(&self, default: &'a str) -> &'a str {
        self.value().unwrap_or(default)
    }
}
