use std::collections::HashMap;

use serde_json::{Map, Value};

pub const LINE1_ALIASES: &[&str] = &["TLE_LINE1", "LINE1", "TLE1"];
pub const LINE2_ALIASES: &[&str] = &["TLE_LINE2", "LINE2", "TLE2"];
pub const CATALOG_ID_ALIASES: &[&str] = &[
    "NORAD_CAT_ID",
    "NORAD_ID",
    "CATNR",
    "SATNUM",
    "SATELLITE_ID",
];
pub const OBJECT_NAME_ALIASES: &[&str] = &["OBJECT_NAME", "SATNAME", "NAME", "TLE_LINE0"];

/// Mean-element fields of an OMM-style record. Their presence means the lines
/// could in principle be rebuilt, which is not supported.
pub const MEAN_ELEMENT_FIELDS: &[&str] = &[
    "EPOCH",
    "MEAN_MOTION",
    "ECCENTRICITY",
    "INCLINATION",
    "RA_OF_ASC_NODE",
    "ARG_OF_PERICENTER",
    "MEAN_ANOMALY",
];

/// Case-insensitive view over one upstream record.
pub struct NormalizedRecord<'a> {
    fields: HashMap<String, &'a Value>,
}

impl<'a> NormalizedRecord<'a> {
    pub fn new(raw: &'a Map<String, Value>) -> Self {
        let fields = raw
            .iter()
            .map(|(k, v)| (k.trim().to_ascii_uppercase(), v))
            .collect();
        Self { fields }
    }

    /// First candidate (in priority order) holding a non-empty value.
    pub fn resolve(&self, candidates: &[&str]) -> Option<String> {
        candidates
            .iter()
            .filter_map(|name| self.fields.get(&name.to_ascii_uppercase()))
            .find_map(|value| value_to_string(value))
    }

    pub fn has_all(&self, names: &[&str]) -> bool {
        names.iter().all(|name| {
            self.fields
                .get(*name)
                .and_then(|v| value_to_string(v))
                .is_some()
        })
    }

    pub fn field_names(&self) -> String {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
