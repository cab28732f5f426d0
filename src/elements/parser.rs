use serde_json::Value;

use super::error::ElementError;
use super::record::{
    NormalizedRecord, CATALOG_ID_ALIASES, LINE1_ALIASES, LINE2_ALIASES, MEAN_ELEMENT_FIELDS,
    OBJECT_NAME_ALIASES,
};
use super::types::OrbitalElementSet;

/// Parse one upstream element record into a normalized element set.
pub fn parse_element_set(record: &Value) -> Result<OrbitalElementSet, ElementError> {
    let raw = record.as_object().ok_or(ElementError::NotAnObject)?;
    let fields = NormalizedRecord::new(raw);

    let lines = fields
        .resolve(LINE1_ALIASES)
        .zip(fields.resolve(LINE2_ALIASES));

    let (line1, line2) = match lines {
        Some(lines) => lines,
        None if fields.has_all(MEAN_ELEMENT_FIELDS) => {
            return Err(ElementError::SynthesisUnsupported);
        }
        None => return Err(ElementError::MissingElementData(fields.field_names())),
    };

    let norad_id = fields
        .resolve(CATALOG_ID_ALIASES)
        .map(|id| parse_catalog_id(&id))
        .transpose()?;
    let object_name = fields.resolve(OBJECT_NAME_ALIASES).map(|name| strip_line0(&name));

    OrbitalElementSet::from_lines(object_name, norad_id, &line1, &line2)
}

/// Split a response body into individual records. Upstream endpoints return
/// either a JSON array or a single object.
pub fn parse_records(body: &str) -> Result<Vec<Value>, ElementError> {
    match serde_json::from_str(body)? {
        Value::Array(records) => Ok(records),
        record @ Value::Object(_) => Ok(vec![record]),
        Value::Null => Ok(Vec::new()),
        _ => Err(ElementError::NotAnObject),
    }
}

fn parse_catalog_id(raw: &str) -> Result<u64, ElementError> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<u64>() {
        return Ok(id);
    }
    // Numeric JSON values may arrive as floats ("25544.0", "2.5544e4").
    // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|id| id.is_finite() && *id >= 0.0 && *id < u64::MAX as f64 && id.fract() == 0.0)
        .map(|id| id as u64)
        .ok_or_else(|| ElementError::InvalidCatalogId(raw.to_string()))
}

fn strip_line0(name: &str) -> String {
    name.strip_prefix("0 ").unwrap_or(name).trim().to_string()
}
