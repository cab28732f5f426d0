use std::fmt;

use chrono::{DateTime, Duration, Utc};
use sgp4::{Constants, Elements};

use super::error::ElementError;

/// A decoded, immutable two-line element set ready for propagation.
pub struct OrbitalElementSet {
    pub norad_id: u64,
    pub object_name: String,
    pub line1: String,
    pub line2: String,
    pub epoch: DateTime<Utc>,
    elements: Elements,
    constants: Constants,
}

impl OrbitalElementSet {
    pub fn from_lines(
        object_name: Option<String>,
        norad_id: Option<u64>,
        line1: &str,
        line2: &str,
    ) -> Result<Self, ElementError> {
        let label = object_name
            .clone()
            .or_else(|| norad_id.map(|id| format!("NORAD {}", id)))
            .unwrap_or_else(|| "unnamed object".to_string());
        let invalid = |message: String| ElementError::InvalidTle {
            name: label.clone(),
            message,
        };

        let elements = Elements::from_tle(
            object_name.clone(),
            line1.as_bytes(),
            line2.as_bytes(),
        )
        .map_err(|e| invalid(e.to_string()))?;
        let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

        if let Some(id) = norad_id.filter(|id| *id != elements.norad_id) {
            log::warn!(
                "Catalog number {} for {} does not match {} encoded in line 1",
                id,
                label,
                elements.norad_id
            );
        }
        let norad_id = norad_id.unwrap_or(elements.norad_id);
        let object_name = object_name.unwrap_or_else(|| format!("NORAD {}", norad_id));
        let epoch = DateTime::from_naive_utc_and_offset(elements.datetime, Utc);

        Ok(Self {
            norad_id,
            object_name,
            line1: line1.to_string(),
            line2: line2.to_string(),
            epoch,
            elements,
            constants,
        })
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    /// Signed distance of `at` from the element epoch.
    pub fn age_at(&self, at: DateTime<Utc>) -> Duration {
        at - self.epoch
    }

    pub fn is_stale_at(&self, at: DateTime<Utc>, limit: Duration) -> bool {
        self.age_at(at).abs() > limit
    }
}

impl fmt::Debug for OrbitalElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrbitalElementSet")
            .field("norad_id", &self.norad_id)
            .field("object_name", &self.object_name)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
