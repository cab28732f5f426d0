use chrono::{DateTime, SubsecRound, Utc};

use super::frames::{
    teme_to_ecef_position, teme_to_ecef_velocity, Geodetic, SGP4_EARTH_RADIUS_KM,
};
use super::types::{Frame, StateVector};
use crate::elements::OrbitalElementSet;

/// Anything that can produce a state at a given instant. `None` means no
/// valid state exists at that instant; it is not an error.
pub trait Propagate {
    fn state_at(&self, timestamp: DateTime<Utc>, frame: Frame) -> Option<StateVector>;
}

impl Propagate for OrbitalElementSet {
    fn state_at(&self, timestamp: DateTime<Utc>, frame: Frame) -> Option<StateVector> {
        propagate(self, timestamp, frame)
    }
}

/// Propagate one element set to one instant with SGP4.
///
/// Sub-second precision is dropped. Every failure inside the propagator
/// (decayed orbit, diverging elements, unrepresentable offset, non-finite
/// output) collapses to `None` so a caller sampling many instants can skip
/// the point.
pub fn propagate(
    set: &OrbitalElementSet,
    timestamp: DateTime<Utc>,
    frame: Frame,
) -> Option<StateVector> {
    let timestamp = timestamp.trunc_subsecs(0);
    match try_propagate(set, timestamp, frame) {
        Ok(state) => Some(state),
        Err(message) => {
            log::debug!(
                "No state for {} ({}) at {}: {}",
                set.object_name,
                set.norad_id,
                timestamp,
                message
            );
            None
        }
    }
}

fn try_propagate(
    set: &OrbitalElementSet,
    timestamp: DateTime<Utc>,
    frame: Frame,
) -> Result<StateVector, String> {
    let naive = timestamp.naive_utc();
    let minutes = set
        .elements()
        .datetime_to_minutes_since_epoch(&naive)
        .map_err(|e| e.to_string())?;

    let prediction = set.constants().propagate(minutes).map_err(|e| e.to_string())?;

    let [x, y, z] = prediction.position;
    let radius = (x * x + y * y + z * z).sqrt();
    if radius < SGP4_EARTH_RADIUS_KM {
        return Err(format!("orbit decayed (radius {:.1} km)", radius));
    }

    let (position, velocity) = match frame {
        Frame::Inertial => (prediction.position, prediction.velocity),
        Frame::EarthFixed => {
            let gmst = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&naive));
            (
                teme_to_ecef_position(prediction.position, gmst),
                teme_to_ecef_velocity(prediction.position, prediction.velocity, gmst),
            )
        }
    };

    if !position.iter().chain(velocity.iter()).all(|v| v.is_finite()) {
        return Err("non-finite state vector".to_string());
    }

    let geodetic = Geodetic::from_position(position);

    Ok(StateVector {
        timestamp,
        x: position[0],
        y: position[1],
        z: position[2],
        vx: velocity[0],
        vy: velocity[1],
        vz: velocity[2],
        latitude: geodetic.latitude_deg,
        longitude: geodetic.longitude_deg,
        altitude: geodetic.altitude_km,
    })
}
