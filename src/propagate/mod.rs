mod frames;
mod propagator;
mod types;

pub use frames::{
    normalize_longitude, Geodetic, EARTH_ROTATION_RAD_S, MEAN_EARTH_RADIUS_KM,
    SGP4_EARTH_RADIUS_KM,
};
pub use propagator::{propagate, Propagate};
pub use types::{Frame, StateVector};
