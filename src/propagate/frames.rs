pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;
/// Mean Earth radius. Altitudes are measured from this sphere, not from an
/// ellipsoid.
pub const MEAN_EARTH_RADIUS_KM: f64 = 6371.0;
/// Equatorial radius of the WGS-72 model SGP4 is built on. A state inside
/// this sphere means the orbit has decayed.
pub const SGP4_EARTH_RADIUS_KM: f64 = 6378.135;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_km: f64,
}

impl Geodetic {
    pub fn from_position(pos: [f64; 3]) -> Self {
        let [x, y, z] = pos;
        let horizontal = (x * x + y * y).sqrt();
        Self {
            latitude_deg: z.atan2(horizontal).to_degrees(),
            longitude_deg: normalize_longitude(y.atan2(x).to_degrees()),
            altitude_km: (x * x + y * y + z * z).sqrt() - MEAN_EARTH_RADIUS_KM,
        }
    }
}

/// Wrap any angle in degrees into [-180, 180].
pub fn normalize_longitude(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn teme_to_ecef_velocity(pos_teme: [f64; 3], vel_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let pos = teme_to_ecef_position(pos_teme, gmst);
    let rotated = teme_to_ecef_position(vel_teme, gmst);
    [
        rotated[0] + EARTH_ROTATION_RAD_S * pos[1],
        rotated[1] - EARTH_ROTATION_RAD_S * pos[0],
        rotated[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn longitude_wraps_into_half_open_range() {
        assert_abs_diff_eq!(normalize_longitude(190.0), -170.0);
        assert_abs_diff_eq!(normalize_longitude(-190.0), 170.0);
        assert_abs_diff_eq!(normalize_longitude(180.0), 180.0);
        assert_abs_diff_eq!(normalize_longitude(540.0), 180.0);
        assert_abs_diff_eq!(normalize_longitude(0.0), 0.0);
    }

    #[test]
    fn geodetic_on_axes() {
        let g = Geodetic::from_position([6771.0, 0.0, 0.0]);
        assert_abs_diff_eq!(g.latitude_deg, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(g.longitude_deg, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(g.altitude_km, 400.0, epsilon = 1e-9);

        let g = Geodetic::from_position([0.0, -6771.0, 0.0]);
        assert_abs_diff_eq!(g.longitude_deg, -90.0, epsilon = 1e-9);

        let g = Geodetic::from_position([0.0, 0.0, -6771.0]);
        assert_abs_diff_eq!(g.latitude_deg, -90.0, epsilon = 1e-9);
    }

    #[test]
    fn rotation_preserves_radius() {
        let pos = [4000.0, -3000.0, 4500.0];
        let rotated = teme_to_ecef_position(pos, 1.234);
        let r = |p: [f64; 3]| (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        assert_abs_diff_eq!(r(pos), r(rotated), epsilon = 1e-9);
        assert_abs_diff_eq!(rotated[2], pos[2]);
    }

    #[test]
    fn corotating_point_has_no_earth_fixed_velocity() {
        let pos = [6771.0, 0.0, 0.0];
        let vel = [0.0, EARTH_ROTATION_RAD_S * 6771.0, 0.0];
        let v = teme_to_ecef_velocity(pos, vel, 0.0);
        assert_abs_diff_eq!(v[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v[1], 0.0, epsilon = 1e-12);
    }
}
