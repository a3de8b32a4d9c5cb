use super::angles::{hours_to_degrees, normalize_hours};
use super::vec::Vec3;

/// Mean obliquity of the ecliptic at J2000, in degrees.
pub const OBLIQUITY_J2000_DEG: f64 = 23.439_281;

/// Equatorial coordinate of a catalog feature.
///
/// `ra` is in hours `[0, 24)`, `dec` in degrees `[-90, 90]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CelestialPoint {
    pub ra: f64,
    pub dec: f64,
}

impl CelestialPoint {
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// Builds a point from chart coordinates `[x, y]` where `x = 360 - ra_deg`
    /// (east-left screen orientation) and `y = dec`.
    pub fn from_chart_coordinates(x_deg: f64, y_deg: f64) -> Self {
        Self {
            ra: normalize_hours((360.0 - x_deg) / 15.0),
            dec: y_deg,
        }
    }

    pub fn ra_deg(self) -> f64 {
        hours_to_degrees(self.ra)
    }

    pub fn is_finite(self) -> bool {
        self.ra.is_finite() && self.dec.is_finite()
    }

    pub fn unit_vector(self) -> Vec3 {
        let ra = self.ra_deg().to_radians();
        let dec = self.dec.to_radians();
        Vec3::new(dec.cos() * ra.cos(), dec.cos() * ra.sin(), dec.sin())
    }

    /// Great-circle separation in degrees.
    pub fn angular_distance(self, other: Self) -> f64 {
        self.unit_vector()
            .dot(other.unit_vector())
            .clamp(-1.0, 1.0)
            .acos()
            .to_degrees()
    }
}

/// Converts ecliptic longitude/latitude (degrees) to an equatorial point.
pub fn ecliptic_to_equatorial(lon_deg: f64, lat_deg: f64, obliquity_deg: f64) -> CelestialPoint {
    let lon = lon_deg.to_radians();
    let lat = lat_deg.to_radians();
    let eps = obliquity_deg.to_radians();

    let dec = (lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin()).asin();
    let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());

    CelestialPoint::new(normalize_hours(ra.to_degrees() / 15.0), dec.to_degrees())
}
