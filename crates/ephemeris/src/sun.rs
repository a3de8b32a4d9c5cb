use chrono::{DateTime, Utc};
use foundation::math::normalize_degrees;
use foundation::time::julian_day;
use formats::{CatalogFeature, ObjectType};

use crate::{chart_point, sin_deg};

/// Julian Day of the orbital elements' epoch (2010.0 TT).
pub const SUN_EPOCH_JD: f64 = 2_455_196.5;
pub const TROPICAL_YEAR_DAYS: f64 = 365.242_191;
/// Ecliptic longitude at epoch.
pub const SUN_LONGITUDE_AT_EPOCH: f64 = 279.557_208;
/// Ecliptic longitude of perigee.
pub const SUN_PERIGEE_LONGITUDE: f64 = 283.112_438;
pub const EARTH_ORBIT_ECCENTRICITY: f64 = 0.016_705;
pub const SUN_MAGNITUDE: f64 = -26.74;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SunPosition {
    /// Ecliptic longitude in degrees `[0, 360)`. Latitude is always 0.
    pub ecliptic_longitude: f64,
    pub mean_anomaly: f64,
    pub days_since_epoch: f64,
    /// Mean motion angle since epoch, `[0, 360)`.
    pub n: f64,
}

pub fn sun_position(date: DateTime<Utc>) -> SunPosition {
    let days = julian_day(date) - SUN_EPOCH_JD;
    let n = normalize_degrees(360.0 / TROPICAL_YEAR_DAYS * days);
    let mean_anomaly = normalize_degrees(n + SUN_LONGITUDE_AT_EPOCH - SUN_PERIGEE_LONGITUDE);
    // First-order equation of the centre.
    let center = (360.0 / std::f64::consts::PI) * EARTH_ORBIT_ECCENTRICITY * sin_deg(mean_anomaly);
    let ecliptic_longitude = normalize_degrees(n + center + SUN_LONGITUDE_AT_EPOCH);

    SunPosition {
        ecliptic_longitude,
        mean_anomaly,
        days_since_epoch: days,
        n,
    }
}

impl SunPosition {
    pub fn to_feature(&self) -> CatalogFeature {
        CatalogFeature::point(
            "sun",
            ObjectType::Sun,
            chart_point(self.ecliptic_longitude, 0.0),
            SUN_MAGNITUDE,
        )
        .with_name("Sun")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn one_day_after_epoch() {
        let sun = sun_position(utc(2010, 1, 1, 0, 0));
        assert_close(sun.days_since_epoch, 1.0, 1e-9);
        assert_close(sun.ecliptic_longitude, 280.457, 1e-3);
        assert_close(sun.mean_anomaly, 357.430, 1e-3);
    }

    #[test]
    fn equinox_and_solstice() {
        let march = sun_position(utc(2024, 3, 20, 3, 6)).ecliptic_longitude;
        assert!(march < 0.05 || march > 359.95, "march equinox at {march}");

        let june = sun_position(utc(2024, 6, 20, 20, 51)).ecliptic_longitude;
        assert_close(june, 90.0, 0.05);
    }

    #[test]
    fn angles_stay_in_range_before_epoch() {
        for date in [utc(1970, 1, 1, 0, 0), utc(1999, 7, 1, 12, 0), utc(2009, 12, 30, 0, 0)] {
            let sun = sun_position(date);
            assert!(sun.days_since_epoch < 0.0);
            for angle in [sun.ecliptic_longitude, sun.mean_anomaly, sun.n] {
                assert!((0.0..360.0).contains(&angle), "{date}: {angle}");
            }
        }
    }

    #[test]
    fn feature_uses_chart_convention() {
        let sun = SunPosition {
            ecliptic_longitude: 90.0,
            mean_anomaly: 0.0,
            days_since_epoch: 0.0,
            n: 0.0,
        };
        let feature = sun.to_feature();
        assert_eq!(feature.id, "sun");
        assert_eq!(feature.object_type, ObjectType::Sun);
        assert_eq!(feature.magnitude, SUN_MAGNITUDE);
        assert_eq!(feature.name.as_deref(), Some("Sun"));
        let p = feature.geometry.point().unwrap();
        assert_close(p.ra, 6.0, 1e-9);
        assert_close(p.dec, 0.0, 1e-12);
    }
}
