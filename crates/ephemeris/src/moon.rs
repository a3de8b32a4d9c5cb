use chrono::{DateTime, Utc};
use foundation::math::normalize_degrees;
use formats::{CatalogFeature, ObjectType};

use crate::sun::{SunPosition, sun_position};
use crate::{chart_point, cos_deg, sin_deg};

/// Mean longitude at epoch.
const MOON_LONGITUDE_AT_EPOCH: f64 = 91.929_336;
/// Mean longitude of perigee at epoch.
const MOON_PERIGEE_AT_EPOCH: f64 = 130.143_076;
/// Mean longitude of the ascending node at epoch.
const MOON_NODE_AT_EPOCH: f64 = 291.682_547;
const MOON_INCLINATION: f64 = 5.145_396;

pub const MOON_MAGNITUDE: f64 = -12.74;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MoonPosition {
    /// Ecliptic latitude in degrees.
    pub latitude: f64,
    /// Ecliptic longitude in degrees `[0, 360)`.
    pub longitude: f64,
}

pub fn moon_position(date: DateTime<Utc>) -> MoonPosition {
    moon_position_from(&sun_position(date))
}

/// Lunar position for the instant `sun` was computed at.
pub fn moon_position_from(sun: &SunPosition) -> MoonPosition {
    let d = sun.days_since_epoch;
    let sun_lon = sun.ecliptic_longitude;
    let sun_anomaly = sun.mean_anomaly;

    let mean_lon = normalize_degrees(13.176_396_6 * d + MOON_LONGITUDE_AT_EPOCH);
    let anomaly = normalize_degrees(mean_lon - 0.111_404_1 * d - MOON_PERIGEE_AT_EPOCH);
    let node = normalize_degrees(MOON_NODE_AT_EPOCH - 0.052_953_9 * d);

    let evection = 1.2739 * sin_deg(2.0 * (mean_lon - sun_lon) - anomaly);
    let annual = 0.1858 * sin_deg(sun_anomaly);
    let a3 = 0.37 * sin_deg(sun_anomaly);
    let corrected_anomaly = anomaly + evection - annual - a3;
    let center = 6.2886 * sin_deg(corrected_anomaly);
    let a4 = 0.214 * sin_deg(2.0 * corrected_anomaly);
    let lon = mean_lon + evection + center - annual + a4;
    let variation = 0.6583 * sin_deg(2.0 * (lon - sun_lon));
    let true_lon = lon + variation;
    let node = node - 0.16 * sin_deg(sun_anomaly);

    let y = sin_deg(true_lon - node) * cos_deg(MOON_INCLINATION);
    let x = cos_deg(true_lon - node);
    // atan2 lands in [-180, 180], so the sum can go negative.
    let longitude = normalize_degrees(y.atan2(x).to_degrees() + node);
    let latitude = (sin_deg(true_lon - node) * sin_deg(MOON_INCLINATION))
        .asin()
        .to_degrees();

    MoonPosition {
        latitude,
        longitude,
    }
}

impl MoonPosition {
    pub fn to_feature(&self) -> CatalogFeature {
        CatalogFeature::point(
            "moon",
            ObjectType::Moon,
            chart_point(self.longitude, self.latitude),
            MOON_MAGNITUDE,
        )
        .with_name("Moon")
    }
}
