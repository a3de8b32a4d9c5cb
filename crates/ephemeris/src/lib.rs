//! Low-precision sun and moon positions.
//!
//! Accuracy is around a degree, enough to place the bodies on a chart.

pub mod moon;
pub mod sun;

pub use moon::*;
pub use sun::*;

use foundation::math::CelestialPoint;

pub(crate) fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

pub(crate) fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

/// Chart placement for an ecliptic position: `[360 - lon, -lat]`.
pub(crate) fn chart_point(longitude: f64, latitude: f64) -> CelestialPoint {
    CelestialPoint::from_chart_coordinates(360.0 - longitude, -latitude)
}
