use chrono::{DateTime, Utc};
use foundation::math::{CelestialPoint, Rotation};
use foundation::time::local_sidereal_time;
use serde::{Deserialize, Serialize};

use crate::options::OptionsError;

/// Geographic observer position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(OptionsError::InvalidValue {
                field: "location.latitude".to_string(),
                reason: format!("{} is outside [-90, 90]", self.latitude),
            });
        }
        if !self.longitude.is_finite() {
            return Err(OptionsError::InvalidValue {
                field: "location.longitude".to_string(),
                reason: format!("{} is not finite", self.longitude),
            });
        }
        Ok(())
    }
}

/// Fixed chart center: RA in hours, Dec in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub ra: f64,
    pub dec: f64,
}

impl Center {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.ra.is_finite() || !(0.0..24.0).contains(&self.ra) {
            return Err(OptionsError::InvalidValue {
                field: "center.ra".to_string(),
                reason: format!("{} is outside [0, 24)", self.ra),
            });
        }
        if !self.dec.is_finite() || !(-90.0..=90.0).contains(&self.dec) {
            return Err(OptionsError::InvalidValue {
                field: "center.dec".to_string(),
                reason: format!("{} is outside [-90, 90]", self.dec),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ObserverMode {
    Location(Location),
    Center(Center),
}

/// What the chart is looking at. The datetime always drives the sun and
/// moon; in center mode it does not affect centering.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObserverState {
    pub datetime: DateTime<Utc>,
    pub mode: ObserverMode,
}

impl ObserverState {
    /// The sky point at the middle of the chart.
    pub fn zenith(&self) -> CelestialPoint {
        match self.mode {
            ObserverMode::Center(c) => CelestialPoint::new(c.ra, c.dec),
            ObserverMode::Location(loc) => CelestialPoint::new(
                local_sidereal_time(self.datetime, loc.longitude),
                loc.latitude,
            ),
        }
    }
}

/// Projection rotation that brings the zenith to the chart center:
/// `(ra * 15, -dec)` degrees.
pub fn compute_zenith(observer: &ObserverState) -> Rotation {
    Rotation::centered_on(observer.zenith())
}
