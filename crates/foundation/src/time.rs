//! Astronomical time: Julian Day and sidereal time.
//!
//! Sidereal time uses the low-order polynomial in UT (IAU 1982 style), which
//! is more than adequate for centering a chart.

use chrono::{DateTime, Utc};

use crate::math::angles::frac;

pub const MILLIS_PER_DAY: f64 = 86_400_000.0;
/// Julian Day of the Unix epoch (1970-01-01T00:00:00Z).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Offset between Julian Day and Modified Julian Day.
pub const MJD_OFFSET: f64 = 2_400_000.5;
/// MJD of J2000.0 (2000-01-01T12:00:00).
pub const J2000_MJD: f64 = 51_544.5;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

pub fn julian_day(date: DateTime<Utc>) -> f64 {
    date.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD
}

/// Greenwich Mean Sidereal Time in hours. Not reduced to `[0, 24)`.
pub fn greenwich_mean_sidereal_time(date: DateTime<Utc>) -> f64 {
    let mjd = julian_day(date) - MJD_OFFSET;
    let mjd0 = mjd.floor();
    let ut = (mjd - mjd0) * 24.0;
    let t = (mjd0 - J2000_MJD) / DAYS_PER_JULIAN_CENTURY;

    6.697_374_558
        + 1.002_737_909_3 * ut
        + (8_640_184.812_866 + (0.093_104 - 0.000_006_2 * t) * t) * t / 3600.0
}

/// Local sidereal time in hours `[0, 24)` for an east-positive longitude in degrees.
pub fn local_sidereal_time(date: DateTime<Utc>, longitude_deg: f64) -> f64 {
    let gmst = greenwich_mean_sidereal_time(date);
    let lst = 24.0 * frac((gmst + longitude_deg / 15.0) / 24.0);
    // frac() is strictly below 1, but the multiply can still round up to 24.
    if lst >= 24.0 { 0.0 } else { lst }
}
