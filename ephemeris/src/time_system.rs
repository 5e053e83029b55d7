//! Civil time to sidereal time conversion.
//!
//! The sidereal model is the low-precision linear GMST expression anchored at
//! J2000.0. There are no higher-order IAU terms, no nutation and no UT1 correction;
//! chart output depends on this exact arithmetic, so keep it that way.

use chrono::NaiveDateTime;

/// Milliseconds in one civil day
pub const MILLISECONDS_PER_DAY: f64 = 86_400_000.0;

/// Julian Date of the Unix epoch (1970-01-01T00:00:00)
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian Date of the J2000.0 epoch (2000-01-01T12:00:00)
pub const J2000_JD: f64 = 2_451_545.0;

/// Greenwich Mean Sidereal Time at J2000.0, in hours
pub const GMST_AT_J2000_HOURS: f64 = 18.697374558;

/// Sidereal hours elapsed per civil day
pub const SIDEREAL_HOURS_PER_DAY: f64 = 24.06570982441908;

/// Sky rotation per hour of sidereal time
pub const DEGREES_PER_HOUR: f64 = 15.0;

/// Julian Date for a time given in milliseconds since the Unix epoch.
///
/// Accepts any finite value, including times before 1970.
pub fn julian_date(unix_ms: f64) -> f64 {
    unix_ms / MILLISECONDS_PER_DAY + UNIX_EPOCH_JD
}

/// Milliseconds since the Unix epoch for a naive wall-clock timestamp.
///
/// The wall clock is read as if it were UTC.
pub fn unix_millis(timestamp: &NaiveDateTime) -> i64 {
    timestamp.and_utc().timestamp_millis()
}

/// Julian Date of a naive wall-clock timestamp.
pub fn julian_date_of(timestamp: &NaiveDateTime) -> f64 {
    julian_date(unix_millis(timestamp) as f64)
}

/// Greenwich Mean Sidereal Time in degrees.
///
/// `gmst = 18.697374558 + 24.06570982441908 * (jd - 2451545.0)` hours, reduced
/// modulo 24 and scaled to degrees. The reduction is a truncating remainder, so
/// dates before J2000 - 0.78 d give a negative angle in (-360, 0]. Callers only
/// feed the result into periodic functions, where the sign is irrelevant.
pub fn greenwich_mean_sidereal_time_deg(jd: f64) -> f64 {
    let days_since_j2000 = jd - J2000_JD;
    let gmst_hours = GMST_AT_J2000_HOURS + SIDEREAL_HOURS_PER_DAY * days_since_j2000;
    (gmst_hours % 24.0) * DEGREES_PER_HOUR
}

/// Local Sidereal Time in degrees for an observer at `longitude_deg` (east positive).
///
/// Same truncating remainder as [`greenwich_mean_sidereal_time_deg`].
pub fn local_sidereal_time_deg(gmst_deg: f64, longitude_deg: f64) -> f64 {
    (gmst_deg + longitude_deg) % 360.0
}
