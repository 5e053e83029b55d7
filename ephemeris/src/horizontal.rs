//! Equatorial to horizontal coordinate transform.
//!
//! Converts catalog right ascension / declination into altitude / azimuth for an
//! observer at a given latitude, longitude and wall-clock time.
//!
//! # Conventions
//! - Azimuth is measured from north through east (0° = N, 90° = E).
//! - Altitude is positive above the horizon. No refraction is applied.
//! - All public values are degrees; radians only appear internally.
//!
//! # Degenerate geometry
//! The azimuth is recovered as `acos((sin δ - sin h sin φ) / (cos h cos φ))`. When
//! the object sits exactly at the zenith/nadir or the observer stands on a pole the
//! denominator is zero and the azimuth comes out non-finite. Rounding can also push
//! the ratio a hair outside [-1, 1] for objects on the meridian, with the same
//! result. This is left as-is; consumers must tolerate a non-finite azimuth.

use std::f64::consts::PI;

use chrono::NaiveDateTime;

use crate::time_system::{greenwich_mean_sidereal_time_deg, julian_date_of, local_sidereal_time_deg};

fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Position of an object relative to the observer's horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalPosition {
    /// Angle above the horizon in degrees (negative below)
    pub altitude_deg: f64,
    /// Angle from north through east in degrees
    pub azimuth_deg: f64,
}

impl HorizontalPosition {
    /// Whether the object is strictly above the horizon.
    pub fn is_above_horizon(&self) -> bool {
        self.altitude_deg > 0.0
    }
}

/// Local sidereal orientation of the sky for one (longitude, time) pair.
///
/// Computing the sidereal time once and reusing it for every catalog object
/// gives the same bits as calling [`equatorial_to_horizontal`] per object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiderealFrame {
    lst_deg: f64,
}

impl SiderealFrame {
    /// Sidereal frame for an observer at `longitude_deg` at wall-clock `timestamp`.
    pub fn new(longitude_deg: f64, timestamp: &NaiveDateTime) -> Self {
        let gmst_deg = greenwich_mean_sidereal_time_deg(julian_date_of(timestamp));
        Self::from_lst_deg(local_sidereal_time_deg(gmst_deg, longitude_deg))
    }

    /// Sidereal frame from an already known local sidereal time.
    pub fn from_lst_deg(lst_deg: f64) -> Self {
        Self { lst_deg }
    }

    /// Local sidereal time in degrees.
    pub fn lst_deg(&self) -> f64 {
        self.lst_deg
    }

    /// Hour angle of right ascension `ra_deg`, in radians.
    pub fn hour_angle_rad(&self, ra_deg: f64) -> f64 {
        deg_to_rad((self.lst_deg - ra_deg + 360.0) % 360.0)
    }

    /// Horizontal position of (`ra_deg`, `dec_deg`) seen from latitude `latitude_deg`.
    pub fn to_horizontal(&self, ra_deg: f64, dec_deg: f64, latitude_deg: f64) -> HorizontalPosition {
        let hour_angle = self.hour_angle_rad(ra_deg);
        let dec = deg_to_rad(dec_deg);
        let lat = deg_to_rad(latitude_deg);

        let sin_alt = dec.sin() * lat.sin() + dec.cos() * lat.cos() * hour_angle.cos();
        let alt = sin_alt.asin();

        let cos_az = (dec.sin() - alt.sin() * lat.sin()) / (alt.cos() * lat.cos());
        let mut az = cos_az.acos();
        // West of the meridian
        if hour_angle.sin() > 0.0 {
            az = 2.0 * PI - az;
        }

        HorizontalPosition {
            altitude_deg: rad_to_deg(alt),
            azimuth_deg: rad_to_deg(az),
        }
    }
}

/// Convert one equatorial position into horizontal coordinates.
///
/// # Arguments
/// * `ra_deg` - Right ascension in degrees
/// * `dec_deg` - Declination in degrees
/// * `latitude_deg` - Observer latitude in degrees, north positive
/// * `longitude_deg` - Observer longitude in degrees, east positive
/// * `timestamp` - Wall-clock time, read without timezone conversion
///
/// See the module docs for the degenerate zenith/pole case.
pub fn equatorial_to_horizontal(
    ra_deg: f64,
    dec_deg: f64,
    latitude_deg: f64,
    longitude_deg: f64,
    timestamp: &NaiveDateTime,
) -> HorizontalPosition {
    SiderealFrame::new(longitude_deg, timestamp).to_horizontal(ra_deg, dec_deg, latitude_deg)
}

/// Per-frame form of [`equatorial_to_horizontal`] with the sidereal time already resolved.
pub fn equatorial_to_horizontal_at(
    ra_deg: f64,
    dec_deg: f64,
    latitude_deg: f64,
    sidereal: &SiderealFrame,
) -> HorizontalPosition {
    sidereal.to_horizontal(ra_deg, dec_deg, latitude_deg)
}
