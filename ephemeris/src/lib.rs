//! Sidereal time and horizontal coordinate calculations
//!
//! Two layers, leaves first:
//! - [`time_system`]: civil timestamp -> Julian Date -> Greenwich Mean Sidereal Time
//! - [`horizontal`]: equatorial (RA/Dec) -> local horizontal (altitude/azimuth)
//!
//! Timestamps are [`chrono::NaiveDateTime`] values. Their wall-clock components are
//! used as-is (read as if they were UTC); no timezone conversion ever happens.

pub mod horizontal;
pub mod time_system;

pub use horizontal::{
    equatorial_to_horizontal, equatorial_to_horizontal_at, HorizontalPosition, SiderealFrame,
};
pub use time_system::{
    greenwich_mean_sidereal_time_deg, julian_date, julian_date_of, local_sidereal_time_deg,
    unix_millis,
};
