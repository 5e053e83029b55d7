//! Observer location and moment.

use chrono::{NaiveDateTime, Timelike};
use ephemeris::{equatorial_to_horizontal, HorizontalPosition, SiderealFrame};

use crate::error::{Result, SkyChartError};

/// Where and when the sky is seen from.
///
/// The timestamp is wall-clock time without a zone; its components are used as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverState {
    latitude_deg: f64,
    longitude_deg: f64,
    timestamp: NaiveDateTime,
}

impl ObserverState {
    /// Build a validated observer state.
    ///
    /// Latitude must lie in [-90, 90] and longitude in [-180, 180]; NaN is rejected.
    pub fn new(latitude_deg: f64, longitude_deg: f64, timestamp: NaiveDateTime) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(SkyChartError::InvalidObserver(format!(
                "latitude {latitude_deg} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(SkyChartError::InvalidObserver(format!(
                "longitude {longitude_deg} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            timestamp,
        })
    }

    /// Interpolated state between two validated endpoints. Convex combinations of
    /// in-range coordinates stay in range, so no validation happens here.
    pub(crate) fn interpolated(latitude_deg: f64, longitude_deg: f64, timestamp: NaiveDateTime) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            timestamp,
        }
    }

    pub fn latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Same state with a different timestamp
    pub fn at(&self, timestamp: NaiveDateTime) -> Self {
        Self { timestamp, ..*self }
    }

    /// True when both states would draw the same settled chart: equal coordinates
    /// and equal timestamps once sub-second parts are dropped.
    pub fn same_target(&self, other: &ObserverState) -> bool {
        self.latitude_deg == other.latitude_deg
            && self.longitude_deg == other.longitude_deg
            && truncate_to_second(self.timestamp) == truncate_to_second(other.timestamp)
    }

    /// Sidereal frame of this observer, computed once per rendered frame.
    pub fn sidereal_frame(&self) -> SiderealFrame {
        SiderealFrame::new(self.longitude_deg, &self.timestamp)
    }

    /// Horizontal position of one equatorial coordinate for this observer.
    pub fn horizontal(&self, ra_deg: f64, dec_deg: f64) -> HorizontalPosition {
        equatorial_to_horizontal(ra_deg, dec_deg, self.latitude_deg, self.longitude_deg, &self.timestamp)
    }
}

fn truncate_to_second(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}
