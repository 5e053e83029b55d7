//! Naked-eye bright star catalog
//!
//! Catalog files are JSON arrays of star records in one of two shapes:
//!
//! ```text
//! { "ra": 101.287, "dec": -16.716, "mag": -1.46, "SpectralCls": "A1V" }
//! { "RA": "06:45:08.9", "DEC": "-16:42:58", "MAG": "-1.46", "SpectralCls": "A1V" }
//! ```
//!
//! Decimal fields win whenever they are present. Legacy string fields are parsed
//! permissively (see [`crate::parse`]).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::StarCatalog;
use crate::parse::{dec_dms_to_deg, parse_leading_float, ra_hms_to_deg};
use crate::Result;

/// A magnitude field that may be stored as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    /// Numeric value, parsing text by its leading decimal number.
    pub fn value(&self) -> f64 {
        match self {
            NumberOrText::Number(value) => *value,
            NumberOrText::Text(text) => parse_leading_float(text),
        }
    }
}

/// One raw catalog record as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    /// Right ascension in decimal degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ra: Option<f64>,
    /// Declination in decimal degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dec: Option<f64>,
    /// Visual magnitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag: Option<f64>,
    /// Legacy right ascension, "HH:MM:SS"
    #[serde(rename = "RA", default, skip_serializing_if = "Option::is_none")]
    pub ra_hms: Option<String>,
    /// Legacy declination, "±DD:MM:SS"
    #[serde(rename = "DEC", default, skip_serializing_if = "Option::is_none")]
    pub dec_dms: Option<String>,
    /// Legacy magnitude, number or free text
    #[serde(rename = "MAG", default, skip_serializing_if = "Option::is_none")]
    pub mag_text: Option<NumberOrText>,
    /// Spectral classification, e.g. "K5III"
    #[serde(rename = "SpectralCls", default, skip_serializing_if = "Option::is_none")]
    pub spectral_class: Option<String>,
    /// Secondary designation column, used as a spectral fallback by older exports
    #[serde(rename = "Title HD", default, skip_serializing_if = "Option::is_none")]
    pub title_hd: Option<String>,
}

/// A normalized catalog star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStar {
    /// Right ascension in decimal degrees (J2000, no proper motion)
    pub ra_deg: f64,
    /// Declination in decimal degrees
    pub dec_deg: f64,
    /// Visual magnitude; NaN when the source value could not be parsed
    pub magnitude: f64,
    /// Spectral class text, only the first letter is significant
    pub spectral_class: String,
}

impl CatalogStar {
    pub fn new(ra_deg: f64, dec_deg: f64, magnitude: f64, spectral_class: impl Into<String>) -> Self {
        Self {
            ra_deg,
            dec_deg,
            magnitude,
            spectral_class: spectral_class.into(),
        }
    }

    /// Normalize a raw record.
    ///
    /// Decimal `ra`/`dec`/`mag` take precedence over `RA`/`DEC`/`MAG`. Absent
    /// legacy coordinates become 0, an absent magnitude becomes NaN. The spectral
    /// class falls back to `Title HD` and then to an empty string.
    pub fn from_record(record: &StarRecord) -> Self {
        let ra_deg = record
            .ra
            .unwrap_or_else(|| ra_hms_to_deg(record.ra_hms.as_deref().unwrap_or("")));
        let dec_deg = record
            .dec
            .unwrap_or_else(|| dec_dms_to_deg(record.dec_dms.as_deref().unwrap_or("")));
        let magnitude = record.mag.unwrap_or_else(|| {
            record
                .mag_text
                .as_ref()
                .map_or(f64::NAN, NumberOrText::value)
        });
        let spectral_class = [&record.spectral_class, &record.title_hd]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .cloned()
            .unwrap_or_default();

        Self {
            ra_deg,
            dec_deg,
            magnitude,
            spectral_class,
        }
    }

    /// True when the star is at least as bright as `limit`.
    ///
    /// A NaN magnitude never passes.
    pub fn is_within_magnitude(&self, limit: f64) -> bool {
        self.magnitude <= limit
    }
}

/// In-memory bright star catalog, loaded once and shared read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrightStarCatalog {
    stars: Vec<CatalogStar>,
}

impl BrightStarCatalog {
    pub fn new(stars: Vec<CatalogStar>) -> Self {
        Self { stars }
    }

    /// Build a catalog by normalizing raw records.
    pub fn from_records(records: &[StarRecord]) -> Self {
        let stars: Vec<CatalogStar> = records.iter().map(CatalogStar::from_record).collect();
        let unparsed = stars.iter().filter(|s| s.magnitude.is_nan()).count();
        if unparsed > 0 {
            log::warn!("{unparsed} catalog records have no usable magnitude and will not be drawn");
        }
        Self { stars }
    }

    /// Parse a JSON array of star records.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<StarRecord> = serde_json::from_reader(reader)?;
        Ok(Self::from_records(&records))
    }

    /// Load a JSON star catalog file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let catalog = Self::from_json_reader(BufReader::new(file))?;
        log::info!(
            "Loaded {} stars from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// Underlying star slice
    pub fn as_slice(&self) -> &[CatalogStar] {
        &self.stars
    }
}

impl StarCatalog for BrightStarCatalog {
    type Star = CatalogStar;

    fn get_star(&self, index: usize) -> Option<&CatalogStar> {
        self.stars.get(index)
    }

    fn stars(&self) -> impl Iterator<Item = &CatalogStar> {
        self.stars.iter()
    }

    fn len(&self) -> usize {
        self.stars.len()
    }

    fn filter<F>(&self, predicate: F) -> Vec<&CatalogStar>
    where
        F: Fn(&CatalogStar) -> bool,
    {
        self.stars.iter().filter(|star| predicate(star)).collect()
    }
}
