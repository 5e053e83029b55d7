//! Star catalog and constellation figure data for sky charts
//!
//! This crate owns the static sky data: the naked-eye bright star catalog and
//! the constellation stick figures. Both are loaded once from JSON and then
//! shared read-only by every renderer through [`SkyData`].

pub mod catalogs;
pub mod constellations;
pub mod parse;

use std::io::Read;
use std::path::Path;

use thiserror::Error;

pub use catalogs::{BrightStarCatalog, CatalogStar, StarCatalog, StarRecord};
pub use constellations::{ConstellationFigure, ConstellationSet, EquatorialVertex};

/// Errors that can occur while loading sky data
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for sky data operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Parse a JSON star catalog from any reader.
pub fn load_stars_json<R: Read>(reader: R) -> Result<BrightStarCatalog> {
    BrightStarCatalog::from_json_reader(reader)
}

/// Parse a JSON constellation lines dataset from any reader.
pub fn load_constellations_json<R: Read>(reader: R) -> Result<ConstellationSet> {
    ConstellationSet::from_json_reader(reader)
}

/// Stars plus constellation figures, the full static input of a chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkyData {
    pub catalog: BrightStarCatalog,
    pub constellations: ConstellationSet,
}

impl SkyData {
    pub fn new(catalog: BrightStarCatalog, constellations: ConstellationSet) -> Self {
        Self {
            catalog,
            constellations,
        }
    }

    /// Load the star catalog and the constellation lines from disk.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(stars_path: P, lines_path: Q) -> Result<Self> {
        Ok(Self::new(
            BrightStarCatalog::load(stars_path)?,
            ConstellationSet::load(lines_path)?,
        ))
    }
}
