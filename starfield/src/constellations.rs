//! Constellation line figures.
//!
//! The dataset is a GeoJSON-style feature collection. Each feature carries a
//! `MultiLineString` whose coordinates are `[ra_deg, dec_deg]` pairs; right
//! ascension may be negative (the d3-celestial convention) and is used as-is.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// One polyline vertex in equatorial coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct EquatorialVertex {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl From<[f64; 2]> for EquatorialVertex {
    fn from([ra_deg, dec_deg]: [f64; 2]) -> Self {
        Self { ra_deg, dec_deg }
    }
}

impl From<EquatorialVertex> for [f64; 2] {
    fn from(vertex: EquatorialVertex) -> Self {
        [vertex.ra_deg, vertex.dec_deg]
    }
}

/// A constellation stick figure: an ordered list of polylines.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationFigure {
    /// Dataset identifier, usually the IAU abbreviation
    pub id: Option<String>,
    pub polylines: Vec<Vec<EquatorialVertex>>,
}

impl ConstellationFigure {
    /// Total number of vertices across all polylines
    pub fn vertex_count(&self) -> usize {
        self.polylines.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<Vec<EquatorialVertex>>,
}

/// All constellation figures of a dataset, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstellationSet {
    figures: Vec<ConstellationFigure>,
}

impl ConstellationSet {
    pub fn new(figures: Vec<ConstellationFigure>) -> Self {
        Self { figures }
    }

    /// Parse a feature collection.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_reader(reader)?;
        let figures = collection
            .features
            .into_iter()
            .map(|feature| ConstellationFigure {
                id: feature.id,
                polylines: feature.geometry.coordinates,
            })
            .collect();
        Ok(Self { figures })
    }

    /// Load a constellation lines file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let set = Self::from_json_reader(BufReader::new(file))?;
        log::info!(
            "Loaded {} constellation figures from {}",
            set.len(),
            path.as_ref().display()
        );
        Ok(set)
    }

    pub fn figures(&self) -> &[ConstellationFigure] {
        &self.figures
    }

    /// Find a figure by identifier.
    pub fn get(&self, id: &str) -> Option<&ConstellationFigure> {
        self.figures.iter().find(|f| f.id.as_deref() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}
