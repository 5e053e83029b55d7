//! Star catalogs module
//!
//! This module provides the catalog star model and the naked-eye bright star
//! catalog used by the sky chart.

mod bright_stars;

pub use bright_stars::{BrightStarCatalog, CatalogStar, NumberOrText, StarRecord};

/// Generic trait for all star catalogs
pub trait StarCatalog {
    /// Star entry type for this catalog
    type Star;

    /// Get a star by its position in the catalog
    fn get_star(&self, index: usize) -> Option<&Self::Star>;

    /// Get all stars in the catalog
    fn stars(&self) -> impl Iterator<Item = &Self::Star>;

    /// Get the number of stars in the catalog
    fn len(&self) -> usize;

    /// Check if the catalog is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filter stars based on a predicate
    fn filter<F>(&self, predicate: F) -> Vec<&Self::Star>
    where
        F: Fn(&Self::Star) -> bool;
}
