use thiserror::Error;

/// Errors raised by the sky chart renderer and its collaborators.
#[derive(Debug, Error)]
pub enum SkyChartError {
    /// Observer coordinates outside latitude [-90, 90] or longitude [-180, 180]
    #[error("Invalid observer: {0}")]
    InvalidObserver(String),

    /// A drawing surface of the requested size could not be allocated
    #[error("Cannot allocate a {width}x{height} drawing surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] starfield::CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Standard Result type for sky chart operations.
pub type Result<T> = std::result::Result<T, SkyChartError>;
