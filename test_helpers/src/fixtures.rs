//! Fixture datasets in the real catalog file formats.
//!
//! The star list mixes decimal records with legacy sexagesimal ones and carries
//! a few deliberately awkward entries: one fainter than the naked-eye limit, one
//! with an unparsable magnitude and one whose spectral class only lives in the
//! `Title HD` column.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Bright star catalog fixture (JSON array of star records).
pub const BRIGHT_STARS_JSON: &str = r#"[
  { "ra": 101.287, "dec": -16.716, "mag": -1.46, "SpectralCls": "A1V" },
  { "ra": 95.988, "dec": -52.696, "mag": -0.74, "SpectralCls": "A9II" },
  { "ra": 213.915, "dec": 19.182, "mag": -0.05, "SpectralCls": "K1.5III" },
  { "ra": 279.235, "dec": 38.784, "mag": 0.03, "SpectralCls": "A0V" },
  { "RA": "05:16:41.4", "DEC": "+45:59:53", "MAG": "0.08", "SpectralCls": "G5III" },
  { "RA": "05:14:32.3", "DEC": "-08:12:06", "MAG": "0.13", "SpectralCls": "B8Ia" },
  { "ra": 88.793, "dec": 7.407, "mag": 0.50, "SpectralCls": "M1Ia" },
  { "ra": 37.955, "dec": 89.264, "mag": 1.98, "SpectralCls": "F7Ib" },
  { "ra": 85.190, "dec": -1.943, "mag": 1.77, "SpectralCls": "O9.5Ib" },
  { "ra": 84.053, "dec": -1.202, "mag": 1.69, "SpectralCls": "B0Ia" },
  { "ra": 83.002, "dec": -0.299, "mag": 2.23, "SpectralCls": "O9.5II" },
  { "ra": 81.283, "dec": 6.350, "mag": 1.64, "SpectralCls": "B2III" },
  { "ra": 30.0, "dec": 60.0, "mag": 4.8, "SpectralCls": "", "Title HD": "K3" },
  { "ra": 70.0, "dec": 10.0, "mag": 6.2, "SpectralCls": "G8V" },
  { "RA": "04:00:00", "DEC": "+20:00:00", "MAG": "n/a", "SpectralCls": "" }
]"#;

/// Number of records in [`BRIGHT_STARS_JSON`]
pub const BRIGHT_STARS_COUNT: usize = 15;

/// Records in [`BRIGHT_STARS_JSON`] that pass the naked-eye magnitude limit
pub const NAKED_EYE_STARS_COUNT: usize = 13;

/// Constellation line fixture (GeoJSON-like feature collection).
pub const CONSTELLATION_LINES_JSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "id": "Ori",
      "properties": { "rank": "1" },
      "geometry": {
        "type": "MultiLineString",
        "coordinates": [
          [[85.190, -1.943], [84.053, -1.202], [83.002, -0.299]],
          [[88.793, 7.407], [81.283, 6.350]]
        ]
      }
    },
    {
      "type": "Feature",
      "id": "UMi",
      "geometry": {
        "type": "MultiLineString",
        "coordinates": [
          [[37.955, 89.264], [-96.65, 86.586], [-108.6, 82.037]]
        ]
      }
    },
    {
      "type": "Feature",
      "geometry": {
        "type": "MultiLineString",
        "coordinates": [
          [[213.915, 19.182], [279.235, 38.784]]
        ]
      }
    }
  ]
}"#;

/// Number of features in [`CONSTELLATION_LINES_JSON`]
pub const CONSTELLATION_COUNT: usize = 3;

/// Write `contents` to `dir/name` and return the full path.
pub fn write_fixture<P: AsRef<Path>>(dir: P, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.as_ref().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Write both fixture datasets into `dir`, returning (stars path, lines path).
pub fn write_sky_fixtures<P: AsRef<Path>>(dir: P) -> io::Result<(PathBuf, PathBuf)> {
    let stars = write_fixture(dir.as_ref(), "bright_stars.json", BRIGHT_STARS_JSON)?;
    let lines = write_fixture(dir.as_ref(), "constellation_lines.json", CONSTELLATION_LINES_JSON)?;
    Ok((stars, lines))
}
