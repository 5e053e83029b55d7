//! Static PNG snapshots of a chart.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use image::{ImageFormat, RgbaImage};
use starfield::SkyData;
use tiny_skia::Pixmap;

use crate::error::{Result, SkyChartError};
use crate::observer::ObserverState;
use crate::render::{new_surface, render_scene, RenderOptions, RENDER_RESOLUTION};

/// File name of a snapshot exported on `export_date`, e.g. `starmap_2024-06-01.png`
pub fn export_file_name(export_date: NaiveDate) -> String {
    format!("starmap_{}.png", export_date.format("%Y-%m-%d"))
}

/// Straight-alpha RGBA copy of a premultiplied render surface.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> Result<RgbaImage> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let mut raw = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        raw.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    RgbaImage::from_raw(width, height, raw).ok_or(SkyChartError::SurfaceAllocation { width, height })
}

/// Lossless PNG encoding of a render surface.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>> {
    let image = pixmap_to_rgba_image(pixmap)?;
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Renders single frames into an offscreen buffer, independent of any live view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotExporter {
    resolution: u32,
}

impl Default for SnapshotExporter {
    fn default() -> Self {
        Self::new(RENDER_RESOLUTION)
    }
}

impl SnapshotExporter {
    pub fn new(resolution: u32) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Render `observer` with `options`, forcing the background on or off.
    pub fn render(
        &self,
        sky: &SkyData,
        observer: &ObserverState,
        options: &RenderOptions,
        with_background: bool,
    ) -> Result<Pixmap> {
        let mut pixmap = new_surface(self.resolution)?;
        let options = RenderOptions {
            draw_background: with_background,
            ..*options
        };
        render_scene(&mut pixmap, sky, observer, &options)?;
        Ok(pixmap)
    }

    /// Render and encode as PNG.
    pub fn png_bytes(
        &self,
        sky: &SkyData,
        observer: &ObserverState,
        options: &RenderOptions,
        with_background: bool,
    ) -> Result<Vec<u8>> {
        encode_png(&self.render(sky, observer, options, with_background)?)
    }

    /// Render, encode and write `starmap_<export_date>.png` into `dir`.
    ///
    /// Returns the written path.
    pub fn save(
        &self,
        sky: &SkyData,
        observer: &ObserverState,
        options: &RenderOptions,
        with_background: bool,
        dir: &Path,
        export_date: NaiveDate,
    ) -> Result<PathBuf> {
        let bytes = self.png_bytes(sky, observer, options, with_background)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(export_file_name(export_date));
        fs::write(&path, bytes)?;
        log::info!(
            "Exported {}x{} chart to {}",
            self.resolution,
            self.resolution,
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn observer() -> ObserverState {
        let timestamp = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(21, 30, 0)
            .unwrap();
        ObserverState::new(31.23, 121.47, timestamp).unwrap()
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(export_file_name(date), "starmap_2024-06-01.png");
    }

    #[test]
    fn test_default_resolution() {
        assert_eq!(SnapshotExporter::default().resolution(), 2000);
    }

    #[test]
    fn test_png_round_trip_dimensions() {
        let exporter = SnapshotExporter::new(48);
        let bytes = exporter
            .png_bytes(&SkyData::default(), &observer(), &RenderOptions::default(), true)
            .unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (48, 48));
    }

    #[test]
    fn test_transparent_export_has_clear_corners() {
        let exporter = SnapshotExporter::new(48);
        let pixmap = exporter
            .render(&SkyData::default(), &observer(), &RenderOptions::default(), false)
            .unwrap();
        let image = pixmap_to_rgba_image(&pixmap).unwrap();
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_save_writes_named_file() {
        let dir = TempDir::new().unwrap();
        let exporter = SnapshotExporter::new(32);
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let path = exporter
            .save(
                &SkyData::default(),
                &observer(),
                &RenderOptions::default(),
                true,
                &dir.path().join("exports"),
                date,
            )
            .unwrap();
        assert!(path.ends_with("exports/starmap_2025-01-02.png"));
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}
