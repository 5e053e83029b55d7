//! Chart configuration files.
//!
//! A [`ChartConfig`] is a JSON document. Every field is optional on disk; missing
//! ones take their defaults, so a file may hold only the settings it changes:
//!
//! ```json
//! { "observer": { "latitude_deg": 64.15, "longitude_deg": -21.94 },
//!   "render": { "show_constellations": false } }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SkyChartError};
use crate::frame_loop::DEFAULT_FRAME_INTERVAL;
use crate::observer::ObserverState;
use crate::render::{RenderOptions, RENDER_RESOLUTION};
use crate::transition::TRANSITION_DURATION;

/// Default observer location (Shanghai)
pub const DEFAULT_LATITUDE_DEG: f64 = 31.23;
pub const DEFAULT_LONGITUDE_DEG: f64 = 121.47;

/// Observer location; the moment is always supplied at run time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude_deg: DEFAULT_LATITUDE_DEG,
            longitude_deg: DEFAULT_LONGITUDE_DEG,
        }
    }
}

/// Sky data file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub stars_path: PathBuf,
    pub constellation_lines_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            stars_path: PathBuf::from("data/stars.json"),
            constellation_lines_path: PathBuf::from("data/constellations.lines.json"),
        }
    }
}

/// Everything a chart run can be configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub observer: LocationConfig,
    pub render: RenderOptions,
    pub data: DataConfig,
    /// Edge length of the render and export surface
    pub resolution: u32,
    pub transition_ms: u64,
    /// Simulated frame spacing for offline animation
    pub frame_interval_us: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            observer: LocationConfig::default(),
            render: RenderOptions::default(),
            data: DataConfig::default(),
            resolution: RENDER_RESOLUTION,
            transition_ms: TRANSITION_DURATION.as_millis() as u64,
            frame_interval_us: DEFAULT_FRAME_INTERVAL.as_micros() as u64,
        }
    }
}

impl ChartConfig {
    /// Load a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: ChartConfig = serde_json::from_str(&text)
            .map_err(|e| SkyChartError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        log::info!("Loaded chart configuration from {}", path.display());
        Ok(config)
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SkyChartError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject settings no chart can be drawn with.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(SkyChartError::Config("resolution must be positive".to_string()));
        }
        if self.frame_interval_us == 0 {
            return Err(SkyChartError::Config(
                "frame_interval_us must be positive".to_string(),
            ));
        }
        if !self.render.brightness.is_finite() || !self.render.star_size.is_finite() {
            return Err(SkyChartError::Config(
                "brightness and star_size must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Observer at the configured location and the given moment.
    pub fn observer_at(&self, timestamp: NaiveDateTime) -> Result<ObserverState> {
        ObserverState::new(self.observer.latitude_deg, self.observer.longitude_deg, timestamp)
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(self.frame_interval_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ChartConfig::default();
        assert_eq!(config.observer.latitude_deg, 31.23);
        assert_eq!(config.observer.longitude_deg, 121.47);
        assert_eq!(config.render.brightness, 2.0);
        assert_eq!(config.render.star_size, 1.5);
        assert!(config.render.show_constellations);
        assert_eq!(config.resolution, 2000);
        assert_eq!(config.transition_duration(), Duration::from_millis(2000));
    }

    #[test]
    fn test_save_load_preserves_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.json");

        let mut config = ChartConfig::default();
        config.observer.latitude_deg = -33.87;
        config.render.show_constellations = false;
        config.resolution = 1024;
        config.save(&path).unwrap();

        let loaded = ChartConfig::load(&path).unwrap();
        assert_relative_eq!(loaded.observer.latitude_deg, -33.87, epsilon = 1e-12);
        assert_relative_eq!(loaded.observer.longitude_deg, 121.47, epsilon = 1e-12);
        assert!(!loaded.render.show_constellations);
        assert_eq!(loaded.resolution, 1024);
        assert_eq!(loaded.data, config.data);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"render": {"brightness": 0.8}}"#).unwrap();

        let config = ChartConfig::load(&path).unwrap();
        assert_relative_eq!(config.render.brightness, 0.8, epsilon = 1e-12);
        assert_eq!(config.render.star_size, 1.5);
        assert_relative_eq!(config.observer.latitude_deg, DEFAULT_LATITUDE_DEG);
    }

    #[test]
    fn test_invalid_files_are_config_errors() {
        let dir = TempDir::new().unwrap();
        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "not json").unwrap();
        assert!(matches!(ChartConfig::load(&garbage), Err(SkyChartError::Config(_))));

        let zero = dir.path().join("zero.json");
        std::fs::write(&zero, r#"{"resolution": 0}"#).unwrap();
        assert!(matches!(ChartConfig::load(&zero), Err(SkyChartError::Config(_))));
    }

    #[test]
    fn test_observer_at_validates_location() {
        let timestamp = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut config = ChartConfig::default();
        assert!(config.observer_at(timestamp).is_ok());
        config.observer.longitude_deg = 190.0;
        assert!(config.observer_at(timestamp).is_err());
    }
}
