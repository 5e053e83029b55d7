//! Animated azimuthal sky charts.
//!
//! Given an observer's latitude, longitude and wall-clock time, the chart shows
//! the naked-eye stars and constellation figures above the local horizon on a
//! polar projection of the sky dome. Moving the observer animates the sky from
//! the old state to the new one.
//!
//! Pipeline, leaves first:
//! - [`ephemeris`] turns catalog RA/Dec into altitude/azimuth
//! - [`projector`] maps altitude/azimuth to surface pixels and styles each star
//! - [`render`] draws one complete frame into a [`tiny_skia::Pixmap`]
//! - [`transition`] interpolates observer states over a fixed duration
//! - [`frame_loop`] and [`live`] pace frames and own the live surface
//! - [`export`] renders one frame offscreen and writes a PNG

pub mod config;
pub mod error;
pub mod export;
pub mod frame_loop;
pub mod live;
pub mod observer;
pub mod place;
pub mod projector;
pub mod render;
pub mod transition;

pub use config::ChartConfig;
pub use error::{Result, SkyChartError};
pub use export::SnapshotExporter;
pub use frame_loop::{Clock, FrameLoop, FrameSource, ManualClock, RealtimeFrames, SimulatedFrames};
pub use live::{display_size, LiveView};
pub use observer::ObserverState;
pub use place::{apply_place_lookup, NominatimLookup, PlaceLookup, PlaceMatch};
pub use projector::{ProjectedStar, SkyProjector, StarColor};
pub use render::{render_scene, RenderOptions, RENDER_RESOLUTION};
pub use transition::{Frame, RequestOutcome, TransitionScheduler, TRANSITION_DURATION};
