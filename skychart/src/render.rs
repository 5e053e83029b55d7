//! Scene rendering.
//!
//! [`render_scene`] is the one drawing routine. Live frames and exported
//! snapshots both go through it, so the same observer, options and surface size
//! always produce the same pixels.

use ephemeris::equatorial_to_horizontal_at;
use serde::{Deserialize, Serialize};
use starfield::{SkyData, StarCatalog};
use tiny_skia::{
    Color, FillRule, GradientStop, Mask, Paint, PathBuilder, Pixmap, Point, RadialGradient, Rect,
    SpreadMode, Stroke, Transform,
};

use crate::error::{Result, SkyChartError};
use crate::observer::ObserverState;
use crate::projector::{ProjectedStar, SkyProjector, StarColor, NAKED_EYE_LIMIT_MAG};

/// Edge length of the square render surface, live and exported
pub const RENDER_RESOLUTION: u32 = 2000;

/// Background colour at the zenith
pub const BACKGROUND_CENTER_RGB: (u8, u8, u8) = (0x0b, 0x1a, 0x3c);
/// Background colour at the surface edge
pub const BACKGROUND_EDGE_RGB: (u8, u8, u8) = (0x1a, 0x1a, 0x2e);

/// Constellation line width in pixels
pub const CONSTELLATION_LINE_WIDTH: f32 = 1.5;
/// Constellation line opacity
pub const CONSTELLATION_LINE_ALPHA: f32 = 0.5;

/// Glow radius as a multiple of the body radius
pub const GLOW_RADIUS_FACTOR: f64 = 3.5;
/// Glow gradient (position, opacity) stops
pub const GLOW_STOPS: [(f32, f32); 3] = [(0.0, 0.45), (0.4, 0.18), (1.0, 0.0)];

/// Style switches for one render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub show_constellations: bool,
    /// Multiplier on star body opacity
    pub brightness: f64,
    /// Multiplier on star body size
    pub star_size: f64,
    /// Paint the sky gradient; when off the surface stays transparent outside the stars and lines
    pub draw_background: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_constellations: true,
            brightness: 2.0,
            star_size: 1.5,
            draw_background: true,
        }
    }
}

fn rgb_color((r, g, b): (u8, u8, u8), alpha: f32) -> Color {
    let mut color = Color::from_rgba8(r, g, b, 255);
    color.set_alpha(alpha);
    color
}

fn star_tint(color: StarColor, alpha: f32) -> Color {
    rgb_color(color.rgb(), alpha)
}

fn is_finite_point(x: f64, y: f64) -> bool {
    x.is_finite() && y.is_finite()
}

fn draw_background(pixmap: &mut Pixmap, projector: &SkyProjector) {
    let (cx, cy) = projector.center();
    let center = Point::from_xy(cx as f32, cy as f32);
    let stops = vec![
        GradientStop::new(0.0, rgb_color(BACKGROUND_CENTER_RGB, 1.0)),
        GradientStop::new(1.0, rgb_color(BACKGROUND_EDGE_RGB, 1.0)),
    ];
    let Some(shader) = RadialGradient::new(
        center,
        center,
        projector.radius() as f32,
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    ) else {
        return;
    };
    let Some(rect) = Rect::from_xywh(0.0, 0.0, pixmap.width() as f32, pixmap.height() as f32) else {
        return;
    };

    let paint = Paint {
        shader,
        ..Paint::default()
    };
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Circular clip covering the whole drawable disc.
fn viewport_mask(width: u32, height: u32, projector: &SkyProjector) -> Result<Mask> {
    let mut mask = Mask::new(width, height).ok_or(SkyChartError::SurfaceAllocation { width, height })?;
    let (cx, cy) = projector.center();
    if let Some(circle) = PathBuilder::from_circle(cx as f32, cy as f32, projector.radius() as f32) {
        mask.fill_path(&circle, FillRule::Winding, true, Transform::identity());
    }
    Ok(mask)
}

fn draw_constellations(
    pixmap: &mut Pixmap,
    mask: &Mask,
    sky: &SkyData,
    observer: &ObserverState,
    projector: &SkyProjector,
) {
    let sidereal = observer.sidereal_frame();
    let mut paint = Paint::default();
    paint.set_color(rgb_color((255, 255, 255), CONSTELLATION_LINE_ALPHA));
    let stroke = Stroke {
        width: CONSTELLATION_LINE_WIDTH,
        ..Stroke::default()
    };

    for figure in sky.constellations.figures() {
        for polyline in &figure.polylines {
            let mut builder = PathBuilder::new();
            let mut started = false;
            // Vertices below the horizon are skipped, the line joins the next visible one
            for vertex in polyline {
                let position = equatorial_to_horizontal_at(
                    vertex.ra_deg,
                    vertex.dec_deg,
                    observer.latitude_deg(),
                    &sidereal,
                );
                let Some((x, y)) = projector.project_visible(&position) else {
                    continue;
                };
                if !is_finite_point(x, y) {
                    continue;
                }
                if started {
                    builder.line_to(x as f32, y as f32);
                } else {
                    builder.move_to(x as f32, y as f32);
                    started = true;
                }
            }
            if let Some(path) = builder.finish() {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), Some(mask));
            }
        }
    }
}

fn draw_star(pixmap: &mut Pixmap, mask: &Mask, star: &ProjectedStar) {
    let (x, y) = (star.x as f32, star.y as f32);

    let glow_radius = (star.radius * GLOW_RADIUS_FACTOR) as f32;
    let stops = GLOW_STOPS
        .iter()
        .map(|&(position, alpha)| GradientStop::new(position, star_tint(star.color, alpha)))
        .collect();
    let center = Point::from_xy(x, y);
    if let (Some(shader), Some(glow)) = (
        RadialGradient::new(center, center, glow_radius, stops, SpreadMode::Pad, Transform::identity()),
        PathBuilder::from_circle(x, y, glow_radius),
    ) {
        let paint = Paint {
            shader,
            ..Paint::default()
        };
        pixmap.fill_path(&glow, &paint, FillRule::Winding, Transform::identity(), Some(mask));
    }

    if let Some(body) = PathBuilder::from_circle(x, y, star.radius as f32) {
        let mut paint = Paint::default();
        paint.set_color(star_tint(star.color, star.alpha as f32));
        pixmap.fill_path(&body, &paint, FillRule::Winding, Transform::identity(), Some(mask));
    }
}

fn draw_stars(
    pixmap: &mut Pixmap,
    mask: &Mask,
    sky: &SkyData,
    observer: &ObserverState,
    projector: &SkyProjector,
    options: &RenderOptions,
) -> usize {
    let sidereal = observer.sidereal_frame();
    let mut drawn = 0;
    for star in sky.catalog.stars() {
        if !star.is_within_magnitude(NAKED_EYE_LIMIT_MAG) {
            continue;
        }
        let position =
            equatorial_to_horizontal_at(star.ra_deg, star.dec_deg, observer.latitude_deg(), &sidereal);
        let Some(projected) =
            projector.project_star(star, &position, options.brightness, options.star_size)
        else {
            continue;
        };
        if !is_finite_point(projected.x, projected.y) {
            continue;
        }
        draw_star(pixmap, mask, &projected);
        drawn += 1;
    }
    drawn
}

/// Draw the full chart for `observer` into `pixmap`.
///
/// Layers, bottom to top: background gradient (unless disabled), constellation
/// lines (if enabled), then every star above the horizon and within the
/// naked-eye limit as a glow plus a body disc. Lines and stars are clipped to
/// the circular viewport. The previous contents of `pixmap` are discarded.
///
/// Returns the number of stars drawn.
pub fn render_scene(
    pixmap: &mut Pixmap,
    sky: &SkyData,
    observer: &ObserverState,
    options: &RenderOptions,
) -> Result<usize> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let projector = SkyProjector::for_surface(width, height);

    pixmap.fill(Color::TRANSPARENT);
    if options.draw_background {
        draw_background(pixmap, &projector);
    }

    let mask = viewport_mask(width, height, &projector)?;
    if options.show_constellations {
        draw_constellations(pixmap, &mask, sky, observer, &projector);
    }
    let drawn = draw_stars(pixmap, &mask, sky, observer, &projector, options);

    log::debug!(
        "Rendered {drawn} stars for ({:.4}, {:.4}) at {}",
        observer.latitude_deg(),
        observer.longitude_deg(),
        observer.timestamp()
    );
    Ok(drawn)
}

/// Allocate a square render surface.
pub fn new_surface(resolution: u32) -> Result<Pixmap> {
    Pixmap::new(resolution, resolution).ok_or(SkyChartError::SurfaceAllocation {
        width: resolution,
        height: resolution,
    })
}
