//! Azimuthal sky projection and star styling.
//!
//! The chart is a polar plot of the sky dome: the zenith sits at the centre and
//! the horizon on a circle `HORIZON_MARGIN_PX` inside the surface edge. North is
//! up and east is to the left, the way the sky looks when lying on your back
//! with your head to the north.

use std::f64::consts::PI;

use ephemeris::HorizontalPosition;
use starfield::CatalogStar;

/// Faintest magnitude that is ever drawn
pub const NAKED_EYE_LIMIT_MAG: f64 = 5.5;

/// Gap between the horizon circle and the surface edge
pub const HORIZON_MARGIN_PX: f64 = 10.0;

/// Smallest body size before the size multiplier is applied
pub const MIN_STAR_SIZE_PX: f64 = 1.2;

/// Maps horizontal coordinates onto a square drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyProjector {
    center_x: f64,
    center_y: f64,
    radius: f64,
}

impl SkyProjector {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    /// Projector centred on a `width` x `height` surface with radius `width / 2`.
    pub fn for_surface(width: u32, height: u32) -> Self {
        Self::new(width as f64 / 2.0, height as f64 / 2.0, width as f64 / 2.0)
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_x, self.center_y)
    }

    /// Viewport radius, the horizon sits `HORIZON_MARGIN_PX` inside it
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Surface position of (`altitude_deg`, `azimuth_deg`).
    ///
    /// Defined for any altitude; callers decide visibility.
    pub fn project(&self, altitude_deg: f64, azimuth_deg: f64) -> (f64, f64) {
        let r = (90.0 - altitude_deg) * (self.radius - HORIZON_MARGIN_PX) / 90.0;
        let theta = (270.0 - azimuth_deg) * PI / 180.0;
        (
            self.center_x + r * theta.cos(),
            self.center_y + r * theta.sin(),
        )
    }

    /// Surface position of an object above the horizon, `None` otherwise.
    pub fn project_visible(&self, position: &HorizontalPosition) -> Option<(f64, f64)> {
        position
            .is_above_horizon()
            .then(|| self.project(position.altitude_deg, position.azimuth_deg))
    }

    /// Screen geometry and style for a catalog star, or `None` when it is below
    /// the horizon or fainter than [`NAKED_EYE_LIMIT_MAG`].
    pub fn project_star(
        &self,
        star: &CatalogStar,
        position: &HorizontalPosition,
        brightness: f64,
        size_scale: f64,
    ) -> Option<ProjectedStar> {
        if !star.is_within_magnitude(NAKED_EYE_LIMIT_MAG) {
            return None;
        }
        let (x, y) = self.project_visible(position)?;
        Some(ProjectedStar {
            x,
            y,
            radius: star_visual_size(star.magnitude, size_scale),
            color: color_for_spectral_class(&star.spectral_class),
            alpha: star_alpha(star.magnitude, brightness),
        })
    }
}

/// A star ready to be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedStar {
    pub x: f64,
    pub y: f64,
    /// Body radius in pixels; the glow extends to 3.5x this
    pub radius: f64,
    pub color: StarColor,
    /// Body opacity in [0, 1]
    pub alpha: f64,
}

/// Body size in pixels: `max(1.2, 6 e^(-0.35 mag)) * size_scale`.
pub fn star_visual_size(magnitude: f64, size_scale: f64) -> f64 {
    MIN_STAR_SIZE_PX.max(6.0 * (-0.35 * magnitude).exp()) * size_scale
}

/// Unclamped body opacity: `max(1, 1.7 - 0.13 mag) * brightness * 1.1`.
///
/// The inner floor of 1 means every naked-eye star comes out at or above
/// `1.1 * brightness`.
pub fn raw_star_alpha(magnitude: f64, brightness: f64) -> f64 {
    1.0_f64.max(1.7 - 0.13 * magnitude) * brightness * 1.1
}

/// Body opacity clamped to [0, 1] after the brightness multiplier.
pub fn star_alpha(magnitude: f64, brightness: f64) -> f64 {
    let alpha = raw_star_alpha(magnitude, brightness);
    if alpha.is_nan() {
        return 0.0;
    }
    alpha.clamp(0.0, 1.0)
}

/// Body tint by spectral class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StarColor {
    /// O stars
    PaleBlue,
    /// B stars
    BlueWhite,
    /// A stars
    NearWhiteBlue,
    /// F stars and anything unclassified
    White,
    /// G stars
    WarmWhite,
    /// K stars
    PaleOrange,
    /// M stars
    Orange,
}

impl StarColor {
    /// sRGB components
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            StarColor::PaleBlue => (0xbf, 0xcf, 0xff),
            StarColor::BlueWhite => (0xc8, 0xd8, 0xff),
            StarColor::NearWhiteBlue => (0xe0, 0xe7, 0xff),
            StarColor::White => (0xff, 0xff, 0xff),
            StarColor::WarmWhite => (0xff, 0xf7, 0xe0),
            StarColor::PaleOrange => (0xff, 0xe2, 0xb0),
            StarColor::Orange => (0xff, 0xe0, 0xa8),
        }
    }
}

/// Tint for a spectral class string. Only the first character counts, case-insensitively.
pub fn color_for_spectral_class(spectral_class: &str) -> StarColor {
    match spectral_class.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('O') => StarColor::PaleBlue,
        Some('B') => StarColor::BlueWhite,
        Some('A') => StarColor::NearWhiteBlue,
        Some('F') => StarColor::White,
        Some('G') => StarColor::WarmWhite,
        Some('K') => StarColor::PaleOrange,
        Some('M') => StarColor::Orange,
        _ => StarColor::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_zenith_projects_to_center() {
        let projector = SkyProjector::for_surface(2000, 2000);
        for az in [0.0, 45.0, 90.0, 181.5, 359.9] {
            let (x, y) = projector.project(90.0, az);
            assert_relative_eq!(x, 1000.0, epsilon = 1e-9);
            assert_relative_eq!(y, 1000.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_horizon_sits_inside_margin() {
        let projector = SkyProjector::for_surface(2000, 2000);
        for az in [0.0, 90.0, 180.0, 270.0, 33.3] {
            let (x, y) = projector.project(1e-9, az);
            let r = ((x - 1000.0).powi(2) + (y - 1000.0).powi(2)).sqrt();
            assert_relative_eq!(r, 990.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_cardinal_directions() {
        let projector = SkyProjector::for_surface(200, 200);
        // North up
        let (x, y) = projector.project(0.0, 0.0);
        assert_relative_eq!(x, 100.0, epsilon = 1e-9);
        assert_relative_eq!(y, 10.0, epsilon = 1e-9);
        // East left
        let (x, y) = projector.project(0.0, 90.0);
        assert_relative_eq!(x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(y, 100.0, epsilon = 1e-9);
        // South down
        let (_, y) = projector.project(0.0, 180.0);
        assert_relative_eq!(y, 190.0, epsilon = 1e-9);
    }

    #[test]
    fn test_project_visible_uses_strict_horizon() {
        let projector = SkyProjector::for_surface(100, 100);
        let on_horizon = HorizontalPosition { altitude_deg: 0.0, azimuth_deg: 10.0 };
        let above = HorizontalPosition { altitude_deg: 0.1, azimuth_deg: 10.0 };
        assert!(projector.project_visible(&on_horizon).is_none());
        assert!(projector.project_visible(&above).is_some());
    }

    #[test]
    fn test_star_size_decreases_with_magnitude_and_floors() {
        let mut previous = f64::INFINITY;
        let mut mag = -1.5;
        while mag < 4.5 {
            let size = star_visual_size(mag, 1.0);
            assert!(size < previous);
            assert!(size >= MIN_STAR_SIZE_PX);
            previous = size;
            mag += 0.25;
        }
        assert_eq!(star_visual_size(5.5, 1.0), MIN_STAR_SIZE_PX);
        assert_eq!(star_visual_size(5.5, 1.5), MIN_STAR_SIZE_PX * 1.5);
    }

    #[test]
    fn test_star_alpha_clamps_after_brightness() {
        assert_relative_eq!(raw_star_alpha(0.0, 2.0), 1.7 * 2.0 * 1.1, epsilon = 1e-12);
        assert_eq!(star_alpha(0.0, 2.0), 1.0);
        assert_relative_eq!(star_alpha(6.0, 0.5), 0.55, epsilon = 1e-12);
        assert_eq!(star_alpha(1.0, 0.0), 0.0);
        assert_eq!(star_alpha(1.0, -1.0), 0.0);
    }

    #[rstest]
    #[case("O9.5Ib", StarColor::PaleBlue)]
    #[case("B8Ia", StarColor::BlueWhite)]
    #[case("a0V", StarColor::NearWhiteBlue)]
    #[case("F7Ib", StarColor::White)]
    #[case("G5III", StarColor::WarmWhite)]
    #[case("K5", StarColor::PaleOrange)]
    #[case("M1Ia", StarColor::Orange)]
    #[case("", StarColor::White)]
    #[case("DA2", StarColor::White)]
    fn test_color_for_spectral_class(#[case] class: &str, #[case] expected: StarColor) {
        assert_eq!(color_for_spectral_class(class), expected);
    }

    #[test]
    fn test_faint_and_unparsed_stars_are_never_projected() {
        let projector = SkyProjector::for_surface(2000, 2000);
        let overhead = HorizontalPosition { altitude_deg: 80.0, azimuth_deg: 0.0 };
        let faint = CatalogStar::new(0.0, 0.0, 6.0, "G");
        let unparsed = CatalogStar::new(0.0, 0.0, f64::NAN, "G");
        let bright = CatalogStar::new(0.0, 0.0, 1.0, "K");
        assert!(projector.project_star(&faint, &overhead, 2.0, 1.5).is_none());
        assert!(projector.project_star(&unparsed, &overhead, 2.0, 1.5).is_none());

        let drawn = projector.project_star(&bright, &overhead, 2.0, 1.5).unwrap();
        assert_eq!(drawn.color, StarColor::PaleOrange);
        assert_eq!(drawn.alpha, 1.0);
        assert_relative_eq!(drawn.radius, star_visual_size(1.0, 1.5), epsilon = 1e-12);
    }
}
