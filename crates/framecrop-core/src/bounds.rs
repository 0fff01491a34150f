//! Legal zoom and pan ranges.
//!
//! The crop window must never expose space outside the image. Zoom is
//! bounded below by fit-to-window (scale 1) and above by the configured
//! magnification limit; pan is bounded per axis by how far the scaled
//! image overhangs the window.
//!
//! Translation bounds depend on scale, so a combined update must clamp the
//! scale first and then clamp translation against the *new* scale.
//! [`CropBounds::clamp`] enforces that order.

use tracing::trace;

use crate::config::CropConfiguration;
use crate::geometry::{displayed_extent, Offset, Size, ViewportSize};

/// Smallest legal scale: the image exactly fits the viewport.
pub const MIN_SCALE: f64 = 1.0;

/// Legal `(min, max)` zoom scale for a configuration.
pub fn max_scale_range(config: &CropConfiguration) -> (f64, f64) {
    (MIN_SCALE, config.max_magnification_scale.max(MIN_SCALE))
}

/// Farthest the image may be panned in each axis at `scale`.
///
/// Per axis: `max(0, (extent * scale - 2 * mask_radius) / 2)`. The legal
/// range is symmetric, `[-x, +x]` and `[-y, +y]`.
pub fn max_translation_range(config: &CropConfiguration, extent: Size, scale: f64) -> Offset {
    translation_limit(config.mask_radius, extent, scale)
}

fn translation_limit(mask_radius: f64, extent: Size, scale: f64) -> Offset {
    let window = mask_radius * 2.0;
    Offset::new(
        ((extent.width * scale - window) / 2.0).max(0.0),
        ((extent.height * scale - window) / 2.0).max(0.0),
    )
}

/// Bounds for one laid-out session: displayed extent plus mask and zoom limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBounds {
    extent: Size,
    mask_radius: f64,
    min_scale: f64,
    max_scale: f64,
}

impl CropBounds {
    /// Bounds for an image already laid out at `extent`.
    pub fn new(config: &CropConfiguration, extent: Size) -> Self {
        let (min_scale, max_scale) = max_scale_range(config);
        Self {
            extent,
            mask_radius: config.mask_radius,
            min_scale,
            max_scale,
        }
    }

    /// Bounds for an image of `image_dims` pixels laid out in `viewport`.
    pub fn from_layout(
        config: &CropConfiguration,
        image_dims: (u32, u32),
        viewport: ViewportSize,
    ) -> Self {
        Self::new(config, displayed_extent(image_dims, viewport))
    }

    /// Displayed extent at scale 1.
    pub fn extent(&self) -> Size {
        self.extent
    }

    pub fn mask_radius(&self) -> f64 {
        self.mask_radius
    }

    pub fn scale_range(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// Maximum absolute translation per axis at `scale`.
    pub fn translation_range(&self, scale: f64) -> Offset {
        translation_limit(self.mask_radius, self.extent, scale)
    }

    /// Clamp a proposed scale into `[min, max]`. NaN falls back to the minimum.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.min_scale;
        }
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Clamp a proposed translation against the range at `scale`.
    pub fn clamp_translation(&self, translation: Offset, scale: f64) -> Offset {
        let limit = self.translation_range(scale);
        let clamp_axis = |v: f64, max: f64| if v.is_nan() { 0.0 } else { v.clamp(-max, max) };
        Offset::new(
            clamp_axis(translation.x, limit.x),
            clamp_axis(translation.y, limit.y),
        )
    }

    /// Clamp scale, then clamp translation against the clamped scale.
    pub fn clamp(&self, scale: f64, translation: Offset) -> (f64, Offset) {
        let scale = self.clamp_scale(scale);
        let clamped = self.clamp_translation(translation, scale);
        if clamped != translation {
            trace!(
                scale,
                requested_x = translation.x,
                requested_y = translation.y,
                x = clamped.x,
                y = clamped.y,
                "translation clamped"
            );
        }
        (scale, clamped)
    }

    /// Whether the mask window at `translation` lies inside the scaled image.
    pub fn window_covered(&self, scale: f64, translation: Offset) -> bool {
        let half_w = self.extent.width * scale / 2.0;
        let half_h = self.extent.height * scale / 2.0;
        let r = self.mask_radius;
        let eps = 1e-9;
        translation.x.abs() + r <= half_w + eps && translation.y.abs() + r <= half_h + eps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(radius: f64, max_scale: f64) -> CropConfiguration {
        CropConfiguration {
            mask_radius: radius,
            max_magnification_scale: max_scale,
            ..Default::default()
        }
    }

    fn scenario_bounds() -> CropBounds {
        // 1200x800 image in a 300x300 viewport -> 300x200 displayed
        let vp = ViewportSize::new(300.0, 300.0).unwrap();
        CropBounds::from_layout(&config(100.0, 4.0), (1200, 800), vp)
    }

    #[test]
    fn test_scale_range() {
        assert_eq!(max_scale_range(&config(100.0, 4.0)), (1.0, 4.0));
        assert_eq!(scenario_bounds().scale_range(), (1.0, 4.0));
    }

    #[test]
    fn test_scale_clamps_to_maximum() {
        let bounds = scenario_bounds();
        assert_eq!(bounds.clamp_scale(10.0), 4.0);
        assert_eq!(bounds.clamp_scale(0.2), 1.0);
        assert_eq!(bounds.clamp_scale(2.5), 2.5);
        assert_eq!(bounds.clamp_scale(f64::NAN), 1.0);
    }

    #[test]
    fn test_translation_range_at_fit() {
        let bounds = scenario_bounds();
        let range = bounds.translation_range(1.0);
        // 300 wide - 200 window -> 50 each way; 200 tall - 200 window -> locked
        assert!((range.x - 50.0).abs() < 1e-9);
        assert_eq!(range.y, 0.0);
    }

    #[test]
    fn test_translation_range_grows_with_scale() {
        let bounds = scenario_bounds();
        let range = bounds.translation_range(2.0);
        assert!((range.x - 200.0).abs() < 1e-9);
        assert!((range.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_translation_range_never_negative() {
        let extent = Size::new(100.0, 100.0);
        let range = max_translation_range(&config(80.0, 4.0), extent, 1.0);
        assert_eq!(range, Offset::ZERO);
    }

    #[test]
    fn test_clamp_translation_symmetric() {
        let bounds = scenario_bounds();
        let t = bounds.clamp_translation(Offset::new(-500.0, 30.0), 1.0);
        assert!((t.x + 50.0).abs() < 1e-9);
        assert_eq!(t.y, 0.0);
    }

    #[test]
    fn test_clamp_orders_scale_before_translation() {
        let bounds = scenario_bounds();
        // Translation legal at the requested scale 10 but not at the clamped 4
        let (scale, t) = bounds.clamp(10.0, Offset::new(1000.0, 1000.0));
        assert_eq!(scale, 4.0);
        let range = bounds.translation_range(4.0);
        assert_eq!(t, range);
        assert!(bounds.window_covered(scale, t));
    }

    #[test]
    fn test_window_covered() {
        let bounds = scenario_bounds();
        assert!(bounds.window_covered(1.0, Offset::new(50.0, 0.0)));
        assert!(!bounds.window_covered(1.0, Offset::new(51.0, 0.0)));
        assert!(!bounds.window_covered(1.0, Offset::new(0.0, 1.0)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: clamped scale always lies in [1, max].
        #[test]
        fn prop_scale_in_range(
            max_scale in 1.0f64..=10.0,
            proposed in -100.0f64..=100.0,
        ) {
            let cfg = CropConfiguration { max_magnification_scale: max_scale, ..Default::default() };
            let bounds = CropBounds::new(&cfg, Size::new(300.0, 300.0));
            let s = bounds.clamp_scale(proposed);
            prop_assert!((1.0..=max_scale).contains(&s));
        }

        /// Property: when the extent can hold the window, clamped state keeps it covered.
        #[test]
        fn prop_clamped_window_covered(
            (w, h) in (200.0f64..=800.0, 200.0f64..=800.0),
            radius in 10.0f64..=100.0,
            proposed_scale in 0.5f64..=8.0,
            tx in -2000.0f64..=2000.0,
            ty in -2000.0f64..=2000.0,
        ) {
            let cfg = CropConfiguration { mask_radius: radius, ..Default::default() };
            let bounds = CropBounds::new(&cfg, Size::new(w, h));
            let (scale, t) = bounds.clamp(proposed_scale, Offset::new(tx, ty));
            prop_assert!(bounds.window_covered(scale, t));
        }
    }
}
