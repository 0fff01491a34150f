//! View-space / image-pixel-space conversions.
//!
//! All gesture math happens in view units (the front-end's layout units).
//! The image is laid out scale-to-fit inside the viewport, so one view unit
//! covers a fixed number of native pixels; these helpers derive that ratio
//! and map the crop window into pixel coordinates.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Translation is the image offset relative to the viewport center
//! - Pixel rectangles use pixel edges, so a full-width rect spans `0.0..width`

use serde::{Deserialize, Serialize};

use crate::error::CropError;

/// A width/height pair in view units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Uniformly scale both dimensions.
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// A 2D offset in view units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Measured on-screen size of the box the image is laid out in.
///
/// Only constructible from a finite, strictly positive size, so geometry
/// functions taking one never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize(Size);

impl ViewportSize {
    /// Validate a measured layout size.
    ///
    /// Returns `CropError::LayoutNotReady` when the size is zero, negative or
    /// not finite, which is what front-ends report before layout completes.
    pub fn new(width: f64, height: f64) -> Result<Self, CropError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self(Size::new(width, height)))
        } else {
            Err(CropError::LayoutNotReady)
        }
    }

    pub fn width(&self) -> f64 {
        self.0.width
    }

    pub fn height(&self) -> f64 {
        self.0.height
    }

    pub fn size(&self) -> Size {
        self.0
    }
}

/// Axis-aligned rectangle in image pixel space (pixel edges, not centers).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the rectangle lies within `0..width` x `0..height`, allowing
    /// `tolerance` pixels of overhang on every edge.
    pub fn is_within(&self, width: u32, height: u32, tolerance: f64) -> bool {
        self.x >= -tolerance
            && self.y >= -tolerance
            && self.right() <= width as f64 + tolerance
            && self.bottom() <= height as f64 + tolerance
    }
}

/// Scale-to-fit size of an image inside the viewport.
///
/// The image is scaled uniformly so that its limiting dimension exactly
/// fills the viewport. `image_dims` are the upright pixel dimensions and
/// must both be non-zero.
pub fn displayed_extent(image_dims: (u32, u32), viewport: ViewportSize) -> Size {
    let (iw, ih) = (image_dims.0 as f64, image_dims.1 as f64);
    let fit = (viewport.width() / iw).min(viewport.height() / ih);
    Size::new(iw * fit, ih * fit)
}

/// Native pixels covered by one view unit at scale 1.
///
/// The same in both axes since the fit is uniform.
pub fn image_pixels_per_view_unit(image_dims: (u32, u32), viewport: ViewportSize) -> f64 {
    let (iw, ih) = (image_dims.0 as f64, image_dims.1 as f64);
    (iw / viewport.width()).max(ih / viewport.height())
}

/// Map the mask window into the pixel space of `bitmap_dims`.
///
/// The window is a square of side `2 * mask_radius` view units at the
/// viewport center. Panning the image by `translation` is equivalent to
/// moving the window by `-translation` relative to the image, and zooming
/// by `scale` shrinks the window's footprint in pixels by the same factor.
///
/// `bitmap_dims` may differ from the dimensions `pixels_per_view_unit` was
/// derived from: a rotated bitmap is larger than its source but shares its
/// center and pixel density, so the window is placed relative to the
/// bitmap's own center.
pub fn crop_window(
    bitmap_dims: (u32, u32),
    pixels_per_view_unit: f64,
    mask_radius: f64,
    scale: f64,
    translation: Offset,
) -> PixelRect {
    let px_per_unit = pixels_per_view_unit / scale;
    let half = mask_radius * px_per_unit;
    let cx = bitmap_dims.0 as f64 / 2.0 - translation.x * px_per_unit;
    let cy = bitmap_dims.1 as f64 / 2.0 - translation.y * px_per_unit;
    PixelRect::new(cx - half, cy - half, half * 2.0, half * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(w: f64, h: f64) -> ViewportSize {
        ViewportSize::new(w, h).unwrap()
    }

    #[test]
    fn test_viewport_rejects_unmeasured_sizes() {
        assert_eq!(ViewportSize::new(0.0, 300.0), Err(CropError::LayoutNotReady));
        assert_eq!(ViewportSize::new(300.0, -1.0), Err(CropError::LayoutNotReady));
        assert_eq!(
            ViewportSize::new(f64::INFINITY, 300.0),
            Err(CropError::LayoutNotReady)
        );
        assert!(ViewportSize::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn test_displayed_extent_fit_width() {
        let extent = displayed_extent((1200, 800), viewport(300.0, 300.0));
        assert!((extent.width - 300.0).abs() < 1e-9);
        assert!((extent.height - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_displayed_extent_fit_height() {
        let extent = displayed_extent((800, 1200), viewport(300.0, 300.0));
        assert!((extent.width - 200.0).abs() < 1e-9);
        assert!((extent.height - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_displayed_extent_upscales_small_images() {
        let extent = displayed_extent((50, 25), viewport(400.0, 400.0));
        assert!((extent.width - 400.0).abs() < 1e-9);
        assert!((extent.height - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_pixels_per_view_unit() {
        let vp = viewport(300.0, 300.0);
        assert!((image_pixels_per_view_unit((1200, 800), vp) - 4.0).abs() < 1e-9);
        assert!((image_pixels_per_view_unit((800, 1200), vp) - 4.0).abs() < 1e-9);
        assert!((image_pixels_per_view_unit((150, 100), vp) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_ratio_matches_extent_in_both_axes() {
        let vp = viewport(390.0, 640.0);
        let dims = (4032, 3024);
        let extent = displayed_extent(dims, vp);
        let k = image_pixels_per_view_unit(dims, vp);
        assert!((extent.width * k - 4032.0).abs() < 1e-6);
        assert!((extent.height * k - 3024.0).abs() < 1e-6);
    }

    #[test]
    fn test_crop_window_centered() {
        // 1200x800 in 300x300 -> 4 px per unit; radius 100 -> 800px window
        let rect = crop_window((1200, 800), 4.0, 100.0, 1.0, Offset::ZERO);
        assert_eq!(rect, PixelRect::new(200.0, 0.0, 800.0, 800.0));
    }

    #[test]
    fn test_crop_window_scale_shrinks_footprint() {
        let rect = crop_window((1200, 800), 4.0, 100.0, 2.0, Offset::ZERO);
        assert_eq!(rect, PixelRect::new(400.0, 200.0, 400.0, 400.0));
    }

    #[test]
    fn test_crop_window_translation_moves_opposite() {
        // Image dragged right by 50 units -> window moves left in the image
        let rect = crop_window((1200, 800), 4.0, 100.0, 1.0, Offset::new(50.0, 0.0));
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.center(), (400.0, 400.0));
    }

    #[test]
    fn test_crop_window_uses_target_center() {
        // Rotated bitmap is larger but keeps the same pixel density
        let rect = crop_window((1000, 1000), 2.0, 50.0, 1.0, Offset::ZERO);
        assert_eq!(rect.center(), (500.0, 500.0));
        assert_eq!(rect.width, 200.0);
    }

    #[test]
    fn test_pixel_rect_within() {
        let rect = PixelRect::new(-0.4, 0.0, 100.3, 50.0);
        assert!(rect.is_within(100, 50, 0.5));
        assert!(!rect.is_within(100, 50, 0.0));
    }
}
