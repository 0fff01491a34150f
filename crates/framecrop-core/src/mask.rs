//! Crop window shape and circular masking.
//!
//! The window itself is always a square of side `2 * radius`; the shape only
//! decides whether the extracted square is masked to its inscribed circle.
//!
//! ## Coverage rule
//!
//! A pixel belongs to the circle when its *center* lies within the radius.
//! The edge is hard (no feathering), which keeps the output pixel-exact and
//! reproducible.

use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;

/// Shape of the on-screen crop window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskShape {
    #[default]
    Circle,
    Square,
}

impl MaskShape {
    /// Parse a shape name (`"circle"` or `"square"`, case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "circle" => Some(MaskShape::Circle),
            "square" => Some(MaskShape::Square),
            _ => None,
        }
    }
}

/// Crop window geometry, fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskGeometry {
    /// Half the window side, in view units.
    pub radius: f64,
    pub shape: MaskShape,
}

impl MaskGeometry {
    pub fn new(radius: f64, shape: MaskShape) -> Self {
        Self { radius, shape }
    }

    /// Side of the square window in view units.
    pub fn side(&self) -> f64 {
        self.radius * 2.0
    }
}

/// A circle in the pixel space of some bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMask {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl CircleMask {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    /// Whether the pixel at integer coordinates `(x, y)` is inside.
    #[inline]
    pub fn contains_pixel(&self, x: i64, y: i64) -> bool {
        let dx = x as f64 + 0.5 - self.center_x;
        let dy = y as f64 + 0.5 - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Clear every pixel outside `mask`.
///
/// `origin` is where the bitmap's top-left pixel sits in the mask's
/// coordinate space. Outside pixels become fully transparent when the
/// bitmap has alpha, otherwise they are set to `fill`.
pub fn apply_circle_mask(bitmap: &mut Bitmap, mask: &CircleMask, origin: (i64, i64), fill: [u8; 3]) {
    if bitmap.is_empty() {
        return;
    }
    let bpp = bitmap.bytes_per_pixel();
    let has_alpha = bitmap.format.has_alpha();
    let width = bitmap.width as usize;

    for (row, line) in bitmap.pixels.chunks_exact_mut(width * bpp).enumerate() {
        let y = origin.1 + row as i64;
        for (col, pixel) in line.chunks_exact_mut(bpp).enumerate() {
            let x = origin.0 + col as i64;
            if mask.contains_pixel(x, y) {
                continue;
            }
            if has_alpha {
                pixel.fill(0);
            } else {
                pixel.copy_from_slice(&fill);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::PixelFormat;

    #[test]
    fn test_shape_from_name() {
        assert_eq!(MaskShape::from_name("circle"), Some(MaskShape::Circle));
        assert_eq!(MaskShape::from_name("Square"), Some(MaskShape::Square));
        assert_eq!(MaskShape::from_name("hexagon"), None);
    }

    #[test]
    fn test_geometry_side() {
        assert_eq!(MaskGeometry::new(65.0, MaskShape::Square).side(), 130.0);
    }

    #[test]
    fn test_contains_pixel() {
        let mask = CircleMask::new(5.0, 5.0, 5.0);
        assert!(mask.contains_pixel(4, 4));
        assert!(mask.contains_pixel(0, 4));
        assert!(!mask.contains_pixel(0, 0));
        assert!(!mask.contains_pixel(9, 9));
    }

    #[test]
    fn test_mask_rgba_clears_outside() {
        let mut bmp = Bitmap::filled(10, 10, PixelFormat::Rgba8, &[1, 2, 3, 255]);
        apply_circle_mask(&mut bmp, &CircleMask::new(5.0, 5.0, 5.0), (0, 0), [9, 9, 9]);
        assert_eq!(bmp.pixel(0, 0), &[0, 0, 0, 0]);
        assert_eq!(bmp.pixel(5, 5), &[1, 2, 3, 255]);
    }

    #[test]
    fn test_mask_rgb_uses_fill() {
        let mut bmp = Bitmap::filled(10, 10, PixelFormat::Rgb8, &[1, 2, 3]);
        apply_circle_mask(&mut bmp, &CircleMask::new(5.0, 5.0, 5.0), (0, 0), [9, 8, 7]);
        assert_eq!(bmp.pixel(9, 0), &[9, 8, 7]);
        assert_eq!(bmp.pixel(4, 5), &[1, 2, 3]);
    }

    #[test]
    fn test_mask_respects_origin() {
        // Bitmap covers the right half of a 10x10 circle
        let mut bmp = Bitmap::filled(5, 10, PixelFormat::Rgba8, &[7, 7, 7, 255]);
        apply_circle_mask(&mut bmp, &CircleMask::new(5.0, 5.0, 5.0), (5, 0), [0, 0, 0]);
        assert_eq!(bmp.pixel(0, 5), &[7, 7, 7, 255]);
        assert_eq!(bmp.pixel(4, 0), &[0, 0, 0, 0]);
    }
}
