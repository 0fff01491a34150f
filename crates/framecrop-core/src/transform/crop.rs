//! Crop window extraction.
//!
//! Turns the floating-point crop window (see [`crate::geometry::crop_window`])
//! into an integer pixel region and copies it out, optionally masking it to
//! the window's inscribed circle.
//!
//! # Rounding
//!
//! The window origin and side are each rounded once. The region is then
//! clamped to the bitmap, so fractional overhang from floating-point error
//! never indexes outside the buffer, and the square never drifts by a pixel
//! between the preview and the export.

use tracing::debug;

use crate::bitmap::Bitmap;
use crate::error::CropError;
use crate::geometry::PixelRect;
use crate::mask::{apply_circle_mask, CircleMask};

/// How the extracted region is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropMode {
    /// Return the square region as is.
    Square,
    /// Mask to the inscribed circle; `fill` is used for images without alpha.
    Circle { fill: [u8; 3] },
}

/// Integer pixel region inside a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Window snapped to whole pixels, before and after clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedWindow {
    /// Rounded window origin; may lie outside the bitmap.
    pub left: i64,
    pub top: i64,
    /// Rounded window side lengths.
    pub width: i64,
    pub height: i64,
    /// The part of the window inside the bitmap.
    pub region: PixelRegion,
}

fn degenerate(window: &PixelRect) -> CropError {
    CropError::DegenerateCrop {
        x: window.x,
        y: window.y,
        width: window.width,
        height: window.height,
    }
}

/// Snap `window` to whole pixels and clamp it to a `bitmap_dims` bitmap.
///
/// # Errors
///
/// `CropError::DegenerateCrop` if the window is not finite, rounds to less
/// than one pixel, or does not overlap the bitmap.
pub fn snap_window(window: &PixelRect, bitmap_dims: (u32, u32)) -> Result<SnappedWindow, CropError> {
    let finite = [window.x, window.y, window.width, window.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Err(degenerate(window));
    }

    let left = window.x.round() as i64;
    let top = window.y.round() as i64;
    let width = window.width.round() as i64;
    let height = window.height.round() as i64;
    if width < 1 || height < 1 {
        return Err(degenerate(window));
    }

    let (bw, bh) = (bitmap_dims.0 as i64, bitmap_dims.1 as i64);
    let x0 = left.clamp(0, bw);
    let y0 = top.clamp(0, bh);
    let x1 = left.saturating_add(width).clamp(0, bw);
    let y1 = top.saturating_add(height).clamp(0, bh);
    if x1 <= x0 || y1 <= y0 {
        return Err(degenerate(window));
    }

    Ok(SnappedWindow {
        left,
        top,
        width,
        height,
        region: PixelRegion {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        },
    })
}

/// Copy a region out of a bitmap. The region must lie inside the bitmap.
pub fn extract_region(bitmap: &Bitmap, region: PixelRegion) -> Bitmap {
    let bpp = bitmap.bytes_per_pixel();
    let row_bytes = region.width as usize * bpp;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);

    // Copy pixel data row by row
    for y in region.y..region.y + region.height {
        let start = y as usize * bitmap.row_stride() + region.x as usize * bpp;
        output.extend_from_slice(&bitmap.pixels[start..start + row_bytes]);
    }

    Bitmap {
        width: region.width,
        height: region.height,
        format: bitmap.format,
        pixels: output,
    }
}

/// Extract the crop window from `bitmap`.
///
/// The output keeps the bitmap's pixel format. In circle mode the circle
/// is inscribed in the full snapped window, even where the window was
/// clamped at the bitmap edge.
pub fn extract_crop(bitmap: &Bitmap, window: &PixelRect, mode: CropMode) -> Result<Bitmap, CropError> {
    let snapped = snap_window(window, (bitmap.width, bitmap.height))?;
    let region = snapped.region;

    debug!(
        x = region.x,
        y = region.y,
        width = region.width,
        height = region.height,
        ?mode,
        "extracting crop"
    );

    let mut output = extract_region(bitmap, region);

    if let CropMode::Circle { fill } = mode {
        let mask = CircleMask::new(
            snapped.left as f64 + snapped.width as f64 / 2.0,
            snapped.top as f64 + snapped.height as f64 / 2.0,
            snapped.width.min(snapped.height) as f64 / 2.0,
        );
        apply_circle_mask(&mut output, &mask, (region.x as i64, region.y as i64), fill);
    }

    Ok(output)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::bitmap::PixelFormat;
    use proptest::prelude::*;

    fn create_test_image(width: u32, height: u32) -> Bitmap {
        let pixels: Vec<u8> = (0..width * height * 4).map(|i| (i % 253) as u8).collect();
        Bitmap::new(width, height, PixelFormat::Rgba8, pixels).unwrap()
    }

    proptest! {
        /// Property: output never exceeds the source and matches its buffer size.
        #[test]
        fn prop_output_bounded_by_input(
            (width, height) in (4u32..=60, 4u32..=60),
            (x, y) in (-30.0f64..=60.0, -30.0f64..=60.0),
            side in 1.0f64..=80.0,
        ) {
            let img = create_test_image(width, height);
            let window = PixelRect::new(x, y, side, side);
            if let Ok(out) = extract_crop(&img, &window, CropMode::Circle { fill: [0, 0, 0] }) {
                prop_assert!(out.width <= width && out.height <= height);
                prop_assert!(out.width >= 1 && out.height >= 1);
                prop_assert_eq!(out.byte_size(), out.pixel_count() * 4);
            }
        }

        /// Property: extraction is deterministic.
        #[test]
        fn prop_crop_is_deterministic(
            (width, height) in (4u32..=60, 4u32..=60),
            (x, y, side) in (0.0f64..=20.0, 0.0f64..=20.0, 1.0f64..=40.0),
            circle in any::<bool>(),
        ) {
            let img = create_test_image(width, height);
            let mode = if circle { CropMode::Circle { fill: [0, 0, 0] } } else { CropMode::Square };
            let window = PixelRect::new(x, y, side, side);
            let first = extract_crop(&img, &window, mode);
            let second = extract_crop(&img, &window, mode);
            prop_assert_eq!(first, second);
        }

        /// Property: a window fully inside the bitmap yields a square of the rounded side.
        #[test]
        fn prop_inside_window_is_square(
            side in 1u32..=20,
            (x, y) in (0u32..=20, 0u32..=20),
        ) {
            let img = create_test_image(50, 50);
            let window = PixelRect::new(x as f64, y as f64, side as f64, side as f64);
            let out = extract_crop(&img, &window, CropMode::Square).unwrap();
            prop_assert_eq!((out.width, out.height), (side, side));
            prop_assert_eq!(out.pixel(0, 0), img.pixel(x, y));
        }
    }
}
