//! Orientation normalization.
//!
//! The front-end always shows the photograph upright, so every pixel
//! operation must run on the upright bitmap too or the exported crop would
//! not match the framed preview.

use image::DynamicImage;

use super::{Bitmap, Orientation, SourceImage};
use crate::error::CropError;

/// Render the source bitmap upright according to its orientation.
///
/// Returns a copy of the bitmap when no transform is needed. The pixel
/// format is preserved.
pub fn orient_upright(source: &SourceImage) -> Result<Bitmap, CropError> {
    let bitmap = &source.bitmap;
    if source.orientation == Orientation::Normal {
        return Ok(bitmap.clone());
    }

    let img = bitmap.to_dynamic().ok_or(CropError::InvalidBitmap {
        expected: bitmap.pixel_count() * bitmap.bytes_per_pixel(),
        actual: bitmap.byte_size(),
    })?;

    let upright = apply_orientation(img, source.orientation);
    Ok(Bitmap::from_dynamic(upright, bitmap.format))
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::PixelFormat;

    /// 3x2 RGB image where each pixel's red channel is its index.
    fn indexed_source(orientation: Orientation) -> SourceImage {
        let mut pixels = Vec::new();
        for i in 0..6u8 {
            pixels.extend_from_slice(&[i, 0, 0]);
        }
        let bmp = Bitmap::new(3, 2, PixelFormat::Rgb8, pixels).unwrap();
        SourceImage::new(bmp, orientation)
    }

    #[test]
    fn test_normal_is_copy() {
        let src = indexed_source(Orientation::Normal);
        assert_eq!(orient_upright(&src).unwrap(), src.bitmap);
    }

    #[test]
    fn test_rotate90_swaps_and_moves_pixels() {
        // 0 1 2        3 0
        // 3 4 5   ->   4 1
        //              5 2
        let src = indexed_source(Orientation::Rotate90CW);
        let out = orient_upright(&src).unwrap();
        assert_eq!((out.width, out.height), (2, 3));
        assert_eq!(out.pixel(0, 0)[0], 3);
        assert_eq!(out.pixel(1, 0)[0], 0);
        assert_eq!(out.pixel(1, 2)[0], 2);
    }

    #[test]
    fn test_flip_horizontal() {
        let src = indexed_source(Orientation::FlipHorizontal);
        let out = orient_upright(&src).unwrap();
        assert_eq!((out.width, out.height), (3, 2));
        assert_eq!(out.pixel(0, 0)[0], 2);
        assert_eq!(out.pixel(2, 1)[0], 3);
    }

    #[test]
    fn test_upright_dimensions_match_oriented_dimensions() {
        for code in 1..=8u32 {
            let src = indexed_source(Orientation::from(code));
            let out = orient_upright(&src).unwrap();
            assert_eq!((out.width, out.height), src.oriented_dimensions());
            assert_eq!(out.format, PixelFormat::Rgb8);
        }
    }

    #[test]
    fn test_mismatched_buffer_is_rejected() {
        let bmp = Bitmap {
            width: 4,
            height: 4,
            format: PixelFormat::Rgb8,
            pixels: vec![0; 10],
        };
        let src = SourceImage::new(bmp, Orientation::Rotate180);
        assert!(matches!(
            orient_upright(&src),
            Err(CropError::InvalidBitmap { .. })
        ));
    }
}
