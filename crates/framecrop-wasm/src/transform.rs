//! WASM binding for standalone rotation.
//!
//! Lets a front-end render a rotated preview without going through a
//! crop session.

use crate::types::{to_js_error, JsBitmap};
use framecrop_core::config::DEFAULT_MAX_SURFACE_PIXELS;
use framecrop_core::{rotate_bitmap, InterpolationFilter};
use wasm_bindgen::prelude::*;

/// Rotate an image about its center.
///
/// The output canvas is expanded to fit the entire rotated image. Uncovered
/// corners are transparent for RGBA images and black for RGB images.
///
/// # Arguments
///
/// * `image` - Source image to rotate
/// * `radians` - Rotation angle (positive = clockwise on screen)
/// * `use_lanczos` - Use high-quality Lanczos3 filter (slower), otherwise bilinear
///
/// # Errors
///
/// Returns error if the angle is not finite or the rotated canvas is too large.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const rotated = rotate_image(sourceImage, Math.PI / 12, false);
/// ```
#[wasm_bindgen]
pub fn rotate_image(image: &JsBitmap, radians: f64, use_lanczos: bool) -> Result<JsBitmap, JsValue> {
    let filter = if use_lanczos {
        InterpolationFilter::Lanczos3
    } else {
        InterpolationFilter::Bilinear
    };

    rotate_bitmap(image.bitmap(), radians, filter, DEFAULT_MAX_SURFACE_PIXELS)
        .map(JsBitmap::from_bitmap)
        .map_err(to_js_error)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_rotation_rejects_non_finite_angle() {
        let img = JsBitmap::try_new(4, 4, 3, vec![0; 48]).unwrap();
        let err = rotate_image(&img, f64::NAN, false).unwrap_err();
        assert!(err.as_string().unwrap().contains("Rotation failed"));
    }
}
