//! WASM-compatible wrapper types for pixel buffers.
//!
//! Images cross the boundary as packed 8-bit RGB or RGBA buffers with an
//! explicit channel count, matching what a canvas `ImageData` or a decoder
//! hands over.

use framecrop_core::{Bitmap, CropError, PixelFormat};
use wasm_bindgen::prelude::*;

/// A packed pixel buffer for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
///
/// The `free()` method can be called to explicitly release WASM memory, but this is
/// optional as wasm-bindgen's finalizer will handle cleanup automatically.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsBitmap {
    inner: Bitmap,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a bitmap from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `channels` - 3 for RGB, 4 for RGBA
    /// * `pixels` - Row-major pixel data
    ///
    /// # Errors
    /// Returns error if the channel count is unsupported or the buffer length
    /// does not match the dimensions
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Result<JsBitmap, JsValue> {
        Self::try_new(width, height, channels, pixels).map_err(to_js_error)
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the number of channels per pixel (3 or 4)
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.inner.bytes_per_pixel() as u8
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.byte_size()
    }

    /// Returns pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsBitmap {
    pub(crate) fn try_new(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
    ) -> Result<Self, CropError> {
        let format = PixelFormat::from_channels(channels).ok_or_else(|| {
            CropError::InvalidConfiguration(format!("unsupported channel count: {channels}"))
        })?;
        Ok(Self {
            inner: Bitmap::new(width, height, format, pixels)?,
        })
    }

    pub(crate) fn from_bitmap(bitmap: Bitmap) -> Self {
        Self { inner: bitmap }
    }

    pub(crate) fn bitmap(&self) -> &Bitmap {
        &self.inner
    }
}

/// Convert a core error into a JS string error.
pub(crate) fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_bitmap_creation() {
        let img = JsBitmap::try_new(100, 50, 4, vec![0u8; 100 * 50 * 4]).unwrap();
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.channels(), 4);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_js_bitmap_pixels() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8]; // 2 RGB pixels
        let img = JsBitmap::try_new(2, 1, 3, pixels.clone()).unwrap();
        assert_eq!(img.pixels(), pixels);
    }

    #[test]
    fn test_js_bitmap_rejects_bad_input() {
        assert!(matches!(
            JsBitmap::try_new(2, 1, 2, vec![0; 4]),
            Err(CropError::InvalidConfiguration(_))
        ));
        assert_eq!(
            JsBitmap::try_new(2, 2, 3, vec![0; 11]).err(),
            Some(CropError::InvalidBitmap {
                expected: 12,
                actual: 11
            })
        );
    }

    #[test]
    fn test_from_bitmap() {
        let bmp = Bitmap::blank(20, 10, PixelFormat::Rgb8);
        let js = JsBitmap::from_bitmap(bmp.clone());
        assert_eq!(js.bitmap(), &bmp);
        assert_eq!(js.channels(), 3);
    }
}
