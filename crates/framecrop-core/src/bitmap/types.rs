//! Core bitmap types.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::CropError;

/// Pixel layout of a [`Bitmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGB, 3 bytes per pixel.
    #[default]
    Rgb8,
    /// 8-bit RGBA (straight alpha), 4 bytes per pixel.
    Rgba8,
}

impl PixelFormat {
    /// Number of bytes used by one pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Whether the format carries an alpha channel.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, PixelFormat::Rgba8)
    }

    /// Map a channel count (3 or 4) to a format.
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            3 => Some(PixelFormat::Rgb8),
            4 => Some(PixelFormat::Rgba8),
            _ => None,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Already upright.
    #[default]
    Normal = 1,
    /// Mirrored horizontally.
    FlipHorizontal = 2,
    /// Upside down.
    Rotate180 = 3,
    /// Mirrored vertically.
    FlipVertical = 4,
    /// Needs 90° CW rotation then a horizontal flip.
    Transpose = 5,
    /// Needs 90° CW rotation.
    Rotate90CW = 6,
    /// Needs 270° CW rotation then a horizontal flip.
    Transverse = 7,
    /// Needs 270° CW rotation (90° CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if making the image upright swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A packed pixel buffer with dimensions and format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout of each pixel in `pixels`.
    pub format: PixelFormat,
    /// Row-major pixel data, `width * height * format.bytes_per_pixel()` bytes.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap, checking that the buffer matches the dimensions.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, CropError> {
        let expected = Self::buffer_len(width, height, format);
        if pixels.len() != expected {
            return Err(CropError::InvalidBitmap {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    /// Create a zero-filled bitmap (black for RGB, fully transparent for RGBA).
    pub fn blank(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            pixels: vec![0u8; Self::buffer_len(width, height, format)],
        }
    }

    /// Create a bitmap where every pixel has the given value.
    ///
    /// `value` must hold exactly one pixel in `format`.
    pub fn filled(width: u32, height: u32, format: PixelFormat, value: &[u8]) -> Self {
        debug_assert_eq!(value.len(), format.bytes_per_pixel());
        let len = Self::buffer_len(width, height, format);
        Self {
            width,
            height,
            format,
            pixels: value.iter().copied().cycle().take(len).collect(),
        }
    }

    #[inline]
    fn buffer_len(width: u32, height: u32, format: PixelFormat) -> usize {
        width as usize * height as usize * format.bytes_per_pixel()
    }

    /// Bytes per pixel of this bitmap's format.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Bytes per row.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Byte slice of the pixel at `(x, y)`.
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.bytes_per_pixel();
        let idx = y as usize * self.row_stride() + x as usize * bpp;
        &self.pixels[idx..idx + bpp]
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty bitmap.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Convert to an `image::DynamicImage` for use with `imageops`.
    ///
    /// Returns `None` if the buffer does not match the dimensions.
    pub fn to_dynamic(&self) -> Option<DynamicImage> {
        match self.format {
            PixelFormat::Rgb8 => {
                image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
                    .map(DynamicImage::ImageRgb8)
            }
            PixelFormat::Rgba8 => {
                image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
                    .map(DynamicImage::ImageRgba8)
            }
        }
    }

    /// Build a bitmap in `format` from an `image::DynamicImage`.
    pub fn from_dynamic(img: DynamicImage, format: PixelFormat) -> Self {
        let (width, height, pixels) = match format {
            PixelFormat::Rgb8 => {
                let buf = img.into_rgb8();
                let (w, h) = buf.dimensions();
                (w, h, buf.into_raw())
            }
            PixelFormat::Rgba8 => {
                let buf = img.into_rgba8();
                let (w, h) = buf.dimensions();
                (w, h, buf.into_raw())
            }
        };
        Self {
            width,
            height,
            format,
            pixels,
        }
    }
}

/// The caller's photograph together with its display orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub bitmap: Bitmap,
    pub orientation: Orientation,
}

impl SourceImage {
    pub fn new(bitmap: Bitmap, orientation: Orientation) -> Self {
        Self {
            bitmap,
            orientation,
        }
    }

    /// Dimensions of the image once displayed upright.
    pub fn oriented_dimensions(&self) -> (u32, u32) {
        if self.orientation.swaps_dimensions() {
            (self.bitmap.height, self.bitmap.width)
        } else {
            (self.bitmap.width, self.bitmap.height)
        }
    }
}
