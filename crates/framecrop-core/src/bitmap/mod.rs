//! Bitmap model shared by every stage of the crop pipeline.
//!
//! A [`Bitmap`] is a tightly packed, row-major pixel buffer in one of the
//! supported [`PixelFormat`]s. A [`SourceImage`] pairs the caller's bitmap
//! with the orientation it must be displayed in; the engine only ever reads
//! it and produces new bitmaps from it.

mod orientation;
mod types;

pub use orientation::orient_upright;
pub use types::{Bitmap, Orientation, PixelFormat, SourceImage};
