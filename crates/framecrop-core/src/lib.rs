//! Framecrop Core - pan, zoom and rotate crop engine
//!
//! This crate frames a photograph behind a fixed square or circular crop
//! window, keeps user gestures within legal bounds, and cuts the framed
//! region out of the full-resolution image.
//!
//! # Module Structure
//!
//! - `geometry` - Viewport layout and view-to-pixel mapping
//! - `bounds` - Legal zoom and pan ranges
//! - `gesture` - Transform state and gesture composition
//! - `bitmap` - Pixel buffers and orientation normalization
//! - `transform` - Rotation and crop extraction
//! - `mask` - Crop window shape and circular masking
//! - `session` - Ties the above together for one source image

pub mod bitmap;
pub mod bounds;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod mask;
pub mod session;
pub mod transform;

pub use bitmap::{orient_upright, Bitmap, Orientation, PixelFormat, SourceImage};
pub use bounds::{max_scale_range, max_translation_range, CropBounds};
pub use config::CropConfiguration;
pub use error::CropError;
pub use geometry::{Offset, PixelRect, Size, ViewportSize};
pub use gesture::{GestureEvent, ViewportState};
pub use mask::{MaskGeometry, MaskShape};
pub use session::{CropOutcome, CropSession};
pub use transform::{compute_rotated_bounds, extract_crop, rotate_bitmap, InterpolationFilter};
