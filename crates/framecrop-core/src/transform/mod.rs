//! Pixel transforms run when a crop session completes: rotation and crop.
//!
//! # Transform Order
//!
//! 1. Orientation normalization (see [`crate::bitmap::orient_upright`])
//! 2. Rotation by the committed angle, if rotation is enabled
//! 3. Crop window extraction, optionally masked to a circle
//!
//! Crop extraction assumes it runs on the already-rotated bitmap: the
//! window is placed relative to that bitmap's center.
//!
//! # Coordinate System
//!
//! - Rotation angles are in radians, positive = clockwise on screen
//! - Crop windows are in pixels of the bitmap being cropped
//! - Origin is top-left corner

mod crop;
mod rotation;

pub use crop::{extract_crop, extract_region, snap_window, CropMode, PixelRegion, SnappedWindow};
pub use rotation::{compute_rotated_bounds, rotate_bitmap, InterpolationFilter};
