//! Session configuration.
//!
//! A [`CropConfiguration`] is supplied once when a crop session starts and is
//! read-only for its duration. Missing fields deserialize to their defaults,
//! so front-ends only need to send what they change.

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::transform::InterpolationFilter;

/// Largest rotated surface the engine will allocate, in pixels.
pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 100_000_000;

/// Configuration for a crop session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfiguration {
    /// Half the side (or the radius) of the crop window, in view units.
    pub mask_radius: f64,
    /// Upper zoom bound relative to fit-to-window (>= 1).
    pub max_magnification_scale: f64,
    /// Multiplier applied to pinch gestures.
    pub zoom_sensitivity: f64,
    /// Whether rotation gestures are honoured and applied on completion.
    pub rotate_image: bool,
    /// Whether a circle mask produces a circular (masked) output.
    pub crop_image_circular: bool,
    /// Resampling filter used when rotating on completion.
    pub rotation_filter: InterpolationFilter,
    /// Allocation limit for the rotated surface.
    pub max_surface_pixels: u64,
    /// Fill used outside the circle for images without an alpha channel.
    pub circle_fill: [u8; 3],
}

impl Default for CropConfiguration {
    fn default() -> Self {
        Self {
            mask_radius: 130.0,
            max_magnification_scale: 4.0,
            zoom_sensitivity: 1.0,
            rotate_image: false,
            crop_image_circular: false,
            rotation_filter: InterpolationFilter::Bilinear,
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
            circle_fill: [0, 0, 0],
        }
    }
}

impl CropConfiguration {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every field is within its legal range.
    pub fn validate(&self) -> Result<(), CropError> {
        if !(self.mask_radius.is_finite() && self.mask_radius > 0.0) {
            return Err(CropError::InvalidConfiguration(format!(
                "mask_radius must be > 0, got {}",
                self.mask_radius
            )));
        }
        if !(self.max_magnification_scale.is_finite() && self.max_magnification_scale >= 1.0) {
            return Err(CropError::InvalidConfiguration(format!(
                "max_magnification_scale must be >= 1, got {}",
                self.max_magnification_scale
            )));
        }
        if !(self.zoom_sensitivity.is_finite() && self.zoom_sensitivity > 0.0) {
            return Err(CropError::InvalidConfiguration(format!(
                "zoom_sensitivity must be > 0, got {}",
                self.zoom_sensitivity
            )));
        }
        if self.max_surface_pixels == 0 {
            return Err(CropError::InvalidConfiguration(
                "max_surface_pixels must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
