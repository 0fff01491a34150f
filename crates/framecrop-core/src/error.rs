//! Error types for the crop engine.

use thiserror::Error;

/// Failures reported by the crop engine.
///
/// Geometry and bounds computations never fail once their inputs are
/// validated; only layout-dependent queries, rotation and the final
/// extraction can produce one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// Geometry was queried before a usable viewport size was known.
    #[error("Viewport layout is not ready")]
    LayoutNotReady,

    /// The rotated surface could not be produced.
    #[error("Rotation failed: {0}")]
    Rotation(String),

    /// The crop rectangle is empty or not representable in pixels.
    #[error("Degenerate crop rectangle ({width}x{height} at {x},{y})")]
    DegenerateCrop {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The source image has no pixels.
    #[error("Source image is empty")]
    EmptyImage,

    /// Pixel buffer length does not match the declared dimensions.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    InvalidBitmap { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            CropError::LayoutNotReady.to_string(),
            "Viewport layout is not ready"
        );

        let err = CropError::Rotation("surface too large".to_string());
        assert_eq!(err.to_string(), "Rotation failed: surface too large");

        let err = CropError::InvalidBitmap {
            expected: 12,
            actual: 9,
        };
        assert_eq!(
            err.to_string(),
            "Pixel buffer size mismatch: expected 12 bytes, got 9"
        );
    }
}
