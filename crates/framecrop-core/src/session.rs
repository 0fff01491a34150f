//! A crop session: one source image framed in one viewport.
//!
//! The session owns the transform state and is its only writer. Gestures
//! update it in place; `complete` reads the committed values and runs the
//! pixel pipeline once.
//!
//! Layout arrives after construction. Until the viewport size is known,
//! every geometry query and gesture returns `CropError::LayoutNotReady`.

use tracing::{debug, warn};

use crate::bitmap::{orient_upright, Bitmap, SourceImage};
use crate::bounds::CropBounds;
use crate::config::CropConfiguration;
use crate::error::CropError;
use crate::geometry::{
    crop_window, displayed_extent, image_pixels_per_view_unit, PixelRect, Size, ViewportSize,
};
use crate::gesture::{GestureEvent, ViewportState};
use crate::mask::{MaskGeometry, MaskShape};
use crate::transform::{extract_crop, rotate_bitmap, CropMode};

/// Result of completing a session.
#[derive(Debug, Clone, PartialEq)]
pub struct CropOutcome {
    /// The cropped image, in the source pixel format.
    pub bitmap: Bitmap,
    /// Set when rotation failed and the crop was taken from the unrotated image.
    pub rotation_error: Option<CropError>,
}

/// Interactive crop state for one source image.
#[derive(Debug, Clone)]
pub struct CropSession {
    source: SourceImage,
    mask: MaskGeometry,
    config: CropConfiguration,
    viewport: Option<ViewportSize>,
    state: ViewportState,
}

impl CropSession {
    /// Start a session with identity transform state.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for out-of-range settings, `EmptyImage` for a
    /// source with no pixels, `InvalidBitmap` for a short or long buffer.
    pub fn new(
        source: SourceImage,
        shape: MaskShape,
        config: CropConfiguration,
    ) -> Result<Self, CropError> {
        config.validate()?;
        let bitmap = &source.bitmap;
        if bitmap.is_empty() {
            return Err(CropError::EmptyImage);
        }
        let expected = bitmap.pixel_count() * bitmap.bytes_per_pixel();
        if bitmap.byte_size() != expected {
            return Err(CropError::InvalidBitmap {
                expected,
                actual: bitmap.byte_size(),
            });
        }

        debug!(
            width = bitmap.width,
            height = bitmap.height,
            orientation = ?source.orientation,
            ?shape,
            "crop session started"
        );

        Ok(Self {
            mask: MaskGeometry::new(config.mask_radius, shape),
            source,
            config,
            viewport: None,
            state: ViewportState::default(),
        })
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn config(&self) -> &CropConfiguration {
        &self.config
    }

    pub fn mask(&self) -> MaskGeometry {
        self.mask
    }

    /// Current live and committed transform values.
    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// Record the measured viewport size and re-clamp the transform to it.
    ///
    /// An unusable size leaves the previous layout in place.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> Result<(), CropError> {
        let viewport = ViewportSize::new(width, height)?;
        self.viewport = Some(viewport);
        let bounds = self.bounds()?;
        self.state = self.state.reclamp(&bounds);
        debug!(width, height, "viewport laid out");
        Ok(())
    }

    fn viewport(&self) -> Result<ViewportSize, CropError> {
        self.viewport.ok_or(CropError::LayoutNotReady)
    }

    /// Size of the upright image in the viewport at scale 1.
    pub fn displayed_extent(&self) -> Result<Size, CropError> {
        Ok(displayed_extent(
            self.source.oriented_dimensions(),
            self.viewport()?,
        ))
    }

    /// Source pixels per view unit at scale 1.
    pub fn pixels_per_view_unit(&self) -> Result<f64, CropError> {
        Ok(image_pixels_per_view_unit(
            self.source.oriented_dimensions(),
            self.viewport()?,
        ))
    }

    /// Zoom and pan limits for the current layout.
    pub fn bounds(&self) -> Result<CropBounds, CropError> {
        Ok(CropBounds::from_layout(
            &self.config,
            self.source.oriented_dimensions(),
            self.viewport()?,
        ))
    }

    /// Feed one gesture event and return the updated state.
    pub fn handle(&mut self, event: GestureEvent) -> Result<ViewportState, CropError> {
        let bounds = self.bounds()?;
        self.state = self.state.apply(event, &bounds, &self.config);
        Ok(self.state)
    }

    /// The committed crop window in pixels of the upright, unrotated image.
    pub fn crop_rect(&self) -> Result<PixelRect, CropError> {
        Ok(crop_window(
            self.source.oriented_dimensions(),
            self.pixels_per_view_unit()?,
            self.mask.radius,
            self.state.last_scale,
            self.state.last_translation,
        ))
    }

    fn crop_mode(&self) -> CropMode {
        if self.mask.shape == MaskShape::Circle && self.config.crop_image_circular {
            CropMode::Circle {
                fill: self.config.circle_fill,
            }
        } else {
            CropMode::Square
        }
    }

    /// Produce the final crop from the committed transform.
    ///
    /// The source is made upright, rotated by the committed angle when
    /// rotation is enabled, and cut to the mask window. A rotation failure
    /// is not fatal: the crop is taken from the unrotated image and the
    /// error is returned alongside it.
    ///
    /// # Errors
    ///
    /// `LayoutNotReady` before layout, `DegenerateCrop` when the window
    /// does not map to any pixels.
    pub fn complete(&self) -> Result<CropOutcome, CropError> {
        let k = self.pixels_per_view_unit()?;
        let upright = orient_upright(&self.source)?;
        let state = self.state;

        let rotate = self.config.rotate_image && state.last_rotation != 0.0;
        let mut rotation_error = None;
        let working = if rotate {
            match rotate_bitmap(
                &upright,
                state.last_rotation,
                self.config.rotation_filter,
                self.config.max_surface_pixels,
            ) {
                Ok(rotated) => rotated,
                Err(e) => {
                    warn!(error = %e, "rotation failed, cropping unrotated image");
                    rotation_error = Some(e);
                    upright
                }
            }
        } else {
            upright
        };

        let window = crop_window(
            (working.width, working.height),
            k,
            self.mask.radius,
            state.last_scale,
            state.last_translation,
        );
        let bitmap = extract_crop(&working, &window, self.crop_mode())?;

        debug!(
            width = bitmap.width,
            height = bitmap.height,
            scale = state.last_scale,
            rotation = state.last_rotation,
            rotated = rotate && rotation_error.is_none(),
            "crop completed"
        );

        Ok(CropOutcome {
            bitmap,
            rotation_error,
        })
    }
}
