//! Gesture composition over an explicit transform state.
//!
//! A gesture streams deltas relative to where it started. Each update is
//! applied to the *committed* values (the state at the end of the previous
//! gesture) and clamped immediately, so every intermediate frame is legal.
//! Ending a gesture commits the live values as the anchor for the next one.
//!
//! Bounds are re-derived from the live scale on every update; there is no
//! frame where the translation is checked against a stale scale.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::bounds::CropBounds;
use crate::config::CropConfiguration;
use crate::geometry::Offset;

/// Base multiplier turning a pinch magnitude into a scale factor.
const MAGNIFICATION_SENSITIVITY: f64 = 0.1;

/// Live and committed pan/zoom/rotate values for one crop session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub scale: f64,
    pub translation: Offset,
    /// Radians, positive = clockwise on screen.
    pub rotation: f64,
    pub last_scale: f64,
    pub last_translation: Offset,
    pub last_rotation: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: Offset::ZERO,
            rotation: 0.0,
            last_scale: 1.0,
            last_translation: Offset::ZERO,
            last_rotation: 0.0,
        }
    }
}

/// One input from the front-end's gesture recognizers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    /// Pinch in progress; magnitude is relative to the pinch start (1.0 = none).
    Magnify(f64),
    MagnifyEnded,
    /// Drag in progress; delta is relative to the drag start, in view units.
    Pan { dx: f64, dy: f64 },
    PanEnded,
    /// Rotation in progress; radians relative to the rotation start.
    Rotate(f64),
    RotateEnded,
}

/// Scale factor for a pinch of `magnitude` at the configured sensitivity.
pub fn magnification_factor(magnitude: f64, zoom_sensitivity: f64) -> f64 {
    (magnitude - 1.0) * MAGNIFICATION_SENSITIVITY * zoom_sensitivity + 1.0
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a pinch update anchored on the committed scale.
    ///
    /// The committed translation is re-clamped at the new scale, since
    /// zooming out shrinks the legal pan range.
    pub fn magnify(self, bounds: &CropBounds, config: &CropConfiguration, magnitude: f64) -> Self {
        let proposed = self.last_scale * magnification_factor(magnitude, config.zoom_sensitivity);
        let (scale, translation) = bounds.clamp(proposed, self.last_translation);
        trace!(magnitude, proposed, scale, "magnify");
        Self {
            scale,
            translation,
            ..self
        }
    }

    /// Apply a drag update anchored on the committed translation.
    pub fn pan(self, bounds: &CropBounds, delta: Offset) -> Self {
        let (scale, translation) = bounds.clamp(self.scale, self.last_translation + delta);
        Self {
            scale,
            translation,
            ..self
        }
    }

    /// Apply a rotation update anchored on the committed angle.
    pub fn rotate(self, radians: f64) -> Self {
        let rotation = self.last_rotation + radians;
        if !rotation.is_finite() {
            return self;
        }
        Self { rotation, ..self }
    }

    /// Commit live scale and translation at the end of a pinch.
    pub fn end_magnify(self) -> Self {
        Self {
            last_scale: self.scale,
            last_translation: self.translation,
            ..self
        }
    }

    /// Commit live translation at the end of a drag.
    ///
    /// A pinch may still be running, so the committed translation is clamped
    /// against the committed scale to keep the committed pair legal.
    pub fn end_pan(self, bounds: &CropBounds) -> Self {
        Self {
            last_translation: bounds.clamp_translation(self.translation, self.last_scale),
            ..self
        }
    }

    /// Commit live rotation at the end of a rotation gesture.
    pub fn end_rotate(self) -> Self {
        Self {
            last_rotation: self.rotation,
            ..self
        }
    }

    /// Re-clamp live and committed values, e.g. after the viewport changed.
    pub fn reclamp(self, bounds: &CropBounds) -> Self {
        let (scale, translation) = bounds.clamp(self.scale, self.translation);
        let (last_scale, last_translation) = bounds.clamp(self.last_scale, self.last_translation);
        Self {
            scale,
            translation,
            last_scale,
            last_translation,
            ..self
        }
    }

    /// Apply one front-end event. Rotation events are ignored unless
    /// `config.rotate_image` is set.
    pub fn apply(self, event: GestureEvent, bounds: &CropBounds, config: &CropConfiguration) -> Self {
        match event {
            GestureEvent::Magnify(magnitude) => self.magnify(bounds, config, magnitude),
            GestureEvent::MagnifyEnded => self.end_magnify(),
            GestureEvent::Pan { dx, dy } => self.pan(bounds, Offset::new(dx, dy)),
            GestureEvent::PanEnded => self.end_pan(bounds),
            GestureEvent::Rotate(radians) if config.rotate_image => self.rotate(radians),
            GestureEvent::RotateEnded if config.rotate_image => self.end_rotate(),
            GestureEvent::Rotate(_) | GestureEvent::RotateEnded => self,
        }
    }
}
