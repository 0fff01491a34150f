//! Crop session WASM bindings.
//!
//! The front-end forwards gesture recognizer callbacks to a `JsCropSession`
//! and reads back the clamped transform to render the preview. Updates
//! carry values relative to the gesture start; the matching `end_*` call
//! commits them.

use crate::types::{to_js_error, JsBitmap};
use framecrop_core::{
    CropConfiguration, CropError, CropSession, GestureEvent, MaskShape, Orientation, SourceImage,
};
use wasm_bindgen::prelude::*;

/// JavaScript-accessible crop session.
///
/// # Example (TypeScript)
/// ```typescript
/// const session = new JsCropSession(image, 6, 'square', { rotate_image: true });
/// session.set_viewport_size(320, 480);
///
/// pinch.onChange = (e) => {
///   session.magnify(e.scale);
///   render(session.scale, session.translation_x, session.translation_y);
/// };
/// pinch.onEnd = () => session.end_magnify();
///
/// const result = session.complete();
/// if (result.rotation_error) console.warn(result.rotation_error);
/// ```
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Start a crop session.
    ///
    /// # Arguments
    /// * `image` - Source pixels as stored
    /// * `orientation` - EXIF orientation code (1-8); other values mean upright
    /// * `shape` - `"circle"` or `"square"`
    /// * `config` - Configuration object; missing fields take their defaults,
    ///   `undefined` or `null` uses the defaults for everything
    ///
    /// # Errors
    /// Returns error if the shape or configuration is invalid, or the image is empty
    #[wasm_bindgen(constructor)]
    pub fn new(
        image: &JsBitmap,
        orientation: u8,
        shape: &str,
        config: JsValue,
    ) -> Result<JsCropSession, JsValue> {
        let shape = MaskShape::from_name(shape)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown mask shape: {}", shape)))?;
        let config: CropConfiguration = if config.is_undefined() || config.is_null() {
            CropConfiguration::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))?
        };
        Self::from_parts(image, orientation, shape, config).map_err(to_js_error)
    }

    /// Record the measured viewport size. Call again whenever layout changes.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner
            .set_viewport_size(width, height)
            .map_err(to_js_error)
    }

    /// Pinch update; `magnitude` is relative to the pinch start (1.0 = none).
    pub fn magnify(&mut self, magnitude: f64) -> Result<(), JsValue> {
        self.send(GestureEvent::Magnify(magnitude))
    }

    /// Commit the current zoom.
    pub fn end_magnify(&mut self) -> Result<(), JsValue> {
        self.send(GestureEvent::MagnifyEnded)
    }

    /// Drag update in view units, relative to the drag start.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        self.send(GestureEvent::Pan { dx, dy })
    }

    /// Commit the current pan.
    pub fn end_pan(&mut self) -> Result<(), JsValue> {
        self.send(GestureEvent::PanEnded)
    }

    /// Rotation update in radians, relative to the rotation start.
    /// Ignored unless `rotate_image` is enabled.
    pub fn rotate(&mut self, radians: f64) -> Result<(), JsValue> {
        self.send(GestureEvent::Rotate(radians))
    }

    /// Commit the current rotation.
    pub fn end_rotate(&mut self) -> Result<(), JsValue> {
        self.send(GestureEvent::RotateEnded)
    }

    /// Live zoom scale (1 = fit to viewport)
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.state().scale
    }

    /// Live horizontal offset in view units
    #[wasm_bindgen(getter)]
    pub fn translation_x(&self) -> f64 {
        self.inner.state().translation.x
    }

    /// Live vertical offset in view units
    #[wasm_bindgen(getter)]
    pub fn translation_y(&self) -> f64 {
        self.inner.state().translation.y
    }

    /// Live rotation in radians
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.state().rotation
    }

    /// Full live and committed state as a plain object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.state())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Displayed image size at scale 1 as `[width, height]`.
    pub fn displayed_extent(&self) -> Result<Vec<f64>, JsValue> {
        let extent = self.inner.displayed_extent().map_err(to_js_error)?;
        Ok(vec![extent.width, extent.height])
    }

    /// Committed crop window in source pixels as `[x, y, width, height]`.
    pub fn crop_rect(&self) -> Result<Vec<f64>, JsValue> {
        let rect = self.inner.crop_rect().map_err(to_js_error)?;
        Ok(vec![rect.x, rect.y, rect.width, rect.height])
    }

    /// Produce the final crop from the committed transform.
    ///
    /// # Errors
    /// Returns error if layout is not known yet or the crop window is degenerate
    pub fn complete(&self) -> Result<JsCropResult, JsValue> {
        let outcome = self.inner.complete().map_err(to_js_error)?;
        Ok(JsCropResult {
            image: JsBitmap::from_bitmap(outcome.bitmap),
            rotation_error: outcome.rotation_error.map(|e| e.to_string()),
        })
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsCropSession {
    /// Build a session from already-parsed parts.
    pub(crate) fn from_parts(
        image: &JsBitmap,
        orientation: u8,
        shape: MaskShape,
        config: CropConfiguration,
    ) -> Result<Self, CropError> {
        let source = SourceImage::new(
            image.bitmap().clone(),
            Orientation::from(u32::from(orientation)),
        );
        Ok(Self {
            inner: CropSession::new(source, shape, config)?,
        })
    }

    fn send(&mut self, event: GestureEvent) -> Result<(), JsValue> {
        self.inner.handle(event).map(|_| ()).map_err(to_js_error)
    }
}

/// Output of `JsCropSession::complete`.
#[wasm_bindgen]
pub struct JsCropResult {
    image: JsBitmap,
    rotation_error: Option<String>,
}

#[wasm_bindgen]
impl JsCropResult {
    /// The cropped image (a copy).
    pub fn image(&self) -> JsBitmap {
        self.image.clone()
    }

    /// Set when rotation failed and the crop was taken unrotated.
    #[wasm_bindgen(getter)]
    pub fn rotation_error(&self) -> Option<String> {
        self.rotation_error.clone()
    }
}
