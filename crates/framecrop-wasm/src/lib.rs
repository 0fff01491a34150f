//! Framecrop WASM - WebAssembly bindings for the crop engine
//!
//! This crate exposes framecrop-core to JavaScript/TypeScript front-ends.
//! The front-end owns gesture recognition and rendering; the session here
//! owns the transform state and produces the final crop.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper for pixel buffers
//! - `session` - Interactive crop session bindings
//! - `transform` - Standalone rotation binding
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsBitmap, JsCropSession } from '@framecrop/wasm';
//!
//! await init();
//!
//! const image = new JsBitmap(width, height, 4, rgbaPixels);
//! const session = new JsCropSession(image, exifOrientation, 'circle', {
//!   mask_radius: 130,
//!   crop_image_circular: true,
//! });
//! session.set_viewport_size(view.clientWidth, view.clientHeight);
//!
//! // Feed gesture updates, then commit at gesture end
//! session.magnify(pinch.scale);
//! session.end_magnify();
//!
//! const result = session.complete();
//! const cropped = result.image();
//! ```

use wasm_bindgen::prelude::*;

mod session;
mod transform;
mod types;

pub use session::{JsCropResult, JsCropSession};
pub use transform::rotate_image;
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
