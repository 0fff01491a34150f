//! Bitmap rotation with bilinear and Lanczos3 interpolation.
//!
//! The output canvas is the axis-aligned bounding box of the rotated
//! content, so no corner is clipped. Canvas pixels not covered by the
//! source are transparent for RGBA bitmaps and black for RGB bitmaps.
//!
//! # Algorithm
//!
//! Inverse mapping: for each output pixel center we find the source
//! position it came from and interpolate there. With θ positive meaning
//! clockwise on screen (y axis pointing down):
//! ```text
//! src_x =  (dst_x - dst_cx) * cos(θ) + (dst_y - dst_cy) * sin(θ) + src_cx
//! src_y = -(dst_x - dst_cx) * sin(θ) + (dst_y - dst_cy) * cos(θ) + src_cy
//! ```
//! Quarter turns skip resampling and move pixels exactly.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::error::CropError;

/// Angles closer than this to a quarter turn are treated as exact.
const ANGLE_EPSILON: f64 = 1e-9;

/// Interpolation filter for rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// High-quality Lanczos3 interpolation.
    Lanczos3,
}

/// Number of clockwise quarter turns if `radians` is a multiple of 90°.
fn quarter_turns(radians: f64) -> Option<u8> {
    let turns = radians.rem_euclid(TAU) / FRAC_PI_2;
    let nearest = turns.round();
    if (turns - nearest).abs() * FRAC_PI_2 < ANGLE_EPSILON {
        Some((nearest as u8) % 4)
    } else {
        None
    }
}

/// Dimensions of the bounding box of a `width` x `height` image rotated by `radians`.
///
/// ```text
/// new_w = |w*cos| + |h*sin|
/// new_h = |w*sin| + |h*cos|
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, radians: f64) -> (u32, u32) {
    match quarter_turns(radians) {
        Some(0) | Some(2) => return (width, height),
        Some(_) => return (height, width),
        None => {}
    }

    let cos = radians.cos().abs();
    let sin = radians.sin().abs();
    let (w, h) = (width as f64, height as f64);

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate a bitmap about its center.
///
/// # Arguments
///
/// * `bitmap` - Source bitmap; never modified
/// * `radians` - Rotation angle, positive = clockwise on screen
/// * `filter` - Resampling filter for non-quarter-turn angles
/// * `max_surface_pixels` - Largest output the caller allows to allocate
///
/// # Errors
///
/// `CropError::Rotation` if the angle is not finite, the source is empty, or
/// the rotated surface would exceed `max_surface_pixels`.
pub fn rotate_bitmap(
    bitmap: &Bitmap,
    radians: f64,
    filter: InterpolationFilter,
    max_surface_pixels: u64,
) -> Result<Bitmap, CropError> {
    if !radians.is_finite() {
        return Err(CropError::Rotation(format!("angle is not finite: {radians}")));
    }
    if bitmap.is_empty() {
        return Err(CropError::Rotation("source bitmap is empty".to_string()));
    }

    let (dst_w, dst_h) = compute_rotated_bounds(bitmap.width, bitmap.height, radians);
    let surface = dst_w as u64 * dst_h as u64;
    if surface > max_surface_pixels {
        return Err(CropError::Rotation(format!(
            "rotated surface {dst_w}x{dst_h} exceeds limit of {max_surface_pixels} pixels"
        )));
    }

    debug!(
        src_w = bitmap.width,
        src_h = bitmap.height,
        dst_w,
        dst_h,
        radians,
        "rotating bitmap"
    );

    if let Some(turns) = quarter_turns(radians) {
        return Ok(rotate_quarter_turns(bitmap, turns));
    }

    let (src_w, src_h) = (bitmap.width as f64, bitmap.height as f64);
    let cos = radians.cos();
    let sin = radians.sin();

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let bpp = bitmap.bytes_per_pixel();
    let mut output = Bitmap::blank(dst_w, dst_h, bitmap.format);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Work on pixel centers so the mapping is symmetric
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Back to source index space (centers at integer + 0.5 edges)
            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            let sample = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(bitmap, src_x, src_y),
                InterpolationFilter::Lanczos3 => sample_lanczos3(bitmap, src_x, src_y),
            };

            if let Some(pixel) = sample {
                let dst_idx = (dst_y as usize * dst_w as usize + dst_x as usize) * bpp;
                output.pixels[dst_idx..dst_idx + bpp].copy_from_slice(&pixel[..bpp]);
            }
        }
    }

    Ok(output)
}

/// Exact clockwise rotation by `turns` quarter turns.
fn rotate_quarter_turns(bitmap: &Bitmap, turns: u8) -> Bitmap {
    if turns == 0 {
        return bitmap.clone();
    }

    let (w, h) = (bitmap.width, bitmap.height);
    let (dst_w, dst_h) = if turns % 2 == 1 { (h, w) } else { (w, h) };
    let bpp = bitmap.bytes_per_pixel();
    let mut output = Bitmap::blank(dst_w, dst_h, bitmap.format);

    for y in 0..h {
        for x in 0..w {
            let (nx, ny) = match turns {
                1 => (h - 1 - y, x),
                2 => (w - 1 - x, h - 1 - y),
                _ => (y, w - 1 - x),
            };
            let dst_idx = (ny as usize * dst_w as usize + nx as usize) * bpp;
            output.pixels[dst_idx..dst_idx + bpp].copy_from_slice(bitmap.pixel(x, y));
        }
    }

    output
}

/// Get a pixel as `[f64; 4]` (unused channels stay zero).
#[inline]
fn get_pixel_f64(bitmap: &Bitmap, px: usize, py: usize) -> [f64; 4] {
    let bpp = bitmap.bytes_per_pixel();
    let idx = (py * bitmap.width as usize + px) * bpp;
    let mut out = [0.0; 4];
    for (c, v) in out.iter_mut().enumerate().take(bpp) {
        *v = bitmap.pixels[idx + c] as f64;
    }
    out
}

/// Whether a sample position lies on the source image (half a pixel of
/// overhang is still the edge pixel).
#[inline]
fn covers(bitmap: &Bitmap, x: f64, y: f64) -> bool {
    let (w, h) = (bitmap.width as f64, bitmap.height as f64);
    x >= -0.5 && x < w - 0.5 && y >= -0.5 && y < h - 0.5
}

/// Sample with bilinear interpolation, clamping neighbours to the edge.
///
/// Returns `None` outside the source image.
fn sample_bilinear(bitmap: &Bitmap, x: f64, y: f64) -> Option<[u8; 4]> {
    if !covers(bitmap, x, y) {
        return None;
    }

    let max_x = (bitmap.width - 1) as f64;
    let max_y = (bitmap.height - 1) as f64;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(bitmap.width as usize - 1);
    let y1 = (y0 + 1).min(bitmap.height as usize - 1);

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_f64(bitmap, x0, y0);
    let p10 = get_pixel_f64(bitmap, x1, y0);
    let p01 = get_pixel_f64(bitmap, x0, y1);
    let p11 = get_pixel_f64(bitmap, x1, y1);

    let mut result = [0u8; 4];
    for i in 0..bitmap.bytes_per_pixel() {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    Some(result)
}

/// Sample with Lanczos3 over a 6x6 neighbourhood.
///
/// Falls back to bilinear within the kernel radius of the edges.
fn sample_lanczos3(bitmap: &Bitmap, x: f64, y: f64) -> Option<[u8; 4]> {
    let (w, h) = (bitmap.width as i64, bitmap.height as i64);

    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(bitmap, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;

            if px >= 0 && px < w && py >= 0 && py < h {
                let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
                let pixel = get_pixel_f64(bitmap, px as usize, py as usize);
                for (acc, v) in sum.iter_mut().zip(pixel) {
                    *acc += v * weight;
                }
                weight_sum += weight;
            }
        }
    }

    let mut result = [0u8; 4];
    if weight_sum > 0.0 {
        for i in 0..bitmap.bytes_per_pixel() {
            result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
        }
    }

    Some(result)
}

/// Lanczos kernel: `sinc(x) * sinc(x/a)` for `|x| < a`, else 0.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
