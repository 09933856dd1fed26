//! Resampling at fractional source locations
//!
//! Locations are first clamped into `[0, w-1] x [0, h-1]`, so samples
//! past an edge repeat the edge pixel. NaN clamps to 0.

use holowarp_core::{Raster, color};

/// How a fractional location is turned into a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleMethod {
    /// Weighted average of the four surrounding pixels
    #[default]
    Bilinear,
    /// The pixel whose centre is closest
    Nearest,
}

/// Clamp a coordinate into `[0, max]`.
#[inline]
pub fn clamp_coord(v: f64, max: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, max) }
}

/// Sample `src` at `(x, y)` with the given method.
#[inline]
pub fn sample(src: &Raster, x: f64, y: f64, method: SampleMethod) -> u32 {
    match method {
        SampleMethod::Bilinear => sample_bilinear(src, x, y),
        SampleMethod::Nearest => sample_nearest(src, x, y),
    }
}

/// Bilinear interpolation over the four neighbours of `(x, y)`.
///
/// Every channel, alpha included, is interpolated in `f64` and rounded
/// half-up.
pub fn sample_bilinear(src: &Raster, x: f64, y: f64) -> u32 {
    let (w, h) = src.dimensions();
    let x = clamp_coord(x, (w - 1) as f64);
    let y = clamp_coord(y, (h - 1) as f64);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = color::to_channels(src.get_pixel_unchecked(x0, y0));
    let p10 = color::to_channels(src.get_pixel_unchecked(x1, y0));
    let p01 = color::to_channels(src.get_pixel_unchecked(x0, y1));
    let p11 = color::to_channels(src.get_pixel_unchecked(x1, y1));

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
        let bot = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
        let v = top * (1.0 - fy) + bot * fy;
        out[c] = (v + 0.5).floor().clamp(0.0, 255.0) as u8;
    }
    color::from_channels(out)
}

/// Nearest-neighbour sampling at `(x, y)`.
pub fn sample_nearest(src: &Raster, x: f64, y: f64) -> u32 {
    let (w, h) = src.dimensions();
    let x = clamp_coord(x, (w - 1) as f64).round() as u32;
    let y = clamp_coord(y, (h - 1) as f64).round() as u32;
    src.get_pixel_unchecked(x, y)
}
