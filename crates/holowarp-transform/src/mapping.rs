//! Pixel grid <-> normalized complex plane
//!
//! Pixel `(x, y)` covers the unit square whose centre sits at
//! `(x + 0.5, y + 0.5)`. The plane origin is the grid centre `(w/2, h/2)`
//! and one unit equals `max(w, h) / 2` pixels, so the longer axis spans
//! `[-1, 1]`. The y axis points down, as in the image.

use crate::polynomial::ComplexMap;
use crate::{TransformError, TransformResult};
use num_complex::Complex64;

/// Reject grids that cannot be normalized or addressed.
pub fn validate_dimensions(width: u32, height: u32) -> TransformResult<()> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidDimensions { width, height });
    }
    holowarp_core::raster::pixel_count(width, height)
        .map(|_| ())
        .map_err(|_| TransformError::InvalidDimensions { width, height })
}

/// Centre and scale of one pixel grid
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    cx: f64,
    cy: f64,
    scale: f64,
}

impl Frame {
    fn new(width: u32, height: u32) -> TransformResult<Self> {
        validate_dimensions(width, height)?;
        Ok(Self {
            cx: width as f64 / 2.0,
            cy: height as f64 / 2.0,
            scale: width.max(height) as f64 / 2.0,
        })
    }

    #[inline]
    fn normalize(&self, x: f64, y: f64) -> Complex64 {
        Complex64::new(
            (x + 0.5 - self.cx) / self.scale,
            (y + 0.5 - self.cy) / self.scale,
        )
    }

    #[inline]
    fn denormalize(&self, z: Complex64) -> (f64, f64) {
        (
            z.re * self.scale + self.cx - 0.5,
            z.im * self.scale + self.cy - 0.5,
        )
    }
}

/// Map a pixel position of a `width x height` grid to the complex plane.
///
/// `x` and `y` may be fractional; integer values address pixel centres.
pub fn normalize(x: f64, y: f64, width: u32, height: u32) -> TransformResult<Complex64> {
    Ok(Frame::new(width, height)?.normalize(x, y))
}

/// Inverse of [`normalize`].
pub fn denormalize(z: Complex64, width: u32, height: u32) -> TransformResult<(f64, f64)> {
    Ok(Frame::new(width, height)?.denormalize(z))
}

/// Maps output pixels to fractional source locations through a complex map.
///
/// Output pixels are normalized against the output canvas and the mapped
/// value is denormalized against the source image, so canvas and source
/// sizes are independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    output: Frame,
    source: Frame,
    output_dims: (u32, u32),
    source_dims: (u32, u32),
}

impl CoordinateMapper {
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidDimensions`] if either grid has a
    /// zero side or too many pixels to address.
    pub fn new(source_dims: (u32, u32), output_dims: (u32, u32)) -> TransformResult<Self> {
        let output = Frame::new(output_dims.0, output_dims.1)?;
        let source = Frame::new(source_dims.0, source_dims.1)?;
        Ok(Self {
            output,
            source,
            output_dims,
            source_dims,
        })
    }

    pub fn source_dims(&self) -> (u32, u32) {
        self.source_dims
    }

    pub fn output_dims(&self) -> (u32, u32) {
        self.output_dims
    }

    /// Normalize an output pixel.
    #[inline]
    pub fn normalize_output(&self, x: u32, y: u32) -> Complex64 {
        self.output.normalize(x as f64, y as f64)
    }

    /// Denormalize a plane point into source pixel space.
    #[inline]
    pub fn denormalize_source(&self, z: Complex64) -> (f64, f64) {
        self.source.denormalize(z)
    }

    /// Fractional source location sampled by output pixel `(x, y)`.
    ///
    /// The result may lie outside the source or be non-finite; the
    /// resampler clamps it.
    #[inline]
    pub fn map_pixel<M: ComplexMap + ?Sized>(&self, x: u32, y: u32, map: &M) -> (f64, f64) {
        self.denormalize_source(map.eval(self.normalize_output(x, y)))
    }
}
