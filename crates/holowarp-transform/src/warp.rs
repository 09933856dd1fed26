//! Complex-map image warping
//!
//! Every output pixel is mapped to a fractional source location by a
//! [`ComplexMap`] and resampled there. Rows are independent; with the
//! `parallel` feature they are filled concurrently by rayon, each task
//! owning one disjoint output row.
//!
//! # Example
//!
//! ```
//! use holowarp_core::Raster;
//! use holowarp_transform::{Polynomial, WarpOptions, warp};
//!
//! let src = Raster::new_filled(8, 8, 0xFF0000FF).unwrap();
//! let p = Polynomial::from_reals(&[0.0, 0.0, 1.0, 0.0]).unwrap();
//! let out = warp(&src, &p, 16, 4, &WarpOptions::default()).unwrap();
//! assert_eq!(out.dimensions(), (16, 4));
//! ```

use crate::mapping::CoordinateMapper;
use crate::polynomial::ComplexMap;
use crate::sample::{SampleMethod, sample};
use crate::{TransformError, TransformResult};
use holowarp_core::{Raster, RasterMut};
use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Options for [`warp`] and [`WarpMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WarpOptions {
    /// Resampling method
    pub method: SampleMethod,
}

impl WarpOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resampling method
    pub fn with_method(mut self, method: SampleMethod) -> Self {
        self.method = method;
        self
    }
}

/// Fill `out` row by row; `f(y, row)` writes one row.
#[cfg(feature = "parallel")]
fn fill_rows<F>(out: &mut RasterMut, f: F)
where
    F: Fn(u32, &mut [u32]) + Sync,
{
    let w = out.width() as usize;
    out.data_mut()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| f(y as u32, row));
}

/// Fill `out` row by row (single-threaded fallback).
#[cfg(not(feature = "parallel"))]
fn fill_rows<F>(out: &mut RasterMut, f: F)
where
    F: Fn(u32, &mut [u32]),
{
    let w = out.width() as usize;
    out.data_mut()
        .chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| f(y as u32, row));
}

/// Warp `src` onto a fresh `out_width x out_height` canvas.
///
/// Output pixel `(x, y)` takes the source sample at
/// `mapper.map_pixel(x, y, map)`, clamped to the source edges.
///
/// # Errors
///
/// Returns [`TransformError::InvalidDimensions`] if the output size is
/// zero or unaddressable.
pub fn warp<M: ComplexMap + ?Sized>(
    src: &Raster,
    map: &M,
    out_width: u32,
    out_height: u32,
    options: &WarpOptions,
) -> TransformResult<Raster> {
    let mapper = CoordinateMapper::new(src.dimensions(), (out_width, out_height))?;
    debug!(
        "warp {}x{} -> {}x{} ({:?})",
        src.width(),
        src.height(),
        out_width,
        out_height,
        options.method
    );

    let method = options.method;
    let mut out = RasterMut::new(out_width, out_height)?;
    fill_rows(&mut out, |y, row| {
        for (x, pixel) in row.iter_mut().enumerate() {
            let (sx, sy) = mapper.map_pixel(x as u32, y, map);
            *pixel = sample(src, sx, sy, method);
        }
    });

    Ok(out.into())
}

/// Precomputed source locations for one (map, source size, output size).
///
/// Evaluating the map dominates the cost of a warp; a `WarpMap` pays it
/// once and can then be applied to any number of same-sized sources.
/// [`WarpMap::apply`] produces exactly what [`warp`] would.
#[derive(Debug, Clone)]
pub struct WarpMap {
    mapper: CoordinateMapper,
    locations: Vec<(f64, f64)>,
    method: SampleMethod,
}

impl WarpMap {
    /// Evaluate `map` for every pixel of an `output_dims` canvas sampling a
    /// `source_dims` image.
    pub fn new<M: ComplexMap + ?Sized>(
        map: &M,
        source_dims: (u32, u32),
        output_dims: (u32, u32),
        options: &WarpOptions,
    ) -> TransformResult<Self> {
        let mapper = CoordinateMapper::new(source_dims, output_dims)?;
        let (w, h) = output_dims;
        debug!(
            "building warp map {}x{} -> {}x{}",
            source_dims.0, source_dims.1, w, h
        );

        let row = |y: u32| (0..w).map(move |x| mapper.map_pixel(x, y, map));
        #[cfg(feature = "parallel")]
        let locations: Vec<(f64, f64)> = (0..h)
            .into_par_iter()
            .flat_map_iter(row)
            .collect();
        #[cfg(not(feature = "parallel"))]
        let locations: Vec<(f64, f64)> = (0..h).flat_map(row).collect();

        Ok(Self {
            mapper,
            locations,
            method: options.method,
        })
    }

    pub fn source_dims(&self) -> (u32, u32) {
        self.mapper.source_dims()
    }

    pub fn output_dims(&self) -> (u32, u32) {
        self.mapper.output_dims()
    }

    /// Precomputed source location for output pixel `(x, y)`
    pub fn location(&self, x: u32, y: u32) -> Option<(f64, f64)> {
        let (w, h) = self.output_dims();
        if x >= w || y >= h {
            return None;
        }
        self.locations
            .get(y as usize * w as usize + x as usize)
            .copied()
    }

    /// Resample `src` through the precomputed locations.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::DimensionMismatch`] if `src` is not the
    /// size the map was built for.
    pub fn apply(&self, src: &Raster) -> TransformResult<Raster> {
        if src.dimensions() != self.source_dims() {
            return Err(TransformError::DimensionMismatch {
                expected: self.source_dims(),
                actual: src.dimensions(),
            });
        }

        let (w, h) = self.output_dims();
        let method = self.method;
        let mut out = RasterMut::new(w, h)?;
        fill_rows(&mut out, |y, row| {
            let start = y as usize * w as usize;
            let locs = &self.locations[start..start + row.len()];
            for (pixel, &(sx, sy)) in row.iter_mut().zip(locs) {
                *pixel = sample(src, sx, sy, method);
            }
        });

        Ok(out.into())
    }
}
