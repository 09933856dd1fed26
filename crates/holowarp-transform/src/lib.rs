//! holowarp-transform - Complex-map geometric warps
//!
//! This crate provides the geometry of a holomorphic image warp:
//!
//! - Coefficient vectors built from flattened `(re, im)` pairs
//! - Horner-evaluated polynomials and rational functions ([`ComplexMap`])
//! - Mapping between pixel grids and the normalized complex plane
//! - Bilinear and nearest-neighbour resampling with edge clamping
//! - The per-pixel warp loop (row-parallel with the `parallel` feature)
//!   and reusable precomputed warp maps

pub mod coeffs;
mod error;
pub mod mapping;
pub mod polynomial;
pub mod sample;
pub mod warp;

pub use coeffs::CoefficientVector;
pub use error::{TransformError, TransformResult};
pub use mapping::{CoordinateMapper, denormalize, normalize, validate_dimensions};
pub use polynomial::{ComplexMap, POLE_EPSILON, Polynomial, RationalFunction};
pub use sample::{SampleMethod, sample, sample_bilinear, sample_nearest};
pub use warp::{WarpMap, WarpOptions, warp};

pub use num_complex::Complex64;
