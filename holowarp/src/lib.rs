//! holowarp - Warp images through complex polynomials
//!
//! Each output pixel is placed on the complex plane, sent through a
//! polynomial `P(z) = Σ ci · z^i`, and the source image is sampled at
//! the resulting point. The whole pipeline is one call:
//!
//! ```
//! use holowarp::{Raster, io, transform};
//!
//! let src = Raster::new_filled(8, 8, 0x3366CCFF).unwrap();
//! let png = io::write_image_mem(&src, io::ImageFormat::Png).unwrap();
//!
//! // P(z) = z, on a 16x12 canvas
//! let jpeg = transform(&png, 16, 12, &[0.0, 0.0, 1.0, 0.0]).unwrap();
//! assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
//! ```
//!
//! The crates underneath are re-exported as modules: [`io`] for codecs
//! and [`transform`](mod@transform) for polynomials, coordinate mapping and
//! resampling.

mod error;
mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{ImageTransform, PolynomialWarper, TransformOptions, transform, warp_with};

pub use holowarp_core::{ImageFormat, Raster, RasterMut, color};

pub use holowarp_io as io;
pub use holowarp_transform as transform;
