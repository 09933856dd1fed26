//! Decode, warp, encode
//!
//! [`ImageTransform`] is the single contract callers depend on; any
//! raster-to-raster warp gets the byte-level pipeline for free.

use crate::error::{Error, Result};
use holowarp_core::Raster;
use holowarp_io::jpeg::MAX_JPEG_DIMENSION;
use holowarp_io::{DEFAULT_JPEG_QUALITY, IoError};
use holowarp_transform::{
    CoefficientVector, ComplexMap, Polynomial, SampleMethod, WarpOptions, validate_dimensions,
    warp,
};
use log::debug;

/// Options for the byte-level pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// JPEG quality, clamped into `1..=100` when encoding
    pub jpeg_quality: u8,
    /// Resampling method
    pub sample_method: SampleMethod,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            sample_method: SampleMethod::Bilinear,
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_sample_method(mut self, method: SampleMethod) -> Self {
        self.sample_method = method;
        self
    }

    fn warp_options(&self) -> WarpOptions {
        WarpOptions::new().with_method(self.sample_method)
    }
}

/// An image-to-image warp with a fixed configuration.
pub trait ImageTransform {
    /// Warp a decoded raster onto an `output_width x output_height` canvas.
    fn transform_raster(&self, src: &Raster, output_width: u32, output_height: u32)
    -> Result<Raster>;

    /// JPEG quality used by [`transform_bytes`](Self::transform_bytes).
    fn jpeg_quality(&self) -> u8 {
        DEFAULT_JPEG_QUALITY
    }

    /// Decode `image_bytes`, warp, and encode the result as JPEG.
    ///
    /// Output dimensions are checked before the bytes are decoded: a
    /// canvas the JPEG encoder cannot express fails with
    /// [`Error::Encode`] without decoding or warping anything.
    fn transform_bytes(
        &self,
        image_bytes: &[u8],
        output_width: u32,
        output_height: u32,
    ) -> Result<Vec<u8>> {
        validate_dimensions(output_width, output_height)?;
        if output_width > MAX_JPEG_DIMENSION || output_height > MAX_JPEG_DIMENSION {
            return Err(Error::Encode(IoError::EncodeError(format!(
                "canvas {}x{} exceeds JPEG limit of {} pixels per side",
                output_width, output_height, MAX_JPEG_DIMENSION
            ))));
        }

        let src = holowarp_io::read_image_mem(image_bytes).map_err(Error::Decode)?;
        let out = self.transform_raster(&src, output_width, output_height)?;

        let mut jpeg = Vec::new();
        holowarp_io::jpeg::write_jpeg(&out, &mut jpeg, self.jpeg_quality())
            .map_err(Error::Encode)?;
        debug!(
            "transformed {} input bytes into {}x{} JPEG of {} bytes",
            image_bytes.len(),
            output_width,
            output_height,
            jpeg.len()
        );
        Ok(jpeg)
    }
}

/// Warps through a complex polynomial built from `(re, im)` pairs.
///
/// # Examples
///
/// ```
/// use holowarp::{ImageTransform, PolynomialWarper, Raster};
///
/// let src = Raster::new_filled(4, 4, 0xFF0000FF).unwrap();
/// let warper = PolynomialWarper::new(&[0.0, 0.0, 1.0, 0.0]).unwrap();
/// let out = warper.transform_raster(&src, 4, 4).unwrap();
/// assert!(out.equals(&src));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialWarper {
    polynomial: Polynomial,
    options: TransformOptions,
}

impl PolynomialWarper {
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoefficients`] if `coefficients` is empty or
    /// has odd length.
    pub fn new(coefficients: &[f64]) -> Result<Self> {
        let coeffs = CoefficientVector::from_reals(coefficients)?;
        debug!("polynomial of degree {}", coeffs.degree());
        Ok(Self {
            polynomial: Polynomial::new(coeffs),
            options: TransformOptions::default(),
        })
    }

    pub fn from_polynomial(polynomial: Polynomial) -> Self {
        Self {
            polynomial,
            options: TransformOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }
}

impl ImageTransform for PolynomialWarper {
    fn transform_raster(
        &self,
        src: &Raster,
        output_width: u32,
        output_height: u32,
    ) -> Result<Raster> {
        warp_with(src, &self.polynomial, output_width, output_height, &self.options)
    }

    fn jpeg_quality(&self) -> u8 {
        self.options.jpeg_quality
    }
}

/// Warp through any [`ComplexMap`] with pipeline options.
pub fn warp_with<M: ComplexMap + ?Sized>(
    src: &Raster,
    map: &M,
    output_width: u32,
    output_height: u32,
    options: &TransformOptions,
) -> Result<Raster> {
    Ok(warp(
        src,
        map,
        output_width,
        output_height,
        &options.warp_options(),
    )?)
}

/// Warp an encoded image through the polynomial given by `coefficients`
/// and return JPEG bytes.
///
/// `coefficients` holds flattened `(re, im)` pairs, constant term first.
/// The output canvas is `output_width x output_height` regardless of the
/// source size. Validation happens in order: coefficients, dimensions,
/// then decoding. Identical inputs always give identical bytes.
///
/// # Errors
///
/// - [`Error::InvalidCoefficients`] for an empty or odd-length list
/// - [`Error::InvalidDimensions`] for a zero or unaddressable canvas
/// - [`Error::Decode`] for malformed or unsupported image bytes
/// - [`Error::Encode`] if the canvas cannot be written as JPEG (e.g. a
///   side longer than 65535)
pub fn transform(
    image_bytes: &[u8],
    output_width: u32,
    output_height: u32,
    coefficients: &[f64],
) -> Result<Vec<u8>> {
    PolynomialWarper::new(coefficients)?.transform_bytes(image_bytes, output_width, output_height)
}
