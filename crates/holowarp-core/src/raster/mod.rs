//! Raster - The RGBA8 image container
//!
//! The `Raster` structure is the image type every holowarp stage works
//! on: the decoder produces one, the warp reads one and writes another,
//! and the encoder consumes one.
//!
//! # Pixel layout
//!
//! - One 32-bit word per pixel, packed `0xRRGGBBAA` (see [`crate::color`])
//! - Rows are stored top to bottom, pixels left to right, with no padding
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for cheap cloning and is immutable. To build or
//! modify pixel data, use a [`RasterMut`] (via [`RasterMut::new`],
//! [`Raster::try_into_mut`] or [`Raster::to_mut`]) and convert back with
//! `Into<Raster>`.

mod access;

use crate::color;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Encoded image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Unknown format
    #[default]
    Unknown,
    /// BMP format
    Bmp,
    /// JFIF JPEG format
    Jpeg,
    /// PNG format
    Png,
    /// GIF format
    Gif,
    /// WebP format
    WebP,
}

impl ImageFormat {
    /// Get the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => "dat",
            Self::Bmp => "bmp",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::WebP => "webp",
        }
    }
}

/// Internal raster data
#[derive(Debug, Clone)]
struct RasterData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Format the pixels were decoded from
    informat: ImageFormat,
    /// Packed RGBA pixels, row-major
    data: Vec<u32>,
}

impl RasterData {
    fn new(width: u32, height: u32, fill: u32) -> Result<Self> {
        let len = pixel_count(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::InvalidDimension { width, height })?;
        data.resize(len, fill);
        Ok(Self {
            width,
            height,
            informat: ImageFormat::Unknown,
            data,
        })
    }
}

/// Number of pixels in a `width x height` image.
///
/// # Errors
///
/// Returns [`Error::InvalidDimension`] if either side is 0 or the byte
/// size of an RGBA8 buffer of that shape does not fit in `usize`.
pub fn pixel_count(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimension { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .filter(|n| n.checked_mul(4).is_some())
        .ok_or(Error::InvalidDimension { width, height })
}

/// Raster - Immutable RGBA8 image
///
/// # Examples
///
/// ```
/// use holowarp_core::{Raster, color};
///
/// let red = Raster::new_filled(4, 3, color::compose_rgb(255, 0, 0)).unwrap();
/// assert_eq!(red.dimensions(), (4, 3));
/// assert_eq!(red.get_rgba(3, 2), Some((255, 0, 0, 255)));
/// ```
#[derive(Debug, Clone)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a new raster with every pixel set to 0 (transparent black).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(RasterMut::new(width, height)?.into())
    }

    /// Create a new raster with every pixel set to `pixel`.
    pub fn new_filled(width: u32, height: u32, pixel: u32) -> Result<Self> {
        Ok(RasterMut::new_filled(width, height, pixel)?.into())
    }

    /// Create a raster from interleaved RGBA8 samples.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferLength`] if `samples` is not exactly
    /// `width * height * 4` bytes long.
    pub fn from_rgba_bytes(width: u32, height: u32, samples: &[u8]) -> Result<Self> {
        let len = pixel_count(width, height)?;
        if samples.len() != len * 4 {
            return Err(Error::BufferLength {
                expected: len * 4,
                actual: samples.len(),
            });
        }
        let data = samples
            .chunks_exact(4)
            .map(|px| color::from_channels([px[0], px[1], px[2], px[3]]))
            .collect();
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                informat: ImageFormat::Unknown,
                data,
            }),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Get the format the raster was decoded from.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Get raw access to the packed pixels.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get the number of strong references to this raster.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Get the pixels of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &self.inner.data[start..start + w]
    }

    /// Check if two rasters have the same width and height.
    pub fn sizes_equal(&self, other: &Raster) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Check if two rasters have the same size and identical pixels.
    pub fn equals(&self, other: &Raster) -> bool {
        self.sizes_equal(other) && self.inner.data == other.inner.data
    }

    /// Interleaved RGBA8 samples, 4 bytes per pixel.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.inner
            .data
            .iter()
            .flat_map(|&px| color::to_channels(px))
            .collect()
    }

    /// Interleaved RGB8 samples with alpha dropped, 3 bytes per pixel.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.inner.data.len() * 3);
        for &px in &self.inner.data {
            let (r, g, b) = color::extract_rgb(px);
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }

    /// Try to take unique ownership for mutation without copying.
    ///
    /// Returns `Err(self)` if other clones of this raster are alive.
    pub fn try_into_mut(self) -> std::result::Result<RasterMut, Self> {
        Arc::try_unwrap(self.inner)
            .map(|inner| RasterMut { inner })
            .map_err(|inner| Raster { inner })
    }

    /// Copy the pixels into a new mutable raster.
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: (*self.inner).clone(),
        }
    }
}

/// RasterMut - Uniquely owned, mutable RGBA8 image
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Create a new mutable raster with every pixel set to 0.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_filled(width, height, 0)
    }

    /// Create a new mutable raster with every pixel set to `pixel`.
    pub fn new_filled(width: u32, height: u32, pixel: u32) -> Result<Self> {
        Ok(Self {
            inner: RasterData::new(width, height, pixel)?,
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Record the format the pixels were decoded from.
    pub fn set_informat(&mut self, format: ImageFormat) {
        self.inner.informat = format;
    }

    /// Get raw access to the packed pixels.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get mutable access to the packed pixels.
    ///
    /// Rows are contiguous, so `data_mut().chunks_mut(width)` yields
    /// disjoint row slices.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Get the pixels of row `y` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let w = self.inner.width as usize;
        let start = y as usize * w;
        &mut self.inner.data[start..start + w]
    }
}

impl From<RasterMut> for Raster {
    fn from(raster: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster.inner),
        }
    }
}
