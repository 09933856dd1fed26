//! holowarp-io - Image decoding and encoding
//!
//! Every decoder normalizes its input to a [`Raster`] of RGBA8 pixels:
//! grayscale is expanded to gray RGB, missing alpha becomes 255, palettes
//! are expanded and 16-bit samples are reduced to their high byte.
//!
//! | Format | Read | Write | Feature |
//! |---|---|---|---|
//! | PNG | yes | yes | `png-format` (default) |
//! | JPEG | yes | yes | `jpeg` (default) |
//! | BMP | yes | no | `bmp` (default) |
//! | GIF | yes (single frame) | no | `gif-format` |
//! | WebP | yes (single frame) | no | `webp-format` |

#[cfg(feature = "bmp")]
pub mod bmp;
mod error;
pub mod format;
#[cfg(feature = "gif-format")]
pub mod gif;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "webp-format")]
pub mod webp;

pub use error::{IoError, IoResult};
pub use format::detect_format_from_bytes;
pub use holowarp_core::ImageFormat;

#[cfg(feature = "jpeg")]
pub use jpeg::DEFAULT_JPEG_QUALITY;

use holowarp_core::Raster;
use log::debug;

/// Decode an image from an in-memory buffer, detecting its format.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for unrecognized or disabled
/// formats, and a decode or I/O error for malformed or truncated data.
/// No partial image is ever returned.
pub fn read_image_mem(data: &[u8]) -> IoResult<Raster> {
    let format = detect_format_from_bytes(data)?;
    let raster = read_image_mem_format(data, format)?;
    debug!(
        "decoded {:?} image: {}x{}",
        format,
        raster.width(),
        raster.height()
    );
    Ok(raster)
}

/// Decode an image from an in-memory buffer in a known format.
pub fn read_image_mem_format(data: &[u8], format: ImageFormat) -> IoResult<Raster> {
    #[allow(unused_imports)]
    use std::io::Cursor;

    let raster = match format {
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => crate::bmp::read_bmp(Cursor::new(data))?,
        #[cfg(feature = "png-format")]
        ImageFormat::Png => crate::png::read_png(Cursor::new(data))?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => crate::jpeg::read_jpeg(Cursor::new(data))?,
        #[cfg(feature = "gif-format")]
        ImageFormat::Gif => crate::gif::read_gif(Cursor::new(data))?,
        #[cfg(feature = "webp-format")]
        ImageFormat::WebP => crate::webp::read_webp(Cursor::new(data))?,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} decoding is not enabled",
                format
            )));
        }
    };

    let mut raster = match raster.try_into_mut() {
        Ok(raster) => raster,
        Err(shared) => shared.to_mut(),
    };
    raster.set_informat(format);
    Ok(raster.into())
}

/// Encode an image into an in-memory buffer.
///
/// JPEG output uses [`DEFAULT_JPEG_QUALITY`]; use [`jpeg::write_jpeg`]
/// directly to choose another quality.
pub fn write_image_mem(raster: &Raster, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => crate::png::write_png(raster, &mut buffer)?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => crate::jpeg::write_jpeg(raster, &mut buffer, DEFAULT_JPEG_QUALITY)?,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} encoding is not enabled",
                format
            )));
        }
    }
    debug!(
        "encoded {}x{} image as {:?}: {} bytes",
        raster.width(),
        raster.height(),
        format,
        buffer.len()
    );
    Ok(buffer)
}
