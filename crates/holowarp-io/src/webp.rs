//! WebP image format support
//!
//! Reads lossy and lossless still WebP images. Animated WebP images
//! (multiple frames) are not supported.

use crate::{IoError, IoResult};
use holowarp_core::{Raster, RasterMut, color};
use image_webp::WebPDecoder;
use std::io::{BufRead, Seek};

/// Read a WebP image
pub fn read_webp<R: BufRead + Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = WebPDecoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("WebP decode error: {}", e)))?;

    if decoder.is_animated() {
        return Err(IoError::UnsupportedFormat(
            "animated WebP not supported".to_string(),
        ));
    }

    let (width, height) = decoder.dimensions();
    let has_alpha = decoder.has_alpha();

    let buffer_size = decoder.output_buffer_size().ok_or_else(|| {
        IoError::DecodeError("failed to determine output buffer size".to_string())
    })?;

    let mut buffer = vec![0u8; buffer_size];
    decoder
        .read_image(&mut buffer)
        .map_err(|e| IoError::DecodeError(format!("WebP read error: {}", e)))?;

    let mut raster = RasterMut::new(width, height)?;

    // Decoder output is RGBA8 when the image has alpha, RGB8 otherwise
    let samples = if has_alpha { 4 } else { 3 };
    for (pixel, src) in raster.data_mut().iter_mut().zip(buffer.chunks_exact(samples)) {
        let a = if has_alpha { src[3] } else { 255 };
        *pixel = color::compose_rgba(src[0], src[1], src[2], a);
    }

    Ok(raster.into())
}
