//! GIF image format support
//!
//! Reads single-frame GIF images. Animated GIFs (multiple frames) are
//! not supported.

use crate::{IoError, IoResult};
use gif::{ColorOutput, DecodeOptions};
use holowarp_core::{Raster, RasterMut, color};
use std::io::Read;

/// Read a GIF image
///
/// The decoder expands the palette, so transparent palette entries
/// arrive with alpha 0.
pub fn read_gif<R: Read>(reader: R) -> IoResult<Raster> {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::RGBA);

    let mut decoder = options
        .read_info(reader)
        .map_err(|e| IoError::DecodeError(format!("GIF decode error: {}", e)))?;

    let frame = decoder
        .read_next_frame()
        .map_err(|e| IoError::DecodeError(format!("GIF frame error: {}", e)))?
        .ok_or_else(|| IoError::InvalidData("no frames in GIF".to_string()))?
        .clone();

    if decoder
        .read_next_frame()
        .map_err(|e| IoError::DecodeError(format!("GIF frame error: {}", e)))?
        .is_some()
    {
        return Err(IoError::UnsupportedFormat(
            "animated GIF not supported".to_string(),
        ));
    }

    let width = frame.width as u32;
    let height = frame.height as u32;
    let mut raster = RasterMut::new(width, height)?;

    let buffer = &frame.buffer;
    if buffer.len() < raster.data().len() * 4 {
        return Err(IoError::InvalidData(format!(
            "GIF frame buffer too short: {} bytes for {}x{}",
            buffer.len(),
            width,
            height
        )));
    }

    for (pixel, rgba) in raster.data_mut().iter_mut().zip(buffer.chunks_exact(4)) {
        *pixel = color::compose_rgba(rgba[0], rgba[1], rgba[2], rgba[3]);
    }

    Ok(raster.into())
}
