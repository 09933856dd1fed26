//! PNG image format support

use crate::{IoError, IoResult};
use holowarp_core::{Raster, RasterMut, color};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
///
/// Palettes and low bit depths are expanded and 16-bit samples are
/// stripped to 8 bits by the decoder, so every PNG arrives here as one
/// of the four 8-bit color types.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;

    let (color_type, bit_depth) = reader.output_color_type();
    let samples = match (color_type, bit_depth) {
        (ColorType::Grayscale, BitDepth::Eight) => 1,
        (ColorType::GrayscaleAlpha, BitDepth::Eight) => 2,
        (ColorType::Rgb, BitDepth::Eight) => 3,
        (ColorType::Rgba, BitDepth::Eight) => 4,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG format: {:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let mut raster = RasterMut::new(width, height)?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    for y in 0..height {
        let row_start = y as usize * bytes_per_row;
        let row = raster.row_data_mut(y);
        for (x, pixel) in row.iter_mut().enumerate() {
            let idx = row_start + x * samples;
            *pixel = match samples {
                1 => {
                    let g = data[idx];
                    color::compose_rgb(g, g, g)
                }
                2 => {
                    let g = data[idx];
                    color::compose_rgba(g, g, g, data[idx + 1])
                }
                3 => color::compose_rgb(data[idx], data[idx + 1], data[idx + 2]),
                _ => color::compose_rgba(data[idx], data[idx + 1], data[idx + 2], data[idx + 3]),
            };
        }
    }

    Ok(raster.into())
}

/// Write a PNG image
///
/// Always written as 8-bit RGBA, so the round trip is lossless.
pub fn write_png<W: Write>(raster: &Raster, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, raster.width(), raster.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    writer
        .write_image_data(&raster.to_rgba_bytes())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}
