//! Synthetic test images
//!
//! Regression tests build their inputs here instead of loading fixture
//! files, so every test is self-contained.

use holowarp_core::{Raster, RasterMut, color};
use holowarp_io::{ImageFormat, write_image_mem};

pub const RED: u32 = 0xFF0000FF;
pub const GREEN: u32 = 0x00FF00FF;
pub const BLUE: u32 = 0x0000FFFF;
pub const YELLOW: u32 = 0xFFFF00FF;
pub const WHITE: u32 = 0xFFFFFFFF;

/// A raster with every pixel set to `pixel`.
///
/// # Panics
///
/// Panics if either dimension is 0.
pub fn solid(width: u32, height: u32, pixel: u32) -> Raster {
    Raster::new_filled(width, height, pixel).expect("solid test image")
}

/// A raster split into four colored quadrants:
/// red (top-left), green (top-right), blue (bottom-left), white (bottom-right).
pub fn quadrants(width: u32, height: u32) -> Raster {
    let mut rm = RasterMut::new(width, height).expect("quadrant test image");
    for y in 0..height {
        for (x, pixel) in rm.row_data_mut(y).iter_mut().enumerate() {
            let right = x as u32 >= width / 2;
            let bottom = y >= height / 2;
            *pixel = match (right, bottom) {
                (false, false) => RED,
                (true, false) => GREEN,
                (false, true) => BLUE,
                (true, true) => WHITE,
            };
        }
    }
    rm.into()
}

/// A 2x2 raster with distinct corners:
/// red (0,0), green (1,0), blue (0,1), yellow (1,1).
pub fn corners_2x2() -> Raster {
    let mut rm = RasterMut::new(2, 2).expect("corner test image");
    rm.data_mut().copy_from_slice(&[RED, GREEN, BLUE, YELLOW]);
    rm.into()
}

/// A smooth gradient: red rises left to right, green rises top to bottom,
/// blue is constant.
pub fn gradient(width: u32, height: u32) -> Raster {
    let mut rm = RasterMut::new(width, height).expect("gradient test image");
    let sx = 255.0 / (width.max(2) - 1) as f64;
    let sy = 255.0 / (height.max(2) - 1) as f64;
    for y in 0..height {
        let g = (y as f64 * sy).round() as u8;
        for (x, pixel) in rm.row_data_mut(y).iter_mut().enumerate() {
            let r = (x as f64 * sx).round() as u8;
            *pixel = color::compose_rgb(r, g, 128);
        }
    }
    rm.into()
}

/// Encode a raster as PNG bytes (lossless).
pub fn png_bytes(raster: &Raster) -> Vec<u8> {
    write_image_mem(raster, ImageFormat::Png).expect("encode test PNG")
}

/// Encode a raster as JPEG bytes at the default quality.
pub fn jpeg_bytes(raster: &Raster) -> Vec<u8> {
    write_image_mem(raster, ImageFormat::Jpeg).expect("encode test JPEG")
}

/// Largest per-channel difference between two same-sized rasters.
///
/// # Panics
///
/// Panics if the sizes differ.
pub fn max_channel_diff(a: &Raster, b: &Raster) -> u8 {
    assert!(a.sizes_equal(b), "size mismatch");
    a.data()
        .iter()
        .zip(b.data())
        .flat_map(|(&p, &q)| {
            color::to_channels(p)
                .into_iter()
                .zip(color::to_channels(q))
                .map(|(c, d)| c.abs_diff(d))
        })
        .max()
        .unwrap_or(0)
}
