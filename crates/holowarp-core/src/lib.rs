//! holowarp-core - Basic data structures for image warping
//!
//! This crate provides the fundamental data structures shared by the
//! holowarp crates:
//!
//! - [`Raster`] / [`RasterMut`] - The RGBA8 image container (immutable / mutable)
//! - [`ImageFormat`] - Encoded image formats known to the I/O layer
//! - [`color`] - Channel helpers for packed 32-bit RGBA pixels

pub mod error;
pub mod raster;

pub use error::{Error, Result};
pub use raster::{ImageFormat, Raster, RasterMut};

/// Color channel indices and helper functions for 32-bit RGBA pixels.
///
/// # Pixel format
///
/// Pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
pub mod color {
    /// Red channel (MSB, byte 0)
    pub const RED: usize = 0;
    /// Green channel (byte 1)
    pub const GREEN: usize = 1;
    /// Blue channel (byte 2)
    pub const BLUE: usize = 2;
    /// Alpha channel (LSB, byte 3)
    pub const ALPHA: usize = 3;

    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Extract alpha component from a 32-bit pixel.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

    /// Compose an opaque 32-bit RGB pixel (alpha = 255).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        compose_rgba(r, g, b, 255)
    }

    /// Compose a 32-bit RGBA pixel.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | ((a as u32) << ALPHA_SHIFT)
    }

    /// Extract RGB values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// Extract RGBA values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel), alpha(pixel))
    }

    /// Split a pixel into its four channels in `[R, G, B, A]` order.
    #[inline]
    pub fn to_channels(pixel: u32) -> [u8; 4] {
        pixel.to_be_bytes()
    }

    /// Pack four channels in `[R, G, B, A]` order into a pixel.
    #[inline]
    pub fn from_channels(channels: [u8; 4]) -> u32 {
        u32::from_be_bytes(channels)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_compose_extract() {
            let pixel = compose_rgba(0x12, 0x34, 0x56, 0x78);
            assert_eq!(pixel, 0x12345678);
            assert_eq!(extract_rgba(pixel), (0x12, 0x34, 0x56, 0x78));
            assert_eq!(extract_rgb(pixel), (0x12, 0x34, 0x56));
        }

        #[test]
        fn test_compose_rgb_is_opaque() {
            assert_eq!(alpha(compose_rgb(1, 2, 3)), 255);
        }

        #[test]
        fn test_channels_match_shifts() {
            let pixel = compose_rgba(10, 20, 30, 40);
            let ch = to_channels(pixel);
            assert_eq!(ch[RED], 10);
            assert_eq!(ch[GREEN], 20);
            assert_eq!(ch[BLUE], 30);
            assert_eq!(ch[ALPHA], 40);
            assert_eq!(from_channels(ch), pixel);
        }
    }
}
