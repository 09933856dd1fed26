//! BMP image format support
//!
//! Reads uncompressed Windows Bitmap (BMP) files. Palette images
//! (1, 4, 8 bpp) are expanded through their color table. 32 bpp images
//! are opaque unless BI_BITFIELDS declares the top byte as alpha.

use crate::{IoError, IoResult};
use holowarp_core::{Raster, RasterMut, color};
use std::io::Read;

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Smallest header carrying the RGB masks (BITMAPV2INFOHEADER)
const BMP_V2_HEADER_SIZE: u32 = 52;

/// Smallest header carrying the alpha mask (BITMAPV3INFOHEADER)
const BMP_V3_HEADER_SIZE: u32 = 56;

const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Skip `count` bytes, failing if the stream ends first.
fn skip_bytes<R: Read>(reader: &mut R, count: u64) -> IoResult<()> {
    let skipped = std::io::copy(&mut reader.by_ref().take(count), &mut std::io::sink())
        .map_err(IoError::Io)?;
    if skipped < count {
        return Err(truncated("BMP header"));
    }
    Ok(())
}

fn truncated(what: &str) -> IoError {
    IoError::Io(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        format!("{} truncated", what),
    ))
}

/// Read a BMP image
///
/// Pixel data is read and its length checked against the header before
/// the raster is allocated, so a header claiming a huge image fails with
/// an error instead of an allocation.
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<Raster> {
    let mut file_header = [0u8; BMP_FILE_HEADER_SIZE];
    reader.read_exact(&mut file_header).map_err(IoError::Io)?;

    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }

    let pixel_offset = le_u32(&file_header, 10) as u64;

    let mut info_header = [0u8; 40];
    reader.read_exact(&mut info_header).map_err(IoError::Io)?;

    let header_size = le_u32(&info_header, 0);
    if header_size < BMP_INFO_HEADER_SIZE {
        return Err(IoError::InvalidData(format!(
            "unsupported BMP header size: {}",
            header_size
        )));
    }

    let width = le_u32(&info_header, 4) as i32;
    let height = le_u32(&info_header, 8) as i32;

    let planes = le_u16(&info_header, 12);
    if planes != 1 {
        return Err(IoError::InvalidData(format!(
            "unsupported number of planes: {}",
            planes
        )));
    }

    let bits_per_pixel = le_u16(&info_header, 14);
    let compression = le_u32(&info_header, 16);
    let colors_used = le_u32(&info_header, 32);

    if compression != BI_RGB && compression != BI_BITFIELDS {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP compression: {}",
            compression
        )));
    }

    if !matches!(bits_per_pixel, 1 | 4 | 8 | 24 | 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit depth: {}",
            bits_per_pixel
        )));
    }

    // V2+ headers carry the channel masks at info offsets 40..56
    let extra = (header_size - BMP_INFO_HEADER_SIZE) as u64;
    let mut masks = [0u8; 16];
    let in_header = extra.min(masks.len() as u64) as usize;
    reader.read_exact(&mut masks[..in_header]).map_err(IoError::Io)?;
    skip_bytes(&mut reader, extra - in_header as u64)?;

    let mut trailing_masks = 0u64;
    if compression == BI_BITFIELDS && header_size < BMP_V2_HEADER_SIZE {
        if header_size != BMP_INFO_HEADER_SIZE {
            return Err(IoError::InvalidData(format!(
                "BMP header of {} bytes cannot hold bit field masks",
                header_size
            )));
        }
        reader.read_exact(&mut masks[..12]).map_err(IoError::Io)?;
        trailing_masks = 12;
    }

    let use_alpha = if compression == BI_BITFIELDS {
        bitfield_alpha(bits_per_pixel, header_size, &masks)?
    } else {
        false
    };

    // Color table for 1, 4, 8 bpp images, stored as B, G, R, reserved.
    // Short tables are padded with black so every index resolves.
    let table_entries = if bits_per_pixel <= 8 {
        palette_entries(bits_per_pixel, colors_used)
    } else {
        0
    };
    let palette: Vec<u32> = if bits_per_pixel <= 8 {
        let mut table = vec![0u8; table_entries as usize * 4];
        reader.read_exact(&mut table).map_err(IoError::Io)?;
        let mut palette: Vec<u32> = table
            .chunks_exact(4)
            .map(|bgra| color::compose_rgb(bgra[2], bgra[1], bgra[0]))
            .collect();
        palette.resize(1 << bits_per_pixel, color::compose_rgb(0, 0, 0));
        palette
    } else {
        Vec::new()
    };

    let current_pos =
        BMP_FILE_HEADER_SIZE as u64 + header_size as u64 + trailing_masks + table_entries * 4;
    if pixel_offset > current_pos {
        skip_bytes(&mut reader, pixel_offset - current_pos)?;
    }

    let width = width.unsigned_abs();
    let top_down = height < 0;
    let height = height.unsigned_abs();

    // BMP rows are 4-byte aligned
    let row_stride = (width as u64 * bits_per_pixel as u64).div_ceil(32) * 4;
    let data_len = row_stride
        .checked_mul(height as u64)
        .ok_or(holowarp_core::Error::InvalidDimension { width, height })?;

    let mut data = Vec::new();
    reader.take(data_len).read_to_end(&mut data).map_err(IoError::Io)?;
    if (data.len() as u64) < data_len {
        return Err(truncated("BMP pixel data"));
    }

    let mut raster = RasterMut::new(width, height)?;

    for (row, row_buffer) in data.chunks_exact(row_stride as usize).enumerate() {
        let row = row as u32;
        let y = if top_down { row } else { height - 1 - row };
        let out = raster.row_data_mut(y);

        for (x, pixel) in out.iter_mut().enumerate() {
            *pixel = match bits_per_pixel {
                1 => palette[((row_buffer[x / 8] >> (7 - (x % 8))) & 1) as usize],
                4 => {
                    let byte = row_buffer[x / 2];
                    let index = if x % 2 == 0 { byte >> 4 } else { byte & 0xF };
                    palette[index as usize]
                }
                8 => palette[row_buffer[x] as usize],
                24 => {
                    let idx = x * 3;
                    color::compose_rgb(row_buffer[idx + 2], row_buffer[idx + 1], row_buffer[idx])
                }
                _ => {
                    let idx = x * 4;
                    let alpha = if use_alpha { row_buffer[idx + 3] } else { 255 };
                    color::compose_rgba(
                        row_buffer[idx + 2],
                        row_buffer[idx + 1],
                        row_buffer[idx],
                        alpha,
                    )
                }
            };
        }
    }

    Ok(raster.into())
}

/// Number of color table entries stored in the file.
fn palette_entries(bits_per_pixel: u16, colors_used: u32) -> u64 {
    let max_colors = 1u32 << bits_per_pixel;
    if colors_used == 0 || colors_used > max_colors {
        max_colors as u64
    } else {
        colors_used as u64
    }
}

/// Check BI_BITFIELDS masks and report whether the top byte is alpha.
///
/// Only the byte-aligned 32 bpp layout (`B, G, R, A` in memory) is
/// accepted; any other layout is rejected rather than misread.
fn bitfield_alpha(bits_per_pixel: u16, header_size: u32, masks: &[u8; 16]) -> IoResult<bool> {
    let (red, green, blue) = (le_u32(masks, 0), le_u32(masks, 4), le_u32(masks, 8));
    let alpha = if header_size >= BMP_V3_HEADER_SIZE {
        le_u32(masks, 12)
    } else {
        0
    };

    if bits_per_pixel != 32
        || (red, green, blue) != (0x00FF_0000, 0x0000_FF00, 0x0000_00FF)
        || !matches!(alpha, 0 | 0xFF00_0000)
    {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit fields at {} bpp: R={:#010x} G={:#010x} B={:#010x} A={:#010x}",
            bits_per_pixel, red, green, blue, alpha
        )));
    }

    Ok(alpha != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// A BMP under construction; `rows` are raw row bytes in file order.
    struct TestBmp {
        width: i32,
        height: i32,
        bpp: u16,
        compression: u32,
        colors_used: u32,
        header_tail: Vec<u8>,
        table: Vec<u8>,
        rows: Vec<Vec<u8>>,
    }

    impl TestBmp {
        fn new(width: i32, height: i32, bpp: u16, rows: Vec<Vec<u8>>) -> Self {
            Self {
                width,
                height,
                bpp,
                compression: BI_RGB,
                colors_used: 0,
                header_tail: Vec::new(),
                table: Vec::new(),
                rows,
            }
        }

        fn encode(&self) -> Vec<u8> {
            let stride = (self.width.unsigned_abs() as usize * self.bpp as usize).div_ceil(32) * 4;
            let header_size = 40 + self.header_tail.len();
            let offset = 14 + header_size + self.table.len();
            let image_size = stride * self.rows.len();
            let mut out = Vec::new();
            out.extend_from_slice(b"BM");
            out.extend_from_slice(&((offset + image_size) as u32).to_le_bytes());
            out.extend_from_slice(&[0, 0, 0, 0]);
            out.extend_from_slice(&(offset as u32).to_le_bytes());
            out.extend_from_slice(&(header_size as u32).to_le_bytes());
            out.extend_from_slice(&self.width.to_le_bytes());
            out.extend_from_slice(&self.height.to_le_bytes());
            out.extend_from_slice(&1u16.to_le_bytes());
            out.extend_from_slice(&self.bpp.to_le_bytes());
            out.extend_from_slice(&self.compression.to_le_bytes());
            out.extend_from_slice(&(image_size as u32).to_le_bytes());
            out.extend_from_slice(&[0u8; 8]);
            out.extend_from_slice(&self.colors_used.to_le_bytes());
            out.extend_from_slice(&[0u8; 4]);
            out.extend_from_slice(&self.header_tail);
            out.extend_from_slice(&self.table);
            for row in &self.rows {
                let mut line = row.clone();
                line.resize(stride, 0);
                out.extend_from_slice(&line);
            }
            out
        }
    }

    fn color_table(colors: &[(u8, u8, u8)]) -> Vec<u8> {
        colors.iter().flat_map(|&(r, g, b)| [b, g, r, 0]).collect()
    }

    fn masks(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|m| m.to_le_bytes()).collect()
    }

    /// Build a bottom-up 24-bit BMP from rows given top to bottom.
    fn bmp24(width: u32, rows: &[Vec<(u8, u8, u8)>]) -> Vec<u8> {
        let stored = rows
            .iter()
            .rev()
            .map(|row| row.iter().flat_map(|&(r, g, b)| [b, g, r]).collect())
            .collect();
        TestBmp::new(width as i32, rows.len() as i32, 24, stored).encode()
    }

    fn read(bmp: &TestBmp) -> IoResult<Raster> {
        read_bmp(Cursor::new(bmp.encode()))
    }

    #[test]
    fn test_read_bmp24_bottom_up() {
        let data = bmp24(
            3,
            &[
                vec![(255, 0, 0), (0, 255, 0), (0, 0, 255)],
                vec![(1, 2, 3), (4, 5, 6), (7, 8, 9)],
            ],
        );
        let raster = read_bmp(Cursor::new(data)).unwrap();
        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.get_rgba(0, 0), Some((255, 0, 0, 255)));
        assert_eq!(raster.get_rgba(2, 0), Some((0, 0, 255, 255)));
        assert_eq!(raster.get_rgba(1, 1), Some((4, 5, 6, 255)));
    }

    #[test]
    fn test_read_bmp1_palette() {
        // 10 pixels span two bytes; bottom row stored first
        let mut bmp = TestBmp::new(10, 2, 1, vec![vec![0x00, 0x00], vec![0xB0, 0x40]]);
        bmp.colors_used = 2;
        bmp.table = color_table(&[(10, 20, 30), (200, 210, 220)]);
        let raster = read(&bmp).unwrap();

        let on = Some((200, 210, 220, 255));
        let off = Some((10, 20, 30, 255));
        let top: Vec<_> = (0..10).map(|x| raster.get_rgba(x, 0)).collect();
        assert_eq!(top, vec![on, off, on, on, off, off, off, off, off, on]);
        assert_eq!(raster.get_rgba(9, 1), off);
    }

    #[test]
    fn test_read_bmp4_palette_full_table() {
        let colors: Vec<(u8, u8, u8)> = (0..16).map(|i| (i * 16, 255 - i * 16, i)).collect();
        let mut bmp = TestBmp::new(3, 1, 4, vec![vec![0x2F, 0x10]]);
        bmp.table = color_table(&colors);
        let raster = read(&bmp).unwrap();

        assert_eq!(raster.get_rgba(0, 0), Some((32, 223, 2, 255)));
        assert_eq!(raster.get_rgba(1, 0), Some((240, 15, 15, 255)));
        assert_eq!(raster.get_rgba(2, 0), Some((16, 239, 1, 255)));
    }

    #[test]
    fn test_read_bmp8_short_palette() {
        let mut bmp = TestBmp::new(2, 2, 8, vec![vec![0, 1], vec![2, 200]]);
        bmp.colors_used = 3;
        bmp.table = color_table(&[(255, 0, 0), (0, 255, 0), (0, 0, 255)]);
        let raster = read(&bmp).unwrap();

        assert_eq!(raster.get_rgba(0, 0), Some((0, 0, 255, 255)));
        // Index past the stored table reads as black
        assert_eq!(raster.get_rgba(1, 0), Some((0, 0, 0, 255)));
        assert_eq!(raster.get_rgba(0, 1), Some((255, 0, 0, 255)));
        assert_eq!(raster.get_rgba(1, 1), Some((0, 255, 0, 255)));
    }

    #[test]
    fn test_read_bmp32_top_down_is_opaque() {
        let bmp = TestBmp::new(
            2,
            -2,
            32,
            vec![vec![3, 2, 1, 0, 6, 5, 4, 0], vec![9, 8, 7, 0, 12, 11, 10, 0x40]],
        );
        let raster = read(&bmp).unwrap();

        assert_eq!(raster.dimensions(), (2, 2));
        assert_eq!(raster.get_rgba(0, 0), Some((1, 2, 3, 255)));
        assert_eq!(raster.get_rgba(1, 0), Some((4, 5, 6, 255)));
        assert_eq!(raster.get_rgba(0, 1), Some((7, 8, 9, 255)));
        assert_eq!(raster.get_rgba(1, 1), Some((10, 11, 12, 255)));
    }

    #[test]
    fn test_read_bmp32_bitfields_after_header() {
        let mut bmp = TestBmp::new(1, 1, 32, vec![vec![3, 2, 1, 0x40]]);
        bmp.compression = BI_BITFIELDS;
        bmp.table = masks(&[0x00FF_0000, 0x0000_FF00, 0x0000_00FF]);
        assert_eq!(read(&bmp).unwrap().get_rgba(0, 0), Some((1, 2, 3, 255)));
    }

    #[test]
    fn test_read_bmp32_bitfields_alpha() {
        let mut bmp = TestBmp::new(1, 1, 32, vec![vec![3, 2, 1, 0x40]]);
        bmp.compression = BI_BITFIELDS;
        bmp.header_tail = masks(&[0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000]);
        assert_eq!(read(&bmp).unwrap().get_rgba(0, 0), Some((1, 2, 3, 0x40)));
    }

    #[test]
    fn test_read_bmp_rejects_other_bitfields() {
        let mut swapped = TestBmp::new(1, 1, 32, vec![vec![3, 2, 1, 0]]);
        swapped.compression = BI_BITFIELDS;
        swapped.table = masks(&[0x0000_00FF, 0x0000_FF00, 0x00FF_0000]);
        assert!(matches!(read(&swapped), Err(IoError::UnsupportedFormat(_))));

        let mut rgb24 = TestBmp::new(1, 1, 24, vec![vec![3, 2, 1]]);
        rgb24.compression = BI_BITFIELDS;
        rgb24.table = masks(&[0x00FF_0000, 0x0000_FF00, 0x0000_00FF]);
        assert!(matches!(read(&rgb24), Err(IoError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_read_bmp_truncated() {
        let mut data = bmp24(4, &vec![vec![(9, 9, 9); 4]; 4]);
        data.truncate(data.len() - 5);
        assert!(matches!(read_bmp(Cursor::new(data)), Err(IoError::Io(_))));
    }

    #[test]
    fn test_read_bmp_huge_header_claims() {
        // 62 bytes claiming 100000 x 100000 pixels
        let mut data = bmp24(2, &[vec![(1, 2, 3); 2]]);
        data[18..22].copy_from_slice(&100_000i32.to_le_bytes());
        data[22..26].copy_from_slice(&100_000i32.to_le_bytes());
        assert_eq!(data.len(), 62);
        assert!(matches!(read_bmp(Cursor::new(data)), Err(IoError::Io(_))));

        let mut data = bmp24(2, &[vec![(1, 2, 3); 2]]);
        data[14..18].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
        assert!(matches!(read_bmp(Cursor::new(data)), Err(IoError::Io(_))));

        let mut data = bmp24(2, &[vec![(1, 2, 3); 2]]);
        data[10..14].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(read_bmp(Cursor::new(data)), Err(IoError::Io(_))));
    }

    #[test]
    fn test_read_bmp_bad_magic() {
        let mut data = bmp24(1, &[vec![(0, 0, 0)]]);
        data[0] = b'X';
        assert!(matches!(
            read_bmp(Cursor::new(data)),
            Err(IoError::InvalidData(_))
        ));
    }

    #[test]
    fn test_read_bmp_zero_width() {
        let data = bmp24(0, &[vec![]]);
        assert!(matches!(read_bmp(Cursor::new(data)), Err(IoError::Core(_))));
    }
}
