//! Codec regression test
//!
//! Encodes synthetic rasters, decodes them back through format
//! detection, and checks what each format is expected to preserve.

use holowarp_io::jpeg::{MAX_JPEG_DIMENSION, write_jpeg};
use holowarp_io::{
    DEFAULT_JPEG_QUALITY, ImageFormat, IoError, detect_format_from_bytes, read_image_mem,
    write_image_mem,
};
use holowarp_test::{RegParams, images};

#[test]
fn codec_reg() {
    let mut rp = RegParams::new("codec");

    // --- Test 1: PNG is lossless, alpha included ---
    let grad = images::gradient(33, 17);
    let mut translucent = grad.to_mut();
    translucent
        .set_rgba(3, 4, 10, 20, 30, 77)
        .expect("set translucent pixel");
    let translucent = translucent.into();
    let png = write_image_mem(&translucent, ImageFormat::Png).expect("encode png");
    rp.compare_values(
        1.0,
        (detect_format_from_bytes(&png).ok() == Some(ImageFormat::Png)) as u8 as f64,
        0.0,
    );
    let back = read_image_mem(&png).expect("decode png");
    rp.compare_raster(&translucent, &back);
    rp.write_raster_and_check(&back).expect("write png");

    // --- Test 2: JPEG stays close to the source ---
    let jpeg = write_image_mem(&grad, ImageFormat::Jpeg).expect("encode jpeg");
    rp.compare_values(
        1.0,
        (detect_format_from_bytes(&jpeg).ok() == Some(ImageFormat::Jpeg)) as u8 as f64,
        0.0,
    );
    let back = read_image_mem(&jpeg).expect("decode jpeg");
    rp.compare_raster_within(&grad, &back, 16);
    rp.compare_values(
        255.0,
        back.data().iter().map(|&p| holowarp_core::color::alpha(p)).min().unwrap_or(0) as f64,
        0.0,
    );

    // --- Test 3: the default quality matches the explicit call ---
    let mut explicit = Vec::new();
    write_jpeg(&grad, &mut explicit, DEFAULT_JPEG_QUALITY).expect("explicit jpeg");
    rp.compare_bytes(&jpeg, &explicit);

    // --- Test 4: lower quality produces a smaller file ---
    let noisy = images::quadrants(64, 64);
    let mut low = Vec::new();
    write_jpeg(&noisy, &mut low, 5).expect("low quality");
    let mut high = Vec::new();
    write_jpeg(&noisy, &mut high, 100).expect("high quality");
    rp.compare_values(1.0, (low.len() < high.len()) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "codec regression test failed");
}

#[test]
fn codec_errors() {
    let png = images::png_bytes(&images::solid(4, 4, images::BLUE));
    assert!(read_image_mem(&png[..png.len() / 2]).is_err());
    assert!(matches!(read_image_mem(&[]), Err(IoError::InvalidData(_))));
    assert!(matches!(
        read_image_mem(b"II*\0 tiff is not supported"),
        Err(IoError::UnsupportedFormat(_))
    ));

    let wide = images::solid(MAX_JPEG_DIMENSION + 1, 1, images::RED);
    assert!(matches!(
        write_image_mem(&wide, ImageFormat::Jpeg),
        Err(IoError::EncodeError(_))
    ));
}
