use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
    let decoded = decode_image(&png_bytes(img)).unwrap();
    assert_eq!(decoded.width(), 1);
    assert_eq!(decoded.height(), 1);
    assert_eq!(
        decoded.data(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn opaque_pixels_are_untouched_and_transparent_are_zeroed() {
    let img = image::RgbaImage::from_raw(2, 1, vec![10, 20, 30, 255, 90, 90, 90, 0]).unwrap();
    let decoded = from_rgba_image(img).unwrap();
    assert_eq!(decoded.data(), &[10, 20, 30, 255, 0, 0, 0, 0]);
    assert_eq!(decoded.bounds().right, 2);
    assert_eq!(decoded.bounds().bottom, 1);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(err.to_string().contains("decode image"));
}

#[test]
fn decoded_pixels_match_color_premultiply() {
    let img = image::RgbaImage::from_raw(2, 1, vec![255, 128, 7, 77, 33, 66, 99, 200]).unwrap();
    let decoded = from_rgba_image(img).unwrap();
    let expected = [
        Rgba8Premul::from_straight_rgba(255, 128, 7, 77).to_array(),
        Rgba8Premul::from_straight_rgba(33, 66, 99, 200).to_array(),
    ]
    .concat();
    assert_eq!(decoded.data(), expected.as_slice());
}
