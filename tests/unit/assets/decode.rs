use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100u8, 50u8, 200u8, 128u8]);

    let prepared = decode_image(&buf, None).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn key_threshold_clears_light_pixels_only() {
    let buf = png_bytes(2, 1, vec![250, 252, 255, 255, 10, 20, 30, 255]);
    let prepared = decode_image(&buf, Some(240)).unwrap();
    assert_eq!(&prepared.rgba8_premul[0..4], &[0, 0, 0, 0]);
    assert_eq!(&prepared.rgba8_premul[4..8], &[10, 20, 30, 255]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"not an image", None).is_err());
}

#[test]
fn unpremultiply_inverts_opaque_and_clears_transparent() {
    let mut px = vec![10, 20, 30, 255, 9, 9, 9, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [10, 20, 30, 255, 0, 0, 0, 0]);
}
