use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::CircuitarResult;

#[derive(Clone, Debug)]
/// Decoded sprite in premultiplied RGBA8 form.
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode PNG/JPEG/... bytes into a premultiplied sprite.
///
/// With `key_threshold` set, pixels whose R, G and B are all at or above the threshold become
/// fully transparent, which removes the white paper background of scanned component drawings.
pub fn decode_image(bytes: &[u8], key_threshold: Option<u8>) -> CircuitarResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    if let Some(threshold) = key_threshold {
        key_out_light_background(&mut rgba8_premul, threshold);
    }
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn key_out_light_background(rgba: &mut [u8], threshold: u8) {
    for px in rgba.chunks_exact_mut(4) {
        if px[0] >= threshold && px[1] >= threshold && px[2] >= threshold {
            px[3] = 0;
        }
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
