use std::path::Path;

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    assets::store::SpriteStore,
    foundation::core::{Canvas, Point, Rect, Rgba8},
    foundation::error::{CircuitarError, CircuitarResult},
    render::plan::{DrawOp, RenderPlan},
};

pub type PremulRgba8 = [u8; 4];

#[derive(Clone, Debug)]
/// Video frame in premultiplied RGBA8, row-major.
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRgba {
    pub fn new(width: u32, height: u32, fill: Rgba8) -> CircuitarResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let px = fill.to_premul();
        let data = px
            .iter()
            .copied()
            .cycle()
            .take(canvas.width as usize * canvas.height as usize * 4)
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = img.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn load_png(path: &Path) -> CircuitarResult<Self> {
        let img = image::open(path)
            .with_context(|| format!("open background '{}'", path.display()))?
            .to_rgba8();
        Ok(Self::from_rgba_image(img))
    }

    /// Straight-alpha copy suitable for encoding.
    pub fn to_rgba_image(&self) -> CircuitarResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| CircuitarError::composite("frame buffer size mismatch"))
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        let range = self.pixel_range(i64::from(x), i64::from(y))?;
        let px = self.data.get(range)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Byte range of pixel `(x, y)`, or `None` outside the frame.
    fn pixel_range(&self, x: i64, y: i64) -> Option<std::ops::Range<usize>> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(i..i + 4)
    }

    // Pixels beyond a short buffer are skipped.
    fn pixel_mut(&mut self, x: i64, y: i64) -> Option<&mut [u8]> {
        let range = self.pixel_range(x, y)?;
        self.data.get_mut(range)
    }

    fn blend_pixel(&mut self, x: i64, y: i64, src: PremulRgba8) {
        if let Some(px) = self.pixel_mut(x, y) {
            let dst = [px[0], px[1], px[2], px[3]];
            px.copy_from_slice(&over(dst, src));
        }
    }
}

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(src[i], dc);
    }
    out
}

/// Composite `sprite` centered on `center`.
///
/// Returns `false` and leaves the frame untouched when the sprite is empty or its rectangle
/// would leave the frame.
pub fn overlay_centered(frame: &mut FrameRgba, sprite: &PreparedImage, center: Point) -> bool {
    if sprite.width == 0 || sprite.height == 0 {
        return false;
    }
    let x0 = (center.x - f64::from(sprite.width) / 2.0).round();
    let y0 = (center.y - f64::from(sprite.height) / 2.0).round();
    let rect = Rect::new(
        x0,
        y0,
        x0 + f64::from(sprite.width),
        y0 + f64::from(sprite.height),
    );
    if !frame.canvas().contains_rect(rect) {
        return false;
    }

    let (ox, oy) = (x0 as i64, y0 as i64);
    let row_bytes = sprite.width as usize * 4;
    for (sy, row) in sprite.rgba8_premul.chunks_exact(row_bytes).enumerate() {
        for (sx, px) in row.chunks_exact(4).enumerate() {
            frame.blend_pixel(
                ox + sx as i64,
                oy + sy as i64,
                [px[0], px[1], px[2], px[3]],
            );
        }
    }
    true
}

/// Rasterize a straight wire of `width` pixels; pixels outside the frame are clipped.
pub fn draw_wire(frame: &mut FrameRgba, start: Point, end: Point, color: Rgba8, width: f64) {
    let src = color.to_premul();
    let len = start.distance(end);
    let samples = (len * 2.0).ceil().max(1.0) as usize;
    let half = (width.max(1.0) / 2.0).floor() as i64;

    let mut last: Option<(i64, i64)> = None;
    for i in 0..=samples {
        let t = i as f64 / samples as f64;
        let p = start.lerp(end, t);
        let (cx, cy) = (p.x.round() as i64, p.y.round() as i64);
        if last == Some((cx, cy)) {
            continue;
        }
        last = Some((cx, cy));
        for dy in -half..=half {
            for dx in -half..=half {
                stamp(frame, cx + dx, cy + dy, src);
            }
        }
    }
}

// Translucent stamps may overlap and blend more than once.
fn stamp(frame: &mut FrameRgba, x: i64, y: i64, src: PremulRgba8) {
    if src[3] == 255 {
        if let Some(px) = frame.pixel_mut(x, y) {
            px.copy_from_slice(&src);
        }
    } else {
        frame.blend_pixel(x, y, src);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompositeStats {
    pub wires: usize,
    pub sprites_drawn: usize,
    pub sprites_skipped: usize,
    /// Text ops are left to the host's text renderer.
    pub text_ops: usize,
}

/// Execute the wire and sprite ops of `plan` onto `frame`.
pub fn composite_plan(
    frame: &mut FrameRgba,
    plan: &RenderPlan,
    sprites: &SpriteStore,
) -> CircuitarResult<CompositeStats> {
    if frame.data.len() != frame.width as usize * frame.height as usize * 4 {
        return Err(CircuitarError::composite(
            "frame buffer does not match its dimensions",
        ));
    }

    let mut stats = CompositeStats::default();
    for op in &plan.ops {
        match op {
            DrawOp::Wire {
                start,
                end,
                color,
                width,
                ..
            } => {
                draw_wire(frame, *start, *end, *color, *width);
                stats.wires += 1;
            }
            DrawOp::Sprite {
                component,
                asset,
                center,
            } => {
                let drawn = sprites
                    .get(*asset)
                    .is_some_and(|img| overlay_centered(frame, img, *center));
                if drawn {
                    stats.sprites_drawn += 1;
                } else {
                    tracing::debug!(component, "sprite skipped");
                    stats.sprites_skipped += 1;
                }
            }
            DrawOp::Text { text, .. } => {
                tracing::debug!(text, "text op left to host renderer");
                stats.text_ops += 1;
            }
        }
    }
    Ok(stats)
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/composite/overlay.rs"]
mod tests;
