//! Per-size icon rendering
//!
//! Each icon is a disc built from concentric filled ellipses, one per row of
//! the image, with the color sliding from the outer color to the inner one.
//! Later, smaller ellipses paint over earlier ones, so the disc ends up
//! banded rather than a smooth radial blend. A single glyph is then centered
//! on top.

use crate::{
    config::IconConfig,
    font::{GlyphFont, TextBox},
};
use image::{Rgba, RgbaImage};

/// Inclusive pixel bounds of an ellipse: left, top, right, bottom.
pub type EllipseBounds = (i64, i64, i64, i64);

/// Render one `size`x`size` icon, resolving the configured font at the size
/// the icon calls for.
pub fn render_icon(size: u32, config: &IconConfig) -> RgbaImage {
    let font = GlyphFont::resolve(&config.font_name, glyph_em_size(size, config.font_scale));
    render_icon_with_font(size, config, &font)
}

/// Render one icon with an already resolved font.
pub fn render_icon_with_font(size: u32, config: &IconConfig, font: &GlyphFont) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);

    for row in 0..size {
        let color = gradient_color(config.outer_color, config.inner_color, row, size);
        draw_filled_ellipse(&mut img, ring_bounds(row, size), color);
    }

    let text = config.glyph.to_string();
    let bbox = font.text_bbox(&text);
    let (x, y) = glyph_origin(size, &bbox, config.vertical_bias);
    font.draw_text(&mut img, x, y, &text, config.glyph_color);

    img
}

/// Opaque color of the ellipse drawn for `row`, interpolated with
/// `t = row / size` and truncated per channel.
pub fn gradient_color(outer: Rgba<u8>, inner: Rgba<u8>, row: u32, size: u32) -> Rgba<u8> {
    let t = f64::from(row) / f64::from(size);
    let lerp = |a: u8, b: u8| (f64::from(a) * (1.0 - t) + f64::from(b) * t) as u8;
    Rgba([
        lerp(outer[0], inner[0]),
        lerp(outer[1], inner[1]),
        lerp(outer[2], inner[2]),
        255,
    ])
}

/// Bounding box of the ellipse drawn for `row`: inset by a quarter of the row
/// index on every side.
pub fn ring_bounds(row: u32, size: u32) -> EllipseBounds {
    let inset = i64::from(row / 4);
    let far = i64::from(size) - inset;
    (inset, inset, far, far)
}

/// Glyph em size in pixels.
pub fn glyph_em_size(size: u32, font_scale: f32) -> f32 {
    (f64::from(size) * f64::from(font_scale)).round() as f32
}

/// Upward shift applied to the vertically centered glyph.
pub fn vertical_bias(size: u32, bias: f32) -> i32 {
    (f64::from(size) * f64::from(bias)).round() as i32
}

/// Origin that centers `bbox` in the icon, then lifts it by the vertical bias.
pub fn glyph_origin(size: u32, bbox: &TextBox, bias: f32) -> (i32, i32) {
    let size = size as i32;
    let x = (size - bbox.width()).div_euclid(2);
    let y = (size - bbox.height()).div_euclid(2) - vertical_bias(size as u32, bias);
    (x, y)
}

/// Fill the ellipse inscribed in `bounds` with `color`, replacing whatever
/// is underneath. Pixels whose centers fall inside the ellipse are painted;
/// anything outside the image is clipped.
pub fn draw_filled_ellipse(img: &mut RgbaImage, bounds: EllipseBounds, color: Rgba<u8>) {
    let (left, top, right, bottom) = bounds;
    if right < left || bottom < top {
        return;
    }

    let rx = (right - left + 1) as f64 / 2.0;
    let ry = (bottom - top + 1) as f64 / 2.0;
    let cx = left as f64 + rx;
    let cy = top as f64 + ry;

    let x_start = left.max(0);
    let y_start = top.max(0);
    let x_end = right.min(i64::from(img.width()) - 1);
    let y_end = bottom.min(i64::from(img.height()) - 1);

    for y in y_start..=y_end {
        let dy = (y as f64 + 0.5 - cy) / ry;
        for x in x_start..=x_end {
            let dx = (x as f64 + 0.5 - cx) / rx;
            if dx * dx + dy * dy <= 1.0 {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
