use app_icon_gen::{
    font::GlyphFont,
    render::{
        glyph_em_size, glyph_origin, gradient_color, render_icon, render_icon_with_font,
        ring_bounds, vertical_bias,
    },
    IconConfig,
};
use image::Rgba;

const OUTER: Rgba<u8> = Rgba([66, 150, 250, 255]);
const INNER: Rgba<u8> = Rgba([38, 100, 200, 255]);

fn builtin_config() -> IconConfig {
    IconConfig {
        font_name: "no-such-font-9b7d1a.ttf".to_string(),
        ..IconConfig::default()
    }
}

#[test]
fn every_size_is_square_rgba() {
    let config = IconConfig::default();

    for &size in &config.sizes {
        let img = render_icon_with_font(size, &config, &GlyphFont::Builtin);
        assert_eq!(img.dimensions(), (size, size), "icon {size} should be square");
        assert_eq!(img.as_raw().len(), (size * size * 4) as usize);
    }
}

#[test]
fn default_sizes_are_strictly_descending() {
    let sizes = IconConfig::default().sizes;
    assert_eq!(sizes, vec![256, 128, 64, 48, 32, 16]);
    assert!(sizes.windows(2).all(|pair| pair[0] > pair[1]));
}

#[test]
fn first_row_uses_outer_color() {
    for size in [256, 128, 64, 48, 32, 16] {
        assert_eq!(gradient_color(OUTER, INNER, 0, size), OUTER);
    }
}

#[test]
fn last_row_approaches_inner_color() {
    assert_eq!(gradient_color(OUTER, INNER, 255, 256), INNER);

    for size in [128, 64, 48, 32, 16] {
        let color = gradient_color(OUTER, INNER, size - 1, size);
        for channel in 0..3 {
            let diff = (i32::from(color[channel]) - i32::from(INNER[channel])).abs();
            assert!(
                diff <= 50 / size as i32 + 1,
                "channel {channel} of row {} at size {size} is {diff} away",
                size - 1
            );
        }
        assert_eq!(color[3], 255);
    }
}

#[test]
fn row_colors_are_truncated_lerps() {
    assert_eq!(gradient_color(OUTER, INNER, 32, 64), Rgba([52, 125, 225, 255]));
    // t = 0.9375: 39.75, 103.125, 203.125
    assert_eq!(gradient_color(OUTER, INNER, 15, 16), Rgba([39, 103, 203, 255]));
}

#[test]
fn rings_shrink_by_a_quarter_row() {
    assert_eq!(ring_bounds(0, 256), (0, 0, 256, 256));
    assert_eq!(ring_bounds(3, 256), (0, 0, 256, 256));
    assert_eq!(ring_bounds(4, 256), (1, 1, 255, 255));
    assert_eq!(ring_bounds(15, 16), (3, 3, 13, 13));
}

#[test]
fn vertical_bias_is_five_percent_rounded() {
    let expected = [(256, 13), (128, 6), (64, 3), (48, 2), (32, 2), (16, 1)];
    for (size, bias) in expected {
        assert_eq!(vertical_bias(size, 0.05), bias, "bias for {size}");
    }
}

#[test]
fn glyph_em_size_is_sixty_percent_rounded() {
    let expected = [(256, 154.0), (128, 77.0), (64, 38.0), (48, 29.0), (32, 19.0), (16, 10.0)];
    for (size, em) in expected {
        assert_eq!(glyph_em_size(size, 0.6), em, "em size for {size}");
    }
}

#[test]
fn glyph_is_centered_then_lifted() {
    let bbox = GlyphFont::Builtin.text_bbox("P");
    for &size in &IconConfig::default().sizes {
        let (x, y) = glyph_origin(size, &bbox, 0.05);
        let size_i = size as i32;
        assert_eq!(x, (size_i - bbox.width()) / 2);
        assert_eq!(y, (size_i - bbox.height()) / 2 - vertical_bias(size, 0.05));
    }
}

#[test]
fn disc_keeps_overdraw_bands() {
    let config = IconConfig::default();
    let img = render_icon_with_font(256, &config, &GlyphFont::Builtin);

    // Outside the disc stays transparent
    assert_eq!(img.get_pixel(0, 0)[3], 0);
    assert_eq!(img.get_pixel(255, 255)[3], 0);

    // The center is painted last, by the innermost ring
    assert_eq!(img.get_pixel(128, 128), &gradient_color(OUTER, INNER, 255, 256));

    // Row 2 at the top of the disc is last covered by ring 11
    assert_eq!(img.get_pixel(128, 2), &gradient_color(OUTER, INNER, 11, 256));
}

#[test]
fn glyph_is_drawn_in_white() {
    let config = IconConfig::default();
    let font = GlyphFont::Builtin;
    let img = render_icon_with_font(256, &config, &font);

    let bbox = font.text_bbox("P");
    let (x, y) = glyph_origin(256, &bbox, config.vertical_bias);

    // Top-left ink pixel of the built-in "P"
    let ink = img.get_pixel((x + bbox.x_min) as u32, (y + bbox.y_min) as u32);
    assert_eq!(ink, &Rgba([255, 255, 255, 255]));
}

#[test]
fn missing_font_still_renders_every_size() {
    let config = builtin_config();
    assert!(GlyphFont::resolve(&config.font_name, 154.0).is_builtin());

    let images: Vec<_> = config
        .sizes
        .iter()
        .map(|&size| render_icon(size, &config))
        .collect();

    assert_eq!(images.len(), 6);
    for (img, &size) in images.iter().zip(&config.sizes) {
        assert_eq!(img.dimensions(), (size, size));
        assert!(img.pixels().any(|pixel| pixel == &Rgba([255, 255, 255, 255])));
    }
}
