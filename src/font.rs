//! Glyph fonts
//!
//! A named TrueType font is looked up on disk and rasterized with
//! `rusttype`. When the lookup comes back empty the caller falls back to
//! [`GlyphFont::Builtin`], a fixed-size bitmap font compiled into the binary.
//!
//! Text positions follow the usual "top-left of the line" convention: the
//! origin passed to [`GlyphFont::draw_text`] is the top of the ascent line,
//! and [`GlyphFont::text_bbox`] reports ink bounds relative to that origin.

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Horizontal advance of one built-in glyph cell.
const BUILTIN_ADVANCE: i32 = 6;

/// Blank rows above the ink in a built-in glyph cell.
const BUILTIN_TOP: i32 = 2;

const BUILTIN_ROWS: usize = 7;

/// Tight ink bounds of a rendered string, max edges exclusive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TextBox {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl TextBox {
    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    fn include(self, x: i32, y: i32) -> Self {
        Self {
            x_min: self.x_min.min(x),
            y_min: self.y_min.min(y),
            x_max: self.x_max.max(x + 1),
            y_max: self.y_max.max(y + 1),
        }
    }

    fn union(self, other: TextBox) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

pub enum GlyphFont {
    TrueType {
        font: Font<'static>,
        scale: Scale,
        path: PathBuf,
    },
    Builtin,
}

impl std::fmt::Debug for GlyphFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlyphFont::TrueType { scale, path, .. } => f
                .debug_struct("TrueType")
                .field("path", path)
                .field("scale", &scale.y)
                .finish(),
            GlyphFont::Builtin => f.write_str("Builtin"),
        }
    }
}

impl GlyphFont {
    /// The named font at `em_px` pixels, or the built-in font when the named
    /// one can't be found or parsed.
    pub fn resolve(name: &str, em_px: f32) -> Self {
        load_truetype(name, em_px).unwrap_or(GlyphFont::Builtin)
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, GlyphFont::Builtin)
    }

    /// Ink bounds of `text` laid out at the origin. Strings without any ink
    /// yield an empty box at the origin.
    pub fn text_bbox(&self, text: &str) -> TextBox {
        match self {
            GlyphFont::TrueType { font, scale, .. } => {
                let ascent = font.v_metrics(*scale).ascent;
                font.layout(text, *scale, point(0.0, ascent))
                    .filter_map(|glyph| glyph.pixel_bounding_box())
                    .map(|rect| TextBox {
                        x_min: rect.min.x,
                        y_min: rect.min.y,
                        x_max: rect.max.x,
                        y_max: rect.max.y,
                    })
                    .reduce(TextBox::union)
                    .unwrap_or_default()
            }
            GlyphFont::Builtin => {
                let mut pixels = builtin_pixels(text);
                match pixels.next() {
                    Some((x, y)) => {
                        let first = TextBox {
                            x_min: x,
                            y_min: y,
                            x_max: x + 1,
                            y_max: y + 1,
                        };
                        pixels.fold(first, |bbox, (x, y)| bbox.include(x, y))
                    }
                    None => TextBox::default(),
                }
            }
        }
    }

    /// Composite `text` onto `img` with its line origin at (`x`, `y`).
    /// Ink falling outside the buffer is clipped.
    pub fn draw_text(&self, img: &mut RgbaImage, x: i32, y: i32, text: &str, color: Rgba<u8>) {
        match self {
            GlyphFont::TrueType { font, scale, .. } => {
                let ascent = font.v_metrics(*scale).ascent;
                let origin = point(x as f32, y as f32 + ascent);
                for glyph in font.layout(text, *scale, origin) {
                    if let Some(rect) = glyph.pixel_bounding_box() {
                        glyph.draw(|gx, gy, coverage| {
                            blend_pixel(
                                img,
                                rect.min.x + gx as i32,
                                rect.min.y + gy as i32,
                                color,
                                coverage,
                            );
                        });
                    }
                }
            }
            GlyphFont::Builtin => {
                for (px, py) in builtin_pixels(text) {
                    blend_pixel(img, x + px, y + py, color, 1.0);
                }
            }
        }
    }
}

/// Find a font file by name. An existing path wins; otherwise the platform
/// font directories are searched for a file with the same name, ignoring case.
pub fn locate_font(name: &str) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.is_file() {
        return Some(direct.to_path_buf());
    }

    let wanted = direct.file_name()?.to_str()?.to_lowercase();
    font_dirs()
        .into_iter()
        .filter(|dir| dir.is_dir())
        .find_map(|dir| {
            WalkDir::new(dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .find(|entry| {
                    entry
                        .file_name()
                        .to_str()
                        .map(|file_name| file_name.to_lowercase() == wanted)
                        .unwrap_or(false)
                })
                .map(|entry| entry.into_path())
        })
}

/// Load the named TrueType font sized so that one em spans `em_px` pixels.
pub fn load_truetype(name: &str, em_px: f32) -> Option<GlyphFont> {
    load_truetype_file(locate_font(name)?, em_px)
}

/// Load a TrueType font from a known file.
pub fn load_truetype_file(path: PathBuf, em_px: f32) -> Option<GlyphFont> {
    let data = std::fs::read(&path).ok()?;
    let font = Font::try_from_vec(data)?;
    let scale = em_scale(&font, em_px);
    Some(GlyphFont::TrueType { font, scale, path })
}

// rusttype scales by ascent-to-descent height rather than by em.
fn em_scale(font: &Font<'_>, em_px: f32) -> Scale {
    let units_per_em = f32::from(font.units_per_em());
    let metrics = font.v_metrics_unscaled();
    let height = metrics.ascent - metrics.descent;
    if units_per_em > 0.0 && height > 0.0 {
        Scale::uniform(em_px * height / units_per_em)
    } else {
        Scale::uniform(em_px)
    }
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(windir) = std::env::var_os("WINDIR") {
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }
    if cfg!(windows) {
        dirs.push(PathBuf::from(r"C:\Windows\Fonts"));
    }

    dirs.push(PathBuf::from("/Library/Fonts"));
    dirs.push(PathBuf::from("/System/Library/Fonts"));
    dirs.push(PathBuf::from("/usr/share/fonts"));
    dirs.push(PathBuf::from("/usr/local/share/fonts"));

    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join("Library/Fonts"));
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
    }

    dirs
}

/// Source-over blend of a single pixel with the given coverage.
fn blend_pixel(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let src_alpha = coverage.clamp(0.0, 1.0) * f32::from(color[3]) / 255.0;
    if src_alpha <= 0.0 {
        return;
    }

    let dst = img.get_pixel_mut(x as u32, y as u32);
    let dst_alpha = f32::from(dst[3]) / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

    for channel in 0..3 {
        let src = f32::from(color[channel]) * src_alpha;
        let below = f32::from(dst[channel]) * dst_alpha * (1.0 - src_alpha);
        dst[channel] = ((src + below) / out_alpha).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round() as u8;
}

/// Lit pixels of `text` in the built-in font, relative to the line origin.
fn builtin_pixels(text: &str) -> impl Iterator<Item = (i32, i32)> + '_ {
    text.chars().enumerate().flat_map(|(index, ch)| {
        let rows = builtin_glyph(ch);
        let left = index as i32 * BUILTIN_ADVANCE;
        (0..BUILTIN_ROWS).flat_map(move |row| {
            (0..5).filter_map(move |col| {
                let lit = rows[row] & (0x10 >> col) != 0;
                lit.then_some((left + col, BUILTIN_TOP + row as i32))
            })
        })
    })
}

/// 5x7 bitmap for `ch`, bit 4 being the leftmost column.
fn builtin_glyph(ch: char) -> [u8; BUILTIN_ROWS] {
    match ch.to_ascii_uppercase() {
        ' ' => [0x00; BUILTIN_ROWS],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        _ => [0x1F; BUILTIN_ROWS],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_p_bounds() {
        let bbox = GlyphFont::Builtin.text_bbox("P");
        assert_eq!(
            bbox,
            TextBox {
                x_min: 0,
                y_min: BUILTIN_TOP,
                x_max: 5,
                y_max: BUILTIN_TOP + 7,
            }
        );
        assert_eq!(bbox.width(), 5);
        assert_eq!(bbox.height(), 7);
    }

    #[test]
    fn builtin_bounds_are_case_folded_and_advance() {
        let font = GlyphFont::Builtin;
        assert_eq!(font.text_bbox("p"), font.text_bbox("P"));
        assert_eq!(font.text_bbox("PP").x_max, BUILTIN_ADVANCE + 5);
        assert_eq!(font.text_bbox(" "), TextBox::default());
    }

    #[test]
    fn builtin_draw_is_clipped_and_opaque() {
        let mut img = RgbaImage::new(8, 8);
        let white = Rgba([255, 255, 255, 255]);
        GlyphFont::Builtin.draw_text(&mut img, -2, -4, "P", white);

        // Row 0 of the image is glyph row 2 (0x11): columns 0 and 4 of the
        // glyph, shifted left by two, leave only column 4 -> x = 2.
        assert_eq!(img.get_pixel(2, 0), &white);
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(7, 7)[3], 0);
    }

    #[test]
    fn blend_over_opaque_keeps_opaque() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        blend_pixel(&mut img, 0, 0, Rgba([255, 255, 255, 255]), 0.5);
        let pixel = img.get_pixel(0, 0);
        assert_eq!(pixel[3], 255);
        assert!((127..=128).contains(&pixel[0]));
    }

    #[test]
    fn missing_font_is_not_found() {
        assert!(locate_font("no-such-font-4f1c2e.ttf").is_none());
        assert!(GlyphFont::resolve("no-such-font-4f1c2e.ttf", 32.0).is_builtin());
    }
}
