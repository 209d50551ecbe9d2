use crate::{
    config::IconConfig,
    font::{load_truetype_file, locate_font, GlyphFont},
    render::{glyph_em_size, render_icon_with_font},
};
use anyhow::{Context, Result};
use image::{
    codecs::{
        ico::{IcoEncoder, IcoFrame},
        png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    },
    ColorType, ImageEncoder, RgbaImage,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Where and how the icon set is written.
#[derive(Debug, Clone)]
pub struct Options {
    pub output: PathBuf,
    /// Also write every size as a standalone PNG next to the icon.
    pub png: bool,
    pub verbose: bool,
}

/// Render every configured size and write the icon file. Returns the
/// absolute path of the written icon.
pub fn generate_icon(config: &IconConfig, options: &Options) -> Result<PathBuf> {
    config.validate()?;

    let images = render_icon_set(config, options.verbose);

    create_dir_all(&options.output).context("Can't create output directory")?;
    let icon_path = options.output.join(&config.file_name);
    write_ico(&images, &icon_path)?;

    if options.png {
        save_png_previews(&images, &options.output, icon_stem(config), options.verbose)?;
    }

    std::fs::canonicalize(&icon_path)
        .with_context(|| format!("Can't resolve {}", icon_path.display()))
}

/// Render one image per configured size, in the configured order.
pub fn render_icon_set(config: &IconConfig, verbose: bool) -> Vec<RgbaImage> {
    let font_path = locate_font(&config.font_name);

    config
        .sizes
        .iter()
        .map(|&size| {
            let em_px = glyph_em_size(size, config.font_scale);
            let font = font_path
                .clone()
                .and_then(|path| load_truetype_file(path, em_px))
                .unwrap_or(GlyphFont::Builtin);
            if verbose {
                match &font {
                    GlyphFont::TrueType { path, .. } => {
                        println!("  Using font {} for {size}x{size}", path.display())
                    }
                    GlyphFont::Builtin => println!(
                        "  Font {} not found, using built-in font for {size}x{size}",
                        config.font_name
                    ),
                }
            }

            let img = render_icon_with_font(size, config, &font);
            if verbose {
                println!("  ✓ Rendered {size}x{size}");
            }
            img
        })
        .collect()
}

/// Write `images` as one ICO file, keeping their order. The first image is
/// the container's primary entry.
pub fn write_ico(images: &[RgbaImage], path: &Path) -> Result<()> {
    let mut frames = Vec::with_capacity(images.len());

    for image in images {
        let (width, height) = image.dimensions();

        // Only the 256px layer can be compressed according to the ico specs
        if width == 256 {
            let mut buf = Vec::new();
            write_png(image.as_raw(), &mut buf, width, height)?;
            frames.push(IcoFrame::with_encoded(buf, width, height, ColorType::Rgba8)?);
        } else {
            frames.push(IcoFrame::as_png(
                image.as_raw(),
                width,
                height,
                ColorType::Rgba8,
            )?);
        }
    }

    let file =
        File::create(path).with_context(|| format!("Can't create {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    let encoder = IcoEncoder::new(&mut out_file);
    encoder
        .encode_images(&frames)
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    out_file.flush()?;

    Ok(())
}

/// Write each image as `<stem>-<w>x<h>.png` into `out_dir`.
pub fn save_png_previews(
    images: &[RgbaImage],
    out_dir: &Path,
    stem: &str,
    verbose: bool,
) -> Result<()> {
    for image in images {
        let (width, height) = image.dimensions();
        let filename = format!("{stem}-{width}x{height}.png");
        let path = out_dir.join(&filename);

        let file = File::create(&path).context("Failed to create PNG file")?;
        let mut out_file = BufWriter::new(file);
        write_png(image.as_raw(), &mut out_file, width, height).context("Failed to write PNG")?;
        out_file.flush()?;

        if verbose {
            println!("  ✓ Generated {filename}");
        }
    }
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgba8)?;
    Ok(())
}

fn icon_stem(config: &IconConfig) -> &str {
    Path::new(&config.file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("icon")
}
