//! Icon configuration
//!
//! Everything that shapes the generated icon lives in [`IconConfig`]. The
//! defaults reproduce the stock application icon; a JSON file can override
//! any subset of the fields.

use anyhow::{Context, Result};
use image::Rgba;
use serde::Deserialize;
use std::{path::Path, str::FromStr};

/// Largest side length an ICO directory entry can describe.
pub const MAX_ICO_SIZE: u32 = 256;

/// Immutable description of the icon set to render.
#[derive(Debug, Clone, PartialEq)]
pub struct IconConfig {
    /// Side lengths to render, strictly descending. The first one becomes the
    /// primary image of the container.
    pub sizes: Vec<u32>,

    /// Gradient color at the rim of the disc.
    pub outer_color: Rgba<u8>,

    /// Gradient color towards the center of the disc.
    pub inner_color: Rgba<u8>,

    /// Character drawn on top of the disc.
    pub glyph: char,

    pub glyph_color: Rgba<u8>,

    /// File name or path of the TrueType font used for the glyph.
    pub font_name: String,

    /// Glyph em size as a fraction of the icon size.
    pub font_scale: f32,

    /// Upward shift of the glyph as a fraction of the icon size.
    pub vertical_bias: f32,

    /// Name of the icon file written to the output directory.
    pub file_name: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sizes: vec![256, 128, 64, 48, 32, 16],
            outer_color: Rgba([66, 150, 250, 255]),
            inner_color: Rgba([38, 100, 200, 255]),
            glyph: 'P',
            glyph_color: Rgba([255, 255, 255, 255]),
            font_name: "arial.ttf".to_string(),
            font_scale: 0.6,
            vertical_bias: 0.05,
            file_name: "app.ico".to_string(),
        }
    }
}

/// On-disk form of the configuration; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    sizes: Option<Vec<u32>>,
    outer_color: Option<String>,
    inner_color: Option<String>,
    glyph: Option<char>,
    glyph_color: Option<String>,
    font_name: Option<String>,
    font_scale: Option<f32>,
    vertical_bias: Option<f32>,
    file_name: Option<String>,
}

impl IconConfig {
    /// Load a JSON config file, filling missing fields from the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(raw).context("Failed to parse config JSON")?;
        let defaults = Self::default();

        let config = Self {
            sizes: file.sizes.unwrap_or(defaults.sizes),
            outer_color: parse_optional_color(file.outer_color, defaults.outer_color)?,
            inner_color: parse_optional_color(file.inner_color, defaults.inner_color)?,
            glyph: file.glyph.unwrap_or(defaults.glyph),
            glyph_color: parse_optional_color(file.glyph_color, defaults.glyph_color)?,
            font_name: file.font_name.unwrap_or(defaults.font_name),
            font_scale: file.font_scale.unwrap_or(defaults.font_scale),
            vertical_bias: file.vertical_bias.unwrap_or(defaults.vertical_bias),
            file_name: file.file_name.unwrap_or(defaults.file_name),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the renderer and the ICO writer rely on.
    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            anyhow::bail!("Size list must not be empty");
        }
        if let Some(&bad) = self
            .sizes
            .iter()
            .find(|&&size| size == 0 || size > MAX_ICO_SIZE)
        {
            anyhow::bail!("Icon size {bad} is outside 1..={MAX_ICO_SIZE}");
        }
        if let Some(pair) = self.sizes.windows(2).find(|pair| pair[0] <= pair[1]) {
            anyhow::bail!(
                "Size list must be strictly descending, found {} before {}",
                pair[0],
                pair[1]
            );
        }
        if !self.font_scale.is_finite() || self.font_scale <= 0.0 {
            anyhow::bail!("Font scale must be positive, got {}", self.font_scale);
        }
        if !self.vertical_bias.is_finite() {
            anyhow::bail!("Vertical bias must be a finite number");
        }
        if self.file_name.trim().is_empty() {
            anyhow::bail!("Output file name must not be empty");
        }
        Ok(())
    }

    /// The size whose image is used as the container's primary image.
    pub fn primary_size(&self) -> Option<u32> {
        self.sizes.first().copied()
    }
}

/// Parse a CSS color string (`#4296fa`, `rgb(66, 150, 250)`, `white`, ...).
pub fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let color = css_color::Srgb::from_str(value)
        .map_err(|_| anyhow::anyhow!("Invalid CSS color: {value}"))?;
    Ok(Rgba([
        (color.red * 255.).round() as u8,
        (color.green * 255.).round() as u8,
        (color.blue * 255.).round() as u8,
        (color.alpha * 255.).round() as u8,
    ]))
}

fn parse_optional_color(value: Option<String>, default: Rgba<u8>) -> Result<Rgba<u8>> {
    match value {
        Some(value) => parse_color(&value),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = IconConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.primary_size(), Some(256));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = IconConfig::from_json(r##"{ "glyph": "Q", "outer_color": "#ff0000" }"##)
            .expect("config should parse");

        assert_eq!(config.glyph, 'Q');
        assert_eq!(config.outer_color, Rgba([255, 0, 0, 255]));
        assert_eq!(config.inner_color, IconConfig::default().inner_color);
        assert_eq!(config.sizes, IconConfig::default().sizes);
    }

    #[test]
    fn rejects_bad_size_lists() {
        assert!(IconConfig::from_json(r#"{ "sizes": [] }"#).is_err());
        assert!(IconConfig::from_json(r#"{ "sizes": [16, 32] }"#).is_err());
        assert!(IconConfig::from_json(r#"{ "sizes": [64, 64] }"#).is_err());
        assert!(IconConfig::from_json(r#"{ "sizes": [512, 16] }"#).is_err());
        assert!(IconConfig::from_json(r#"{ "sizes": [32, 0] }"#).is_err());
    }

    #[test]
    fn rejects_unknown_fields_and_colors() {
        assert!(IconConfig::from_json(r#"{ "colour": "red" }"#).is_err());
        assert!(IconConfig::from_json(r#"{ "inner_color": "not-a-color" }"#).is_err());
    }
}
