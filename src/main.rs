use anyhow::{Context, Result};
use app_icon_gen::{generate_icon, IconConfig, Options};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "app-icon-gen",
    about = "Generate the multi-size application icon (app.ico)"
)]
struct Args {
    /// Output directory. Defaults to the directory containing this executable.
    #[clap(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// JSON file overriding the built-in icon settings.
    #[clap(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Font file name or path for the glyph (falls back to a built-in font).
    #[clap(long, value_name = "NAME")]
    font: Option<String>,

    /// Character drawn on the icon.
    #[clap(long, value_name = "CHAR")]
    glyph: Option<char>,

    /// Also write every size as a PNG next to the icon.
    #[clap(long)]
    png: bool,

    /// Print per-size progress and the font in use.
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => IconConfig::from_file(path)?,
        None => IconConfig::default(),
    };
    if let Some(font) = args.font {
        config.font_name = font;
    }
    if let Some(glyph) = args.glyph {
        config.glyph = glyph;
    }

    let output = match args.output {
        Some(dir) => dir,
        None => executable_dir()?,
    };

    let options = Options {
        output,
        png: args.png,
        verbose: args.verbose,
    };

    let icon_path = generate_icon(&config, &options)?;
    println!("✓ Generated {}", icon_path.display());

    Ok(())
}

fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Can't locate the running executable")?;
    exe.parent()
        .map(|dir| dir.to_path_buf())
        .context("Executable has no parent directory")
}
