use anyhow::{Context, Result};

fn main() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "app.ico".to_string());

    let data = std::fs::read(&path).with_context(|| format!("Failed to open {path}"))?;
    if data.len() < 6 || data[0..4] != [0, 0, 1, 0] {
        anyhow::bail!("{path} is not an ICO file");
    }

    let count = u16::from_le_bytes([data[4], data[5]]) as usize;
    println!("Checking icon: {}", path);
    println!("File size: {} bytes, {} entries", data.len(), count);

    for index in 0..count {
        let start = 6 + index * 16;
        let entry = data
            .get(start..start + 16)
            .with_context(|| format!("Directory entry {index} is truncated"))?;

        // A stored 0 means 256
        let width = if entry[0] == 0 { 256 } else { entry[0] as u32 };
        let height = if entry[1] == 0 { 256 } else { entry[1] as u32 };
        let bits = u16::from_le_bytes([entry[6], entry[7]]);
        let bytes = u32::from_le_bytes([entry[8], entry[9], entry[10], entry[11]]);
        let offset = u32::from_le_bytes([entry[12], entry[13], entry[14], entry[15]]) as usize;

        let payload = data.get(offset..offset + bytes as usize).unwrap_or(&[]);
        let kind = if payload.starts_with(b"\x89PNG") { "png" } else { "bmp" };

        println!(
            "  #{index}: {width}x{height}, {bits} bpp, {bytes} bytes ({kind})"
        );
    }

    let primary = image::open(&path).context("Failed to decode primary image")?;
    println!(
        "\nPrimary image decodes as {}x{}",
        primary.width(),
        primary.height()
    );

    Ok(())
}
