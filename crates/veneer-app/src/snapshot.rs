//! Headless rendering of a layout to a PNG file.

use std::fs;
use std::path::Path;

use anyhow::Context;

use veneer_engine::{SkinEngine, SoftwareSurface};
use veneer_types::bitmap::Bitmap;

/// Screen size reported to the engine while rendering headless.
pub const SCREEN: (u32, u32) = (1920, 1080);

/// Paint the engine's active layout and return the framebuffer.
pub fn render(engine: &SkinEngine, host: &mut SoftwareSurface) -> anyhow::Result<Bitmap> {
    engine.paint(host, engine.client_rect())?;
    Ok(host.snapshot())
}

pub fn save_png(path: &Path, bitmap: &Bitmap) -> anyhow::Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, bitmap.width, bitmap.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&bitmap.pixels)?;
    Ok(())
}
