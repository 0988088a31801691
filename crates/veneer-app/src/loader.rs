//! Filesystem resource loading: skin texts and PNG sprite sheets.

use std::fs;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

use veneer_types::backend::ResourceLoader;
use veneer_types::bitmap::Bitmap;
use veneer_types::error::{Result, SkinError};

/// Resolves skin-relative paths under one directory.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `path` onto the root. Absolute paths and `..` are refused so
    /// a skin cannot read outside its directory.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let rel = Path::new(path.trim());
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || rel.as_os_str().is_empty() {
            return Err(SkinError::Resource(format!("path '{path}' leaves the skin directory")));
        }
        Ok(self.root.join(rel))
    }
}

impl ResourceLoader for FsLoader {
    fn read_text(&mut self, path: &str) -> Result<String> {
        let full = self.resolve(path)?;
        log::debug!("reading {}", full.display());
        Ok(fs::read_to_string(full)?)
    }

    fn load_bitmap(&mut self, path: &str) -> Result<Bitmap> {
        let full = self.resolve(path)?;
        log::debug!("decoding {}", full.display());
        decode_png(&full).map_err(|e| SkinError::Resource(format!("{path}: {e}")))
    }
}

/// Decode a PNG file into an RGBA bitmap.
pub fn decode_png(path: &Path) -> Result<Bitmap> {
    let file = fs::File::open(path)?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| SkinError::Resource(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| SkinError::Resource(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let (pixels, has_alpha) = match info.color_type {
        png::ColorType::Rgba => (data.to_vec(), true),
        png::ColorType::Rgb => (
            data.chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect(),
            false,
        ),
        png::ColorType::GrayscaleAlpha => (
            data.chunks_exact(2)
                .flat_map(|px| [px[0], px[0], px[0], px[1]])
                .collect(),
            true,
        ),
        png::ColorType::Grayscale => (data.iter().flat_map(|&g| [g, g, g, 255]).collect(), false),
        png::ColorType::Indexed => {
            return Err(SkinError::Resource("indexed PNG was not expanded".into()));
        },
    };
    Bitmap::from_rgba(info.width, info.height, pixels, has_alpha)
        .ok_or_else(|| SkinError::Resource(format!("bad pixel data in {}", path.display())))
}
