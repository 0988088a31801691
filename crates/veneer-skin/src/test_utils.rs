//! In-memory resource loader for parser tests.

use std::collections::HashMap;

use veneer_types::backend::{Color, ResourceLoader};
use veneer_types::bitmap::Bitmap;
use veneer_types::error::{Result, SkinError};

pub const CONTROL: Color = Color::rgb(255, 0, 255);

/// Serves texts and bitmaps from maps, counting loads.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    pub texts: HashMap<String, String>,
    pub bitmaps: HashMap<String, Bitmap>,
    pub bitmap_loads: usize,
    pub text_reads: usize,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, path: &str, text: &str) -> Self {
        self.texts.insert(path.to_string(), text.to_string());
        self
    }

    pub fn with_bitmap(mut self, path: &str, bitmap: Bitmap) -> Self {
        self.bitmaps.insert(path.to_string(), bitmap);
        self
    }

    /// Register a sprite sheet with boundary columns `cols` and rows
    /// `rows`; cells are white.
    pub fn with_sheet(self, path: &str, width: u32, height: u32, cols: &[u32], rows: &[u32]) -> Self {
        self.with_bitmap(path, sheet_bitmap(width, height, cols, rows))
    }
}

pub fn sheet_bitmap(width: u32, height: u32, cols: &[u32], rows: &[u32]) -> Bitmap {
    let mut bmp = Bitmap::solid(width, height, Color::WHITE);
    for x in 0..3 {
        bmp.set_pixel(x, 0, CONTROL);
    }
    for &x in cols {
        bmp.set_pixel(x, 1, CONTROL);
    }
    for &y in rows {
        bmp.set_pixel(1, y, CONTROL);
    }
    bmp
}

impl ResourceLoader for MemoryLoader {
    fn read_text(&mut self, path: &str) -> Result<String> {
        self.text_reads += 1;
        self.texts
            .get(path)
            .cloned()
            .ok_or_else(|| SkinError::Resource(format!("no such text '{path}'")))
    }

    fn load_bitmap(&mut self, path: &str) -> Result<Bitmap> {
        self.bitmap_loads += 1;
        self.bitmaps
            .get(path)
            .cloned()
            .ok_or_else(|| SkinError::Resource(format!("no such bitmap '{path}'")))
    }
}
