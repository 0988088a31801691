//! Decoded bitmaps shared by the sprite slicer and the host surface.

use crate::backend::Color;

/// Decoded image data (RGBA pixels).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major.
    pub pixels: Vec<u8>,
    /// Whether the source format carried a native alpha channel.
    pub has_alpha: bool,
}

impl Bitmap {
    /// Wrap RGBA data. Returns `None` when the buffer length does not match.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>, has_alpha: bool) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
            has_alpha,
        })
    }

    /// An opaque bitmap filled with one color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Self {
            width,
            height,
            pixels,
            has_alpha: color.a != 255,
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Read one pixel. Out-of-range coordinates read as transparent.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        if x >= self.width || y >= self.height {
            return Color::TRANSPARENT;
        }
        let i = self.index(x, y);
        Color::rgba(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    /// Write one pixel. Out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.index(x, y);
        self.pixels[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    /// Copy a sub-rectangle into an independent bitmap.
    ///
    /// The region is clipped to the source bounds.
    pub fn sub_image(&self, x: u32, y: u32, w: u32, h: u32) -> Bitmap {
        let x0 = x.min(self.width);
        let y0 = y.min(self.height);
        let w = w.min(self.width - x0);
        let h = h.min(self.height - y0);
        let mut pixels = Vec::with_capacity(w as usize * h as usize * 4);
        for row in y0..y0 + h {
            let start = self.index(x0, row);
            pixels.extend_from_slice(&self.pixels[start..start + w as usize * 4]);
        }
        Bitmap {
            width: w,
            height: h,
            pixels,
            has_alpha: self.has_alpha,
        }
    }

    /// Make every pixel matching `key` (ignoring alpha) fully transparent.
    pub fn apply_color_key(&mut self, key: Color) {
        let mut keyed = false;
        for px in self.pixels.chunks_exact_mut(4) {
            if px[0] == key.r && px[1] == key.g && px[2] == key.b {
                px[3] = 0;
                keyed = true;
            }
        }
        if keyed {
            self.has_alpha = true;
        }
    }

    /// Whether any pixel is not fully opaque.
    pub fn is_translucent(&self) -> bool {
        self.has_alpha && self.pixels.chunks_exact(4).any(|px| px[3] != 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_rejects_wrong_length() {
        assert!(Bitmap::from_rgba(2, 2, vec![0; 15], false).is_none());
        assert!(Bitmap::from_rgba(2, 2, vec![0; 16], false).is_some());
    }

    #[test]
    fn pixel_roundtrip() {
        let mut bmp = Bitmap::solid(4, 3, Color::BLACK);
        bmp.set_pixel(3, 2, Color::rgb(1, 2, 3));
        assert_eq!(bmp.pixel(3, 2), Color::rgb(1, 2, 3));
        assert_eq!(bmp.pixel(4, 0), Color::TRANSPARENT);
    }

    #[test]
    fn sub_image_copies_region() {
        let mut bmp = Bitmap::solid(5, 5, Color::WHITE);
        bmp.set_pixel(2, 2, Color::rgb(9, 9, 9));
        let sub = bmp.sub_image(1, 1, 3, 3);
        assert_eq!((sub.width, sub.height), (3, 3));
        assert_eq!(sub.pixel(1, 1), Color::rgb(9, 9, 9));
        assert_eq!(sub.pixel(0, 0), Color::WHITE);
    }

    #[test]
    fn sub_image_is_clipped() {
        let bmp = Bitmap::solid(4, 4, Color::WHITE);
        let sub = bmp.sub_image(3, 3, 10, 10);
        assert_eq!((sub.width, sub.height), (1, 1));
    }

    #[test]
    fn color_key_sets_alpha() {
        let mut bmp = Bitmap::solid(2, 1, Color::rgb(255, 0, 255));
        bmp.set_pixel(1, 0, Color::WHITE);
        assert!(!bmp.is_translucent());
        bmp.apply_color_key(Color::rgb(255, 0, 255));
        assert_eq!(bmp.pixel(0, 0).a, 0);
        assert_eq!(bmp.pixel(1, 0).a, 255);
        assert!(bmp.is_translucent());
    }
}
