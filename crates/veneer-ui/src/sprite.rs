//! Sprite sheet slicing.
//!
//! One bitmap holds a grid of sub-images separated by one-pixel lines in
//! a sentinel color. Header pixels in the top row describe the sheet:
//!
//! | pixel  | meaning                                               |
//! |--------|-------------------------------------------------------|
//! | (0, 0) | control color: marks grid boundaries                  |
//! | (1, 0) | mask color: chroma key when the bitmap has no alpha   |
//! | (2, 0) | skip color: cells starting with it are left empty     |
//!
//! Column boundaries are read from row 1, row boundaries from column 1.
//! Cells are indexed row-major.

use veneer_types::backend::Color;
use veneer_types::bitmap::Bitmap;
use veneer_types::geometry::Rect;

/// Why a bitmap could not be sliced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SliceError {
    #[error("bitmap {0}x{1} is too small to carry a sprite header")]
    TooSmall(u32, u32),
    #[error("sprite grid has no cells")]
    Empty,
    #[error("sprite grid {0}x{1} exceeds the limit of {2} cells")]
    TooManyCells(usize, usize, usize),
}

/// A bitmap decomposed into an indexed grid of optional sub-bitmaps.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub source: Bitmap,
    pub control_color: Color,
    pub mask_color: Option<Color>,
    pub skip_color: Option<Color>,
    pub x_count: usize,
    pub y_count: usize,
    cells: Vec<Option<Bitmap>>,
    /// Per-cell problems that left a cell empty (index, reason).
    pub cell_errors: Vec<(usize, String)>,
}

impl SpriteSheet {
    /// Slice `bitmap`, allowing at most `max_cells` cells.
    pub fn slice(bitmap: Bitmap, max_cells: usize) -> Result<Self, SliceError> {
        if bitmap.width < 3 || bitmap.height < 2 {
            return Err(SliceError::TooSmall(bitmap.width, bitmap.height));
        }
        let control = bitmap.pixel(0, 0);
        let mask = Some(bitmap.pixel(1, 0)).filter(|c| *c != control);
        let skip = Some(bitmap.pixel(2, 0)).filter(|c| *c != control);

        let xs = boundaries(bitmap.width, |x| bitmap.pixel(x, 1) == control);
        let ys = boundaries(bitmap.height, |y| bitmap.pixel(1, y) == control);
        let x_count = xs.len().saturating_sub(1);
        let y_count = ys.len().saturating_sub(1);
        if x_count == 0 || y_count == 0 {
            return Err(SliceError::Empty);
        }
        if x_count * y_count > max_cells {
            return Err(SliceError::TooManyCells(x_count, y_count, max_cells));
        }

        let key = if bitmap.has_alpha { None } else { mask };
        let mut cells = Vec::with_capacity(x_count * y_count);
        let mut cell_errors = Vec::new();
        for row in 0..y_count {
            for col in 0..x_count {
                let index = row * x_count + col;
                let x0 = xs[col] + 1;
                let y0 = ys[row] + 1;
                let w = xs[col + 1].saturating_sub(x0);
                let h = ys[row + 1].saturating_sub(y0);
                if w == 0 || h == 0 {
                    cell_errors.push((index, format!("cell {index} is {w}x{h}")));
                    cells.push(None);
                    continue;
                }
                if skip.is_some_and(|s| bitmap.pixel(x0, y0) == s) {
                    cells.push(None);
                    continue;
                }
                let mut cell = bitmap.sub_image(x0, y0, w, h);
                if let Some(k) = key {
                    cell.apply_color_key(k);
                }
                cells.push(Some(cell));
            }
        }
        for (index, reason) in &cell_errors {
            log::warn!("sprite cell {index} skipped: {reason}");
        }

        Ok(Self {
            source: bitmap,
            control_color: control,
            mask_color: mask,
            skip_color: skip,
            x_count,
            y_count,
            cells,
            cell_errors,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The decoded cell at `index`, or `None` when absent or out of range.
    pub fn cell(&self, index: usize) -> Option<&Bitmap> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Size of a present cell.
    pub fn cell_size(&self, index: usize) -> Option<(i32, i32)> {
        self.cell(index).map(|b| (b.width as i32, b.height as i32))
    }

    /// Draw a cell with its top-left corner at `(x, y)`.
    pub fn draw_cell(
        &self,
        backend: &mut dyn veneer_types::backend::HostSurface,
        index: usize,
        x: i32,
        y: i32,
    ) -> veneer_types::error::Result<()> {
        if let Some(cell) = self.cell(index) {
            let src = Rect::new(0, 0, cell.width as i32, cell.height as i32);
            backend.draw_bitmap(cell, src, x, y)?;
        }
        Ok(())
    }

    /// Tile a cell across `dst`.
    pub fn tile_cell(
        &self,
        backend: &mut dyn veneer_types::backend::HostSurface,
        index: usize,
        dst: Rect,
    ) -> veneer_types::error::Result<()> {
        if let Some(cell) = self.cell(index) {
            let src = Rect::new(0, 0, cell.width as i32, cell.height as i32);
            backend.tile_bitmap(cell, src, dst)?;
        }
        Ok(())
    }

    pub fn cell_is_translucent(&self, index: usize) -> bool {
        self.cell(index).is_some_and(Bitmap::is_translucent)
    }
}

/// Boundary coordinates along one axis: 0, every sentinel hit, and the
/// far edge when the last explicit boundary is not the final pixel.
fn boundaries(len: u32, is_marker: impl Fn(u32) -> bool) -> Vec<u32> {
    let mut out = vec![0];
    for i in 1..len {
        if is_marker(i) {
            out.push(i);
        }
    }
    if out.last().is_some_and(|&last| last + 1 < len) {
        out.push(len);
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const CONTROL: Color = Color::rgb(255, 0, 255);
    pub const MASK: Color = Color::rgb(0, 255, 0);
    pub const SKIP: Color = Color::rgb(0, 0, 255);

    /// Build a sheet with the given boundary columns / rows; cell content
    /// is white.
    pub fn sheet_bitmap(width: u32, height: u32, cols: &[u32], rows: &[u32]) -> Bitmap {
        let mut bmp = Bitmap::solid(width, height, Color::WHITE);
        bmp.set_pixel(0, 0, CONTROL);
        bmp.set_pixel(1, 0, CONTROL);
        bmp.set_pixel(2, 0, CONTROL);
        for &x in cols {
            bmp.set_pixel(x, 1, CONTROL);
        }
        for &y in rows {
            bmp.set_pixel(1, y, CONTROL);
        }
        bmp
    }

    #[test]
    fn four_columns_of_nine_pixels() {
        let bmp = sheet_bitmap(40, 20, &[10, 20, 30], &[]);
        let sheet = SpriteSheet::slice(bmp, 64).unwrap();
        assert_eq!(sheet.x_count, 4);
        assert_eq!(sheet.y_count, 1);
        for i in 0..4 {
            assert_eq!(sheet.cell_size(i), Some((9, 19)));
        }
    }

    #[test]
    fn explicit_closing_boundary() {
        let bmp = sheet_bitmap(41, 20, &[10, 20, 30, 40], &[]);
        let sheet = SpriteSheet::slice(bmp, 64).unwrap();
        assert_eq!(sheet.x_count, 4);
        assert_eq!(sheet.cell_size(3), Some((9, 19)));
    }

    #[test]
    fn grid_rows_and_columns() {
        let bmp = sheet_bitmap(21, 31, &[10, 20], &[10, 20, 30]);
        let sheet = SpriteSheet::slice(bmp, 64).unwrap();
        assert_eq!((sheet.x_count, sheet.y_count), (2, 3));
        assert_eq!(sheet.cell_count(), 6);
        assert_eq!(sheet.cell_size(5), Some((9, 9)));
        assert!(sheet.cell(6).is_none());
    }

    #[test]
    fn cell_limit_enforced() {
        let bmp = sheet_bitmap(21, 31, &[10, 20], &[10, 20, 30]);
        assert_eq!(
            SpriteSheet::slice(bmp, 5),
            Err(SliceError::TooManyCells(2, 3, 5))
        );
    }

    #[test]
    fn too_small() {
        let bmp = Bitmap::solid(2, 2, CONTROL);
        assert_eq!(SpriteSheet::slice(bmp, 8), Err(SliceError::TooSmall(2, 2)));
    }

    #[test]
    fn adjacent_markers_give_empty_cell() {
        let bmp = sheet_bitmap(20, 10, &[10, 11], &[]);
        let sheet = SpriteSheet::slice(bmp, 8).unwrap();
        assert_eq!(sheet.x_count, 3);
        assert!(sheet.cell(1).is_none());
        assert_eq!(sheet.cell_errors.len(), 1);
        assert!(sheet.cell(2).is_some());
    }

    #[test]
    fn skip_color_marks_absent_cells() {
        let mut bmp = sheet_bitmap(21, 10, &[10, 20], &[]);
        bmp.set_pixel(2, 0, SKIP);
        bmp.set_pixel(11, 1, SKIP);
        let sheet = SpriteSheet::slice(bmp, 8).unwrap();
        assert_eq!(sheet.skip_color, Some(SKIP));
        assert!(sheet.cell(0).is_some());
        assert!(sheet.cell(1).is_none());
        assert!(sheet.cell_errors.is_empty());
    }

    #[test]
    fn mask_color_keys_opaque_bitmaps() {
        let mut bmp = sheet_bitmap(10, 10, &[], &[]);
        bmp.set_pixel(1, 0, MASK);
        bmp.set_pixel(5, 5, MASK);
        let sheet = SpriteSheet::slice(bmp, 8).unwrap();
        let cell = sheet.cell(0).unwrap();
        assert_eq!(cell.pixel(4, 4).a, 0);
        assert_eq!(cell.pixel(3, 3).a, 255);
        assert!(sheet.cell_is_translucent(0));
    }

    #[test]
    fn native_alpha_wins_over_mask() {
        let mut bmp = sheet_bitmap(10, 10, &[], &[]);
        bmp.has_alpha = true;
        bmp.set_pixel(1, 0, MASK);
        bmp.set_pixel(5, 5, MASK);
        bmp.set_pixel(6, 6, Color::rgba(1, 2, 3, 128));
        let sheet = SpriteSheet::slice(bmp, 8).unwrap();
        let cell = sheet.cell(0).unwrap();
        assert_eq!(cell.pixel(4, 4).a, 255);
        assert_eq!(cell.pixel(5, 5).a, 128);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn slicing_is_idempotent(cols in proptest::collection::btree_set(3u32..60, 0..6),
                                     rows in proptest::collection::btree_set(3u32..40, 0..4)) {
                let cols: Vec<u32> = cols.into_iter().collect();
                let rows: Vec<u32> = rows.into_iter().collect();
                let bmp = sheet_bitmap(64, 48, &cols, &rows);
                let a = SpriteSheet::slice(bmp.clone(), 1024).unwrap();
                let b = SpriteSheet::slice(bmp, 1024).unwrap();
                prop_assert_eq!(a.cell_count(), b.cell_count());
                for i in 0..a.cell_count() {
                    prop_assert_eq!(a.cell(i), b.cell(i));
                }
            }
        }
    }
}
