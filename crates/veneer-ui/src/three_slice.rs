//! Three-slice rendering: fixed prologue, tiled middle, fixed epilogue.

use veneer_types::backend::HostSurface;
use veneer_types::error::Result;
use veneer_types::geometry::Rect;

use crate::sprite::SpriteSheet;

/// Direction a strip of art is laid out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Axis along the longer side of `rect`; ties go horizontal.
    pub fn dominant(rect: Rect) -> Self {
        if rect.h > rect.w {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }

    /// Length of `rect` along this axis.
    pub fn len(self, rect: Rect) -> i32 {
        match self {
            Self::Horizontal => rect.w,
            Self::Vertical => rect.h,
        }
    }

    /// Start coordinate of `rect` along this axis.
    pub fn start(self, rect: Rect) -> i32 {
        match self {
            Self::Horizontal => rect.x,
            Self::Vertical => rect.y,
        }
    }

    /// Sub-span `[from, from + len)` of `rect` along this axis.
    pub fn span(self, rect: Rect, from: i32, len: i32) -> Rect {
        match self {
            Self::Horizontal => Rect::new(rect.x.saturating_add(from), rect.y, len.max(0), rect.h),
            Self::Vertical => Rect::new(rect.x, rect.y.saturating_add(from), rect.w, len.max(0)),
        }
    }

    fn cell_len(self, size: (i32, i32)) -> i32 {
        match self {
            Self::Horizontal => size.0,
            Self::Vertical => size.1,
        }
    }
}

/// Cell indices for a strip drawn from one, or up to three, sprite cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThreeSlice {
    pub start: Option<usize>,
    pub middle: Option<usize>,
    pub end: Option<usize>,
}

impl ThreeSlice {
    /// A strip tiled from a single cell.
    pub const fn single(index: usize) -> Self {
        Self {
            start: None,
            middle: Some(index),
            end: None,
        }
    }

    /// Build from an index list: one entry tiles, three entries slice.
    pub fn from_indices(list: &[Option<usize>]) -> Option<Self> {
        match list {
            [one] => one.map(Self::single),
            [start, middle, end] => Some(Self {
                start: *start,
                middle: *middle,
                end: *end,
            }),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.middle.is_none() && self.end.is_none()
    }

    /// Combined length of the fixed prologue and epilogue along `axis`.
    pub fn fixed_len(&self, sheet: &SpriteSheet, axis: Axis) -> i32 {
        let len = |i: Option<usize>| {
            i.and_then(|i| sheet.cell_size(i))
                .map_or(0, |s| axis.cell_len(s))
        };
        len(self.start) + len(self.end)
    }

    /// Natural size: all three cells laid end to end.
    pub fn natural_size(&self, sheet: &SpriteSheet, axis: Axis) -> Option<(i32, i32)> {
        let sizes: Vec<_> = [self.start, self.middle, self.end]
            .into_iter()
            .flatten()
            .filter_map(|i| sheet.cell_size(i))
            .collect();
        if sizes.is_empty() {
            return None;
        }
        let along: i32 = sizes.iter().map(|&s| axis.cell_len(s)).sum();
        let across = sizes
            .iter()
            .map(|&(w, h)| if axis == Axis::Horizontal { h } else { w })
            .max()
            .unwrap_or(0);
        Some(match axis {
            Axis::Horizontal => (along, across),
            Axis::Vertical => (across, along),
        })
    }

    pub fn is_translucent(&self, sheet: &SpriteSheet) -> bool {
        [self.start, self.middle, self.end]
            .into_iter()
            .flatten()
            .any(|i| sheet.cell_is_translucent(i))
    }

    /// Draw into `rect`. Prologue and epilogue keep their size; the middle
    /// cell tiles the remainder.
    pub fn draw(
        &self,
        sheet: &SpriteSheet,
        backend: &mut dyn HostSurface,
        rect: Rect,
        axis: Axis,
    ) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        let total = axis.len(rect);
        let head = self
            .start
            .and_then(|i| sheet.cell_size(i))
            .map_or(0, |s| axis.cell_len(s))
            .min(total);
        let tail = self
            .end
            .and_then(|i| sheet.cell_size(i))
            .map_or(0, |s| axis.cell_len(s))
            .min(total - head);

        if let Some(i) = self.middle {
            sheet.tile_cell(backend, i, axis.span(rect, head, total - head - tail))?;
        }
        if let Some(i) = self.start {
            sheet.tile_cell(backend, i, axis.span(rect, 0, head))?;
        }
        if let Some(i) = self.end {
            sheet.tile_cell(backend, i, axis.span(rect, total - tail, tail))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::tests::sheet_bitmap;
    use crate::test_utils::MockBackend;

    /// Three 4x6 cells side by side.
    fn sheet() -> SpriteSheet {
        SpriteSheet::slice(sheet_bitmap(16, 8, &[5, 10, 15], &[7]), 64).unwrap()
    }

    #[test]
    fn from_index_lists() {
        assert_eq!(ThreeSlice::from_indices(&[Some(2)]), Some(ThreeSlice::single(2)));
        let t = ThreeSlice::from_indices(&[Some(0), None, Some(2)]).unwrap();
        assert_eq!(t.middle, None);
        assert_eq!(ThreeSlice::from_indices(&[Some(0), Some(1)]), None);
        assert_eq!(ThreeSlice::from_indices(&[None]), None);
    }

    #[test]
    fn dominant_axis() {
        assert_eq!(Axis::dominant(Rect::new(0, 0, 10, 30)), Axis::Vertical);
        assert_eq!(Axis::dominant(Rect::new(0, 0, 30, 10)), Axis::Horizontal);
        assert_eq!(Axis::dominant(Rect::new(0, 0, 10, 10)), Axis::Horizontal);
    }

    #[test]
    fn caps_keep_their_size() {
        let s = sheet();
        assert_eq!(s.cell_count(), 3);
        let t = ThreeSlice {
            start: Some(0),
            middle: Some(1),
            end: Some(2),
        };
        let mut backend = MockBackend::new();
        t.draw(&s, &mut backend, Rect::new(10, 0, 20, 6), Axis::Horizontal)
            .unwrap();
        let blits = backend.blits();
        // middle tiles 12 px with 4 px cells, then the two caps
        assert_eq!(blits.len(), 5);
        assert_eq!(blits[0], (14, 0, 4, 6));
        assert_eq!(blits[3], (10, 0, 4, 6));
        assert_eq!(blits[4], (26, 0, 4, 6));
        assert_eq!(t.fixed_len(&s, Axis::Horizontal), 8);
        assert_eq!(t.natural_size(&s, Axis::Horizontal), Some((12, 6)));
    }

    #[test]
    fn caps_clip_when_too_short() {
        let s = sheet();
        let t = ThreeSlice {
            start: Some(0),
            middle: Some(1),
            end: Some(2),
        };
        let mut backend = MockBackend::new();
        t.draw(&s, &mut backend, Rect::new(0, 0, 6, 6), Axis::Horizontal)
            .unwrap();
        let blits = backend.blits();
        assert_eq!(blits, vec![(0, 0, 4, 6), (4, 0, 2, 6)]);
    }
}
