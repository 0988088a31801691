//! Image: static art tiled from one sprite cell, or three-sliced from three.

use std::rc::Rc;

use veneer_types::error::Result;
use veneer_types::geometry::Rect;

use crate::attrs::{AttrError, Attributes};
use crate::context::DrawContext;
use crate::palette::Palette;
use crate::sprite::SpriteSheet;
use crate::three_slice::{Axis, ThreeSlice};
use crate::widget::Widget;

#[derive(Debug, Clone)]
pub struct Image {
    pub sheet: Option<Rc<SpriteSheet>>,
    pub slices: ThreeSlice,
    /// Fixed strip direction; `None` follows the longer side.
    pub axis: Option<Axis>,
}

impl Image {
    pub fn new(sheet: Option<Rc<SpriteSheet>>, slices: ThreeSlice) -> Self {
        Self {
            sheet,
            slices,
            axis: None,
        }
    }

    /// `idx="3"` tiles cell 3; `idx="3,4,5"` three-slices. `axis="v"` or
    /// `axis="h"` pins the strip direction.
    pub fn from_attrs(
        attrs: &Attributes,
        sheet: Option<Rc<SpriteSheet>>,
    ) -> std::result::Result<Self, AttrError> {
        let list = attrs.index_list("idx");
        let slices = if list.is_empty() {
            ThreeSlice::single(0)
        } else {
            ThreeSlice::from_indices(&list)
                .ok_or_else(|| AttrError::new("idx", "expected one or three cell indices"))?
        };
        let axis = match attrs.get("axis").map(str::trim) {
            None => None,
            Some(a) if a.eq_ignore_ascii_case("h") => Some(Axis::Horizontal),
            Some(a) if a.eq_ignore_ascii_case("v") => Some(Axis::Vertical),
            Some(_) => return Err(AttrError::new("axis", "expected 'h' or 'v'")),
        };
        Ok(Self {
            sheet,
            slices,
            axis,
        })
    }

    fn axis_for(&self, rect: Rect) -> Axis {
        self.axis.unwrap_or_else(|| Axis::dominant(rect))
    }
}

impl Widget for Image {
    fn paint(&self, ctx: &mut DrawContext<'_>, rect: Rect, _palette: &Palette) -> Result<()> {
        if let Some(sheet) = &self.sheet {
            self.slices
                .draw(sheet, ctx.backend, rect, self.axis_for(rect))?;
        }
        Ok(())
    }

    fn natural_size(&self) -> Option<(i32, i32)> {
        let sheet = self.sheet.as_ref()?;
        self.slices
            .natural_size(sheet, self.axis.unwrap_or(Axis::Horizontal))
    }

    fn is_translucent(&self) -> bool {
        self.sheet
            .as_ref()
            .is_some_and(|s| self.slices.is_translucent(s))
    }
}
