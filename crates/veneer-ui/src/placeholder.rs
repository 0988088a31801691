//! Placeholders reserve space for surfaces the host application owns.

use veneer_types::backend::{ExternalSurface, HostSurface};
use veneer_types::error::Result;
use veneer_types::geometry::Rect;

use crate::context::DrawContext;
use crate::palette::Palette;
use crate::widget::Widget;

/// Positions a host surface (the workspace view or a text input) over the
/// item's rectangle. Draws nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub surface: ExternalSurface,
    placed: Option<Rect>,
}

impl Placeholder {
    pub fn new(surface: ExternalSurface) -> Self {
        Self {
            surface,
            placed: None,
        }
    }

    pub fn placed(&self) -> Option<Rect> {
        self.placed
    }
}

impl Widget for Placeholder {
    fn on_size(&mut self, rect: Rect, host: &mut dyn HostSurface) -> Result<()> {
        if self.placed != Some(rect) {
            self.placed = Some(rect);
            host.place_external(self.surface, Some(rect));
        }
        Ok(())
    }

    fn on_detach(&mut self, host: &mut dyn HostSurface) {
        if self.placed.take().is_some() {
            host.place_external(self.surface, None);
        }
    }

    fn paint(&self, _ctx: &mut DrawContext<'_>, _rect: Rect, _palette: &Palette) -> Result<()> {
        Ok(())
    }

    fn is_translucent(&self) -> bool {
        true
    }
}
