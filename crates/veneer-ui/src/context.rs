//! Drawing context handed to items while painting.
//!
//! All widgets render through `DrawContext`, which wraps a
//! `&mut dyn HostSurface` together with the skin-wide drawing options.

use veneer_types::backend::{Color, HostSurface};
use veneer_types::error::Result;
use veneer_types::geometry::Rect;

/// Outline color used when the skin enables debug outlines.
pub const DEBUG_OUTLINE: Color = Color::rgb(255, 0, 255);

/// Drawing context wrapping a host surface.
pub struct DrawContext<'a> {
    pub backend: &'a mut dyn HostSurface,
    /// Draw a frame around every item.
    pub debug_outline: bool,
    /// Suffix appended to truncated text.
    pub ellipsis: &'a str,
}

impl<'a> DrawContext<'a> {
    pub fn new(backend: &'a mut dyn HostSurface, ellipsis: &'a str) -> Self {
        Self {
            backend,
            debug_outline: false,
            ellipsis,
        }
    }

    pub fn with_debug_outline(mut self, on: bool) -> Self {
        self.debug_outline = on;
        self
    }

    /// Draw `text` vertically centered in `rect`, starting at `x`.
    pub fn text_in(&mut self, text: &str, x: i32, rect: Rect, color: Color) -> Result<()> {
        let th = self.backend.measure_text_height() as i32;
        let y = rect.y.saturating_add((rect.h.saturating_sub(th) / 2).max(0));
        self.backend.draw_text(text, x, y, color)
    }

    /// Frame an item rectangle when debug outlines are on.
    pub fn outline(&mut self, rect: Rect) -> Result<()> {
        if self.debug_outline {
            self.backend.stroke_rect(rect, DEBUG_OUTLINE)?;
        }
        Ok(())
    }
}
