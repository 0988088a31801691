//! Host trait definitions.
//!
//! The embedding application implements these traits. The skin engine
//! dispatches all drawing, timers, window state and resource loading
//! through trait boundaries -- it never calls platform-specific APIs.

use crate::bitmap::Bitmap;
use crate::error::Result;
use crate::geometry::Rect;

/// A color in RGBA format (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Return the same color with a different alpha value.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Compare the color channels only.
    pub fn same_rgb(self, other: Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
}

/// Width of one glyph of the fallback fixed-width font.
pub const GLYPH_WIDTH: u32 = 8;

/// Height of one line of the fallback fixed-width font.
pub const GLYPH_HEIGHT: u32 = 8;

/// Handle of a host timer. Allocated by the engine's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Content surfaces owned by the embedding application that items only
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalSurface {
    /// The application's main content view.
    Workspace,
    /// A text-entry control.
    Input,
    /// Video / visualization overlay reserved inside a div.
    Overlay,
}

/// Source of skin text and bitmaps.
pub trait ResourceLoader {
    /// Read a text resource (skin documents and includes).
    fn read_text(&mut self, path: &str) -> Result<String>;

    /// Load and decode a bitmap resource.
    fn load_bitmap(&mut self, path: &str) -> Result<Bitmap>;
}

/// Host surface consumed by the engine.
///
/// # Core Methods (required)
///
/// Drawing (`fill_rect`, `draw_bitmap`, `draw_text`, `measure_text`),
/// clipping, offscreen compositing, timers and window state.
///
/// # Extended Methods (optional, with defaults)
///
/// Default implementations approximate using the core methods, so a
/// minimal host only implements the core set.
pub trait HostSurface {
    // -----------------------------------------------------------------------
    // Core methods (required -- no default implementations)
    // -----------------------------------------------------------------------

    /// Draw a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    /// Copy the `src` region of a bitmap to `(x, y)`, honoring its alpha.
    fn draw_bitmap(&mut self, bitmap: &Bitmap, src: Rect, x: i32, y: i32) -> Result<()>;

    /// Draw a line of text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> Result<()>;

    /// Measure the rendered width of a text string in pixels.
    fn measure_text(&self, text: &str) -> u32;

    /// Restrict subsequent drawing to `rect`.
    fn set_clip_rect(&mut self, rect: Rect) -> Result<()>;

    /// Remove any clip rectangle.
    fn reset_clip_rect(&mut self) -> Result<()>;

    /// Redirect subsequent drawing to an offscreen buffer covering `rect`.
    fn begin_offscreen(&mut self, rect: Rect) -> Result<()>;

    /// Blit the offscreen buffer onscreen and resume direct drawing.
    fn end_offscreen(&mut self) -> Result<()>;

    /// Start (or restart) a periodic timer. Ticks arrive as
    /// [`HostEvent::Timer`](crate::input::HostEvent::Timer).
    fn start_timer(&mut self, id: TimerId, interval_ms: u32);

    /// Stop a timer. No tick for `id` may be delivered afterwards.
    fn stop_timer(&mut self, id: TimerId);

    /// Visible screen area available to the window.
    fn screen_work_area(&self) -> Rect;

    /// Move / resize the host window.
    fn set_window_rect(&mut self, rect: Rect);

    fn set_always_on_top(&mut self, on_top: bool);

    fn set_fullscreen(&mut self, fullscreen: bool);

    /// Position an application-owned surface, or hide it with `None`.
    fn place_external(&mut self, surface: ExternalSurface, rect: Option<Rect>);

    // -----------------------------------------------------------------------
    // Extended methods (optional)
    // -----------------------------------------------------------------------

    /// Height of one text line.
    fn measure_text_height(&self) -> u32 {
        GLYPH_HEIGHT
    }

    /// Draw the outline of a rectangle, one pixel wide.
    fn stroke_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        if rect.is_empty() {
            return Ok(());
        }
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, 1), color)?;
        self.fill_rect(Rect::new(rect.x, rect.bottom() - 1, rect.w, 1), color)?;
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.h), color)?;
        self.fill_rect(Rect::new(rect.right() - 1, rect.y, 1, rect.h), color)?;
        Ok(())
    }

    /// Repeat the `src` region of a bitmap across `dst`, clipping the last
    /// row and column of tiles.
    fn tile_bitmap(&mut self, bitmap: &Bitmap, src: Rect, dst: Rect) -> Result<()> {
        if src.is_empty() || dst.is_empty() {
            return Ok(());
        }
        let mut ty = dst.y;
        while ty < dst.bottom() {
            let th = src.h.min(dst.bottom() - ty);
            let mut tx = dst.x;
            while tx < dst.right() {
                let tw = src.w.min(dst.right() - tx);
                self.draw_bitmap(bitmap, Rect::new(src.x, src.y, tw, th), tx, ty)?;
                let Some(next) = tx.checked_add(src.w) else {
                    break;
                };
                tx = next;
            }
            let Some(next) = ty.checked_add(src.h) else {
                break;
            };
            ty = next;
        }
        Ok(())
    }
}
