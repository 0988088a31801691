//! Shared test utilities for veneer-ui widget tests.
//!
//! Provides a [`MockBackend`] that records all draw calls, timer requests
//! and external-surface placements for assertion.

use veneer_types::backend::{Color, ExternalSurface, GLYPH_WIDTH, HostSurface, TimerId};
use veneer_types::bitmap::Bitmap;
use veneer_types::error::Result;
use veneer_types::geometry::Rect;

/// A recorded call from the mock backend.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub enum DrawCall {
    FillRect { rect: Rect, color: Color },
    DrawText { text: String, x: i32, y: i32, color: Color },
    Blit { src: Rect, x: i32, y: i32, w: u32, h: u32 },
    Clip(Rect),
    ResetClip,
    BeginOffscreen(Rect),
    EndOffscreen,
}

/// A mock host that records everything for test assertions.
pub struct MockBackend {
    pub calls: Vec<DrawCall>,
    pub timers: Vec<(TimerId, Option<u32>)>,
    pub placements: Vec<(ExternalSurface, Option<Rect>)>,
    pub work_area: Rect,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            timers: Vec::new(),
            placements: Vec::new(),
            work_area: Rect::new(0, 0, 1920, 1080),
        }
    }

    /// Count of `FillRect` calls.
    pub fn fill_rect_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect { .. }))
            .count()
    }

    /// Count of `Blit` calls.
    pub fn blit_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Blit { .. }))
            .count()
    }

    /// `Blit` destinations as `(x, y, w, h)`.
    pub fn blits(&self) -> Vec<(i32, i32, u32, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Blit { x, y, w, h, .. } => Some((*x, *y, *w, *h)),
                _ => None,
            })
            .collect()
    }

    /// Return text draw calls as `(text, x, y)` tuples,
    /// sorted by Y then X position for easy geometric analysis.
    pub fn text_positions(&self) -> Vec<(&str, i32, i32)> {
        let mut positions: Vec<_> = self
            .calls
            .iter()
            .filter_map(|c| {
                if let DrawCall::DrawText { text, x, y, .. } = c {
                    Some((text.as_str(), *x, *y))
                } else {
                    None
                }
            })
            .collect();
        positions.sort_by(|a, b| a.2.cmp(&b.2).then(a.1.cmp(&b.1)));
        positions
    }

    /// Check if any `DrawText` call contains the given substring.
    pub fn has_text(&self, needle: &str) -> bool {
        self.calls.iter().any(|c| {
            if let DrawCall::DrawText { text, .. } = c {
                text.contains(needle)
            } else {
                false
            }
        })
    }

    /// Color of the first text call.
    pub fn text_color(&self) -> Option<Color> {
        self.calls.iter().find_map(|c| match c {
            DrawCall::DrawText { color, .. } => Some(*color),
            _ => None,
        })
    }
}

impl HostSurface for MockBackend {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        self.calls.push(DrawCall::FillRect { rect, color });
        Ok(())
    }

    fn draw_bitmap(&mut self, _bitmap: &Bitmap, src: Rect, x: i32, y: i32) -> Result<()> {
        self.calls.push(DrawCall::Blit {
            src,
            x,
            y,
            w: src.w as u32,
            h: src.h as u32,
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> Result<()> {
        self.calls.push(DrawCall::DrawText {
            text: text.to_string(),
            x,
            y,
            color,
        });
        Ok(())
    }

    fn measure_text(&self, text: &str) -> u32 {
        text.chars().count() as u32 * GLYPH_WIDTH
    }

    fn set_clip_rect(&mut self, rect: Rect) -> Result<()> {
        self.calls.push(DrawCall::Clip(rect));
        Ok(())
    }

    fn reset_clip_rect(&mut self) -> Result<()> {
        self.calls.push(DrawCall::ResetClip);
        Ok(())
    }

    fn begin_offscreen(&mut self, rect: Rect) -> Result<()> {
        self.calls.push(DrawCall::BeginOffscreen(rect));
        Ok(())
    }

    fn end_offscreen(&mut self) -> Result<()> {
        self.calls.push(DrawCall::EndOffscreen);
        Ok(())
    }

    fn start_timer(&mut self, id: TimerId, interval_ms: u32) {
        self.timers.push((id, Some(interval_ms)));
    }

    fn stop_timer(&mut self, id: TimerId) {
        self.timers.push((id, None));
    }

    fn screen_work_area(&self) -> Rect {
        self.work_area
    }

    fn set_window_rect(&mut self, _rect: Rect) {}

    fn set_always_on_top(&mut self, _on_top: bool) {}

    fn set_fullscreen(&mut self, _fullscreen: bool) {}

    fn place_external(&mut self, surface: ExternalSurface, rect: Option<Rect>) {
        self.placements.push((surface, rect));
    }
}
