//! Software RGBA framebuffer host.
//!
//! Implements [`HostSurface`] by drawing into a `Vec<u8>` sized to the
//! current window rectangle. Timers, window state and external surface
//! placements are recorded rather than acted upon, which makes this the
//! host for headless rendering and for tests.
//!
//! Text is drawn as one solid block per non-blank character on a fixed
//! 8x8 grid; glyph shapes are left to real hosts.

use std::collections::{BTreeMap, HashMap};

use veneer_types::backend::{Color, ExternalSurface, GLYPH_HEIGHT, GLYPH_WIDTH, HostSurface, TimerId};
use veneer_types::bitmap::Bitmap;
use veneer_types::error::{Result, SkinError};
use veneer_types::geometry::Rect;

/// Offscreen target covering part of the window.
struct Offscreen {
    rect: Rect,
    buffer: Vec<u8>,
}

pub struct SoftwareSurface {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
    clip: Option<Rect>,
    offscreen: Option<Offscreen>,
    composites: usize,
    timers: BTreeMap<TimerId, u32>,
    work_area: Rect,
    window: Rect,
    on_top: bool,
    fullscreen: bool,
    placements: HashMap<ExternalSurface, Rect>,
}

impl SoftwareSurface {
    /// A host on a screen of `screen_w` x `screen_h`. The framebuffer is
    /// empty until the engine sets a window rectangle.
    pub fn new(screen_w: u32, screen_h: u32) -> Self {
        Self {
            width: 0,
            height: 0,
            buffer: Vec::new(),
            clip: None,
            offscreen: None,
            composites: 0,
            timers: BTreeMap::new(),
            work_area: Rect::new(0, 0, screen_w as i32, screen_h as i32),
            window: Rect::ZERO,
            on_top: false,
            fullscreen: false,
            placements: HashMap::new(),
        }
    }

    /// RGBA pixels of the window, row-major.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Copy of the framebuffer.
    pub fn snapshot(&self) -> Bitmap {
        Bitmap {
            width: self.width,
            height: self.height,
            pixels: self.buffer.clone(),
            has_alpha: false,
        }
    }

    /// Read one pixel; out of range reads as transparent.
    pub fn pixel(&self, x: i32, y: i32) -> Color {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return Color::TRANSPARENT;
        }
        let o = ((y as u32 * self.width + x as u32) * 4) as usize;
        Color::rgba(
            self.buffer[o],
            self.buffer[o + 1],
            self.buffer[o + 2],
            self.buffer[o + 3],
        )
    }

    pub fn set_work_area(&mut self, rect: Rect) {
        self.work_area = rect;
    }

    pub fn window_rect(&self) -> Rect {
        self.window
    }

    pub fn is_on_top(&self) -> bool {
        self.on_top
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn placement(&self, surface: ExternalSurface) -> Option<Rect> {
        self.placements.get(&surface).copied()
    }

    /// Timers currently running, by id.
    pub fn running_timers(&self) -> Vec<(TimerId, u32)> {
        self.timers.iter().map(|(&id, &ms)| (id, ms)).collect()
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Completed offscreen composites since creation.
    pub fn composites(&self) -> usize {
        self.composites
    }

    /// Pixels the next draw can reach: the active target cut by the clip.
    fn drawable(&self) -> Option<Rect> {
        let target = match &self.offscreen {
            Some(off) => off.rect,
            None => Rect::new(0, 0, self.width as i32, self.height as i32),
        };
        match &self.clip {
            Some(clip) => target.intersection(clip),
            None => target.intersection(&target),
        }
    }

    /// Write one pixel with source-over blending, honoring the clip and
    /// the active offscreen target.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if color.a == 0 {
            return;
        }
        if let Some(clip) = &self.clip
            && !clip.contains(x, y)
        {
            return;
        }
        let (buffer, stride, lx, ly, w, h) = match &mut self.offscreen {
            Some(off) => (
                &mut off.buffer,
                off.rect.w,
                x - off.rect.x,
                y - off.rect.y,
                off.rect.w,
                off.rect.h,
            ),
            None => (
                &mut self.buffer,
                self.width as i32,
                x,
                y,
                self.width as i32,
                self.height as i32,
            ),
        };
        if lx < 0 || ly < 0 || lx >= w || ly >= h {
            return;
        }
        let o = ((ly * stride + lx) * 4) as usize;
        if color.a == 255 {
            buffer[o] = color.r;
            buffer[o + 1] = color.g;
            buffer[o + 2] = color.b;
        } else {
            let sa = color.a as u16;
            let da = 255 - sa;
            buffer[o] = ((color.r as u16 * sa + buffer[o] as u16 * da + 127) / 255) as u8;
            buffer[o + 1] = ((color.g as u16 * sa + buffer[o + 1] as u16 * da + 127) / 255) as u8;
            buffer[o + 2] = ((color.b as u16 * sa + buffer[o + 2] as u16 * da + 127) / 255) as u8;
        }
        buffer[o + 3] = 255;
    }

    /// Window-clipped copy of `rect` from the framebuffer.
    fn read_region(&self, rect: Rect) -> Vec<u8> {
        let (w, h) = (rect.w.max(0) as usize, rect.h.max(0) as usize);
        let mut out = vec![0; w * h * 4];
        for row in 0..rect.h {
            for col in 0..rect.w {
                let c = self.pixel(rect.x + col, rect.y + row);
                let o = (row as usize * w + col as usize) * 4;
                out[o..o + 4].copy_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }
        out
    }
}

impl HostSurface for SoftwareSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        let Some(rect) = self.drawable().and_then(|d| d.intersection(&rect)) else {
            return Ok(());
        };
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn draw_bitmap(&mut self, bitmap: &Bitmap, src: Rect, x: i32, y: i32) -> Result<()> {
        let bounds = Rect::new(0, 0, bitmap.width as i32, bitmap.height as i32);
        let Some(src) = src.intersection(&bounds) else {
            return Ok(());
        };
        for dy in 0..src.h {
            for dx in 0..src.w {
                let (Some(px), Some(py)) = (x.checked_add(dx), y.checked_add(dy)) else {
                    continue;
                };
                let color = bitmap.pixel((src.x + dx) as u32, (src.y + dy) as u32);
                self.set_pixel(px, py, color);
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) -> Result<()> {
        let (gw, gh) = (GLYPH_WIDTH as i32, GLYPH_HEIGHT as i32);
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let cx = x.saturating_add((i as i32).saturating_mul(gw));
            self.fill_rect(
                Rect::new(cx.saturating_add(1), y.saturating_add(1), gw - 2, gh - 1),
                color,
            )?;
        }
        Ok(())
    }

    fn measure_text(&self, text: &str) -> u32 {
        text.chars().count() as u32 * GLYPH_WIDTH
    }

    fn set_clip_rect(&mut self, rect: Rect) -> Result<()> {
        self.clip = Some(rect);
        Ok(())
    }

    fn reset_clip_rect(&mut self) -> Result<()> {
        self.clip = None;
        Ok(())
    }

    fn begin_offscreen(&mut self, rect: Rect) -> Result<()> {
        if self.offscreen.is_some() {
            return Err(SkinError::Host("offscreen composite already active".into()));
        }
        let window = Rect::new(0, 0, self.width as i32, self.height as i32);
        let rect = rect
            .intersection(&window)
            .unwrap_or(Rect::new(rect.x, rect.y, 0, 0));
        let buffer = self.read_region(rect);
        self.offscreen = Some(Offscreen { rect, buffer });
        Ok(())
    }

    fn end_offscreen(&mut self) -> Result<()> {
        let off = self
            .offscreen
            .take()
            .ok_or_else(|| SkinError::Host("no offscreen composite to end".into()))?;
        let saved_clip = self.clip.take();
        for row in 0..off.rect.h {
            for col in 0..off.rect.w {
                let o = (row as usize * off.rect.w as usize + col as usize) * 4;
                let px = &off.buffer[o..o + 4];
                self.set_pixel(
                    off.rect.x + col,
                    off.rect.y + row,
                    Color::rgba(px[0], px[1], px[2], 255),
                );
            }
        }
        self.clip = saved_clip;
        self.composites += 1;
        Ok(())
    }

    fn start_timer(&mut self, id: TimerId, interval_ms: u32) {
        self.timers.insert(id, interval_ms);
    }

    fn stop_timer(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }

    fn screen_work_area(&self) -> Rect {
        self.work_area
    }

    fn set_window_rect(&mut self, rect: Rect) {
        if rect.w != self.window.w || rect.h != self.window.h {
            self.width = rect.w.max(0) as u32;
            self.height = rect.h.max(0) as u32;
            self.buffer = vec![0; self.width as usize * self.height as usize * 4];
        }
        self.window = rect;
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        self.on_top = on_top;
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    /// Only the tiles that reach drawable pixels are visited.
    fn tile_bitmap(&mut self, bitmap: &Bitmap, src: Rect, dst: Rect) -> Result<()> {
        if src.is_empty() {
            return Ok(());
        }
        let Some(visible) = self.drawable().and_then(|d| d.intersection(&dst)) else {
            return Ok(());
        };
        let (sw, sh) = (i64::from(src.w), i64::from(src.h));
        let right = i64::from(dst.x) + i64::from(dst.w);
        let bottom = i64::from(dst.y) + i64::from(dst.h);
        let first_x = i64::from(dst.x) + (i64::from(visible.x) - i64::from(dst.x)) / sw * sw;
        let mut ty = i64::from(dst.y) + (i64::from(visible.y) - i64::from(dst.y)) / sh * sh;
        while ty < i64::from(visible.bottom()) {
            let th = sh.min(bottom - ty) as i32;
            let mut tx = first_x;
            while tx < i64::from(visible.right()) {
                let tw = sw.min(right - tx) as i32;
                self.draw_bitmap(bitmap, Rect::new(src.x, src.y, tw, th), tx as i32, ty as i32)?;
                tx += sw;
            }
            ty += sh;
        }
        Ok(())
    }

    fn place_external(&mut self, surface: ExternalSurface, rect: Option<Rect>) {
        match rect {
            Some(r) => self.placements.insert(surface, r),
            None => self.placements.remove(&surface),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(w: i32, h: i32) -> SoftwareSurface {
        let mut s = SoftwareSurface::new(800, 600);
        s.set_window_rect(Rect::new(0, 0, w, h));
        s
    }

    #[test]
    fn window_sizes_framebuffer() {
        let s = surface(20, 10);
        assert_eq!(s.dimensions(), (20, 10));
        assert_eq!(s.buffer().len(), 20 * 10 * 4);
    }

    #[test]
    fn fill_respects_clip() {
        let mut s = surface(10, 10);
        s.set_clip_rect(Rect::new(0, 0, 5, 10)).unwrap();
        s.fill_rect(Rect::new(0, 0, 10, 10), Color::WHITE).unwrap();
        s.reset_clip_rect().unwrap();
        assert_eq!(s.pixel(4, 4), Color::WHITE);
        assert_eq!(s.pixel(5, 4).r, 0);
    }

    #[test]
    fn translucent_pixels_blend() {
        let mut s = surface(2, 2);
        s.fill_rect(Rect::new(0, 0, 2, 2), Color::WHITE).unwrap();
        s.fill_rect(Rect::new(0, 0, 1, 1), Color::rgba(0, 0, 0, 128)).unwrap();
        assert_eq!(s.pixel(0, 0).r, 127);
        assert_eq!(s.pixel(1, 1).r, 255);
    }

    #[test]
    fn offscreen_lands_on_end() {
        let mut s = surface(10, 10);
        s.begin_offscreen(Rect::new(2, 2, 4, 4)).unwrap();
        s.fill_rect(Rect::new(0, 0, 10, 10), Color::WHITE).unwrap();
        assert_eq!(s.pixel(3, 3).r, 0);
        assert!(s.begin_offscreen(Rect::new(0, 0, 1, 1)).is_err());
        s.end_offscreen().unwrap();
        assert_eq!(s.pixel(3, 3), Color::WHITE);
        assert_eq!(s.pixel(1, 1).r, 0);
        assert_eq!(s.composites(), 1);
        assert!(s.end_offscreen().is_err());
    }

    #[test]
    fn bitmap_sub_region() {
        let mut s = surface(4, 4);
        let mut bmp = Bitmap::solid(2, 2, Color::WHITE);
        bmp.set_pixel(1, 1, Color::rgb(255, 0, 0));
        s.draw_bitmap(&bmp, Rect::new(1, 1, 5, 5), 0, 0).unwrap();
        assert_eq!(s.pixel(0, 0), Color::rgb(255, 0, 0));
        assert_eq!(s.pixel(1, 1).r, 0);
    }

    #[test]
    fn text_blocks_skip_spaces() {
        let mut s = surface(32, 8);
        s.draw_text("a b", 0, 0, Color::WHITE).unwrap();
        assert_eq!(s.pixel(3, 3), Color::WHITE);
        assert_eq!(s.pixel(11, 3).r, 0);
        assert_eq!(s.pixel(19, 3), Color::WHITE);
        assert_eq!(s.measure_text("a b"), 24);
    }

    #[test]
    fn tiles_only_reach_the_window() {
        let mut s = surface(10, 10);
        let mut bmp = Bitmap::solid(3, 3, Color::WHITE);
        bmp.set_pixel(0, 0, Color::rgb(255, 0, 0));
        s.tile_bitmap(&bmp, Rect::new(0, 0, 3, 3), Rect::new(-4, 0, i32::MAX, 10))
            .unwrap();
        // tiles start at x = -4, so the next tile origin is at x = 2
        assert_eq!(s.pixel(2, 0), Color::rgb(255, 0, 0));
        assert_eq!(s.pixel(1, 0), Color::WHITE);
        assert_eq!(s.pixel(9, 9), Color::WHITE);
    }

    #[test]
    fn extreme_coordinates_draw_nothing() {
        let mut s = surface(10, 10);
        s.fill_rect(Rect::new(i32::MAX - 5, i32::MAX - 5, 100, 100), Color::WHITE)
            .unwrap();
        s.draw_text("far", i32::MAX - 8, 0, Color::WHITE).unwrap();
        let bmp = Bitmap::solid(4, 4, Color::WHITE);
        s.draw_bitmap(&bmp, Rect::new(0, 0, 4, 4), i32::MAX - 1, 0).unwrap();
        s.begin_offscreen(Rect::new(i32::MIN, 0, i32::MAX, 10)).unwrap();
        s.end_offscreen().unwrap();
        assert!(s.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn records_host_state() {
        let mut s = SoftwareSurface::new(800, 600);
        s.start_timer(TimerId(2), 50);
        s.start_timer(TimerId(1), 500);
        s.stop_timer(TimerId(2));
        assert_eq!(s.running_timers(), vec![(TimerId(1), 500)]);
        s.place_external(ExternalSurface::Workspace, Some(Rect::new(1, 2, 3, 4)));
        assert_eq!(s.placement(ExternalSurface::Workspace), Some(Rect::new(1, 2, 3, 4)));
        s.place_external(ExternalSurface::Workspace, None);
        assert_eq!(s.placement(ExternalSurface::Workspace), None);
        s.set_always_on_top(true);
        assert!(s.is_on_top());
    }
}
