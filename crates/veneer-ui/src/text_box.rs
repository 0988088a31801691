//! Box: a line of text with optional icons and a secondary time slot.
//!
//! Layout inside the rectangle, left to right:
//! `[icon-left] text ... [time] [icon-right]`. The time slot is shown only
//! when it fits within half the box width. Text that does not fit is
//! replaced by its short alternate when one exists, otherwise truncated
//! with an ellipsis.

use std::cell::Cell;
use std::rc::Rc;

use veneer_types::backend::HostSurface;
use veneer_types::error::Result;
use veneer_types::geometry::Rect;
use veneer_types::input::{Key, Modifiers};

use crate::attrs::{AttrError, Attributes};
use crate::context::DrawContext;
use crate::palette::{Palette, PaletteState};
use crate::sprite::SpriteSheet;
use crate::value::{Action, BoxRegion, Response, TimerRequest, Value};
use crate::widget::{PointerState, Widget};

/// Horizontal text placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Gap between adjacent regions.
const GAP: i32 = 2;

/// Format seconds as `m:ss`, or `h:mm:ss` past an hour.
pub fn format_time(secs: u32) -> String {
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Pick the text to draw within `max_w` pixels.
///
/// Tries the full text, then the short alternate, then trims characters
/// from the full text and appends `ellipsis`. Returns an empty string when
/// not even the ellipsis fits.
pub fn fit_text(
    text: &str,
    short: Option<&str>,
    max_w: i32,
    ellipsis: &str,
    measure: impl Fn(&str) -> u32,
) -> String {
    let fits = |s: &str| measure(s) as i32 <= max_w;
    if fits(text) {
        return text.to_string();
    }
    if let Some(short) = short
        && fits(short)
    {
        return short.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    for keep in (0..chars.len()).rev() {
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.push_str(ellipsis);
        if fits(&candidate) {
            return candidate;
        }
    }
    String::new()
}

/// Regions of a box for one rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoxRegions {
    pub icon_left: Option<Rect>,
    pub icon_right: Option<Rect>,
    pub time: Option<Rect>,
    pub text: Rect,
}

impl BoxRegions {
    pub fn hit(&self, x: i32, y: i32) -> Option<BoxRegion> {
        let inside = |r: Option<Rect>| r.is_some_and(|r| r.contains(x, y));
        if inside(self.icon_left) {
            Some(BoxRegion::IconLeft)
        } else if inside(self.icon_right) {
            Some(BoxRegion::IconRight)
        } else if inside(self.time) {
            Some(BoxRegion::Time)
        } else if self.text.contains(x, y) {
            Some(BoxRegion::Text)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextBox {
    pub sheet: Option<Rc<SpriteSheet>>,
    pub text: String,
    pub short: Option<String>,
    pub time: Option<(u32, Option<u32>)>,
    pub align: Align,
    pub icon_left: Option<usize>,
    pub icon_right: Option<usize>,
    /// Base color slot for the text.
    pub style: PaletteState,
    pub selected: bool,
    pub draggable: bool,
    pub drag_threshold: i32,
    pub blink_interval_ms: u32,
    blinking: bool,
    blink_on: bool,
    pointer: PointerState,
    pressed: Option<BoxRegion>,
    drag_origin: Option<(i32, i32)>,
    dragging: bool,
    /// Width of the time slot measured at the last paint.
    time_width: Cell<i32>,
}

impl TextBox {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            sheet: None,
            text: text.into(),
            short: None,
            time: None,
            align: Align::Left,
            icon_left: None,
            icon_right: None,
            style: PaletteState::Normal,
            selected: false,
            draggable: false,
            drag_threshold: 4,
            blink_interval_ms: 500,
            blinking: false,
            blink_on: false,
            pointer: PointerState::Normal,
            pressed: None,
            drag_origin: None,
            dragging: false,
            time_width: Cell::new(0),
        }
    }

    /// Attributes: `text`, `short`, `align`, `iconleft`, `iconright`,
    /// `style` (a palette slot name), `selected`, `drag`.
    pub fn from_attrs(
        attrs: &Attributes,
        sheet: Option<Rc<SpriteSheet>>,
        drag_threshold: i32,
        blink_interval_ms: u32,
    ) -> std::result::Result<Self, AttrError> {
        let mut b = Self::new(attrs.get("text").unwrap_or_default());
        b.sheet = sheet;
        b.short = attrs.get("short").map(str::to_string);
        if let Some(a) = attrs.get("align") {
            b.align = Align::parse(a)
                .ok_or_else(|| AttrError::new("align", format!("unknown alignment '{a}'")))?;
        }
        b.icon_left = attrs.index("iconleft");
        b.icon_right = attrs.index("iconright");
        if let Some(s) = attrs.get("style") {
            b.style = PaletteState::from_name(s)
                .ok_or_else(|| AttrError::new("style", format!("unknown color state '{s}'")))?;
        }
        b.selected = attrs.flag("selected");
        b.draggable = attrs.flag("drag");
        b.drag_threshold = drag_threshold;
        b.blink_interval_ms = blink_interval_ms;
        Ok(b)
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    pub fn is_blinking(&self) -> bool {
        self.blinking
    }

    fn icon_width(&self, index: Option<usize>) -> Option<i32> {
        let sheet = self.sheet.as_ref()?;
        sheet.cell_size(index?).map(|(w, _)| w)
    }

    /// Split `rect` into regions given the measured width of the time text.
    pub fn regions(&self, rect: Rect, time_width: i32) -> BoxRegions {
        let mut inner = rect;
        let mut out = BoxRegions::default();
        if let Some(w) = self.icon_width(self.icon_left) {
            let w = w.min(inner.w);
            out.icon_left = Some(Rect::new(inner.x, inner.y, w, inner.h));
            inner = inner.inset(w.saturating_add(GAP), 0, 0, 0);
        }
        if let Some(w) = self.icon_width(self.icon_right) {
            let w = w.min(inner.w);
            out.icon_right = Some(Rect::new(inner.right().saturating_sub(w), inner.y, w, inner.h));
            inner = inner.inset(0, 0, w.saturating_add(GAP), 0);
        }
        if self.time.is_some() && time_width > 0 && time_width <= rect.w / 2 {
            let w = time_width.min(inner.w);
            out.time = Some(Rect::new(inner.right().saturating_sub(w), inner.y, w, inner.h));
            inner = inner.inset(0, 0, w.saturating_add(GAP), 0);
        }
        out.text = inner;
        out
    }

    fn time_text(&self) -> Option<String> {
        self.time.map(|(elapsed, total)| match total {
            Some(t) => format!("{}/{}", format_time(elapsed), format_time(t)),
            None => format_time(elapsed),
        })
    }

    fn text_state(&self) -> PaletteState {
        let alt = self.blink_on || self.pointer == PointerState::Hover;
        match (self.selected, alt) {
            (true, false) => PaletteState::Selected,
            (true, true) => PaletteState::SelectedAlt,
            (false, true) if self.style == PaletteState::Normal => PaletteState::NormalAlt,
            (false, _) => self.style,
        }
    }
}

impl Widget for TextBox {
    /// The blink timer dies with the layout; forget it so a replayed
    /// `Blink(true)` starts a new one.
    fn on_detach(&mut self, _host: &mut dyn HostSurface) {
        self.blinking = false;
        self.blink_on = false;
        self.pressed = None;
        self.drag_origin = None;
        self.dragging = false;
        self.pointer = PointerState::Normal;
    }

    fn paint(&self, ctx: &mut DrawContext<'_>, rect: Rect, palette: &Palette) -> Result<()> {
        let time = self.time_text();
        let time_width = time
            .as_deref()
            .map_or(0, |t| ctx.backend.measure_text(t) as i32);
        self.time_width.set(time_width);
        let regions = self.regions(rect, time_width);
        let color = palette.get(self.text_state());

        if let Some(sheet) = &self.sheet {
            for (index, region) in [
                (self.icon_left, regions.icon_left),
                (self.icon_right, regions.icon_right),
            ] {
                if let (Some(i), Some(r)) = (index, region)
                    && let Some((_, h)) = sheet.cell_size(i)
                {
                    sheet.draw_cell(ctx.backend, i, r.x, r.y.saturating_add((r.h - h) / 2))?;
                }
            }
        }
        if let (Some(t), Some(r)) = (time.as_deref(), regions.time) {
            ctx.text_in(t, r.x, r, color)?;
        }

        let area = regions.text;
        if area.is_empty() || self.text.is_empty() {
            return Ok(());
        }
        let backend = &*ctx.backend;
        let shown = fit_text(
            &self.text,
            self.short.as_deref(),
            area.w,
            ctx.ellipsis,
            |s| backend.measure_text(s),
        );
        let w = ctx.backend.measure_text(&shown) as i32;
        let x = match self.align {
            Align::Left => area.x,
            Align::Center => area.x.saturating_add(area.w.saturating_sub(w) / 2),
            Align::Right => area.right().saturating_sub(w),
        };
        ctx.backend.set_clip_rect(area)?;
        ctx.text_in(&shown, x, area, color)?;
        ctx.backend.reset_clip_rect()
    }

    fn is_interactive(&self) -> bool {
        true
    }

    /// Text is drawn without a background.
    fn is_translucent(&self) -> bool {
        true
    }

    fn pointer_down(&mut self, x: i32, y: i32, rect: Rect, _mods: Modifiers) -> Response {
        self.pressed = self.regions(rect, self.time_width.get()).hit(x, y);
        self.drag_origin = Some((x, y));
        self.dragging = false;
        let changed = self.pointer != PointerState::Clicked;
        self.pointer = PointerState::Clicked;
        Response::none().with_redraw(changed)
    }

    fn pointer_motion(&mut self, x: i32, y: i32, rect: Rect, _mods: Modifiers) -> Response {
        if let Some((_, oy)) = self.drag_origin {
            if self.draggable && !self.dragging && (y - oy).abs() > self.drag_threshold {
                self.dragging = true;
            }
            return Response::none();
        }
        let next = if rect.contains(x, y) {
            PointerState::Hover
        } else {
            PointerState::Normal
        };
        let changed = next != self.pointer;
        self.pointer = next;
        Response::none().with_redraw(changed)
    }

    fn pointer_up(&mut self, x: i32, y: i32, rect: Rect, _mods: Modifiers) -> Response {
        let origin = self.drag_origin.take();
        let pressed = self.pressed.take();
        let dragging = std::mem::take(&mut self.dragging);
        self.pointer = if rect.contains(x, y) {
            PointerState::Hover
        } else {
            PointerState::Normal
        };
        let response = Response::redraw();
        if dragging && let Some((_, oy)) = origin {
            return response.action(Action::Reorder { dy: y - oy });
        }
        let released = self.regions(rect, self.time_width.get()).hit(x, y);
        match pressed {
            Some(region) if released == Some(region) => response.action(Action::Click(region)),
            _ => response,
        }
    }

    fn pointer_leave(&mut self) -> Response {
        let changed = self.pointer != PointerState::Normal;
        self.pointer = PointerState::Normal;
        Response::none().with_redraw(changed)
    }

    fn cancel(&mut self) -> Response {
        self.pressed = None;
        self.drag_origin = None;
        self.dragging = false;
        self.pointer = PointerState::Normal;
        Response::redraw()
    }

    fn key(&mut self, key: Key, _mods: Modifiers) -> Response {
        match key {
            Key::Enter | Key::Space => Response::none().action(Action::Click(BoxRegion::Text)),
            _ => Response::none(),
        }
    }

    fn timer_tick(&mut self) -> Response {
        if !self.blinking {
            return Response::none().timer(TimerRequest::Stop);
        }
        self.blink_on = !self.blink_on;
        Response::redraw()
    }

    fn set_value(&mut self, value: &Value) -> Response {
        match value {
            Value::Text { text, short } => {
                if *text == self.text && *short == self.short {
                    return Response::none();
                }
                self.text.clone_from(text);
                self.short.clone_from(short);
                Response::redraw()
            },
            Value::Time { elapsed, total } => {
                let next = Some((*elapsed, *total));
                if next == self.time {
                    return Response::none();
                }
                self.time = next;
                Response::redraw()
            },
            Value::Bool(selected) => {
                if *selected == self.selected {
                    return Response::none();
                }
                self.selected = *selected;
                Response::redraw()
            },
            Value::Blink(on) => {
                if *on == self.blinking {
                    return Response::none();
                }
                self.blinking = *on;
                if *on {
                    Response::none().timer(TimerRequest::Start(self.blink_interval_ms))
                } else {
                    let was_lit = std::mem::take(&mut self.blink_on);
                    Response::none()
                        .with_redraw(was_lit)
                        .timer(TimerRequest::Stop)
                }
            },
            _ => Response::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::tests::sheet_bitmap;
    use crate::test_utils::MockBackend;
    use veneer_types::backend::{Color, GLYPH_WIDTH};

    fn measure(s: &str) -> u32 {
        s.chars().count() as u32 * GLYPH_WIDTH
    }

    #[test]
    fn fit_prefers_full_then_short() {
        assert_eq!(fit_text("Hello", Some("Hi"), 40, "...", measure), "Hello");
        assert_eq!(fit_text("Hello world", Some("Hi"), 40, "...", measure), "Hi");
    }

    #[test]
    fn fit_trims_with_ellipsis() {
        // 6 chars of room: three letters plus "..."
        assert_eq!(fit_text("Hello world", None, 48, "...", measure), "Hel...");
        assert_eq!(fit_text("Hello world", Some("Greetings"), 48, "...", measure), "Hel...");
        assert_eq!(fit_text("Hello", None, 16, "...", measure), "");
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(75), "1:15");
        assert_eq!(format_time(3725), "1:02:05");
    }

    #[test]
    fn time_hidden_when_wider_than_half() {
        let mut b = TextBox::new("track");
        b.time = Some((65, None));
        let wide = b.regions(Rect::new(0, 0, 100, 10), 32);
        assert_eq!(wide.time, Some(Rect::new(68, 0, 32, 10)));
        assert_eq!(wide.text.w, 66);
        let narrow = b.regions(Rect::new(0, 0, 60, 10), 32);
        assert_eq!(narrow.time, None);
        assert_eq!(narrow.text.w, 60);
    }

    #[test]
    fn icons_take_their_cell_width() {
        let sheet = Rc::new(SpriteSheet::slice(sheet_bitmap(16, 8, &[5, 10, 15], &[7]), 64).unwrap());
        let mut b = TextBox::new("x");
        b.sheet = Some(sheet);
        b.icon_left = Some(0);
        b.icon_right = Some(1);
        let r = b.regions(Rect::new(0, 0, 100, 10), 0);
        assert_eq!(r.icon_left, Some(Rect::new(0, 0, 4, 10)));
        assert_eq!(r.icon_right, Some(Rect::new(96, 0, 4, 10)));
        assert_eq!(r.text, Rect::new(6, 0, 88, 10));
        assert_eq!(r.hit(1, 1), Some(BoxRegion::IconLeft));
        assert_eq!(r.hit(50, 1), Some(BoxRegion::Text));
    }

    #[test]
    fn paints_truncated_text_clipped() {
        let b = TextBox::new("A very long title");
        let mut backend = MockBackend::new();
        let mut ctx = DrawContext::new(&mut backend, "...");
        b.paint(&mut ctx, Rect::new(0, 0, 64, 8), &Palette::default())
            .unwrap();
        assert!(backend.has_text("A ver..."));
        assert!(!backend.has_text("title"));
    }

    #[test]
    fn center_alignment() {
        let mut b = TextBox::new("ab");
        b.align = Align::Center;
        let mut backend = MockBackend::new();
        let mut ctx = DrawContext::new(&mut backend, "...");
        b.paint(&mut ctx, Rect::new(0, 0, 100, 8), &Palette::default())
            .unwrap();
        assert_eq!(backend.text_positions(), vec![("ab", 42, 0)]);
    }

    #[test]
    fn click_reports_region() {
        let mut b = TextBox::new("x");
        let rect = Rect::new(0, 0, 100, 10);
        assert!(b.pointer_down(10, 5, rect, Modifiers::NONE).redraw);
        assert_eq!(b.pointer_state(), PointerState::Clicked);
        let r = b.pointer_up(12, 5, rect, Modifiers::NONE);
        assert_eq!(r.actions, vec![Action::Click(BoxRegion::Text)]);
        assert_eq!(b.pointer_state(), PointerState::Hover);
    }

    #[test]
    fn release_outside_does_not_click() {
        let mut b = TextBox::new("x");
        let rect = Rect::new(0, 0, 100, 10);
        b.pointer_down(10, 5, rect, Modifiers::NONE);
        let r = b.pointer_up(10, 50, rect, Modifiers::NONE);
        assert!(r.actions.is_empty());
        assert_eq!(b.pointer_state(), PointerState::Normal);
    }

    #[test]
    fn drag_past_threshold_reorders() {
        let mut b = TextBox::new("x");
        b.draggable = true;
        let rect = Rect::new(0, 0, 100, 10);
        b.pointer_down(10, 5, rect, Modifiers::NONE);
        b.pointer_motion(10, 8, rect, Modifiers::NONE);
        b.pointer_motion(10, 25, rect, Modifiers::NONE);
        let r = b.pointer_up(10, 25, rect, Modifiers::NONE);
        assert_eq!(r.actions, vec![Action::Reorder { dy: 20 }]);
    }

    #[test]
    fn small_drag_is_a_click() {
        let mut b = TextBox::new("x");
        b.draggable = true;
        let rect = Rect::new(0, 0, 100, 10);
        b.pointer_down(10, 5, rect, Modifiers::NONE);
        b.pointer_motion(10, 7, rect, Modifiers::NONE);
        let r = b.pointer_up(10, 7, rect, Modifiers::NONE);
        assert_eq!(r.actions, vec![Action::Click(BoxRegion::Text)]);
    }

    #[test]
    fn hover_tracks_pointer() {
        let mut b = TextBox::new("x");
        let rect = Rect::new(0, 0, 100, 10);
        assert!(b.pointer_motion(5, 5, rect, Modifiers::NONE).redraw);
        assert!(!b.pointer_motion(6, 5, rect, Modifiers::NONE).redraw);
        assert!(b.pointer_leave().redraw);
        assert_eq!(b.pointer_state(), PointerState::Normal);
    }

    #[test]
    fn set_value_redraws_only_on_change() {
        let mut b = TextBox::new("x");
        assert!(b.set_value(&Value::text("y")).redraw);
        assert!(!b.set_value(&Value::text("y")).redraw);
        assert!(b.set_value(&Value::Time { elapsed: 3, total: None }).redraw);
        assert!(!b.set_value(&Value::Int(4)).redraw);
    }

    #[test]
    fn blink_toggles_alt_color() {
        let mut palette = Palette::default();
        palette.set(PaletteState::Normal, Color::WHITE);
        palette.set(PaletteState::NormalAlt, Color::BLACK);
        let mut b = TextBox::new("x");
        let r = b.set_value(&Value::Blink(true));
        assert_eq!(r.timer, TimerRequest::Start(500));
        assert!(b.timer_tick().redraw);

        let mut backend = MockBackend::new();
        let mut ctx = DrawContext::new(&mut backend, "...");
        b.paint(&mut ctx, Rect::new(0, 0, 50, 8), &palette).unwrap();
        assert_eq!(backend.text_color(), Some(Color::BLACK));

        let r = b.set_value(&Value::Blink(false));
        assert_eq!(r.timer, TimerRequest::Stop);
        assert!(r.redraw);
        assert_eq!(b.timer_tick().timer, TimerRequest::Stop);
    }

    #[test]
    fn detach_forgets_blink() {
        let mut b = TextBox::new("x");
        b.set_value(&Value::Blink(true));
        b.on_detach(&mut MockBackend::new());
        assert!(!b.is_blinking());
        let r = b.set_value(&Value::Blink(true));
        assert_eq!(r.timer, TimerRequest::Start(500));
    }

    #[test]
    fn capture_loss_resets_without_action() {
        let mut b = TextBox::new("x");
        let rect = Rect::new(0, 0, 100, 10);
        b.pointer_down(10, 5, rect, Modifiers::NONE);
        let r = b.cancel();
        assert!(r.actions.is_empty());
        assert_eq!(b.pointer_state(), PointerState::Normal);
    }
}
