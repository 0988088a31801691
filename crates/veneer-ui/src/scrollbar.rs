//! Scrollbar / slider.
//!
//! The track is split into three parts: the page region before the thumb,
//! the thumb, and the page region after it. Each part has its own art per
//! pointer sub-state. Without `flip` the minimum value sits at the start
//! of the track; with it the minimum sits at the far end.

use std::rc::Rc;

use veneer_types::backend::HostSurface;
use veneer_types::error::Result;
use veneer_types::geometry::Rect;
use veneer_types::input::{Key, Modifiers};

use crate::attrs::{AttrError, Attributes};
use crate::button::{Repeat, StateCells, cells_from_list};
use crate::context::DrawContext;
use crate::palette::Palette;
use crate::sprite::SpriteSheet;
use crate::three_slice::{Axis, ThreeSlice};
use crate::value::{Response, ScrollRange, TimerRequest, Value};
use crate::widget::{PointerState, Widget};

/// Logical part of a scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// Page toward `min`.
    Decrement,
    Thumb,
    /// Page toward `max`.
    Increment,
}

/// Pixel layout of the track for one rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackMetrics {
    pub axis: Axis,
    pub track: i32,
    pub thumb_len: i32,
    /// Thumb offset from the start of the track.
    pub thumb_pos: i32,
}

impl TrackMetrics {
    pub fn travel(&self) -> i32 {
        self.track - self.thumb_len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    origin: i32,
    start_value: i32,
}

#[derive(Debug, Clone)]
pub struct Scrollbar {
    pub sheet: Option<Rc<SpriteSheet>>,
    pub range: ScrollRange,
    pub flip: bool,
    /// Fixed orientation; `None` follows the longer side.
    pub axis: Option<Axis>,
    pub min_thumb: i32,
    pub decrement_cells: StateCells,
    pub increment_cells: StateCells,
    /// Thumb art per pointer sub-state; hover and clicked are optional.
    pub thumb: [Option<ThreeSlice>; 3],
    pub repeat: Repeat,
    hover: Option<Part>,
    pressed: Option<Part>,
    drag: Option<Drag>,
    /// Last pointer position while a page region is held.
    page_pointer: (i32, i32),
    last_rect: Rect,
}

impl Scrollbar {
    pub fn new(range: ScrollRange) -> Self {
        Self {
            sheet: None,
            range: range.clamped(),
            flip: false,
            axis: None,
            min_thumb: 0,
            decrement_cells: [None; 3],
            increment_cells: [None; 3],
            thumb: [None; 3],
            repeat: Repeat::new(500, 50),
            hover: None,
            pressed: None,
            drag: None,
            page_pointer: (0, 0),
            last_rect: Rect::ZERO,
        }
    }

    /// Attributes: `min`, `max`, `page`, `value`, `flip`, `vertical`,
    /// `minthumb`, `dec`/`inc` (`n,h,c` cells), `thumb`/`thumbhover`/
    /// `thumbclicked` (one or three cells).
    pub fn from_attrs(
        attrs: &Attributes,
        sheet: Option<Rc<SpriteSheet>>,
        repeat: Repeat,
    ) -> std::result::Result<Self, AttrError> {
        let min = attrs.try_int("min")?.unwrap_or(0);
        let max = attrs.try_int("max")?.unwrap_or(100);
        if max < min {
            return Err(AttrError::new("max", format!("{max} is below min {min}")));
        }
        let page = attrs.try_int("page")?.unwrap_or(0).max(0);
        let value = attrs.try_int("value")?.unwrap_or(min);
        let mut s = Self::new(ScrollRange::new(value, min, max, page));
        s.sheet = sheet;
        s.flip = attrs.flag("flip");
        if attrs.contains("vertical") {
            s.axis = Some(if attrs.flag("vertical") {
                Axis::Vertical
            } else {
                Axis::Horizontal
            });
        }
        s.min_thumb = attrs.try_int("minthumb")?.unwrap_or(0).max(0);
        s.decrement_cells = part_cells(attrs, "dec")?;
        s.increment_cells = part_cells(attrs, "inc")?;
        for (slot, key) in ["thumb", "thumbhover", "thumbclicked"].into_iter().enumerate() {
            let list = attrs.index_list(key);
            if !list.is_empty() {
                s.thumb[slot] = Some(ThreeSlice::from_indices(&list).ok_or_else(|| {
                    AttrError::new(key, "expected one or three cell indices")
                })?);
            }
        }
        s.repeat = repeat;
        Ok(s)
    }

    fn axis_for(&self, rect: Rect) -> Axis {
        self.axis.unwrap_or_else(|| Axis::dominant(rect))
    }

    /// Smallest thumb: the larger of the configured minimum and the thumb
    /// art's fixed ends.
    fn min_thumb_len(&self, axis: Axis) -> i32 {
        let art = match (&self.sheet, self.thumb[0]) {
            (Some(sheet), Some(t)) => t.fixed_len(sheet, axis),
            _ => 0,
        };
        self.min_thumb.max(art)
    }

    pub fn metrics(&self, rect: Rect) -> TrackMetrics {
        let axis = self.axis_for(rect);
        let track = axis.len(rect).max(0);
        let r = self.range;
        let span = i64::from(r.max) - i64::from(r.min);
        let thumb_len = if span <= 0 {
            track
        } else {
            let raw = (i64::from(r.page) * i64::from(track) / span).min(i64::from(track)) as i32;
            raw.max(self.min_thumb_len(axis)).min(track)
        };
        let travel = track - thumb_len;
        let movable = i64::from(r.upper()) - i64::from(r.min);
        let mut thumb_pos = if movable > 0 && travel > 0 {
            ((i64::from(r.value) - i64::from(r.min)) * i64::from(travel) / movable) as i32
        } else {
            0
        };
        if self.flip {
            thumb_pos = travel - thumb_pos;
        }
        TrackMetrics {
            axis,
            track,
            thumb_len,
            thumb_pos,
        }
    }

    /// Part under a screen coordinate.
    pub fn hit(&self, x: i32, y: i32, rect: Rect) -> Option<Part> {
        if !rect.contains(x, y) {
            return None;
        }
        let m = self.metrics(rect);
        let along = match m.axis {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        }
        .saturating_sub(m.axis.start(rect));
        Some(if along < m.thumb_pos {
            self.part_before()
        } else if along < m.thumb_pos + m.thumb_len {
            Part::Thumb
        } else {
            self.part_after()
        })
    }

    fn part_before(&self) -> Part {
        if self.flip {
            Part::Increment
        } else {
            Part::Decrement
        }
    }

    fn part_after(&self) -> Part {
        if self.flip {
            Part::Decrement
        } else {
            Part::Increment
        }
    }

    fn has_hover_art(&self, part: Part) -> bool {
        let slot = PointerState::Hover.slot();
        match part {
            Part::Decrement => self.decrement_cells[slot].is_some(),
            Part::Increment => self.increment_cells[slot].is_some(),
            Part::Thumb => self.thumb[slot].is_some(),
        }
    }

    fn part_state(&self, part: Part) -> PointerState {
        if self.pressed == Some(part) {
            PointerState::Clicked
        } else if self.hover == Some(part) && self.has_hover_art(part) {
            PointerState::Hover
        } else {
            PointerState::Normal
        }
    }

    /// Move to `value`; fires when it actually changed.
    fn move_to(&mut self, value: i32) -> Response {
        let next = ScrollRange { value, ..self.range }.clamped();
        if next == self.range {
            return Response::none();
        }
        self.range = next;
        Response::redraw().fire(Value::Range(next))
    }

    fn page_step(&mut self, part: Part) -> Response {
        let step = self.range.page.max(1);
        match part {
            Part::Decrement => self.move_to(self.range.value.saturating_sub(step)),
            Part::Increment => self.move_to(self.range.value.saturating_add(step)),
            Part::Thumb => Response::none(),
        }
    }

    fn along(axis: Axis, x: i32, y: i32) -> i32 {
        match axis {
            Axis::Horizontal => x,
            Axis::Vertical => y,
        }
    }

    pub fn value(&self) -> i32 {
        self.range.value
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn part_cells(attrs: &Attributes, key: &str) -> std::result::Result<StateCells, AttrError> {
    cells_from_list(&attrs.index_list(key), key)
}

impl Widget for Scrollbar {
    fn paint(&self, ctx: &mut DrawContext<'_>, rect: Rect, _palette: &Palette) -> Result<()> {
        let Some(sheet) = &self.sheet else {
            return Ok(());
        };
        let m = self.metrics(rect);
        let before = m.axis.span(rect, 0, m.thumb_pos);
        let thumb = m.axis.span(rect, m.thumb_pos, m.thumb_len);
        let after = m.axis.span(rect, m.thumb_pos + m.thumb_len, m.travel() - m.thumb_pos);

        for (part, region) in [(self.part_before(), before), (self.part_after(), after)] {
            let cells = if part == Part::Decrement {
                &self.decrement_cells
            } else {
                &self.increment_cells
            };
            let state = self.part_state(part);
            if let Some(cell) = cells[state.slot()].or(cells[PointerState::Normal.slot()]) {
                sheet.tile_cell(ctx.backend, cell, region)?;
            }
        }
        let state = self.part_state(Part::Thumb);
        if let Some(art) = self.thumb[state.slot()].or(self.thumb[PointerState::Normal.slot()]) {
            art.draw(sheet, ctx.backend, thumb, m.axis)?;
        }
        Ok(())
    }

    fn on_size(&mut self, rect: Rect, _host: &mut dyn HostSurface) -> Result<()> {
        self.last_rect = rect;
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn pointer_down(&mut self, x: i32, y: i32, rect: Rect, _mods: Modifiers) -> Response {
        let Some(part) = self.hit(x, y, rect) else {
            return Response::none();
        };
        self.pressed = Some(part);
        if part == Part::Thumb {
            self.drag = Some(Drag {
                origin: Self::along(self.axis_for(rect), x, y),
                start_value: self.range.value,
            });
            return Response::redraw();
        }
        self.page_pointer = (x, y);
        let timer = self.repeat.begin();
        self.page_step(part).with_redraw(true).timer(timer)
    }

    fn pointer_motion(&mut self, x: i32, y: i32, rect: Rect, _mods: Modifiers) -> Response {
        if let Some(drag) = self.drag {
            let m = self.metrics(rect);
            let travel = m.travel();
            if travel <= 0 {
                return Response::none();
            }
            let mut delta = i64::from(Self::along(m.axis, x, y)) - i64::from(drag.origin);
            if self.flip {
                delta = -delta;
            }
            let movable = i64::from(self.range.upper()) - i64::from(self.range.min);
            let target = i64::from(drag.start_value) + delta.saturating_mul(movable) / i64::from(travel);
            return self.move_to(saturate(target));
        }
        if self.pressed.is_some() {
            self.page_pointer = (x, y);
            return Response::none();
        }
        let hover = self.hit(x, y, rect);
        let old = std::mem::replace(&mut self.hover, hover);
        let redraw = old != hover
            && (old.is_some_and(|p| self.has_hover_art(p))
                || hover.is_some_and(|p| self.has_hover_art(p)));
        Response::none().with_redraw(redraw)
    }

    fn pointer_up(&mut self, x: i32, y: i32, rect: Rect, _mods: Modifiers) -> Response {
        let pressed = self.pressed.take();
        self.drag = None;
        self.hover = self.hit(x, y, rect);
        let response = Response::none().with_redraw(pressed.is_some());
        match pressed {
            Some(Part::Decrement | Part::Increment) => response.timer(TimerRequest::Stop),
            _ => response,
        }
    }

    fn pointer_leave(&mut self) -> Response {
        let redraw = self.hover.take().is_some_and(|p| self.has_hover_art(p));
        Response::none().with_redraw(redraw)
    }

    fn cancel(&mut self) -> Response {
        let pressed = self.pressed.take();
        self.drag = None;
        self.hover = None;
        let response = Response::redraw();
        match pressed {
            Some(Part::Decrement | Part::Increment) => response.timer(TimerRequest::Stop),
            _ => response,
        }
    }

    fn key(&mut self, key: Key, _mods: Modifiers) -> Response {
        let r = self.range;
        match key {
            Key::Up | Key::Left => self.move_to(r.value.saturating_sub(1)),
            Key::Down | Key::Right => self.move_to(r.value.saturating_add(1)),
            Key::PageUp => self.page_step(Part::Decrement),
            Key::PageDown => self.page_step(Part::Increment),
            Key::Home => self.move_to(r.min),
            Key::End => self.move_to(r.upper()),
            _ => Response::none(),
        }
    }

    fn timer_tick(&mut self) -> Response {
        let Some(part @ (Part::Decrement | Part::Increment)) = self.pressed else {
            return Response::none().timer(TimerRequest::Stop);
        };
        let timer = self.repeat.advance();
        let (x, y) = self.page_pointer;
        if self.hit(x, y, self.last_rect) == Some(part) {
            self.page_step(part).timer(timer)
        } else {
            Response::none().timer(timer)
        }
    }

    fn set_value(&mut self, value: &Value) -> Response {
        let next = match value {
            Value::Range(r) => r.clamped(),
            Value::Int(v) => ScrollRange { value: *v, ..self.range }.clamped(),
            _ => return Response::none(),
        };
        if next == self.range {
            return Response::none();
        }
        self.range = next;
        if let Some(drag) = &mut self.drag {
            // keep the grab point while the model moves underneath
            drag.start_value = next.value;
        }
        Response::redraw()
    }

    fn is_translucent(&self) -> bool {
        let Some(sheet) = &self.sheet else {
            return false;
        };
        let cells = self
            .decrement_cells
            .iter()
            .chain(&self.increment_cells)
            .flatten()
            .any(|&i| sheet.cell_is_translucent(i));
        cells || self.thumb.iter().flatten().any(|t| t.is_translucent(sheet))
    }
}
