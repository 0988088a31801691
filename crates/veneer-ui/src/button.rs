//! Button widget.
//!
//! A button has one or more logical states (play/pause, shuffle on/off...),
//! each drawn from up to three sprite cells, one per pointer sub-state.

use std::rc::Rc;

use veneer_types::error::Result;
use veneer_types::geometry::Rect;
use veneer_types::input::{Key, Modifiers};

use crate::attrs::{AttrError, Attributes, parse_index_list};
use crate::context::DrawContext;
use crate::palette::Palette;
use crate::sprite::SpriteSheet;
use crate::value::{Response, TimerRequest, Value};
use crate::widget::{PointerState, Widget};

/// Cells for one logical state, indexed by [`PointerState::slot`].
pub type StateCells = [Option<usize>; 3];

/// Press-and-hold timing shared by buttons and scrollbar pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    pub delay_ms: u32,
    pub interval_ms: u32,
    in_interval: bool,
}

impl Repeat {
    pub const fn new(delay_ms: u32, interval_ms: u32) -> Self {
        Self {
            delay_ms,
            interval_ms,
            in_interval: false,
        }
    }

    /// Timer request for the start of a press.
    pub fn begin(&mut self) -> TimerRequest {
        self.in_interval = false;
        TimerRequest::Start(self.delay_ms)
    }

    /// Timer request after a tick: switch to the short interval once.
    pub fn advance(&mut self) -> TimerRequest {
        if self.in_interval {
            TimerRequest::Keep
        } else {
            self.in_interval = true;
            TimerRequest::Start(self.interval_ms)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Button {
    pub sheet: Option<Rc<SpriteSheet>>,
    pub states: Vec<StateCells>,
    /// Current logical state.
    pub state: usize,
    /// Fire on press and keep firing while held.
    pub repeat_fire: bool,
    /// Keep the pressed look after release until a `Restore` value arrives.
    pub hold: bool,
    pub repeat: Repeat,
    pointer: PointerState,
    armed: bool,
    inside: bool,
    held: bool,
}

impl Button {
    pub fn new(sheet: Option<Rc<SpriteSheet>>, states: Vec<StateCells>) -> Self {
        Self {
            sheet,
            states,
            state: 0,
            repeat_fire: false,
            hold: false,
            repeat: Repeat::new(500, 50),
            pointer: PointerState::Normal,
            armed: false,
            inside: false,
            held: false,
        }
    }

    /// Attributes: `idx="n,h,c"` for a single state or
    /// `states="n,h,c;n,h,c"` for several; `state`, `repeat`, `hold`.
    pub fn from_attrs(
        attrs: &Attributes,
        sheet: Option<Rc<SpriteSheet>>,
        repeat: Repeat,
    ) -> std::result::Result<Self, AttrError> {
        let states = if let Some(list) = attrs.get("states") {
            list.split(';')
                .map(|s| cells_from_list(&parse_index_list(s), "states"))
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            vec![cells_from_list(&attrs.index_list("idx"), "idx")?]
        };
        let mut b = Self::new(sheet, states);
        if let Some(s) = attrs.try_int("state")? {
            b.state = usize::try_from(s)
                .ok()
                .filter(|&s| s < b.states.len())
                .ok_or_else(|| AttrError::new("state", format!("no state {s}")))?;
        }
        b.repeat_fire = attrs.flag("repeat");
        b.hold = attrs.flag("hold");
        b.repeat = repeat;
        Ok(b)
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Sub-state actually drawn: a held button keeps its pressed look.
    fn visual_state(&self) -> PointerState {
        if self.held {
            PointerState::Clicked
        } else {
            self.pointer
        }
    }

    /// Cell for the given logical and pointer state, falling back to the
    /// logical state's normal cell, then to the first state.
    pub fn cell_for(&self, state: usize, pointer: PointerState) -> Option<usize> {
        let cells = self.states.get(state).or_else(|| self.states.first())?;
        cells[pointer.slot()].or(cells[PointerState::Normal.slot()])
    }

    fn set_pointer(&mut self, next: PointerState) -> bool {
        let before = self.visual_state();
        self.pointer = next;
        before != self.visual_state()
    }

    fn fire(&self) -> Value {
        Value::State(self.state)
    }
}

pub(crate) fn cells_from_list(
    list: &[Option<usize>],
    key: &str,
) -> std::result::Result<StateCells, AttrError> {
    if list.len() > 3 {
        return Err(AttrError::new(key, "at most three cells per state"));
    }
    let mut cells = [None; 3];
    for (slot, cell) in cells.iter_mut().zip(list) {
        *slot = *cell;
    }
    Ok(cells)
}

impl Widget for Button {
    fn paint(&self, ctx: &mut DrawContext<'_>, rect: Rect, _palette: &Palette) -> Result<()> {
        if let Some(sheet) = &self.sheet
            && let Some(cell) = self.cell_for(self.state, self.visual_state())
        {
            sheet.draw_cell(ctx.backend, cell, rect.x, rect.y)?;
        }
        Ok(())
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn pointer_down(&mut self, x: i32, y: i32, rect: Rect, _mods: Modifiers) -> Response {
        self.armed = true;
        self.inside = rect.contains(x, y);
        self.held = false;
        let redraw = self.set_pointer(PointerState::Clicked);
        let response = Response::none().with_redraw(redraw);
        if self.repeat_fire {
            let timer = self.repeat.begin();
            response.fire(self.fire()).timer(timer)
        } else {
            response
        }
    }

    fn pointer_motion(&mut self, x: i32, y: i32, rect: Rect, _mods: Modifiers) -> Response {
        self.inside = rect.contains(x, y);
        let next = match (self.armed, self.inside) {
            (true, true) => PointerState::Clicked,
            (false, true) => PointerState::Hover,
            (_, false) => PointerState::Normal,
        };
        let redraw = self.set_pointer(next);
        Response::none().with_redraw(redraw)
    }

    fn pointer_up(&mut self, x: i32, y: i32, rect: Rect, _mods: Modifiers) -> Response {
        if !std::mem::take(&mut self.armed) {
            return Response::none();
        }
        self.inside = rect.contains(x, y);
        let before = self.visual_state();
        if self.repeat_fire {
            self.pointer = if self.inside {
                PointerState::Hover
            } else {
                PointerState::Normal
            };
            return Response::none()
                .with_redraw(before != self.visual_state())
                .timer(TimerRequest::Stop);
        }
        if !self.inside {
            self.pointer = PointerState::Normal;
            return Response::none().with_redraw(before != self.visual_state());
        }
        self.pointer = PointerState::Hover;
        self.held = self.hold;
        Response::none()
            .with_redraw(before != self.visual_state())
            .fire(self.fire())
    }

    fn pointer_leave(&mut self) -> Response {
        self.inside = false;
        let redraw = self.set_pointer(PointerState::Normal);
        Response::none().with_redraw(redraw)
    }

    fn cancel(&mut self) -> Response {
        let was_armed = std::mem::take(&mut self.armed);
        self.inside = false;
        let redraw = self.set_pointer(PointerState::Normal);
        let response = Response::none().with_redraw(redraw);
        if was_armed && self.repeat_fire {
            response.timer(TimerRequest::Stop)
        } else {
            response
        }
    }

    fn key(&mut self, key: Key, _mods: Modifiers) -> Response {
        match key {
            Key::Enter | Key::Space => Response::none().fire(self.fire()),
            _ => Response::none(),
        }
    }

    fn timer_tick(&mut self) -> Response {
        if !self.armed || !self.repeat_fire {
            return Response::none().timer(TimerRequest::Stop);
        }
        let timer = self.repeat.advance();
        let response = Response::none().timer(timer);
        if self.inside {
            response.fire(self.fire())
        } else {
            response
        }
    }

    fn set_value(&mut self, value: &Value) -> Response {
        let before = (self.state, self.visual_state());
        match value {
            Value::State(s) if *s < self.states.len() => self.state = *s,
            Value::Bool(b) if self.states.len() > 1 => self.state = usize::from(*b),
            Value::Restore => {
                self.held = false;
                if !self.armed {
                    self.pointer = PointerState::Normal;
                }
            },
            _ => {},
        }
        Response::none().with_redraw(before != (self.state, self.visual_state()))
    }

    fn natural_size(&self) -> Option<(i32, i32)> {
        let sheet = self.sheet.as_ref()?;
        sheet.cell_size(self.cell_for(0, PointerState::Normal)?)
    }

    fn is_translucent(&self) -> bool {
        let Some(sheet) = &self.sheet else {
            return false;
        };
        self.states
            .iter()
            .flatten()
            .flatten()
            .any(|&i| sheet.cell_is_translucent(i))
    }
}
