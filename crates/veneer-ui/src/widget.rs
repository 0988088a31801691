//! The behavior every item variant implements.

use veneer_types::backend::HostSurface;
use veneer_types::error::Result;
use veneer_types::geometry::Rect;
use veneer_types::input::{Key, Modifiers};

use crate::context::DrawContext;
use crate::palette::Palette;
use crate::value::{Response, Value};

/// Pointer sub-state of an interactive item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerState {
    #[default]
    Normal,
    Hover,
    Clicked,
}

impl PointerState {
    pub const ALL: [PointerState; 3] = [Self::Normal, Self::Hover, Self::Clicked];

    pub fn slot(self) -> usize {
        self as usize
    }
}

/// Per-variant behavior. Pointer coordinates are in screen space and
/// `rect` is the item's current screen rectangle.
///
/// Pointer handlers are only called for items that accept input; the
/// engine routes motion and release to the captured item even when the
/// pointer has left its rectangle.
pub trait Widget {
    /// The item got a new screen rectangle.
    fn on_size(&mut self, rect: Rect, host: &mut dyn HostSurface) -> Result<()> {
        let _ = (rect, host);
        Ok(())
    }

    /// The item's layout is being deactivated.
    fn on_detach(&mut self, host: &mut dyn HostSurface) {
        let _ = host;
    }

    fn paint(&self, ctx: &mut DrawContext<'_>, rect: Rect, palette: &Palette) -> Result<()>;

    /// Whether the variant reacts to pointer and key input at all.
    fn is_interactive(&self) -> bool {
        false
    }

    fn pointer_down(&mut self, x: i32, y: i32, rect: Rect, mods: Modifiers) -> Response {
        let _ = (x, y, rect, mods);
        Response::none()
    }

    fn pointer_motion(&mut self, x: i32, y: i32, rect: Rect, mods: Modifiers) -> Response {
        let _ = (x, y, rect, mods);
        Response::none()
    }

    fn pointer_up(&mut self, x: i32, y: i32, rect: Rect, mods: Modifiers) -> Response {
        let _ = (x, y, rect, mods);
        Response::none()
    }

    /// The pointer left the item without a press in progress.
    fn pointer_leave(&mut self) -> Response {
        Response::none()
    }

    /// Capture was lost mid-press: return to the resting look, fire nothing.
    fn cancel(&mut self) -> Response {
        self.pointer_leave()
    }

    fn key(&mut self, key: Key, mods: Modifiers) -> Response {
        let _ = (key, mods);
        Response::none()
    }

    fn timer_tick(&mut self) -> Response {
        Response::none()
    }

    /// Push a bound value. Redraw is requested only on an actual change.
    fn set_value(&mut self, value: &Value) -> Response {
        let _ = value;
        Response::none()
    }

    /// Size of the item's art, used when the document gives no size.
    fn natural_size(&self) -> Option<(i32, i32)> {
        None
    }

    /// Whether painting needs an offscreen composite.
    fn is_translucent(&self) -> bool {
        false
    }
}
