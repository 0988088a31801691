//! Items: one widget instance plus the data every variant shares.

use veneer_types::backend::{ExternalSurface, HostSurface};
use veneer_types::error::Result;
use veneer_types::geometry::Rect;
use veneer_types::input::{Key, Modifiers};

use crate::button::Button;
use crate::context::DrawContext;
use crate::div::Div;
use crate::image::Image;
use crate::palette::Palette;
use crate::placeholder::Placeholder;
use crate::position::ItemGeometry;
use crate::scrollbar::Scrollbar;
use crate::target::Target;
use crate::text_box::TextBox;
use crate::value::{Response, Value};
use crate::widget::Widget;

/// The closed set of item variants.
#[derive(Debug, Clone)]
pub enum ItemKind {
    Div(Div),
    Image(Image),
    Box(TextBox),
    Button(Button),
    Scrollbar(Scrollbar),
    /// Workspace or input surface reserved for the host.
    Placeholder(Placeholder),
}

impl ItemKind {
    pub fn widget(&self) -> &dyn Widget {
        match self {
            Self::Div(w) => w,
            Self::Image(w) => w,
            Self::Box(w) => w,
            Self::Button(w) => w,
            Self::Scrollbar(w) => w,
            Self::Placeholder(w) => w,
        }
    }

    pub fn widget_mut(&mut self) -> &mut dyn Widget {
        match self {
            Self::Div(w) => w,
            Self::Image(w) => w,
            Self::Box(w) => w,
            Self::Button(w) => w,
            Self::Scrollbar(w) => w,
            Self::Placeholder(w) => w,
        }
    }

    /// Tag name used in skin documents.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Div(_) => "div",
            Self::Image(_) => "image",
            Self::Box(_) => "box",
            Self::Button(_) => "button",
            Self::Scrollbar(_) => "scrollbar",
            Self::Placeholder(p) => match p.surface {
                ExternalSurface::Input => "input",
                _ => "workspace",
            },
        }
    }
}

/// One node of a layout's item tree.
#[derive(Debug, Clone)]
pub struct Item {
    pub kind: ItemKind,
    pub geometry: ItemGeometry,
    pub palette: Palette,
    pub target: Option<Target>,
    pub tooltip: Option<String>,
    /// Document `id`, if any.
    pub name: Option<String>,
    /// Shown but never receives input.
    pub disabled: bool,
    pub hidden: bool,
    /// Visibility tracks the truthiness of this target's value.
    pub follow: Option<Target>,
    /// Source line of the item's tag.
    pub line: usize,
    rect: Rect,
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            geometry: ItemGeometry::default(),
            palette: Palette::default(),
            target: None,
            tooltip: None,
            name: None,
            disabled: false,
            hidden: false,
            follow: None,
            line: 0,
            rect: Rect::ZERO,
        }
    }

    pub fn with_geometry(mut self, geometry: ItemGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    /// Rectangle in window coordinates from the last layout pass.
    pub fn screen_rect(&self) -> Rect {
        self.rect
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    /// Store the new rectangle and let the variant react.
    pub fn on_size(&mut self, rect: Rect, host: &mut dyn HostSurface) -> Result<()> {
        self.rect = rect;
        self.kind.widget_mut().on_size(rect, host)
    }

    pub fn detach(&mut self, host: &mut dyn HostSurface) {
        self.kind.widget_mut().on_detach(host);
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    /// Whether hit testing may pick this item.
    pub fn accepts_input(&self) -> bool {
        !self.hidden && !self.disabled && self.kind.widget().is_interactive()
    }

    pub fn paint(&self, ctx: &mut DrawContext<'_>) -> Result<()> {
        if self.hidden {
            return Ok(());
        }
        self.kind.widget().paint(ctx, self.rect, &self.palette)?;
        ctx.outline(self.rect)
    }

    pub fn pointer_down(&mut self, x: i32, y: i32, mods: Modifiers) -> Response {
        let rect = self.rect;
        self.kind.widget_mut().pointer_down(x, y, rect, mods)
    }

    pub fn pointer_motion(&mut self, x: i32, y: i32, mods: Modifiers) -> Response {
        let rect = self.rect;
        self.kind.widget_mut().pointer_motion(x, y, rect, mods)
    }

    pub fn pointer_up(&mut self, x: i32, y: i32, mods: Modifiers) -> Response {
        let rect = self.rect;
        self.kind.widget_mut().pointer_up(x, y, rect, mods)
    }

    pub fn pointer_leave(&mut self) -> Response {
        self.kind.widget_mut().pointer_leave()
    }

    pub fn cancel(&mut self) -> Response {
        self.kind.widget_mut().cancel()
    }

    pub fn key(&mut self, key: Key, mods: Modifiers) -> Response {
        self.kind.widget_mut().key(key, mods)
    }

    pub fn timer_tick(&mut self) -> Response {
        self.kind.widget_mut().timer_tick()
    }

    /// Push a value; on change, host placements are refreshed too.
    pub fn set_value(&mut self, value: &Value, host: &mut dyn HostSurface) -> Result<Response> {
        let response = self.kind.widget_mut().set_value(value);
        if response.redraw {
            let rect = self.rect;
            self.kind.widget_mut().on_size(rect, host)?;
        }
        Ok(response)
    }

    pub fn natural_size(&self) -> Option<(i32, i32)> {
        self.kind.widget().natural_size()
    }

    /// Translucent art needs an offscreen composite when painted alone.
    pub fn is_translucent(&self) -> bool {
        self.kind.widget().is_translucent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBackend;
    use crate::three_slice::ThreeSlice;

    #[test]
    fn tags() {
        assert_eq!(Item::new(ItemKind::Div(Div::new())).tag(), "div");
        let input = ItemKind::Placeholder(Placeholder::new(ExternalSurface::Input));
        assert_eq!(Item::new(input).tag(), "input");
    }

    #[test]
    fn input_gating() {
        let mut item = Item::new(ItemKind::Box(TextBox::new("x")));
        assert!(item.accepts_input());
        item.disabled = true;
        assert!(!item.accepts_input());
        item.disabled = false;
        item.hidden = true;
        assert!(!item.accepts_input());
        let image = Item::new(ItemKind::Image(Image::new(None, ThreeSlice::single(0))));
        assert!(!image.accepts_input());
    }

    #[test]
    fn hidden_items_paint_nothing() {
        let mut item = Item::new(ItemKind::Box(TextBox::new("hello")));
        let mut host = MockBackend::new();
        item.on_size(Rect::new(0, 0, 100, 10), &mut host).unwrap();
        item.hidden = true;
        let mut ctx = DrawContext::new(&mut host, "...");
        item.paint(&mut ctx).unwrap();
        assert!(host.calls.is_empty());
    }

    #[test]
    fn pointer_uses_stored_rect() {
        let mut item = Item::new(ItemKind::Button(Button::new(None, vec![[Some(0), None, None]])));
        let mut host = MockBackend::new();
        item.on_size(Rect::new(10, 10, 20, 20), &mut host).unwrap();
        item.pointer_down(15, 15, Modifiers::NONE);
        let r = item.pointer_up(15, 15, Modifiers::NONE);
        assert_eq!(r.actions.len(), 1);
        item.pointer_down(15, 15, Modifiers::NONE);
        let r = item.pointer_up(5, 5, Modifiers::NONE);
        assert!(r.actions.is_empty());
    }

    #[test]
    fn value_change_refreshes_overlay() {
        let attrs = crate::attrs::Attributes::new(1).with("indent", "1,1,1,1");
        let mut item = Item::new(ItemKind::Div(Div::from_attrs(&attrs).unwrap()));
        let mut host = MockBackend::new();
        item.on_size(Rect::new(0, 0, 10, 10), &mut host).unwrap();
        assert!(host.placements.is_empty());
        item.set_value(&Value::Bool(true), &mut host).unwrap();
        assert_eq!(
            host.placements,
            vec![(ExternalSurface::Overlay, Some(Rect::new(1, 1, 8, 8)))]
        );
    }
}
