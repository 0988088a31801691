//! Div: a grouping container that draws nothing itself.
//!
//! A div may reserve an inset rectangle for the host's overlay surface
//! (a visualization, typically). The overlay is shown while the div is
//! active; `autostart` makes it active from the start, otherwise a truthy
//! value pushed to the div's target switches it on.

use veneer_types::backend::{ExternalSurface, HostSurface};
use veneer_types::error::Result;
use veneer_types::geometry::Rect;

use crate::attrs::{AttrError, Attributes};
use crate::context::DrawContext;
use crate::palette::Palette;
use crate::value::{Response, Value};
use crate::widget::Widget;

/// Overlay insets from the div's edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indent {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Indent {
    /// Parse `"l,t,r,b"`.
    pub fn parse(text: &str) -> Option<Self> {
        let parts: Vec<i32> = text
            .split(',')
            .map(|p| p.trim().parse().ok())
            .collect::<Option<_>>()?;
        match parts[..] {
            [left, top, right, bottom] => Some(Self {
                left,
                top,
                right,
                bottom,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Div {
    pub indent: Option<Indent>,
    pub auto_start: bool,
    active: bool,
    overlay: Option<Rect>,
}

impl Div {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attrs(attrs: &Attributes) -> std::result::Result<Self, AttrError> {
        let indent = match attrs.get("indent") {
            Some(v) => Some(
                Indent::parse(v)
                    .ok_or_else(|| AttrError::new("indent", "expected four integers"))?,
            ),
            None => None,
        };
        let auto_start = attrs.flag("autostart");
        Ok(Self {
            indent,
            auto_start,
            active: auto_start,
            overlay: None,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Overlay rectangle last handed to the host.
    pub fn overlay(&self) -> Option<Rect> {
        self.overlay
    }

    fn place(&mut self, rect: Rect, host: &mut dyn HostSurface) {
        let Some(i) = self.indent else {
            return;
        };
        let overlay = self
            .active
            .then(|| rect.inset(i.left, i.top, i.right, i.bottom))
            .filter(|r| !r.is_empty());
        if overlay != self.overlay {
            self.overlay = overlay;
            host.place_external(ExternalSurface::Overlay, overlay);
        }
    }
}

impl Widget for Div {
    fn on_size(&mut self, rect: Rect, host: &mut dyn HostSurface) -> Result<()> {
        self.place(rect, host);
        Ok(())
    }

    fn on_detach(&mut self, host: &mut dyn HostSurface) {
        if self.overlay.take().is_some() {
            host.place_external(ExternalSurface::Overlay, None);
        }
    }

    fn paint(&self, _ctx: &mut DrawContext<'_>, _rect: Rect, _palette: &Palette) -> Result<()> {
        Ok(())
    }

    /// Draws nothing itself; whatever lies beneath shows through.
    fn is_translucent(&self) -> bool {
        true
    }

    fn set_value(&mut self, value: &Value) -> Response {
        if self.indent.is_none() {
            return Response::none();
        }
        let active = value.is_truthy();
        if active == self.active {
            return Response::none();
        }
        self.active = active;
        // placement follows on the next on_size
        Response::redraw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBackend;

    #[test]
    fn indent_parsing() {
        assert_eq!(
            Indent::parse("1, 2,3,4"),
            Some(Indent {
                left: 1,
                top: 2,
                right: 3,
                bottom: 4
            })
        );
        assert_eq!(Indent::parse("1,2,3"), None);
        assert_eq!(Indent::parse("a,b,c,d"), None);
    }

    #[test]
    fn bad_indent_is_rejected() {
        let attrs = Attributes::new(4).with("indent", "5");
        assert!(Div::from_attrs(&attrs).is_err());
    }

    #[test]
    fn autostart_places_overlay() {
        let attrs = Attributes::new(1)
            .with("indent", "2,2,2,2")
            .with("autostart", "1");
        let mut div = Div::from_attrs(&attrs).unwrap();
        let mut host = MockBackend::new();
        div.on_size(Rect::new(10, 10, 50, 20), &mut host).unwrap();
        let expected = Rect::new(12, 12, 46, 16);
        assert_eq!(
            host.placements,
            vec![(ExternalSurface::Overlay, Some(expected))]
        );
        // same rect again: no duplicate placement
        div.on_size(Rect::new(10, 10, 50, 20), &mut host).unwrap();
        assert_eq!(host.placements.len(), 1);

        div.on_detach(&mut host);
        assert_eq!(host.placements[1], (ExternalSurface::Overlay, None));
    }

    #[test]
    fn overlay_waits_for_activation() {
        let attrs = Attributes::new(1).with("indent", "0,0,0,0");
        let mut div = Div::from_attrs(&attrs).unwrap();
        let mut host = MockBackend::new();
        div.on_size(Rect::new(0, 0, 40, 40), &mut host).unwrap();
        assert!(host.placements.is_empty());

        assert!(div.set_value(&Value::Bool(true)).redraw);
        assert!(!div.set_value(&Value::Bool(true)).redraw);
        div.on_size(Rect::new(0, 0, 40, 40), &mut host).unwrap();
        assert_eq!(div.overlay(), Some(Rect::new(0, 0, 40, 40)));
    }

    #[test]
    fn plain_div_ignores_values() {
        let mut div = Div::new();
        assert_eq!(div.set_value(&Value::Bool(true)), Response::none());
        assert!(!div.is_interactive());
    }
}
