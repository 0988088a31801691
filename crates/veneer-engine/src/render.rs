//! Painting the active layout.
//!
//! Full repaints always go through an offscreen composite. A single item
//! is painted directly only when it is opaque and nothing later in the
//! tree overlaps it; otherwise every item intersecting its rectangle is
//! composited again in tree order.

use veneer_types::backend::{Color, HostSurface};
use veneer_types::error::Result;
use veneer_types::geometry::Rect;
use veneer_ui::context::DrawContext;
use veneer_ui::tree::{ItemId, ItemTree};

use crate::engine::SkinEngine;

/// Color behind every layout.
pub const BACKGROUND: Color = Color::BLACK;

impl SkinEngine {
    /// Repaint `region` (window coordinates) of the active layout.
    pub fn paint(&self, host: &mut dyn HostSurface, region: Rect) -> Result<()> {
        let Some(region) = region.intersection(&self.client_rect()) else {
            return Ok(());
        };
        if self.active_layout().is_none() {
            return Ok(());
        }
        self.composite(host, region)
    }

    /// Repaint one item after its state changed.
    pub fn redraw_item(&self, id: ItemId, host: &mut dyn HostSurface) -> Result<()> {
        let Some(layout) = self.active_layout() else {
            return Ok(());
        };
        let Some(item) = layout.tree.get(id) else {
            return Ok(());
        };
        let Some(rect) = item.screen_rect().intersection(&self.client_rect()) else {
            return Ok(());
        };
        if self.needs_composite(&layout.tree, id) {
            return self.composite(host, rect);
        }

        let mut subtree = vec![id];
        subtree.extend(descendants(&layout.tree, id));
        let mut ctx = DrawContext::new(host, &self.config.ellipsis)
            .with_debug_outline(self.skin.options.debug_outline);
        for sid in subtree {
            let Some(item) = layout.tree.get(sid) else {
                continue;
            };
            if !layout.tree.is_effectively_visible(sid) {
                continue;
            }
            let Some(clip) = item.screen_rect().intersection(&rect) else {
                continue;
            };
            ctx.backend.set_clip_rect(clip)?;
            item.paint(&mut ctx)?;
        }
        ctx.backend.reset_clip_rect()
    }

    /// Whether redrawing `id` must composite what lies beneath it.
    pub fn needs_composite(&self, tree: &ItemTree, id: ItemId) -> bool {
        let Some(item) = tree.get(id) else {
            return false;
        };
        if !tree.is_effectively_visible(id) || item.is_translucent() {
            return true;
        }
        let rect = item.screen_rect();
        let order = tree.tree_order();
        let Some(pos) = order.iter().position(|&i| i == id) else {
            return false;
        };
        order[pos + 1..].iter().any(|&later| {
            !tree.ancestors(later).any(|a| a == id)
                && tree.is_effectively_visible(later)
                && tree
                    .get(later)
                    .is_some_and(|l| l.screen_rect().intersects(&rect))
        })
    }

    /// Paint every visible item intersecting `region` offscreen, then
    /// blit the result.
    fn composite(&self, host: &mut dyn HostSurface, region: Rect) -> Result<()> {
        host.begin_offscreen(region)?;
        let painted = self.paint_items(host, region);
        let ended = host.end_offscreen();
        painted.and(ended)
    }

    fn paint_items(&self, host: &mut dyn HostSurface, region: Rect) -> Result<()> {
        let Some(layout) = self.active_layout() else {
            return Ok(());
        };
        host.set_clip_rect(region)?;
        host.fill_rect(region, BACKGROUND)?;
        let mut ctx = DrawContext::new(host, &self.config.ellipsis)
            .with_debug_outline(self.skin.options.debug_outline);
        for id in layout.tree.tree_order() {
            let Some(item) = layout.tree.get(id) else {
                continue;
            };
            if !layout.tree.is_effectively_visible(id) {
                continue;
            }
            let Some(clip) = item.screen_rect().intersection(&region) else {
                continue;
            };
            ctx.backend.set_clip_rect(clip)?;
            item.paint(&mut ctx)?;
        }
        ctx.backend.reset_clip_rect()
    }
}

/// Every descendant of `id`, in tree order.
fn descendants(tree: &ItemTree, id: ItemId) -> Vec<ItemId> {
    let mut out = Vec::new();
    let mut stack: Vec<ItemId> = tree.children(id).iter().rev().copied().collect();
    while let Some(next) = stack.pop() {
        out.push(next);
        stack.extend(tree.children(next).iter().rev().copied());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::software::SoftwareSurface;
    use std::rc::Rc;
    use veneer_skin::{Layout, Size, Skin};
    use veneer_types::bitmap::Bitmap;
    use veneer_types::config::EngineConfig;
    use veneer_ui::div::Div;
    use veneer_ui::image::Image;
    use veneer_ui::item::{Item, ItemKind};
    use veneer_ui::position::{ItemGeometry, PositionExpr};
    use veneer_ui::sprite::SpriteSheet;
    use veneer_ui::three_slice::ThreeSlice;

    /// A one-cell sheet of `color`.
    fn solid(color: Color, w: u32, h: u32) -> Rc<SpriteSheet> {
        let mut bmp = Bitmap::solid(w + 1, h + 1, color);
        for x in 0..3 {
            bmp.set_pixel(x, 0, Color::rgb(255, 0, 255));
        }
        Rc::new(SpriteSheet::slice(bmp, 4).unwrap())
    }

    fn image(color: Color, x: i32, y: i32, w: i32, h: i32) -> Item {
        let kind = ItemKind::Image(Image::new(
            Some(solid(color, w as u32, h as u32)),
            ThreeSlice::single(0),
        ));
        Item::new(kind).with_geometry(ItemGeometry {
            x: PositionExpr::pixels(x),
            y: PositionExpr::pixels(y),
            w: PositionExpr::pixels(w),
            h: PositionExpr::pixels(h),
        })
    }

    /// A red square under a partly overlapping blue one.
    fn engine() -> (SkinEngine, ItemId, ItemId) {
        let mut layout = Layout::new("main", Item::new(ItemKind::Div(Div::new())));
        layout.default_size = Some(Size::new(40, 30));
        let root = layout.root;
        let red = layout
            .tree
            .push(Some(root), image(Color::rgb(255, 0, 0), 0, 0, 20, 20));
        let blue = layout
            .tree
            .push(Some(root), image(Color::rgb(0, 0, 255), 10, 10, 20, 20));
        let skin = Skin {
            name: "paint".into(),
            layouts: vec![layout],
            ..Skin::default()
        };
        (SkinEngine::new(skin, EngineConfig::default()), red, blue)
    }

    #[test]
    fn full_paint_in_tree_order() {
        let (mut e, _, _) = engine();
        let mut host = SoftwareSurface::new(640, 480);
        e.start(None, &mut host).unwrap();
        assert_eq!(host.pixel(5, 5), Color::rgb(255, 0, 0));
        assert_eq!(host.pixel(15, 15), Color::rgb(0, 0, 255));
        assert_eq!(host.pixel(35, 25), BACKGROUND);
        assert_eq!(host.composites(), 1);
    }

    #[test]
    fn covered_item_is_composited() {
        let (mut e, red, blue) = engine();
        let mut host = SoftwareSurface::new(640, 480);
        e.start(None, &mut host).unwrap();
        let layout = e.active_layout().unwrap();
        assert!(e.needs_composite(&layout.tree, red));
        assert!(!e.needs_composite(&layout.tree, blue));

        e.redraw_item(red, &mut host).unwrap();
        assert_eq!(host.composites(), 2);
        assert_eq!(host.pixel(15, 15), Color::rgb(0, 0, 255));
        e.redraw_item(blue, &mut host).unwrap();
        assert_eq!(host.composites(), 2);
    }

    #[test]
    fn hidden_item_reveals_background() {
        let (mut e, _, blue) = engine();
        let mut host = SoftwareSurface::new(640, 480);
        e.start(None, &mut host).unwrap();
        e.item_mut(blue).unwrap().hidden = true;
        e.redraw_item(blue, &mut host).unwrap();
        assert_eq!(host.pixel(15, 15), Color::rgb(255, 0, 0));
        assert_eq!(host.pixel(25, 25), BACKGROUND);
    }

    #[test]
    fn paint_outside_window_is_noop() {
        let (mut e, _, _) = engine();
        let mut host = SoftwareSurface::new(640, 480);
        e.start(None, &mut host).unwrap();
        e.paint(&mut host, Rect::new(100, 100, 10, 10)).unwrap();
        assert_eq!(host.composites(), 1);
    }
}
