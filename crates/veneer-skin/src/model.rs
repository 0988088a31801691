//! Parsed skin documents: layouts, options and the sprite cache.

use veneer_types::backend::Color;
use veneer_types::error::Diagnostic;
use veneer_types::geometry::Rect;
use veneer_ui::item::Item;
use veneer_ui::tree::{ItemId, ItemTree};

use crate::sprites::SpriteCache;

/// Skin-wide options from the `<options>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinOptions {
    /// Outline every item rectangle when painting.
    pub debug_outline: bool,
    pub tooltip_fg: Color,
    pub tooltip_bg: Color,
}

impl Default for SkinOptions {
    fn default() -> Self {
        Self {
            debug_outline: false,
            tooltip_fg: Color::BLACK,
            tooltip_bg: Color::rgb(255, 255, 225),
        }
    }
}

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// Layouts whose window rectangle this layout copies parts of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InheritFrom {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub position: Option<usize>,
}

/// One selectable arrangement of items.
#[derive(Debug, Clone)]
pub struct Layout {
    pub name: String,
    pub tree: ItemTree,
    /// Implicit full-window div owning every top-level item.
    pub root: ItemId,
    pub default_size: Option<Size>,
    pub min_size: Option<Size>,
    pub max_size: Option<Size>,
    pub inherit: InheritFrom,
    pub always_on_top: bool,
    pub fullscreen: bool,
    /// Last known or persisted window rectangle.
    pub window_rect: Option<Rect>,
    pub line: usize,
}

impl Layout {
    pub fn new(name: impl Into<String>, root: Item) -> Self {
        let mut tree = ItemTree::new();
        let root = tree.push(None, root);
        Self {
            name: name.into(),
            tree,
            root,
            default_size: None,
            min_size: None,
            max_size: None,
            inherit: InheritFrom::default(),
            always_on_top: false,
            fullscreen: false,
            window_rect: None,
            line: 0,
        }
    }

    /// Size implied by the art of the top-level items: the largest
    /// natural extent among them.
    pub fn natural_size(&self) -> Option<Size> {
        self.tree
            .children(self.root)
            .iter()
            .filter_map(|&id| self.tree.get(id)?.natural_size())
            .reduce(|(aw, ah), (bw, bh)| (aw.max(bw), ah.max(bh)))
            .map(|(w, h)| Size::new(w, h))
    }

    /// Clamp a size into the declared min/max bounds.
    pub fn clamp_size(&self, w: i32, h: i32) -> Size {
        let (mut w, mut h) = (w, h);
        if let Some(max) = self.max_size {
            w = w.min(max.w);
            h = h.min(max.h);
        }
        if let Some(min) = self.min_size {
            w = w.max(min.w);
            h = h.max(min.h);
        }
        Size::new(w.max(0), h.max(0))
    }
}

/// A fully parsed skin.
#[derive(Debug, Clone, Default)]
pub struct Skin {
    pub name: String,
    pub version: Option<String>,
    pub layouts: Vec<Layout>,
    pub sprites: SpriteCache,
    pub options: SkinOptions,
    /// Content of `<script>` blocks, handed to the host's script engine.
    pub script: Option<String>,
    /// Problems recovered from while loading.
    pub diagnostics: Vec<Diagnostic>,
}

impl Skin {
    /// Index of the layout named `name` (case-insensitive).
    pub fn layout_index(&self, name: &str) -> Option<usize> {
        self.layouts
            .iter()
            .position(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn layout(&self, index: usize) -> Option<&Layout> {
        self.layouts.get(index)
    }

    pub fn layout_mut(&mut self, index: usize) -> Option<&mut Layout> {
        self.layouts.get_mut(index)
    }

    pub fn layout_names(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(|l| l.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_ui::div::Div;
    use veneer_ui::item::ItemKind;

    fn layout(name: &str) -> Layout {
        Layout::new(name, Item::new(ItemKind::Div(Div::new())))
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let skin = Skin {
            layouts: vec![layout("Main"), layout("Compact")],
            ..Skin::default()
        };
        assert_eq!(skin.layout_index("compact"), Some(1));
        assert_eq!(skin.layout_index("MAIN"), Some(0));
        assert_eq!(skin.layout_index("mini"), None);
        assert_eq!(skin.layout_names().collect::<Vec<_>>(), vec!["Main", "Compact"]);
    }

    #[test]
    fn clamp_respects_bounds() {
        let mut l = layout("main");
        l.min_size = Some(Size::new(100, 50));
        l.max_size = Some(Size::new(400, 300));
        assert_eq!(l.clamp_size(20, 500), Size::new(100, 300));
        assert_eq!(l.clamp_size(200, 100), Size::new(200, 100));
    }

    #[test]
    fn empty_layout_has_no_natural_size() {
        assert_eq!(layout("main").natural_size(), None);
    }
}
