//! veneer-ui: the item model of a skin.
//!
//! Position expressions, sprite-sheet slicing, and the widget variants a
//! skin document instantiates. All rendering goes through `HostSurface`
//! trait methods -- no platform-specific code.

pub mod attrs;
pub mod button;
pub mod context;
pub mod div;
pub mod image;
pub mod item;
pub mod layout;
pub mod palette;
pub mod placeholder;
pub mod position;
pub mod scrollbar;
pub mod sprite;
pub mod target;
pub mod text_box;
pub mod three_slice;
pub mod tree;
pub mod value;
pub mod widget;

#[cfg(test)]
pub(crate) mod test_utils;

pub use attrs::{AttrError, Attributes};
pub use context::DrawContext;
pub use item::{Item, ItemKind};
pub use palette::{Palette, PaletteState};
pub use position::{ItemGeometry, PositionExpr};
pub use sprite::SpriteSheet;
pub use target::{KnownTarget, LayoutJump, Target};
pub use tree::{ItemId, ItemTree};
pub use value::{Action, Response, ScrollRange, TimerRequest, Value};
pub use widget::Widget;
