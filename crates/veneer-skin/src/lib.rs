//! veneer-skin: skin documents.
//!
//! A skin is a tag-based markup document declaring named layouts of
//! items, sprite sheets they draw from, and skin-wide options. This crate
//! turns the text into a [`Skin`]; activating and driving a layout is the
//! engine's job.

pub mod condition;
pub mod discover;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod sprites;
pub mod targets;
pub mod tokenizer;

#[cfg(test)]
pub(crate) mod test_utils;

pub use condition::Conditions;
pub use discover::discover_skins;
pub use geometry::{GEOMETRY_VERSION, GeometryBlob, LayoutGeometry};
pub use model::{InheritFrom, Layout, Size, Skin, SkinOptions};
pub use parser::{parse_skin, read_skin_name};
pub use sprites::SpriteCache;
pub use targets::TargetTable;
