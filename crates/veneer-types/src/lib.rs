//! Foundation types and traits for Veneer.
//!
//! This crate contains the platform-agnostic types shared by all Veneer
//! crates: colors, rectangles, decoded bitmaps, host input events, the
//! host surface trait, configuration, and error types.

pub mod backend;
pub mod bitmap;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;

pub use backend::{Color, ExternalSurface, HostSurface, ResourceLoader, TimerId};
pub use bitmap::Bitmap;
pub use config::EngineConfig;
pub use error::{Diagnostic, DiagnosticKind, Result, SkinError};
pub use geometry::Rect;
pub use input::{HostEvent, Key, Modifiers};
