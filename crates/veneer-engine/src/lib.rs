//! veneer-engine: drives a parsed skin against a host surface.
//!
//! [`SkinEngine`] owns the skin, activates one layout at a time, lays it
//! out, paints it (offscreen when overlap or transparency demands it)
//! and dispatches host events to its items. [`SoftwareSurface`] is an
//! in-memory host used for headless rendering and tests.

pub mod dispatch;
pub mod engine;
pub mod registry;
pub mod render;
pub mod scheduler;
pub mod software;

pub use engine::{FALLBACK_SIZE, Fired, SkinEngine};
pub use registry::TargetRegistry;
pub use render::BACKGROUND;
pub use scheduler::Scheduler;
pub use software::SoftwareSurface;
