//! Platform-agnostic host event types.
//!
//! Every host maps its native paint, pointer, keyboard and timer callbacks
//! to these enums. The engine never sees raw platform input.

use serde::{Deserialize, Serialize};

use crate::backend::TimerId;
use crate::geometry::Rect;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
}

/// Keys the engine's widgets react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Char(char),
}

/// A host-delivered event, in window coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Primary pointer button pressed.
    PointerDown { x: i32, y: i32, modifiers: Modifiers },
    /// Pointer moved (button held or not).
    PointerMove { x: i32, y: i32, modifiers: Modifiers },
    /// Primary pointer button released.
    PointerUp { x: i32, y: i32, modifiers: Modifiers },
    /// Pointer left the window.
    PointerLeave,
    /// The host took pointer capture away (focus stolen, window hidden).
    CaptureLost,
    /// Key pressed.
    Key { key: Key, modifiers: Modifiers },
    /// A timer started through the host surface fired.
    Timer(TimerId),
    /// Part of the window must be repainted.
    Paint(Rect),
    /// The window was resized by the user or the window manager.
    Resize { w: i32, h: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_events_distinct() {
        let down = HostEvent::PointerDown {
            x: 1,
            y: 2,
            modifiers: Modifiers::NONE,
        };
        let up = HostEvent::PointerUp {
            x: 1,
            y: 2,
            modifiers: Modifiers::NONE,
        };
        assert_ne!(down, up);
    }

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }

    #[test]
    fn key_hash_distinct() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Key::Up);
        set.insert(Key::Down);
        set.insert(Key::Up);
        set.insert(Key::Char('a'));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn timer_event_carries_id() {
        let e = HostEvent::Timer(TimerId(7));
        assert_eq!(e, HostEvent::Timer(TimerId(7)));
        assert_ne!(e, HostEvent::Timer(TimerId(8)));
    }
}
