//! Logical targets: what action or bound value an item represents.

use std::fmt;

/// Targets the engine knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KnownTarget {
    Play,
    Pause,
    Stop,
    Previous,
    Next,
    Eject,
    Volume,
    Seek,
    Balance,
    Shuffle,
    Repeat,
    Mute,
    Title,
    Time,
    Playlist,
    PlaylistScroll,
    Equalizer,
    Search,
    Menu,
    Minimize,
    Maximize,
    Close,
}

impl KnownTarget {
    pub const ALL: [KnownTarget; 22] = [
        Self::Play,
        Self::Pause,
        Self::Stop,
        Self::Previous,
        Self::Next,
        Self::Eject,
        Self::Volume,
        Self::Seek,
        Self::Balance,
        Self::Shuffle,
        Self::Repeat,
        Self::Mute,
        Self::Title,
        Self::Time,
        Self::Playlist,
        Self::PlaylistScroll,
        Self::Equalizer,
        Self::Search,
        Self::Menu,
        Self::Minimize,
        Self::Maximize,
        Self::Close,
    ];

    /// Name used in skin documents.
    pub fn name(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Previous => "prev",
            Self::Next => "next",
            Self::Eject => "eject",
            Self::Volume => "volume",
            Self::Seek => "seek",
            Self::Balance => "balance",
            Self::Shuffle => "shuffle",
            Self::Repeat => "repeat",
            Self::Mute => "mute",
            Self::Title => "title",
            Self::Time => "time",
            Self::Playlist => "playlist",
            Self::PlaylistScroll => "playlist_scroll",
            Self::Equalizer => "equalizer",
            Self::Search => "search",
            Self::Menu => "menu",
            Self::Minimize => "minimize",
            Self::Maximize => "maximize",
            Self::Close => "close",
        }
    }
}

/// "Switch to layout X", resolved after the whole document is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutJump {
    pub name: String,
    /// Index of the layout in its skin; `None` means stay on the current one.
    pub layout: Option<usize>,
}

/// What an item is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Known(KnownTarget),
    Layout(LayoutJump),
    /// Unrecognized name, preserved as inert data.
    Unknown(String),
}

impl Target {
    pub fn is_inert(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(k) => write!(f, "{}", k.name()),
            Self::Layout(j) => write!(f, "layout:{}", j.name),
            Self::Unknown(s) => write!(f, "{s}"),
        }
    }
}
