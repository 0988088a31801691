//! Per-item color palettes indexed by semantic state.

use veneer_types::backend::Color;

/// Semantic color slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaletteState {
    Normal,
    NormalAlt,
    Selected,
    SelectedAlt,
    Title1,
    Title2,
    Title3,
    VertText,
    StubText,
}

impl PaletteState {
    pub const ALL: [PaletteState; 9] = [
        Self::Normal,
        Self::NormalAlt,
        Self::Selected,
        Self::SelectedAlt,
        Self::Title1,
        Self::Title2,
        Self::Title3,
        Self::VertText,
        Self::StubText,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let n = name.trim().to_ascii_lowercase();
        Some(match n.as_str() {
            "normal" => Self::Normal,
            "normalalt" => Self::NormalAlt,
            "selected" => Self::Selected,
            "selectedalt" => Self::SelectedAlt,
            "title1" => Self::Title1,
            "title2" => Self::Title2,
            "title3" => Self::Title3,
            "verttext" => Self::VertText,
            "stubtext" => Self::StubText,
            _ => return None,
        })
    }

    fn slot(self) -> usize {
        self as usize
    }

    /// Slot consulted when this one is unset.
    fn fallback(self) -> Option<Self> {
        match self {
            Self::Normal => None,
            Self::SelectedAlt => Some(Self::Selected),
            _ => Some(Self::Normal),
        }
    }
}

/// Default text color when nothing in the chain is set.
pub const DEFAULT_TEXT: Color = Color::rgb(200, 200, 200);

/// Colors for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    slots: [Option<Color>; 9],
}

impl Palette {
    pub fn set(&mut self, state: PaletteState, color: Color) {
        self.slots[state.slot()] = Some(color);
    }

    /// Explicitly set color, without fallback.
    pub fn get_exact(&self, state: PaletteState) -> Option<Color> {
        self.slots[state.slot()]
    }

    /// Resolved color following the fallback chain.
    pub fn get(&self, state: PaletteState) -> Color {
        let mut cur = Some(state);
        while let Some(s) = cur {
            if let Some(c) = self.slots[s.slot()] {
                return c;
            }
            cur = s.fallback();
        }
        DEFAULT_TEXT
    }

    /// Fill unset slots from a parent palette.
    pub fn inherit_from(&mut self, parent: &Palette) {
        for (mine, theirs) in self.slots.iter_mut().zip(parent.slots.iter()) {
            if mine.is_none() {
                *mine = *theirs;
            }
        }
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.strip_prefix('#')?;
    if !s.is_ascii() {
        return None;
    }
    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color::rgb(r, g, b))
    } else if s.len() == 8 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        let a = u8::from_str_radix(&s[6..8], 16).ok()?;
        Some(Color::rgba(r, g, b, a))
    } else {
        None
    }
}
