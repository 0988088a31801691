//! One-dimensional position algebra for item geometry.
//!
//! Grammar (case and whitespace insensitive):
//!
//! ```text
//! expr  := [token] [term]
//! token := "same" | "next" | "opposite"
//! term  := [sign] int [ "." d [d] ] "%" [ [sign] int ]   -- percent + offset
//!        | [sign] int                                   -- pixels
//! ```
//!
//! Percentages are stored in hundredths of a percent (0..=10000).

use std::fmt;

use veneer_types::geometry::Rect;

/// Percentage resolution: 100% == `FULL`.
pub const FULL: u32 = 10_000;

/// Relative token prefixing an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpecialToken {
    #[default]
    None,
    /// Add the previous sibling's position.
    SameAsPrevious,
    /// Add the previous sibling's position plus its size.
    AfterPrevious,
    /// Evaluate against the item's own size on the other axis.
    MirrorOtherAxis,
}

/// Parse failure for a position expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid position expression '{text}': {reason}")]
pub struct PositionError {
    pub text: String,
    pub reason: &'static str,
}

/// A parsed, immutable position or size expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PositionExpr {
    /// Hundredths of a percent of the span, 0..=10000.
    pub percent: u32,
    /// Additive pixel offset.
    pub offset: i32,
    pub token: SpecialToken,
}

impl PositionExpr {
    /// Zero-sized default substituted for unparsable expressions.
    pub const ZERO: Self = Self {
        percent: 0,
        offset: 0,
        token: SpecialToken::None,
    };

    /// The whole span.
    pub const FILL: Self = Self {
        percent: FULL,
        offset: 0,
        token: SpecialToken::None,
    };

    /// A plain pixel value.
    pub const fn pixels(offset: i32) -> Self {
        Self {
            percent: 0,
            offset,
            token: SpecialToken::None,
        }
    }

    pub fn parse(text: &str) -> Result<Self, PositionError> {
        let err = |reason| PositionError {
            text: text.to_string(),
            reason,
        };
        let norm: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        if norm.is_empty() {
            return Err(err("empty expression"));
        }

        let (token, rest) = if let Some(r) = norm.strip_prefix("opposite") {
            (SpecialToken::MirrorOtherAxis, r)
        } else if let Some(r) = norm.strip_prefix("same") {
            (SpecialToken::SameAsPrevious, r)
        } else if let Some(r) = norm.strip_prefix("next") {
            (SpecialToken::AfterPrevious, r)
        } else {
            (SpecialToken::None, norm.as_str())
        };

        if rest.is_empty() {
            let percent = if token == SpecialToken::MirrorOtherAxis {
                FULL
            } else {
                0
            };
            return Ok(Self {
                percent,
                offset: 0,
                token,
            });
        }

        let mut cur = Cursor::new(rest);
        let (negative, whole) = cur.signed_int().ok_or_else(|| err("expected a number"))?;

        let mut fraction = 0u32;
        if cur.eat('.') {
            let digits = cur.digits();
            if digits.is_empty() || digits.len() > 2 {
                return Err(err("percent takes at most two fractional digits"));
            }
            fraction = digits.parse::<u32>().map_err(|_| err("bad fraction"))?;
            if digits.len() == 1 {
                fraction *= 10;
            }
            if cur.peek() != Some('%') {
                return Err(err("fractional digits are only allowed on percentages"));
            }
        }

        if cur.eat('%') {
            if negative {
                return Err(err("negative percentage"));
            }
            let percent = whole
                .checked_mul(100)
                .and_then(|p| p.checked_add(fraction as i64))
                .filter(|p| *p <= FULL as i64)
                .ok_or_else(|| err("percentage above 100%"))?;
            let offset = if cur.is_done() {
                0
            } else {
                let (neg, px) = cur.signed_int().ok_or_else(|| err("expected pixel offset"))?;
                to_offset(neg, px).ok_or_else(|| err("offset out of range"))?
            };
            if !cur.is_done() {
                return Err(err("trailing characters"));
            }
            return Ok(Self {
                percent: percent as u32,
                offset,
                token,
            });
        }

        if !cur.is_done() {
            return Err(err("trailing characters"));
        }
        Ok(Self {
            percent: 0,
            offset: to_offset(negative, whole).ok_or_else(|| err("offset out of range"))?,
            token,
        })
    }

    /// Evaluate against a span and the previous sibling's position and size.
    pub fn evaluate(&self, span: i32, previous_position: i32, previous_size: i32) -> i32 {
        let base = scale(span, self.percent).saturating_add(self.offset);
        match self.token {
            SpecialToken::None | SpecialToken::MirrorOtherAxis => base,
            SpecialToken::SameAsPrevious => base.saturating_add(previous_position),
            SpecialToken::AfterPrevious => base
                .saturating_add(previous_position)
                .saturating_add(previous_size),
        }
    }

    pub fn is_opposite(&self) -> bool {
        self.token == SpecialToken::MirrorOtherAxis
    }
}

impl fmt::Display for PositionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token {
            SpecialToken::None => {},
            SpecialToken::SameAsPrevious => write!(f, "same")?,
            SpecialToken::AfterPrevious => write!(f, "next")?,
            SpecialToken::MirrorOtherAxis => write!(f, "opposite")?,
        }
        if self.percent > 0 {
            write!(f, "{}", self.percent / 100)?;
            if self.percent % 100 != 0 {
                write!(f, ".{:02}", self.percent % 100)?;
            }
            write!(f, "%")?;
            if self.offset != 0 {
                write!(f, "{:+}", self.offset)?;
            }
        } else if self.offset != 0 || self.token == SpecialToken::None {
            write!(f, "{}", self.offset)?;
        }
        Ok(())
    }
}

/// Apply a fraction of [`FULL`] to `total`.
///
/// Fractions above one half are computed from the far edge
/// (`total - total * (100% - fraction)`), so rounding favors the nearer
/// edge of the span on both halves and the result stays monotonic.
pub fn scale(total: i32, fraction: u32) -> i32 {
    let t = total as i64;
    let f = fraction.min(FULL) as i64;
    let full = FULL as i64;
    let v = if f > full / 2 && f < full {
        t - t * (full - f) / full
    } else {
        t * f / full
    };
    v as i32
}

fn to_offset(negative: bool, value: i64) -> Option<i32> {
    let v = if negative { -value } else { value };
    i32::try_from(v).ok()
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn digits(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn signed_int(&mut self) -> Option<(bool, i64)> {
        let negative = if self.eat('-') {
            true
        } else {
            self.eat('+');
            false
        };
        let digits = self.digits();
        if digits.is_empty() || digits.len() > 10 {
            return None;
        }
        digits.parse::<i64>().ok().map(|v| (negative, v))
    }
}

/// The four expressions of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemGeometry {
    pub x: PositionExpr,
    pub y: PositionExpr,
    pub w: PositionExpr,
    pub h: PositionExpr,
}

/// Problem found while resolving an item's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryIssue {
    /// Both width and height mirror each other.
    CircularOpposite,
}

impl ItemGeometry {
    /// Resolve to a rectangle relative to the parent's origin.
    ///
    /// `parent` is the parent's computed size; `previous` is the preceding
    /// sibling's already resolved relative rectangle (zero for the first
    /// child). Sizes resolve first, then `opposite` sizes against the other
    /// axis's computed size, then positions.
    pub fn resolve(&self, parent_w: i32, parent_h: i32, previous: Rect) -> (Rect, Option<GeometryIssue>) {
        let mut issue = None;
        let (mut w, mut h) = (0, 0);

        if !self.w.is_opposite() {
            w = self.w.evaluate(parent_w, previous.w, 0);
        }
        if !self.h.is_opposite() {
            h = self.h.evaluate(parent_h, previous.h, 0);
        }
        match (self.w.is_opposite(), self.h.is_opposite()) {
            (true, true) => issue = Some(GeometryIssue::CircularOpposite),
            (true, false) => w = self.w.evaluate(h, previous.w, 0),
            (false, true) => h = self.h.evaluate(w, previous.h, 0),
            (false, false) => {},
        }

        let x_span = if self.x.is_opposite() { parent_h } else { parent_w };
        let y_span = if self.y.is_opposite() { parent_w } else { parent_h };
        let x = self.x.evaluate(x_span, previous.x, previous.w);
        let y = self.y.evaluate(y_span, previous.y, previous.h);

        (Rect::new(x, y, w.max(0), h.max(0)), issue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PositionExpr {
        PositionExpr::parse(s).unwrap()
    }

    #[test]
    fn bare_integer_is_pixels() {
        assert_eq!(p("42"), PositionExpr::pixels(42));
        assert_eq!(p("-7"), PositionExpr::pixels(-7));
        assert_eq!(p(" + 3 "), PositionExpr::pixels(3));
    }

    #[test]
    fn percent_with_offset() {
        let e = p("50%-10");
        assert_eq!(e.percent, 5000);
        assert_eq!(e.offset, -10);
        assert_eq!(e.evaluate(300, 0, 0), 140);
    }

    #[test]
    fn fractional_percent() {
        assert_eq!(p("12.5%").percent, 1250);
        assert_eq!(p("12.25%").percent, 1225);
        assert!(PositionExpr::parse("12.255%").is_err());
        assert!(PositionExpr::parse("12.5").is_err());
    }

    #[test]
    fn tokens_case_insensitive() {
        assert_eq!(p("SAME").token, SpecialToken::SameAsPrevious);
        assert_eq!(p("Next + 4").token, SpecialToken::AfterPrevious);
        assert_eq!(p("next+4").offset, 4);
        let o = p("Opposite");
        assert_eq!(o.token, SpecialToken::MirrorOtherAxis);
        assert_eq!(o.percent, FULL);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "abc", "10px", "%", "-5%", "101%", "50%x", "same same", "5-"] {
            assert!(PositionExpr::parse(bad).is_err(), "'{bad}' should fail");
        }
    }

    #[test]
    fn relative_tokens_use_previous_sibling() {
        assert_eq!(p("same").evaluate(100, 30, 20), 30);
        assert_eq!(p("next").evaluate(100, 30, 20), 50);
        assert_eq!(p("next+2").evaluate(100, 30, 20), 52);
        assert_eq!(p("same10%").evaluate(100, 30, 20), 40);
    }

    #[test]
    fn edges_of_span() {
        for t in [0, 1, 3, 99, 1000] {
            assert_eq!(p("0%").evaluate(t, 0, 0), 0);
            assert_eq!(p("100%").evaluate(t, 0, 0), t);
            assert_eq!(p("100%-5").evaluate(t, 0, 0), t - 5);
        }
    }

    #[test]
    fn upper_half_rounds_toward_far_edge() {
        // 75% of 3 = 2.25 -> 3 - floor(0.75) = 3
        assert_eq!(scale(3, 7500), 3);
        // 25% of 3 = 0.75 -> floor
        assert_eq!(scale(3, 2500), 0);
        assert_eq!(scale(3, 5000), 1);
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for s in ["50%-10", "12.25%", "same", "next+4", "opposite", "-3", "opposite50%"] {
            let e = p(s);
            assert_eq!(p(&e.to_string()), e, "{s}");
        }
    }

    #[test]
    fn resolve_square_from_height() {
        let g = ItemGeometry {
            x: p("0"),
            y: p("0"),
            w: p("opposite"),
            h: p("50%"),
        };
        let (r, issue) = g.resolve(400, 60, Rect::ZERO);
        assert_eq!(issue, None);
        assert_eq!((r.w, r.h), (30, 30));
    }

    #[test]
    fn resolve_both_opposite_is_circular() {
        let g = ItemGeometry {
            x: p("0"),
            y: p("0"),
            w: p("opposite"),
            h: p("opposite"),
        };
        let (r, issue) = g.resolve(100, 100, Rect::ZERO);
        assert_eq!(issue, Some(GeometryIssue::CircularOpposite));
        assert_eq!((r.w, r.h), (0, 0));
    }

    #[test]
    fn resolve_next_places_after_previous() {
        let g = ItemGeometry {
            x: p("next+2"),
            y: p("same"),
            w: p("same"),
            h: p("100%"),
        };
        let prev = Rect::new(10, 5, 20, 8);
        let (r, _) = g.resolve(200, 30, prev);
        assert_eq!(r, Rect::new(32, 5, 20, 30));
    }

    mod prop {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn monotonic_in_percent(total in 0i32..5000, a in 0u32..=FULL, b in 0u32..=FULL) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(scale(total, lo) <= scale(total, hi));
            }

            #[test]
            fn within_span(total in 0i32..5000, f in 0u32..=FULL) {
                let v = scale(total, f);
                prop_assert!(v >= 0 && v <= total);
            }

            #[test]
            fn offset_is_additive(total in 0i32..5000, pct in 0u32..=100, off in -500i32..500) {
                let with = PositionExpr::parse(&format!("{pct}%{off:+}")).unwrap();
                let without = PositionExpr::parse(&format!("{pct}%")).unwrap();
                prop_assert_eq!(with.evaluate(total, 0, 0), without.evaluate(total, 0, 0) + off);
            }
        }
    }
}
