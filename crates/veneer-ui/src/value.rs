//! Values pushed into items and the responses items give back.

/// Scroll model shared by scrollbars and sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRange {
    pub value: i32,
    pub min: i32,
    pub max: i32,
    /// Visible extent; also the page step.
    pub page: i32,
}

impl ScrollRange {
    pub const fn new(value: i32, min: i32, max: i32, page: i32) -> Self {
        Self {
            value,
            min,
            max,
            page,
        }
    }

    /// Largest reachable value.
    pub fn upper(&self) -> i32 {
        self.max.saturating_sub(self.page).max(self.min)
    }

    /// Copy with `value` clamped into `min..=upper`.
    pub fn clamped(mut self) -> Self {
        self.page = self.page.max(0);
        self.value = self.value.clamp(self.min, self.upper());
        self
    }
}

/// Generic value bound to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    /// Index of a button's logical state.
    State(usize),
    /// Box text with an optional shorter alternate.
    Text { text: String, short: Option<String> },
    /// Elapsed / total seconds shown in a box's secondary slot.
    Time { elapsed: u32, total: Option<u32> },
    Range(ScrollRange),
    /// Release a button held in its pressed look.
    Restore,
    /// Turn box blinking on or off.
    Blink(bool),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text {
            text: s.into(),
            short: None,
        }
    }

    /// Truthiness used by follow-visibility links.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) | Self::Blink(b) => *b,
            Self::Int(n) => *n != 0,
            Self::State(s) => *s != 0,
            Self::Text { text, .. } => !text.is_empty(),
            Self::Time { .. } | Self::Range(_) | Self::Restore => true,
        }
    }
}

/// Sub-region of a box that received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxRegion {
    IconLeft,
    IconRight,
    Time,
    Text,
}

/// Something an item asks the engine to report or perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The item's target was activated with this value.
    Fire(Value),
    /// A box sub-region was clicked.
    Click(BoxRegion),
    /// A draggable box was released after moving vertically by `dy`.
    Reorder { dy: i32 },
}

/// Timer change requested by an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerRequest {
    #[default]
    Keep,
    /// Start, or restart with a new interval.
    Start(u32),
    Stop,
}

/// Result of delivering an event to an item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    pub redraw: bool,
    pub actions: Vec<Action>,
    pub timer: TimerRequest,
}

impl Response {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    pub fn fire(mut self, value: Value) -> Self {
        self.actions.push(Action::Fire(value));
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn timer(mut self, timer: TimerRequest) -> Self {
        self.timer = timer;
        self
    }

    pub fn with_redraw(mut self, redraw: bool) -> Self {
        self.redraw |= redraw;
        self
    }
}
