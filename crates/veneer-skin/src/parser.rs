//! Skin document parser.
//!
//! Walks the token stream with an explicit stack of open elements. Only a
//! document without any layout is fatal; every other problem becomes a
//! [`Diagnostic`] and the offending tag (with its subtree) is skipped.
//!
//! ```text
//! <skin name="Classic" version="2">
//!   <options debug="0" tipfg="#000000" tipbg="#ffffe1"/>
//!   <layout name="main" width="275" height="116" minwidth="275" minheight="116">
//!     <color state="normal" value="#00ff00"/>
//!     <image src="main.png" idx="0"/>
//!     <button x="16" y="88" src="buttons.png" idx="0,1,2" target="play"/>
//!     <if cond="video"> <div x="10" y="20" w="100%-20" h="50" indent="1,1,1,1"/> </if>
//!   </layout>
//!   <include file="compact.skin"/>
//! </skin>
//! ```

use veneer_types::backend::{ExternalSurface, ResourceLoader};
use veneer_types::config::EngineConfig;
use veneer_types::error::{Diagnostic, DiagnosticKind, Result, SkinError};
use veneer_ui::attrs::{AttrError, Attributes};
use veneer_ui::button::{Button, Repeat};
use veneer_ui::div::Div;
use veneer_ui::image::Image;
use veneer_ui::item::{Item, ItemKind};
use veneer_ui::palette::PaletteState;
use veneer_ui::placeholder::Placeholder;
use veneer_ui::position::{ItemGeometry, PositionExpr};
use veneer_ui::scrollbar::Scrollbar;
use veneer_ui::target::Target;
use veneer_ui::text_box::TextBox;
use veneer_ui::tree::ItemId;

use crate::condition::Conditions;
use crate::model::{Layout, Size, Skin};
use crate::targets::TargetTable;
use crate::tokenizer::{Tag, Token, Tokenizer};

/// Tags that create items.
const ITEM_TAGS: &[&str] = &[
    "div",
    "image",
    "box",
    "button",
    "scrollbar",
    "slider",
    "workspace",
    "input",
];

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse a skin document.
///
/// `flags` select conditional blocks, `targets` maps target names, and
/// `loader` supplies included documents and sprite bitmaps.
pub fn parse_skin(
    source: &str,
    flags: &Conditions,
    targets: &TargetTable,
    loader: &mut dyn ResourceLoader,
    config: &EngineConfig,
) -> Result<Skin> {
    let mut parser = Parser {
        flags,
        targets,
        loader,
        config,
        skin: Skin::default(),
        stack: Vec::new(),
        floor: 0,
        pending_inherit: Vec::new(),
    };
    parser.run(Tokenizer::new(source), 0);
    parser.finish()
}

/// Read only the declared skin name, stopping at the first tag.
pub fn read_skin_name(source: &str) -> Option<String> {
    Tokenizer::new(source)
        .find_map(|token| match token {
            Token::Start(tag) => Some(tag),
            _ => None,
        })
        .filter(|tag| tag.name == "skin")
        .and_then(|tag| tag.attrs.get("name").map(str::to_string))
}

// ---------------------------------------------------------------------------
// Parser state
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Frame {
    Skin,
    Layout(usize),
    Item { id: ItemId, tag: String },
    Script,
    If { cond: bool, in_else: bool },
    /// A recognised tag with no structural meaning (`options`, `color`).
    Plain(String),
    /// Subtree ignored after an error or inside a false branch.
    Skipped(String),
}

impl Frame {
    fn name(&self) -> &str {
        match self {
            Self::Skin => "skin",
            Self::Layout(_) => "layout",
            Self::Item { tag, .. } => tag,
            Self::Script => "script",
            Self::If { .. } => "if",
            Self::Plain(name) | Self::Skipped(name) => name,
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Self::If { cond, in_else } => cond != in_else,
            Self::Skipped(_) => false,
            _ => true,
        }
    }
}

/// Layout names to resolve once all layouts exist: (layout, key, name, line).
type PendingInherit = (usize, &'static str, String, usize);

struct Parser<'a> {
    flags: &'a Conditions,
    targets: &'a TargetTable,
    loader: &'a mut dyn ResourceLoader,
    config: &'a EngineConfig,
    skin: Skin,
    stack: Vec<Frame>,
    /// End tags never pop below this depth (set while inside an include).
    floor: usize,
    pending_inherit: Vec<PendingInherit>,
}

impl Parser<'_> {
    fn diag(&mut self, kind: DiagnosticKind, line: usize, message: impl Into<String>) {
        let d = Diagnostic::new(kind, line, message);
        log::warn!("{d}");
        self.skin.diagnostics.push(d);
    }

    fn active(&self) -> bool {
        self.stack.iter().all(Frame::is_active)
    }

    fn current_layout(&self) -> Option<usize> {
        self.stack.iter().rev().find_map(|f| match f {
            Frame::Layout(i) => Some(*i),
            _ => None,
        })
    }

    /// Innermost open item, or the layout root.
    fn current_parent(&self) -> Option<(usize, ItemId)> {
        let layout = self.current_layout()?;
        let item = self.stack.iter().rev().find_map(|f| match f {
            Frame::Item { id, .. } => Some(*id),
            _ => None,
        });
        let root = self.skin.layouts.get(layout)?.root;
        Some((layout, item.unwrap_or(root)))
    }

    fn skip(&mut self, tag: &Tag) {
        if !tag.self_closing {
            self.stack.push(Frame::Skipped(tag.name.clone()));
        }
    }

    fn run(&mut self, tokens: Tokenizer, depth: usize) {
        for token in tokens {
            match token {
                Token::Start(tag) => self.start(tag, depth),
                Token::End { name, line } => self.end(&name, line),
                Token::Text { text, line } => self.text(text, line),
                Token::Error { message, line } => {
                    if self.active() {
                        self.diag(DiagnosticKind::Document, line, message);
                    }
                },
            }
        }
    }

    // -- start tags ---------------------------------------------------------

    fn start(&mut self, tag: Tag, depth: usize) {
        match tag.name.as_str() {
            "else" => {
                self.else_branch(tag.line);
                return;
            },
            "endif" => {
                self.end("if", tag.line);
                return;
            },
            _ => {},
        }
        if !self.active() {
            self.skip(&tag);
            return;
        }
        match tag.name.as_str() {
            "if" => {
                let cond = self.flags.evaluate(tag.attrs.get("cond").unwrap_or_default());
                if !tag.self_closing {
                    self.stack.push(Frame::If {
                        cond,
                        in_else: false,
                    });
                }
            },
            "skin" => self.skin_tag(&tag),
            "options" => self.options_tag(&tag),
            "script" => {
                if !tag.self_closing {
                    self.stack.push(Frame::Script);
                }
            },
            "include" => self.include(&tag, depth),
            "layout" => self.layout_tag(&tag),
            "color" => self.color_tag(&tag),
            name if ITEM_TAGS.contains(&name) => self.item_tag(&tag),
            other => {
                self.diag(
                    DiagnosticKind::Document,
                    tag.line,
                    format!("unknown tag <{other}>"),
                );
                self.skip(&tag);
            },
        }
    }

    fn else_branch(&mut self, line: usize) {
        match self.stack.last_mut() {
            Some(Frame::If { in_else, .. }) if !*in_else => *in_else = true,
            _ => {
                if self.active() {
                    self.diag(DiagnosticKind::Document, line, "<else> without an open <if>");
                }
            },
        }
    }

    fn skin_tag(&mut self, tag: &Tag) {
        if self.stack.iter().any(|f| matches!(f, Frame::Skin)) {
            self.diag(DiagnosticKind::Document, tag.line, "nested <skin>");
            self.skip(tag);
            return;
        }
        if let Some(name) = tag.attrs.get("name") {
            self.skin.name = name.to_string();
        }
        if let Some(version) = tag.attrs.get("version") {
            self.skin.version = Some(version.to_string());
        }
        if !tag.self_closing {
            self.stack.push(Frame::Skin);
        }
    }

    fn options_tag(&mut self, tag: &Tag) {
        let attrs = &tag.attrs;
        if attrs.contains("debug") {
            self.skin.options.debug_outline = attrs.flag("debug");
        }
        for (key, slot) in [
            ("tipfg", &mut self.skin.options.tooltip_fg),
            ("tipbg", &mut self.skin.options.tooltip_bg),
        ] {
            match (attrs.get(key), attrs.color(key)) {
                (Some(_), Some(c)) => *slot = c,
                (Some(text), None) => {
                    let d = Diagnostic::new(
                        DiagnosticKind::Document,
                        tag.line,
                        format!("<options> {key}: bad color '{text}'"),
                    );
                    log::warn!("{d}");
                    self.skin.diagnostics.push(d);
                },
                _ => {},
            }
        }
        if !tag.self_closing {
            self.stack.push(Frame::Plain(tag.name.clone()));
        }
    }

    fn include(&mut self, tag: &Tag, depth: usize) {
        if !tag.self_closing {
            self.stack.push(Frame::Plain(tag.name.clone()));
        }
        let Some(file) = tag.attrs.get("file").or_else(|| tag.attrs.get("src")) else {
            self.diag(DiagnosticKind::Document, tag.line, "<include> without a file");
            return;
        };
        if depth >= self.config.max_include_depth {
            self.diag(
                DiagnosticKind::Document,
                tag.line,
                format!("<include file=\"{file}\"> exceeds nesting depth {}", self.config.max_include_depth),
            );
            return;
        }
        let text = match self.loader.read_text(file) {
            Ok(text) => text,
            Err(e) => {
                self.diag(DiagnosticKind::Resource, tag.line, format!("include '{file}': {e}"));
                return;
            },
        };
        log::debug!("including '{file}' at depth {}", depth + 1);

        let base = self.stack.len();
        let outer_floor = std::mem::replace(&mut self.floor, base);
        self.run(Tokenizer::new(&text), depth + 1);
        if self.stack.len() > base {
            let open = self.stack.len() - base;
            self.diag(
                DiagnosticKind::Document,
                tag.line,
                format!("'{file}' leaves {open} tag(s) open"),
            );
            self.stack.truncate(base);
        }
        self.floor = outer_floor;
    }

    fn layout_tag(&mut self, tag: &Tag) {
        let line = tag.line;
        if self.current_layout().is_some() {
            self.diag(DiagnosticKind::Document, line, "<layout> nested in another layout");
            self.skip(tag);
            return;
        }
        let Some(name) = tag.attrs.get("name").map(str::to_string) else {
            self.diag(DiagnosticKind::Document, line, "<layout> without a name");
            self.skip(tag);
            return;
        };
        if self.skin.layout_index(&name).is_some() {
            self.diag(DiagnosticKind::Document, line, format!("duplicate layout '{name}'"));
            self.skip(tag);
            return;
        }

        let mut root = Item::new(ItemKind::Div(Div::new())).with_geometry(ItemGeometry {
            x: PositionExpr::ZERO,
            y: PositionExpr::ZERO,
            w: PositionExpr::FILL,
            h: PositionExpr::FILL,
        });
        root.line = line;
        let mut layout = Layout::new(name.clone(), root);
        layout.line = line;
        layout.always_on_top = tag.attrs.flag("ontop");
        layout.fullscreen = tag.attrs.flag("fullscreen");
        for (field, wkey, hkey) in [
            (&mut layout.default_size, "width", "height"),
            (&mut layout.min_size, "minwidth", "minheight"),
            (&mut layout.max_size, "maxwidth", "maxheight"),
        ] {
            match size_pair(&tag.attrs, wkey, hkey) {
                Ok(size) => *field = size,
                Err(e) => {
                    let d = Diagnostic::new(DiagnosticKind::Document, line, format!("<layout name=\"{name}\">: {e}"));
                    log::warn!("{d}");
                    self.skin.diagnostics.push(d);
                },
            }
        }

        let index = self.skin.layouts.len();
        for key in ["inheritwidth", "inheritheight", "inheritpos"] {
            if let Some(from) = tag.attrs.get(key) {
                self.pending_inherit.push((index, key, from.to_string(), line));
            }
        }
        log::debug!("layout '{name}' at line {line}");
        self.skin.layouts.push(layout);
        if !tag.self_closing {
            self.stack.push(Frame::Layout(index));
        }
    }

    fn color_tag(&mut self, tag: &Tag) {
        if !tag.self_closing {
            self.stack.push(Frame::Plain(tag.name.clone()));
        }
        let Some((layout, owner)) = self.current_parent() else {
            self.diag(DiagnosticKind::Document, tag.line, "<color> outside a layout");
            return;
        };
        let state_name = tag.attrs.get("state").unwrap_or("normal");
        let Some(state) = PaletteState::from_name(state_name) else {
            self.diag(
                DiagnosticKind::Document,
                tag.line,
                format!("unknown color state '{state_name}'"),
            );
            return;
        };
        let Some(color) = tag.attrs.color("value") else {
            self.diag(DiagnosticKind::Document, tag.line, "<color> needs value=\"#rrggbb\"");
            return;
        };
        if let Some(item) = self
            .skin
            .layouts
            .get_mut(layout)
            .and_then(|l| l.tree.get_mut(owner))
        {
            item.palette.set(state, color);
        }
    }

    fn item_tag(&mut self, tag: &Tag) {
        let Some((layout, parent)) = self.current_parent() else {
            self.diag(
                DiagnosticKind::Document,
                tag.line,
                format!("<{}> outside any layout", tag.name),
            );
            self.skip(tag);
            return;
        };
        if let Some(cond) = tag.attrs.get("cond")
            && !self.flags.evaluate(cond)
        {
            self.skip(tag);
            return;
        }
        let item = match self.build_item(tag) {
            Ok(item) => item,
            Err(e) => {
                self.diag(DiagnosticKind::Document, tag.line, format!("<{}>: {e}", tag.name));
                self.skip(tag);
                return;
            },
        };
        let Some(l) = self.skin.layouts.get_mut(layout) else {
            return;
        };
        let id = l.tree.push(Some(parent), item);
        if !tag.self_closing {
            self.stack.push(Frame::Item {
                id,
                tag: tag.name.clone(),
            });
        }
    }

    fn build_item(&mut self, tag: &Tag) -> std::result::Result<Item, AttrError> {
        let attrs = &tag.attrs;
        let line = tag.line;
        let mut missing_art = false;
        let sheet = match attrs.get("src") {
            Some(path) => {
                let sheet = self.skin.sprites.load(
                    path,
                    line,
                    &mut *self.loader,
                    self.config.max_sprite_cells,
                    &mut self.skin.diagnostics,
                );
                missing_art = sheet.is_none();
                sheet
            },
            None => None,
        };
        let repeat = Repeat::new(self.config.repeat_delay_ms, self.config.repeat_interval_ms);
        let kind = match tag.name.as_str() {
            "div" => ItemKind::Div(Div::from_attrs(attrs)?),
            "image" => ItemKind::Image(Image::from_attrs(attrs, sheet)?),
            "box" => ItemKind::Box(TextBox::from_attrs(
                attrs,
                sheet,
                self.config.drag_threshold_px,
                self.config.blink_interval_ms,
            )?),
            "button" => ItemKind::Button(Button::from_attrs(attrs, sheet, repeat)?),
            "scrollbar" | "slider" => ItemKind::Scrollbar(Scrollbar::from_attrs(attrs, sheet, repeat)?),
            "input" => ItemKind::Placeholder(Placeholder::new(ExternalSurface::Input)),
            _ => ItemKind::Placeholder(Placeholder::new(ExternalSurface::Workspace)),
        };

        let mut item = Item::new(kind);
        item.line = line;
        item.name = attrs.get("id").map(str::to_string);
        item.target = attrs.get("target").map(|t| self.targets.resolve(t));
        item.follow = attrs.get("follow").map(|t| self.targets.resolve(t));
        item.tooltip = attrs
            .get("tip")
            .or_else(|| attrs.get("tooltip"))
            .map(str::to_string);
        item.disabled = attrs.flag("disabled");
        item.hidden = attrs.flag("hidden");
        if missing_art {
            item.hidden = true;
            item.disabled = true;
        }

        let natural = item.natural_size();
        let x = self.position(attrs, "x").unwrap_or(PositionExpr::ZERO);
        let y = self.position(attrs, "y").unwrap_or(PositionExpr::ZERO);
        let w = self
            .position(attrs, "w")
            .or(natural.map(|(w, _)| PositionExpr::pixels(w)))
            .unwrap_or(PositionExpr::FILL);
        let h = self
            .position(attrs, "h")
            .or(natural.map(|(_, h)| PositionExpr::pixels(h)))
            .unwrap_or(PositionExpr::FILL);
        item.geometry = ItemGeometry { x, y, w, h };
        Ok(item)
    }

    /// Parse one geometry attribute; a bad expression becomes zero.
    fn position(&mut self, attrs: &Attributes, key: &str) -> Option<PositionExpr> {
        let text = attrs.get(key)?;
        match PositionExpr::parse(text) {
            Ok(expr) => Some(expr),
            Err(e) => {
                self.diag(DiagnosticKind::Geometry, attrs.line, format!("{key}: {e}"));
                Some(PositionExpr::ZERO)
            },
        }
    }

    // -- end tags and text --------------------------------------------------

    fn end(&mut self, name: &str, line: usize) {
        let active = self.active();
        let found = self.stack[self.floor..]
            .iter()
            .rposition(|f| f.name() == name)
            .map(|i| i + self.floor);
        let Some(index) = found else {
            if active {
                self.diag(DiagnosticKind::Document, line, format!("stray </{name}>"));
            }
            return;
        };
        while self.stack.len() > index + 1 {
            if let Some(open) = self.stack.pop()
                && active
            {
                self.diag(
                    DiagnosticKind::Document,
                    line,
                    format!("<{}> closed implicitly by </{name}>", open.name()),
                );
            }
        }
        self.stack.pop();
    }

    fn text(&mut self, text: String, line: usize) {
        if !self.active() {
            return;
        }
        if matches!(self.stack.last(), Some(Frame::Script)) {
            match &mut self.skin.script {
                Some(script) => {
                    script.push('\n');
                    script.push_str(&text);
                },
                None => self.skin.script = Some(text),
            }
        } else {
            log::debug!("ignoring text at line {line}");
        }
    }

    // -- post-pass ----------------------------------------------------------

    fn finish(mut self) -> Result<Skin> {
        while let Some(open) = self.stack.pop() {
            if !matches!(open, Frame::Skin) {
                self.diag(DiagnosticKind::Document, 0, format!("<{}> never closed", open.name()));
            }
        }
        if self.skin.layouts.is_empty() {
            return Err(SkinError::NoLayouts(self.skin.name));
        }

        for (layout, key, from, line) in std::mem::take(&mut self.pending_inherit) {
            let Some(source) = self.skin.layout_index(&from) else {
                self.diag(DiagnosticKind::Document, line, format!("{key}: no layout '{from}'"));
                continue;
            };
            if let Some(l) = self.skin.layouts.get_mut(layout) {
                match key {
                    "inheritwidth" => l.inherit.width = Some(source),
                    "inheritheight" => l.inherit.height = Some(source),
                    _ => l.inherit.position = Some(source),
                }
            }
        }

        self.resolve_jumps();
        for layout in &mut self.skin.layouts {
            inherit_palettes(layout);
        }

        log::info!(
            "loaded skin '{}': {} layout(s), {} sprite sheet(s), {} diagnostic(s)",
            self.skin.name,
            self.skin.layouts.len(),
            self.skin.sprites.len(),
            self.skin.diagnostics.len()
        );
        Ok(self.skin)
    }

    /// Point `layout:X` targets at their layout; unknown names stay put.
    fn resolve_jumps(&mut self) {
        let names: Vec<String> = self.skin.layout_names().map(str::to_string).collect();
        let mut unresolved = Vec::new();
        for layout in &mut self.skin.layouts {
            for (_, item) in layout.tree.iter_mut() {
                if let Some(Target::Layout(jump)) = &mut item.target {
                    jump.layout = names.iter().position(|n| n.eq_ignore_ascii_case(&jump.name));
                    if jump.layout.is_none() {
                        unresolved.push((item.line, jump.name.clone()));
                    }
                }
            }
        }
        for (line, name) in unresolved {
            self.diag(
                DiagnosticKind::Document,
                line,
                format!("jump to unknown layout '{name}' stays on the current layout"),
            );
        }
    }
}

/// Fill each item's unset palette slots from its parent, top-down.
fn inherit_palettes(layout: &mut Layout) {
    for id in layout.tree.tree_order() {
        let Some(parent) = layout
            .tree
            .parent(id)
            .and_then(|p| layout.tree.get(p))
            .map(|p| p.palette)
        else {
            continue;
        };
        if let Some(item) = layout.tree.get_mut(id) {
            item.palette.inherit_from(&parent);
        }
    }
}

/// Both keys or neither.
fn size_pair(attrs: &Attributes, wkey: &str, hkey: &str) -> std::result::Result<Option<Size>, AttrError> {
    match (attrs.try_int(wkey)?, attrs.try_int(hkey)?) {
        (Some(w), Some(h)) => Ok(Some(Size::new(w.max(0), h.max(0)))),
        (None, None) => Ok(None),
        (None, Some(_)) => Err(AttrError::new(wkey, format!("missing; '{hkey}' is set"))),
        (Some(_), None) => Err(AttrError::new(hkey, format!("missing; '{wkey}' is set"))),
    }
}
