//! The skin engine: owns a parsed skin and drives its active layout.
//!
//! Exactly one layout is active at a time. Activation tears the previous
//! layout down (timers, capture, hover), carries its window rectangle
//! over to layouts that inherit from it, then sizes, lays out and paints
//! the new one.

use std::collections::HashMap;

use veneer_skin::{Layout, Size, Skin};
use veneer_types::backend::HostSurface;
use veneer_types::config::EngineConfig;
use veneer_types::error::{Result, SkinError};
use veneer_types::geometry::Rect;
use veneer_ui::item::{Item, ItemKind};
use veneer_ui::layout::layout_tree;
use veneer_ui::target::Target;
use veneer_ui::tree::ItemId;
use veneer_ui::value::{Action, Response, Value};

use crate::registry::TargetRegistry;
use crate::scheduler::Scheduler;

/// Window size used when a layout declares no size and has no art.
pub const FALLBACK_SIZE: Size = Size::new(320, 240);

/// An action an item performed, reported back to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    pub target: Target,
    pub item: ItemId,
    pub action: Action,
}

pub struct SkinEngine {
    pub(crate) skin: Skin,
    pub(crate) config: EngineConfig,
    pub(crate) active: Option<usize>,
    /// Window rectangle of the active layout, in screen coordinates.
    pub(crate) window: Rect,
    pub(crate) registry: TargetRegistry,
    pub(crate) scheduler: Scheduler,
    /// Last value pushed per target; replayed on activation.
    pub(crate) values: HashMap<Target, Value>,
    pub(crate) capture: Option<ItemId>,
    pub(crate) hover: Option<ItemId>,
    /// Layout jump requested while dispatching, applied afterwards.
    pub(crate) pending_jump: Option<usize>,
}

impl SkinEngine {
    pub fn new(skin: Skin, config: EngineConfig) -> Self {
        Self {
            skin,
            config,
            active: None,
            window: Rect::ZERO,
            registry: TargetRegistry::new(),
            scheduler: Scheduler::new(),
            values: HashMap::new(),
            capture: None,
            hover: None,
            pending_jump: None,
        }
    }

    pub fn skin(&self) -> &Skin {
        &self.skin
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Index of the active layout.
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_layout(&self) -> Option<&Layout> {
        self.skin.layout(self.active?)
    }

    pub(crate) fn active_layout_mut(&mut self) -> Option<&mut Layout> {
        self.skin.layout_mut(self.active?)
    }

    pub fn window_rect(&self) -> Rect {
        self.window
    }

    /// Window-relative rectangle of the whole client area.
    pub fn client_rect(&self) -> Rect {
        Rect::new(0, 0, self.window.w, self.window.h)
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn captured(&self) -> Option<ItemId> {
        self.capture
    }

    pub fn hovered(&self) -> Option<ItemId> {
        self.hover
    }

    /// Last value pushed to `target`.
    pub fn value(&self, target: &Target) -> Option<&Value> {
        self.values.get(target)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.active_layout()?.tree.get(id)
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.active_layout_mut()?.tree.get_mut(id)
    }

    /// Find an item of the active layout by its `id` attribute.
    pub fn find(&self, name: &str) -> Option<ItemId> {
        self.active_layout()?.tree.find(name)
    }

    /// Apply saved geometry. Returns the layout that was active when it
    /// was saved. A blob that does not match this skin is dropped.
    pub fn restore_geometry(&mut self, text: &str) -> Option<usize> {
        match self.skin.apply_geometry(text) {
            Ok(active) => active,
            Err(e) => {
                log::warn!("ignoring saved geometry: {e}");
                None
            },
        }
    }

    /// Serialize every layout's window rectangle, including the live one.
    pub fn save_geometry(&mut self) -> Result<String> {
        self.snapshot_window();
        self.skin.geometry_blob(self.active.unwrap_or(0)).to_toml()
    }

    /// Activate `preferred` if it names a layout, else the first one.
    pub fn start(&mut self, preferred: Option<usize>, host: &mut dyn HostSurface) -> Result<()> {
        let index = preferred
            .filter(|&i| i < self.skin.layouts.len())
            .unwrap_or(0);
        self.activate(index, host)
    }

    /// Activate the layout named `name` (case-insensitive).
    pub fn activate_layout(&mut self, name: &str, host: &mut dyn HostSurface) -> Result<()> {
        let index = self
            .skin
            .layout_index(name)
            .ok_or_else(|| SkinError::Document(format!("no layout named '{name}'")))?;
        self.activate(index, host)
    }

    pub fn activate(&mut self, index: usize, host: &mut dyn HostSurface) -> Result<()> {
        if self.skin.layout(index).is_none() {
            return Err(SkinError::Document(format!("no layout #{index}")));
        }
        let previous = self.active;

        let stopped = self.scheduler.cancel_all(host);
        if stopped > 0 {
            log::debug!("stopped {stopped} timer(s)");
        }
        self.release_pointer(host);
        if let Some(prev) = previous {
            self.snapshot_window();
            self.propagate_inherit(prev);
            if let Some(layout) = self.skin.layout_mut(prev) {
                for (_, item) in layout.tree.iter_mut() {
                    item.detach(host);
                }
            }
        }

        self.active = Some(index);
        self.pending_jump = None;
        if let Some(layout) = self.skin.layout(index) {
            self.registry.rebuild(&layout.tree);
        }

        self.window = self.initial_window(index, previous.is_some(), host);
        host.set_window_rect(self.window);
        self.layout_pass(host)?;

        if let Some(layout) = self.skin.layout(index) {
            host.set_always_on_top(layout.always_on_top);
            host.set_fullscreen(layout.fullscreen);
            log::info!(
                "layout '{}' active at {}x{}",
                layout.name,
                self.window.w,
                self.window.h
            );
        }
        self.replay_values(host)?;
        self.paint(host, self.client_rect())
    }

    /// The host window was resized.
    pub fn resize(&mut self, w: i32, h: i32, host: &mut dyn HostSurface) -> Result<()> {
        let Some(layout) = self.active_layout() else {
            return Ok(());
        };
        let size = layout.clamp_size(w, h);
        let resized = Rect::new(self.window.x, self.window.y, size.w, size.h);
        host.set_window_rect(resized);
        self.window = resized;
        self.snapshot_window();
        self.layout_pass(host)?;
        self.paint(host, self.client_rect())
    }

    /// Recompute every item rectangle of the active layout.
    pub fn layout_pass(&mut self, host: &mut dyn HostSurface) -> Result<()> {
        let (w, h) = (self.window.w, self.window.h);
        let Some(layout) = self.active_layout_mut() else {
            return Ok(());
        };
        let issues = layout_tree(&mut layout.tree, w, h, host)?;
        if !issues.is_empty() {
            log::debug!("{} item(s) with unresolved geometry", issues.len());
        }
        Ok(())
    }

    /// Store `value` for `target` and push it to every bound item.
    /// Items following `target` are shown when the value is truthy.
    pub fn set_target_value(
        &mut self,
        target: &Target,
        value: Value,
        host: &mut dyn HostSurface,
    ) -> Result<()> {
        self.push_value(target, &value, None, true, host)?;
        self.values.insert(target.clone(), value);
        Ok(())
    }

    /// Tooltip of the topmost item under the point.
    pub fn tool_tip(&self, x: i32, y: i32) -> Option<String> {
        let tree = &self.active_layout()?.tree;
        veneer_ui::layout::items_at(tree, x, y)
            .into_iter()
            .filter_map(|id| tree.get(id))
            .find_map(|item| item.tooltip.clone())
    }

    /// Target of the topmost input item under the point.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<Target> {
        let id = self.input_item_at(x, y)?;
        self.item(id)?.target.clone()
    }

    pub(crate) fn input_item_at(&self, x: i32, y: i32) -> Option<ItemId> {
        let tree = &self.active_layout()?.tree;
        veneer_ui::layout::items_at(tree, x, y)
            .into_iter()
            .find(|&id| tree.get(id).is_some_and(Item::accepts_input))
    }

    /// Route the result of an event delivered to `id`.
    pub(crate) fn apply_response(
        &mut self,
        id: ItemId,
        response: Response,
        host: &mut dyn HostSurface,
        fired: &mut Vec<Fired>,
    ) -> Result<()> {
        self.scheduler.apply(id, response.timer, host);
        if response.redraw {
            self.redraw_item(id, host)?;
        }
        if response.actions.is_empty() {
            return Ok(());
        }
        let Some(item) = self.item(id) else {
            return Ok(());
        };
        let target = item.target.clone();
        let mirrors = matches!(item.kind, ItemKind::Scrollbar(_));
        let line = item.line;
        for action in response.actions {
            match &target {
                Some(Target::Layout(jump)) => match jump.layout {
                    Some(index) => self.pending_jump = Some(index),
                    None => log::warn!("no layout named '{}'", jump.name),
                },
                Some(t) if !t.is_inert() => {
                    if mirrors && let Action::Fire(value) = &action {
                        self.push_value(t, value, Some(id), true, host)?;
                        self.values.insert(t.clone(), value.clone());
                    }
                    fired.push(Fired {
                        target: t.clone(),
                        item: id,
                        action,
                    });
                },
                Some(t) => log::debug!("item at line {line} fired unrouted target '{t}'"),
                None => log::trace!("item at line {line} fired without a target"),
            }
        }
        Ok(())
    }

    /// Push `value` to the items bound to `target` (except `source`) and
    /// update the visibility of its followers.
    fn push_value(
        &mut self,
        target: &Target,
        value: &Value,
        source: Option<ItemId>,
        redraw: bool,
        host: &mut dyn HostSurface,
    ) -> Result<()> {
        let bound = self.registry.items(target).to_vec();
        for id in bound.into_iter().filter(|&id| Some(id) != source) {
            let Some(item) = self.item_mut(id) else {
                continue;
            };
            let response = item.set_value(value, host)?;
            self.scheduler.apply(id, response.timer, host);
            if redraw && response.redraw {
                self.redraw_item(id, host)?;
            }
        }

        let visible = value.is_truthy();
        let followers = self.registry.followers(target).to_vec();
        for id in followers {
            let Some(item) = self.item_mut(id) else {
                continue;
            };
            if item.hidden != visible {
                continue;
            }
            item.hidden = !visible;
            if !visible {
                self.drop_pointer_within(id, host);
            }
            if redraw {
                self.redraw_item(id, host)?;
            }
        }
        Ok(())
    }

    fn replay_values(&mut self, host: &mut dyn HostSurface) -> Result<()> {
        let values: Vec<(Target, Value)> = self
            .values
            .iter()
            .map(|(t, v)| (t.clone(), v.clone()))
            .collect();
        for (target, value) in &values {
            self.push_value(target, value, None, false, host)?;
        }
        Ok(())
    }

    /// Cancel the capture and hover of the active layout.
    fn release_pointer(&mut self, host: &mut dyn HostSurface) {
        if let Some(id) = self.capture.take()
            && let Some(item) = self.item_mut(id)
        {
            let response = item.cancel();
            log::debug!("released capture of {} at line {}", item.tag(), item.line);
            self.scheduler.apply(id, response.timer, host);
        }
        if let Some(id) = self.hover.take()
            && let Some(item) = self.item_mut(id)
        {
            let response = item.pointer_leave();
            self.scheduler.apply(id, response.timer, host);
        }
    }

    /// Forget capture and hover held by `id` or one of its descendants.
    ///
    /// The cancelled item's timers stop here; its resting look is painted
    /// by whoever redraws `id`.
    fn drop_pointer_within(&mut self, id: ItemId, host: &mut dyn HostSurface) {
        let within = |engine: &Self, other: ItemId| {
            engine
                .active_layout()
                .is_some_and(|l| l.tree.ancestors(other).any(|a| a == id))
        };
        if let Some(c) = self.capture
            && within(self, c)
        {
            self.capture = None;
            if let Some(item) = self.item_mut(c) {
                let response = item.cancel();
                log::debug!("{} at line {} hidden while captured", item.tag(), item.line);
                self.scheduler.apply(c, response.timer, host);
            }
        }
        if let Some(h) = self.hover
            && within(self, h)
        {
            self.hover = None;
            if let Some(item) = self.item_mut(h) {
                let response = item.pointer_leave();
                self.scheduler.apply(h, response.timer, host);
            }
        }
    }

    /// Record the live window rectangle on the active layout.
    pub(crate) fn snapshot_window(&mut self) {
        let window = self.window;
        if let Some(layout) = self.active_layout_mut()
            && !layout.fullscreen
            && !window.is_empty()
        {
            layout.window_rect = Some(window);
        }
    }

    /// Copy the rectangle of layout `from` into layouts inheriting from it.
    fn propagate_inherit(&mut self, from: usize) {
        let source = self.window;
        if source.is_empty() {
            return;
        }
        for (index, layout) in self.skin.layouts.iter_mut().enumerate() {
            let inherit = layout.inherit;
            if index == from
                || (inherit.width != Some(from)
                    && inherit.height != Some(from)
                    && inherit.position != Some(from))
            {
                continue;
            }
            let mut rect = layout.window_rect.unwrap_or_else(|| {
                let size = preferred_size(layout);
                Rect::new(source.x, source.y, size.w, size.h)
            });
            if inherit.width == Some(from) {
                rect.w = source.w;
            }
            if inherit.height == Some(from) {
                rect.h = source.h;
            }
            if inherit.position == Some(from) {
                rect.x = source.x;
                rect.y = source.y;
            }
            log::debug!("layout '{}' inherits {rect:?}", layout.name);
            layout.window_rect = Some(rect);
        }
    }

    /// Persisted rectangle, else declared size, else natural size;
    /// clamped to the layout bounds and the work area.
    fn initial_window(&self, index: usize, had_window: bool, host: &dyn HostSurface) -> Rect {
        let work = host.screen_work_area();
        let Some(layout) = self.skin.layout(index) else {
            return work;
        };
        if layout.fullscreen {
            return work;
        }
        let rect = layout.window_rect.unwrap_or_else(|| {
            let size = preferred_size(layout);
            let (x, y) = if had_window {
                (self.window.x, self.window.y)
            } else {
                (work.x, work.y)
            };
            Rect::new(x, y, size.w, size.h)
        });
        let size = layout.clamp_size(rect.w, rect.h);
        Rect::new(rect.x, rect.y, size.w, size.h).clamp_within(&work)
    }
}

fn preferred_size(layout: &Layout) -> Size {
    layout
        .default_size
        .or_else(|| layout.natural_size())
        .or(layout.min_size)
        .unwrap_or(FALLBACK_SIZE)
}
