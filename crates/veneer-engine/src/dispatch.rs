//! Host event dispatch.
//!
//! The item pressed on owns the pointer until release. While captured,
//! motion and release go only to it; losing capture (or Escape) returns
//! it to rest without firing. Keys go to the captured item, else to the
//! item under the pointer.

use veneer_types::backend::{HostSurface, TimerId};
use veneer_types::error::Result;
use veneer_types::input::{HostEvent, Key, Modifiers};
use veneer_ui::tree::ItemId;

use crate::engine::{Fired, SkinEngine};

impl SkinEngine {
    /// Deliver one host event. Returns the actions items performed.
    ///
    /// A layout jump triggered by an item is applied after the event has
    /// been fully dispatched.
    pub fn handle_event(
        &mut self,
        event: HostEvent,
        host: &mut dyn HostSurface,
    ) -> Result<Vec<Fired>> {
        let mut fired = Vec::new();
        if self.active.is_none() {
            return Ok(fired);
        }
        match event {
            HostEvent::PointerDown { x, y, modifiers } => {
                self.pointer_down(x, y, modifiers, host, &mut fired)?
            },
            HostEvent::PointerMove { x, y, modifiers } => {
                self.pointer_move(x, y, modifiers, host, &mut fired)?
            },
            HostEvent::PointerUp { x, y, modifiers } => {
                self.pointer_up(x, y, modifiers, host, &mut fired)?
            },
            HostEvent::PointerLeave => self.pointer_leave(host, &mut fired)?,
            HostEvent::CaptureLost => self.lose_capture(host, &mut fired)?,
            HostEvent::Key { key, modifiers } => self.key(key, modifiers, host, &mut fired)?,
            HostEvent::Timer(timer) => self.timer(timer, host, &mut fired)?,
            HostEvent::Paint(region) => self.paint(host, region)?,
            HostEvent::Resize { w, h } => self.resize(w, h, host)?,
        }
        if let Some(index) = self.pending_jump.take() {
            log::debug!("jumping to layout #{index}");
            self.activate(index, host)?;
        }
        Ok(fired)
    }

    fn pointer_down(
        &mut self,
        x: i32,
        y: i32,
        mods: Modifiers,
        host: &mut dyn HostSurface,
        fired: &mut Vec<Fired>,
    ) -> Result<()> {
        if self.capture.is_some() {
            // a press without a release in between: the host lost track
            self.lose_capture(host, fired)?;
        }
        let hit = self.input_item_at(x, y);
        self.set_hover(hit, host, fired)?;
        let Some(id) = hit else {
            return Ok(());
        };
        self.capture = Some(id);
        let response = match self.item_mut(id) {
            Some(item) => item.pointer_down(x, y, mods),
            None => return Ok(()),
        };
        self.apply_response(id, response, host, fired)
    }

    fn pointer_move(
        &mut self,
        x: i32,
        y: i32,
        mods: Modifiers,
        host: &mut dyn HostSurface,
        fired: &mut Vec<Fired>,
    ) -> Result<()> {
        let target = match self.capture {
            Some(id) => Some(id),
            None => {
                let hit = self.input_item_at(x, y);
                self.set_hover(hit, host, fired)?;
                hit
            },
        };
        let Some(id) = target else {
            return Ok(());
        };
        let response = match self.item_mut(id) {
            Some(item) => item.pointer_motion(x, y, mods),
            None => return Ok(()),
        };
        self.apply_response(id, response, host, fired)
    }

    fn pointer_up(
        &mut self,
        x: i32,
        y: i32,
        mods: Modifiers,
        host: &mut dyn HostSurface,
        fired: &mut Vec<Fired>,
    ) -> Result<()> {
        let Some(id) = self.capture.take() else {
            return Ok(());
        };
        let response = match self.item_mut(id) {
            Some(item) => item.pointer_up(x, y, mods),
            None => return Ok(()),
        };
        self.apply_response(id, response, host, fired)?;
        if self.active.is_some() && self.pending_jump.is_none() {
            self.pointer_move(x, y, mods, host, fired)?;
        }
        Ok(())
    }

    fn pointer_leave(&mut self, host: &mut dyn HostSurface, fired: &mut Vec<Fired>) -> Result<()> {
        if self.capture.is_some() {
            return Ok(());
        }
        self.set_hover(None, host, fired)
    }

    /// Return the captured item to rest. Nothing it would have fired is
    /// reported.
    fn lose_capture(&mut self, host: &mut dyn HostSurface, fired: &mut Vec<Fired>) -> Result<()> {
        let Some(id) = self.capture.take() else {
            return Ok(());
        };
        let mut response = match self.item_mut(id) {
            Some(item) => {
                log::debug!("{} at line {} lost capture", item.tag(), item.line);
                item.cancel()
            },
            None => return Ok(()),
        };
        response.actions.clear();
        if self.hover == Some(id) {
            self.hover = None;
        }
        self.apply_response(id, response, host, fired)
    }

    fn key(
        &mut self,
        key: Key,
        mods: Modifiers,
        host: &mut dyn HostSurface,
        fired: &mut Vec<Fired>,
    ) -> Result<()> {
        if key == Key::Escape && self.capture.is_some() {
            return self.lose_capture(host, fired);
        }
        let Some(id) = self.capture.or(self.hover) else {
            return Ok(());
        };
        let response = match self.item_mut(id) {
            Some(item) => item.key(key, mods),
            None => return Ok(()),
        };
        self.apply_response(id, response, host, fired)
    }

    fn timer(
        &mut self,
        timer: TimerId,
        host: &mut dyn HostSurface,
        fired: &mut Vec<Fired>,
    ) -> Result<()> {
        let Some(id) = self.scheduler.owner(timer) else {
            log::trace!("dropping stale tick of {timer:?}");
            return Ok(());
        };
        let response = match self.item_mut(id) {
            Some(item) => item.timer_tick(),
            None => return Ok(()),
        };
        self.apply_response(id, response, host, fired)
    }

    /// Move the hover to `hit`, sending a leave to the previous item.
    fn set_hover(
        &mut self,
        hit: Option<ItemId>,
        host: &mut dyn HostSurface,
        fired: &mut Vec<Fired>,
    ) -> Result<()> {
        if hit == self.hover {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.hover, hit);
        let Some(old) = previous else {
            return Ok(());
        };
        let response = match self.item_mut(old) {
            Some(item) => item.pointer_leave(),
            None => return Ok(()),
        };
        self.apply_response(old, response, host, fired)
    }
}
