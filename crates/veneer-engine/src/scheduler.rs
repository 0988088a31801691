//! Timer tasks owned by the engine.
//!
//! Each item has at most one running timer. Every start allocates a fresh
//! [`TimerId`], so a tick the host had already queued for a cancelled or
//! replaced timer maps to no item and is dropped.

use std::collections::HashMap;

use veneer_types::backend::{HostSurface, TimerId};
use veneer_ui::tree::ItemId;
use veneer_ui::value::TimerRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Task {
    timer: TimerId,
    interval_ms: u32,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next: u64,
    tasks: HashMap<ItemId, Task>,
    owners: HashMap<TimerId, ItemId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the timer of `item`.
    pub fn start(&mut self, item: ItemId, interval_ms: u32, host: &mut dyn HostSurface) -> TimerId {
        self.cancel(item, host);
        self.next += 1;
        let timer = TimerId(self.next);
        self.tasks.insert(item, Task { timer, interval_ms });
        self.owners.insert(timer, item);
        host.start_timer(timer, interval_ms);
        log::trace!("timer {timer:?} every {interval_ms} ms for {item:?}");
        timer
    }

    /// Stop the timer of `item`, if any.
    pub fn cancel(&mut self, item: ItemId, host: &mut dyn HostSurface) {
        if let Some(task) = self.tasks.remove(&item) {
            self.owners.remove(&task.timer);
            host.stop_timer(task.timer);
        }
    }

    /// Stop every timer. Returns how many were running.
    pub fn cancel_all(&mut self, host: &mut dyn HostSurface) -> usize {
        let count = self.tasks.len();
        for (_, task) in self.tasks.drain() {
            host.stop_timer(task.timer);
        }
        self.owners.clear();
        if count > 0 {
            log::debug!("cancelled {count} timer(s)");
        }
        count
    }

    /// Apply an item's timer request.
    pub fn apply(&mut self, item: ItemId, request: TimerRequest, host: &mut dyn HostSurface) {
        match request {
            TimerRequest::Keep => {},
            TimerRequest::Start(ms) => {
                self.start(item, ms, host);
            },
            TimerRequest::Stop => self.cancel(item, host),
        }
    }

    /// Item owning a live timer.
    pub fn owner(&self, timer: TimerId) -> Option<ItemId> {
        self.owners.get(&timer).copied()
    }

    pub fn interval(&self, item: ItemId) -> Option<u32> {
        self.tasks.get(&item).map(|t| t.interval_ms)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::software::SoftwareSurface;

    #[test]
    fn restart_replaces_timer() {
        let mut host = SoftwareSurface::new(10, 10);
        let mut s = Scheduler::new();
        let a = s.start(ItemId(3), 500, &mut host);
        let b = s.start(ItemId(3), 50, &mut host);
        assert_ne!(a, b);
        assert_eq!(s.owner(a), None);
        assert_eq!(s.owner(b), Some(ItemId(3)));
        assert_eq!(s.interval(ItemId(3)), Some(50));
        assert_eq!(host.running_timers(), vec![(b, 50)]);
    }

    #[test]
    fn cancel_all_stops_everything() {
        let mut host = SoftwareSurface::new(10, 10);
        let mut s = Scheduler::new();
        let t = s.start(ItemId(1), 500, &mut host);
        s.apply(ItemId(2), TimerRequest::Start(500), &mut host);
        s.apply(ItemId(2), TimerRequest::Keep, &mut host);
        assert_eq!(s.len(), 2);
        assert_eq!(s.cancel_all(&mut host), 2);
        assert!(s.is_empty());
        assert_eq!(s.owner(t), None);
        assert!(host.running_timers().is_empty());
    }

    #[test]
    fn stop_request_cancels() {
        let mut host = SoftwareSurface::new(10, 10);
        let mut s = Scheduler::new();
        s.apply(ItemId(1), TimerRequest::Start(20), &mut host);
        s.apply(ItemId(1), TimerRequest::Stop, &mut host);
        assert!(s.is_empty());
        assert!(host.running_timers().is_empty());
    }
}
