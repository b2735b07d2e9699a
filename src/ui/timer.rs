//! Explicit, cancellable timers for the TUI. The event loop asks the
//! scheduler for due events on every tick instead of relying on ambient
//! callbacks, so cancelling a handle guarantees its event never fires.

use std::time::{Duration, Instant};

/// Timed UI events driven by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UiTimer {
    DismissNotification,
    ResetConfirmExpired,
    ScoreFlashExpired,
}

/// Identifies one scheduled event so it can be cancelled later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TimerHandle(u64);

struct Scheduled<E> {
    handle: TimerHandle,
    due: Instant,
    event: E,
}

pub(crate) struct Scheduler<E> {
    next_handle: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            next_handle: 0,
            pending: Vec::new(),
        }
    }
}

impl<E> Scheduler<E> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to fire once `delay` has elapsed after `now`.
    pub(crate) fn schedule(&mut self, now: Instant, delay: Duration, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(Scheduled {
            handle,
            due: now + delay,
            event,
        });
        handle
    }

    /// Drop a pending event. Returns `false` if it already fired or was
    /// cancelled before.
    pub(crate) fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.handle != handle);
        self.pending.len() != before
    }

    /// Remove and return every event due at `now`, earliest first.
    pub(crate) fn fire_due(&mut self, now: Instant) -> Vec<E> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|entry| entry.due <= now);
        self.pending = pending;
        due.sort_by_key(|entry| entry.due);
        due.into_iter().map(|entry| entry.event).collect()
    }
}
