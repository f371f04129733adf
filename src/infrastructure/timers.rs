//! Demultiplexing of Zellij's single timer event.
//!
//! `set_timeout` carries no token: every timer arrives as the same
//! `Event::Timer`. [`TimerQueue`] remembers why each timer was set and hands
//! the purposes back in deadline order as timers fire.

use std::time::{Duration, Instant};

/// What a pending timer is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerPurpose {
    /// Clear the notice with this sequence number, if it is still shown.
    DismissNotice(u64),
    /// Feed a locally generated reply into the host bridge.
    DeliverLocalReply(String),
}

/// Pending timers ordered by deadline.
#[derive(Debug)]
pub struct TimerQueue<P = TimerPurpose> {
    pending: Vec<(Instant, P)>,
}

impl<P> Default for TimerQueue<P> {
    fn default() -> Self {
        Self { pending: Vec::new() }
    }
}

impl<P> TimerQueue<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a timer set at `now` to fire `after` later.
    ///
    /// Timers with equal deadlines fire in scheduling order.
    pub fn schedule(&mut self, now: Instant, after: Duration, purpose: P) {
        let deadline = now + after;
        let index = self.pending.partition_point(|(due, _)| *due <= deadline);
        self.pending.insert(index, (deadline, purpose));
    }

    /// Takes the purpose of the timer that just fired: the earliest deadline.
    ///
    /// Returns `None` if nothing is pending.
    pub fn fire(&mut self) -> Option<P> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0).1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
