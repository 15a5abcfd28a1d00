//! Cancelable one-shot timers and guarded transition waits.
//!
//! Time is a virtual millisecond counter owned by the caller. Nothing here
//! reads a wall clock; the owner passes `now` in and polls for due work.

/// A single pending timer carrying a payload.
///
/// Scheduling replaces any pending timer, so at most one is ever
/// outstanding per `OneShot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneShot<T> {
    pending: Option<(u64, T)>,
}

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> OneShot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `delay_ms` after `now`, dropping any prior one.
    pub fn schedule(&mut self, now: u64, delay_ms: u64, value: T) {
        self.pending = Some((now.saturating_add(delay_ms), value));
    }

    /// Disarm the timer, returning its payload if it was pending.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, v)| v)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending timer fires.
    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Payload of the pending timer.
    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, v)| v)
    }

    /// Fire the timer if its deadline has passed.
    pub fn take_due(&mut self, now: u64) -> Option<T> {
        if self.deadline().is_some_and(|at| at <= now) {
            self.cancel()
        } else {
            None
        }
    }
}

/// How a guarded transition finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The end-of-transition signal arrived.
    Signaled,
    /// The guard timeout expired first.
    TimedOut,
}

/// Waits for an animation to end, with a timeout in case the end signal
/// never arrives.
///
/// Completes exactly once: whichever of [`signal`](Self::signal) and the
/// timeout comes first wins, and later signals are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardedTransition {
    deadline: Option<u64>,
}

impl GuardedTransition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting. Restarting an unfinished wait moves its deadline.
    pub fn start(&mut self, now: u64, timeout_ms: u64) {
        self.deadline = Some(now.saturating_add(timeout_ms));
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// The end-of-transition signal. Returns `Some` only if this call
    /// completed the wait.
    pub fn signal(&mut self) -> Option<Completion> {
        self.deadline.take().map(|_| Completion::Signaled)
    }

    /// Complete by timeout if the deadline has passed.
    pub fn poll(&mut self, now: u64) -> Option<Completion> {
        if self.deadline.is_some_and(|at| at <= now) {
            self.deadline = None;
            Some(Completion::TimedOut)
        } else {
            None
        }
    }

    /// Abandon the wait without completing it.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Earliest of a set of optional deadlines.
pub fn earliest(deadlines: impl IntoIterator<Item = Option<u64>>) -> Option<u64> {
    deadlines.into_iter().flatten().min()
}
