//! Timer APIs
//!
//! Bookkeeping behind setTimeout / setInterval. The scheduler never invokes
//! callbacks itself: [`crate::event_loop`] drives it, lending each callback
//! out for the duration of its call so the callback can take `&mut` access to
//! the host that owns the scheduler.
//!
//! Timer lifecycle:
//!
//! ```text
//! schedule ──> Pending ──(fire time reached, pass begins)──> Due
//!                 ^                                           │
//!                 └──────── repeating: fire_at += delay ──────┤
//!                                                             └─ one-shot ─> Completed
//! cancel: Pending | Due ──> Cancelled
//! ```

use std::collections::BTreeMap;
use std::fmt;

use fos_dom::DomError;

use crate::variant::TimerPolicy;

/// Timer handle, unique per scheduler and increasing in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u32);

impl TimerId {
    /// Numeric value as seen by script
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn from_value(value: u32) -> Self {
        TimerId(value)
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Pending,
    Due,
    Cancelled,
    Completed,
}

impl TimerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TimerState::Cancelled | TimerState::Completed)
    }
}

/// Error raised by a script callback
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("uncaught exception: {0}")]
    Thrown(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}

impl CallbackError {
    pub fn thrown(message: impl Into<String>) -> Self {
        CallbackError::Thrown(message.into())
    }
}

/// Script callback invoked with its host
pub type TimerCallback<H> = Box<dyn FnMut(&mut H) -> Result<(), CallbackError>>;

/// Timer entry
pub struct TimerEntry<H> {
    pub id: TimerId,
    pub requested_delay: u64,
    pub repeating: bool,
    pub fire_at: u64,
    pub state: TimerState,
    callback: Option<TimerCallback<H>>,
}

impl<H> fmt::Debug for TimerEntry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEntry")
            .field("id", &self.id)
            .field("requested_delay", &self.requested_delay)
            .field("repeating", &self.repeating)
            .field("fire_at", &self.fire_at)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Timer scheduler with a virtual millisecond clock
pub struct TaskScheduler<H> {
    entries: BTreeMap<TimerId, TimerEntry<H>>,
    next_id: u32,
    now: u64,
    policy: TimerPolicy,
    running: Option<TimerId>,
    closed: bool,
}

impl<H> fmt::Debug for TaskScheduler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("entries", &self.entries.values().collect::<Vec<_>>())
            .field("now", &self.now)
            .field("policy", &self.policy)
            .field("closed", &self.closed)
            .finish()
    }
}

impl<H> Default for TaskScheduler<H> {
    fn default() -> Self {
        Self::new(TimerPolicy::default())
    }
}

impl<H> TaskScheduler<H> {
    pub fn new(policy: TimerPolicy) -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
            now: 0,
            policy,
            running: None,
            closed: false,
        }
    }

    pub fn policy(&self) -> TimerPolicy {
        self.policy
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Move the clock forward; the clock never goes back
    pub(crate) fn set_now(&mut self, now: u64) {
        self.now = self.now.max(now);
    }

    /// Timer whose callback is currently executing
    pub fn current_timer(&self) -> Option<TimerId> {
        self.running
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Add a timeout
    pub fn schedule_timeout(&mut self, callback: TimerCallback<H>, delay_ms: u64) -> TimerId {
        self.schedule(callback, delay_ms, false)
    }

    /// Add an interval
    pub fn schedule_interval(&mut self, callback: TimerCallback<H>, delay_ms: u64) -> TimerId {
        self.schedule(callback, delay_ms, true)
    }

    fn schedule(&mut self, callback: TimerCallback<H>, delay_ms: u64, repeating: bool) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        if self.closed {
            tracing::warn!(%id, "timer scheduled on a closed scheduler; it will never fire");
            return id;
        }

        let fire_at = self.now.saturating_add(self.policy.effective_delay(delay_ms));
        self.entries.insert(
            id,
            TimerEntry {
                id,
                requested_delay: delay_ms,
                repeating,
                fire_at,
                state: TimerState::Pending,
                callback: Some(callback),
            },
        );
        tracing::trace!(%id, delay_ms, fire_at, repeating, "timer scheduled");
        id
    }

    /// Cancel a timer.
    ///
    /// Returns whether a live timer was cancelled. Unknown, completed and
    /// already cancelled ids are ignored.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) if !entry.state.is_terminal() => {
                entry.state = TimerState::Cancelled;
                entry.callback = None;
                tracing::trace!(%id, "timer cancelled");
                true
            }
            _ => false,
        }
    }

    /// Cancel every live timer
    pub fn cancel_all(&mut self) -> usize {
        let ids: Vec<TimerId> = self.entries.keys().copied().collect();
        ids.into_iter().filter(|&id| self.cancel(id)).count()
    }

    /// Cancel everything and refuse further timers
    pub fn close(&mut self) {
        let cancelled = self.cancel_all();
        self.closed = true;
        self.entries.clear();
        tracing::debug!(cancelled, "scheduler closed");
    }

    /// State of a timer; `None` once its entry has been reclaimed
    pub fn state(&self, id: TimerId) -> Option<TimerState> {
        self.entries.get(&id).map(|e| e.state)
    }

    pub fn entry(&self, id: TimerId) -> Option<&TimerEntry<H>> {
        self.entries.get(&id)
    }

    /// Number of timers that may still fire
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| !e.state.is_terminal())
            .count()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }

    /// Earliest fire time among pending timers
    pub fn next_fire_time(&self) -> Option<u64> {
        self.entries
            .values()
            .filter(|e| e.state == TimerState::Pending)
            .map(|e| e.fire_at)
            .min()
    }

    /// Start a drain pass: mark every pending timer whose fire time has been
    /// reached as Due and return them in firing order.
    ///
    /// Ties on fire time keep creation order. Timers created after this call
    /// are not part of the pass.
    pub(crate) fn begin_pass(&mut self) -> Vec<TimerId> {
        let now = self.now;
        let mut due: Vec<(u64, TimerId)> = self
            .entries
            .values_mut()
            .filter(|e| e.state == TimerState::Pending && e.fire_at <= now)
            .map(|e| {
                e.state = TimerState::Due;
                (e.fire_at, e.id)
            })
            .collect();
        due.sort_unstable();
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Lend out the callback of a Due timer; `None` if it was cancelled
    /// since the pass began
    pub(crate) fn take_due(&mut self, id: TimerId) -> Option<TimerCallback<H>> {
        let entry = self.entries.get_mut(&id)?;
        if entry.state != TimerState::Due {
            return None;
        }
        let callback = entry.callback.take()?;
        self.running = Some(id);
        Some(callback)
    }

    /// Return a lent callback after it ran
    pub(crate) fn finish(&mut self, id: TimerId, callback: TimerCallback<H>) {
        self.running = None;
        let policy = self.policy;
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };
        if entry.state != TimerState::Due {
            // Cancelled from inside its own callback
            return;
        }
        if entry.repeating {
            let step = policy.effective_delay(entry.requested_delay);
            entry.fire_at = entry.fire_at.saturating_add(step);
            entry.state = TimerState::Pending;
            entry.callback = Some(callback);
        } else {
            entry.state = TimerState::Completed;
        }
    }

    /// Reclaim terminal entries at the end of a pass
    pub(crate) fn end_pass(&mut self) {
        self.entries.retain(|_, e| !e.state.is_terminal());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> TimerCallback<()> {
        Box::new(|_| Ok(()))
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut tm = TaskScheduler::<()>::default();
        let a = tm.schedule_timeout(noop(), 100);
        let b = tm.schedule_interval(noop(), 50);
        assert!(b > a);
        assert_eq!(a.value(), 1);
        assert_eq!(tm.pending_count(), 2);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut tm = TaskScheduler::<()>::default();
        let id = tm.schedule_timeout(noop(), 100);

        assert!(tm.cancel(id));
        assert!(!tm.cancel(id));
        assert!(!tm.cancel(TimerId::from_value(999)));
        assert_eq!(tm.state(id), Some(TimerState::Cancelled));
        assert!(!tm.has_pending());

        tm.end_pass();
        assert_eq!(tm.state(id), None);
    }

    #[test]
    fn test_min_delay_floor() {
        let mut tm = TaskScheduler::<()>::new(TimerPolicy::new(4));
        let id = tm.schedule_interval(noop(), 0);
        assert_eq!(tm.entry(id).map(|e| e.fire_at), Some(4));
        assert_eq!(tm.next_fire_time(), Some(4));
    }

    #[test]
    fn test_begin_pass_orders_by_time_then_creation() {
        let mut tm = TaskScheduler::<()>::new(TimerPolicy::new(0));
        let late = tm.schedule_timeout(noop(), 10);
        let first = tm.schedule_timeout(noop(), 5);
        let second = tm.schedule_timeout(noop(), 5);
        let future = tm.schedule_timeout(noop(), 50);

        tm.set_now(10);
        assert_eq!(tm.begin_pass(), vec![first, second, late]);
        assert_eq!(tm.state(future), Some(TimerState::Pending));
        assert_eq!(tm.state(first), Some(TimerState::Due));
    }

    #[test]
    fn test_finish_reschedules_interval() {
        let mut tm = TaskScheduler::<()>::new(TimerPolicy::new(0));
        let id = tm.schedule_interval(noop(), 10);
        tm.set_now(10);
        assert_eq!(tm.begin_pass(), vec![id]);

        let cb = tm.take_due(id).unwrap();
        assert_eq!(tm.current_timer(), Some(id));
        tm.finish(id, cb);
        assert_eq!(tm.current_timer(), None);
        assert_eq!(tm.state(id), Some(TimerState::Pending));
        assert_eq!(tm.next_fire_time(), Some(20));
    }

    #[test]
    fn test_huge_delay_saturates() {
        let mut tm = TaskScheduler::<()>::new(TimerPolicy::new(0));
        tm.set_now(1);
        let id = tm.schedule_timeout(noop(), u64::MAX);
        assert_eq!(tm.state(id), Some(TimerState::Pending));
        assert_eq!(tm.next_fire_time(), Some(u64::MAX));
    }

    #[test]
    fn test_interval_reschedule_saturates() {
        let mut tm = TaskScheduler::<()>::new(TimerPolicy::new(0));
        let delay = u64::MAX / 2 + 1;
        let id = tm.schedule_interval(noop(), delay);
        tm.set_now(delay);
        assert_eq!(tm.begin_pass(), vec![id]);
        let cb = tm.take_due(id).unwrap();
        tm.finish(id, cb);
        tm.end_pass();
        assert_eq!(tm.state(id), Some(TimerState::Pending));
        assert_eq!(tm.next_fire_time(), Some(u64::MAX));
    }

    #[test]
    fn test_take_due_skips_cancelled() {
        let mut tm = TaskScheduler::<()>::new(TimerPolicy::new(0));
        let id = tm.schedule_timeout(noop(), 0);
        tm.begin_pass();
        tm.cancel(id);
        assert!(tm.take_due(id).is_none());
    }

    #[test]
    fn test_closed_scheduler_rejects_timers() {
        let mut tm = TaskScheduler::<()>::default();
        tm.schedule_interval(noop(), 10);
        tm.close();
        assert!(tm.is_closed());
        let id = tm.schedule_timeout(noop(), 0);
        assert_eq!(tm.state(id), None);
        assert_eq!(tm.next_fire_time(), None);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut tm = TaskScheduler::<()>::default();
        tm.set_now(20);
        tm.set_now(5);
        assert_eq!(tm.now(), 20);
    }
}
