//! Task lifecycle callbacks for the owning scheduler.

use rv_core::{TaskId, Tick};

/// Callbacks invoked by [`Task`][crate::Task] at lifecycle points the
/// scheduler needs for its own bookkeeping.
///
/// All methods have default no-op implementations.
pub trait TaskObserver {
    /// Called when a task that had resolved to a tick after now is released.
    ///
    /// `earliest_time` is the last tick the task resolved to.
    fn on_task_destroyed(&mut self, _task: TaskId, _earliest_time: Tick) {}
}

/// A [`TaskObserver`] that does nothing.
pub struct NoopObserver;

impl TaskObserver for NoopObserver {}
