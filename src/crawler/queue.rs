//! Task queue with outstanding-work tracking
//!
//! The queue is an unbounded FIFO shared by the dispatcher and every worker.
//! Alongside the visible tasks it counts outstanding work: a task counts from
//! the moment it is pushed until the worker executing it drops its
//! [`CompletionGuard`]. A worker that has popped a task may still push
//! follow-up tasks, so an empty queue alone does not mean the crawl is over;
//! the counter reaching zero does.

use crate::crawler::task::Task;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

/// Queue of pending crawl tasks
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
    outstanding: AtomicUsize,
    changed: Notify,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn tasks(&self) -> MutexGuard<'_, VecDeque<Task>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Appends a task and counts it as outstanding work
    pub fn push(&self, task: Task) {
        // Count before the task becomes visible so the counter never lags
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.tasks().push_back(task);
        self.changed.notify_one();
    }

    /// Removes the oldest task, if any
    pub fn pop(&self) -> Option<Task> {
        self.tasks().pop_front()
    }

    /// Number of tasks waiting in the queue
    pub fn len(&self) -> usize {
        self.tasks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks().is_empty()
    }

    /// Number of tasks pushed and not yet completed, queued or in flight
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Returns true once every pushed task has completed
    pub fn is_drained(&self) -> bool {
        self.outstanding() == 0
    }

    /// Marks one task as completed
    ///
    /// Prefer [`TaskQueue::completion_guard`], which cannot forget to call this.
    pub fn complete(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "completed more tasks than were pushed");
        self.changed.notify_one();
    }

    /// Returns a guard that completes one task when dropped
    pub fn completion_guard(self: &Arc<Self>) -> CompletionGuard {
        CompletionGuard {
            queue: Arc::clone(self),
        }
    }

    /// Waits until a task is pushed or completed
    ///
    /// A notification sent while nobody was waiting is kept, so checking the
    /// queue and then calling this cannot miss a wake-up.
    pub async fn changed(&self) {
        self.changed.notified().await;
    }
}

/// Completes one task of its queue when dropped
///
/// Workers hold the guard for the whole execution of a task, so the task is
/// counted as done whether it succeeded, failed or panicked.
#[derive(Debug)]
pub struct CompletionGuard {
    queue: Arc<TaskQueue>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.queue.complete();
    }
}
