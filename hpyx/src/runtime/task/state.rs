//! Lifecycle states of a pool task.
//!
//! Transitions:
//!
//! ```text
//! QUEUED -> RUNNING -> IDLE -> QUEUED ...
//!              |  \
//!              |   -> NOTIFIED -> QUEUED
//!              -> COMPLETED
//! ```

/// Not scheduled; waiting for its waker to fire.
pub(crate) const IDLE: usize = 0;

/// Sitting in a run queue.
pub(crate) const QUEUED: usize = 1;

/// Being polled. At most one worker observes this state at a time.
pub(crate) const RUNNING: usize = 2;

/// Result (or failure) has been stored; the future is never polled again.
pub(crate) const COMPLETED: usize = 3;

/// Woken while RUNNING; re-queued as soon as the current poll returns.
pub(crate) const NOTIFIED: usize = 4;

pub(crate) fn name(state: usize) -> &'static str {
    match state {
        IDLE => "idle",
        QUEUED => "queued",
        RUNNING => "running",
        COMPLETED => "completed",
        NOTIFIED => "notified",
        _ => "unknown",
    }
}
