use super::handle::Shared;

use std::sync::Arc;
use std::task::{Wake, Waker};

/// Wakes one event-loop task, from any thread.
struct TaskWaker {
    shared: Arc<Shared>,
    slot: usize,
    id: u64,
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.shared.schedule(self.slot, self.id);
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.shared.schedule(self.slot, self.id);
    }
}

/// The task is identified by both its slab slot and its id, so a wake-up
/// that outlives the task cannot reach whatever later reuses the slot.
pub(crate) fn make_waker(shared: Arc<Shared>, slot: usize, id: u64) -> Waker {
    Waker::from(Arc::new(TaskWaker { shared, slot, id }))
}
