use crate::runtime::task::Task;

use std::mem::ManuallyDrop;
use std::sync::Arc;
use std::task::{RawWaker, RawWakerVTable, Waker};

/// Vtable for wakers backed by an `Arc<Task<T>>`.
///
/// The data pointer always comes from `Arc::into_raw`, so every entry
/// just has to keep the strong count balanced.
fn vtable<T: Send + 'static>() -> &'static RawWakerVTable {
    &RawWakerVTable::new(
        clone_raw::<T>,
        wake_raw::<T>,
        wake_by_ref_raw::<T>,
        drop_raw::<T>,
    )
}

/// Builds a waker that reschedules `task` on the pool when woken.
pub(crate) fn make_waker<T: Send + 'static>(task: Arc<Task<T>>) -> Waker {
    let raw = RawWaker::new(Arc::into_raw(task) as *const (), vtable::<T>());

    // Safety: the vtable functions uphold the `RawWaker` contract for a
    // pointer obtained from `Arc::into_raw`.
    unsafe { Waker::from_raw(raw) }
}

/// Borrows the task behind `ptr` without touching its strong count.
///
/// # Safety
///
/// `ptr` must come from `Arc::<Task<T>>::into_raw` and still be live.
unsafe fn borrow<T>(ptr: *const ()) -> ManuallyDrop<Arc<Task<T>>> {
    ManuallyDrop::new(unsafe { Arc::from_raw(ptr as *const Task<T>) })
}

fn clone_raw<T: Send + 'static>(ptr: *const ()) -> RawWaker {
    let task = unsafe { borrow::<T>(ptr) };
    let cloned = Arc::clone(&task);

    RawWaker::new(Arc::into_raw(cloned) as *const (), vtable::<T>())
}

fn wake_raw<T: Send + 'static>(ptr: *const ()) {
    let task = unsafe { Arc::<Task<T>>::from_raw(ptr as *const Task<T>) };
    task.wake();
}

fn wake_by_ref_raw<T: Send + 'static>(ptr: *const ()) {
    let task = unsafe { borrow::<T>(ptr) };
    Arc::clone(&task).wake();
}

fn drop_raw<T: Send + 'static>(ptr: *const ()) {
    drop(unsafe { Arc::<Task<T>>::from_raw(ptr as *const Task<T>) });
}
