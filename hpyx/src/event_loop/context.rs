use super::core::LoopCore;
use super::handle::LoopHandle;
use crate::error::LoopError;

use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    /// The loop currently running on this thread, if any.
    static CURRENT_LOOP: RefCell<Option<Rc<LoopCore>>> = const { RefCell::new(None) };
}

/// Installs `core` as the running loop until the guard is dropped.
pub(crate) struct Enter {
    prev: Option<Rc<LoopCore>>,
}

pub(crate) fn enter(core: Rc<LoopCore>) -> Enter {
    let prev = CURRENT_LOOP.with(|c| c.replace(Some(core)));
    Enter { prev }
}

impl Drop for Enter {
    fn drop(&mut self) {
        let prev = self.prev.take();
        CURRENT_LOOP.with(|c| c.replace(prev));
    }
}

pub(crate) fn is_running() -> bool {
    CURRENT_LOOP.with(|c| c.borrow().is_some())
}

/// Runs `f` against the running loop.
pub(crate) fn with_current<R>(f: impl FnOnce(&Rc<LoopCore>) -> R) -> Result<R, LoopError> {
    let core = CURRENT_LOOP.with(|c| c.borrow().clone());

    match core {
        Some(core) => Ok(f(&core)),
        None => Err(LoopError::NoRunningLoop),
    }
}

/// Returns a handle to the loop running on the current thread.
///
/// Fails with [`LoopError::NoRunningLoop`] outside of
/// [`EventLoop::run`](super::EventLoop::run).
pub fn get_running_loop() -> Result<LoopHandle, LoopError> {
    with_current(|core| core.handle())
}
