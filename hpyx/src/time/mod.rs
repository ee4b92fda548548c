//! Time utilities.
//!
//! [`instrumented`] wraps a future and reports how long it took to
//! complete. Scheduler-agnostic: it works on the event loop and the pool.

mod instrumented;

#[doc(inline)]
pub use instrumented::{Instrumented, instrumented};
