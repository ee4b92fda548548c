//! Internal data structures.
//!
//! [`Slab`] stores the event loop's tasks under small reusable keys.

mod slab;

pub(crate) use slab::Slab;
