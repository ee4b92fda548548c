//! Work-stealing queues.
//!
//! - [`injector`]: the global queue fed by submissions from outside the
//!   pool, which also parks idle workers,
//! - [`queue`]: one local queue per worker, fed by nested spawns and
//!   open to stealing by the other workers.

pub(crate) mod injector;
pub(crate) mod queue;
