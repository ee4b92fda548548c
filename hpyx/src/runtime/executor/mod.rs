//! Task executor.
//!
//! - [`core`]: executor lifecycle (spawn workers, submit, shut down, join),
//! - [`worker`]: the per-thread loop that pops, steals and parks.

pub(crate) mod core;
pub(crate) mod worker;
