use super::Runtime;
use crate::config::{BindPolicy, RuntimeConfig};
use crate::error::RuntimeError;

/// Builder for configuring and creating a [`Runtime`].
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .worker_threads(4)
///     .bind(BindPolicy::Compact)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
}

impl RuntimeBuilder {
    /// Starts from [`RuntimeConfig::default`]: one worker per logical CPU.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration, e.g. one loaded from a file.
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.config.os_threads = n;
        self
    }

    pub fn bind(mut self, policy: BindPolicy) -> Self {
        self.config.bind = policy;
        self
    }

    /// Prefix for worker thread names; workers are named `{prefix}-{id}`.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name = prefix.into();
        self
    }

    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.config.stack_size = Some(bytes);
        self
    }

    /// Spawns the workers.
    pub fn build(self) -> Result<Runtime, RuntimeError> {
        Runtime::new(self.config)
    }
}
