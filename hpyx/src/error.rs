//! Error types.
//!
//! Each concern of the crate has its own error enum; [`DispatchError`]
//! aggregates the ones a caller of [`dispatch`](crate::dispatch) can observe.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building a [`RuntimeConfig`](crate::RuntimeConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An entry was not of the form `key=value`.
    #[error("invalid config entry `{0}`: expected `key=value`")]
    InvalidEntry(String),

    /// The key is not recognized.
    #[error("unknown config key `{0}`")]
    UnknownKey(String),

    /// The key is known but its value could not be interpreted.
    #[error("invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// The config file could not be read.
    #[error("failed to read config at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Errors related to the lifecycle of the dispatch runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    /// The global runtime has not been initialized, or was stopped.
    #[error("runtime is not running")]
    NotRunning,
}

/// Failure of a unit of work executed on the dispatch runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The computation panicked; the payload message is preserved when it
    /// is a string.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// The runtime shut down before the task produced a value.
    #[error("task was dropped before completing")]
    Abandoned,
}

/// Errors related to the cooperative event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoopError {
    /// The calling thread is not running an event loop.
    #[error("no running event loop")]
    NoRunningLoop,

    /// The loop has finished and no longer accepts callbacks.
    #[error("event loop is closed")]
    Closed,
}

/// Failure of a [`LoopFuture`](crate::event_loop::LoopFuture).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FutureError {
    /// The promise was dropped without a value being set.
    #[error("promise dropped without a result")]
    Abandoned,
}

/// Everything that can go wrong between dispatching a computation and
/// observing its result.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Loop(#[from] LoopError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Future(#[from] FutureError),
}
