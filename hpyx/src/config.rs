//! Runtime configuration.
//!
//! A [`RuntimeConfig`] can be assembled from `key=value` entries (the form
//! accepted by [`init_runtime`](crate::init_runtime)), from a TOML document,
//! or programmatically through [`RuntimeBuilder`](crate::RuntimeBuilder).
//!
//! Recognized entry keys:
//!
//! | key                | value                                  |
//! |--------------------|----------------------------------------|
//! | `hpyx.os_threads`  | positive integer, or `all`             |
//! | `hpyx.bind`        | `none` or `compact`                    |
//! | `hpyx.thread_name` | prefix for worker thread names         |
//! | `hpyx.stack_size`  | worker stack size in bytes             |

use crate::error::ConfigError;

use serde::Deserialize;

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::thread;

/// How worker threads are placed on CPU cores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindPolicy {
    /// Leave placement to the OS scheduler.
    #[default]
    None,

    /// Pin worker `i` to core `i % cores`.
    Compact,
}

impl FromStr for BindPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "compact" => Ok(Self::Compact),
            other => Err(format!("expected `none` or `compact`, got `{other}`")),
        }
    }
}

/// Configuration of the dispatch runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Number of worker threads.
    pub os_threads: usize,

    /// Worker placement policy.
    pub bind: BindPolicy,

    /// Prefix used to name worker threads (`{thread_name}-{id}`).
    pub thread_name: String,

    /// Stack size of worker threads, in bytes. `None` keeps the platform
    /// default.
    pub stack_size: Option<usize>,
}

impl Default for RuntimeConfig {
    /// One worker per available logical CPU, falling back to `1`.
    fn default() -> Self {
        Self {
            os_threads: available_threads(),
            bind: BindPolicy::None,
            thread_name: String::from("hpyx-worker"),
            stack_size: None,
        }
    }
}

impl RuntimeConfig {
    /// Builds a configuration from `key=value` entries applied on top of
    /// the defaults.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hpyx::RuntimeConfig;
    ///
    /// let cfg = RuntimeConfig::from_entries(["hpyx.os_threads=2"]).unwrap();
    /// assert_eq!(cfg.os_threads, 2);
    /// ```
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();

        for entry in entries {
            config.apply(entry.as_ref())?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Applies a single `key=value` entry.
    fn apply(&mut self, entry: &str) -> Result<(), ConfigError> {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(ConfigError::InvalidEntry(entry.to_string()));
        };

        let key = key.trim();
        let value = value.trim();

        if key.is_empty() {
            return Err(ConfigError::InvalidEntry(entry.to_string()));
        }

        let invalid = |reason: String| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason,
        };

        match key {
            "hpyx.os_threads" => {
                self.os_threads = if value == "all" {
                    available_threads()
                } else {
                    value.parse().map_err(|e| invalid(format!("{e}")))?
                };
            }
            "hpyx.bind" => {
                self.bind = value.parse().map_err(invalid)?;
            }
            "hpyx.thread_name" => {
                self.thread_name = value.to_string();
            }
            "hpyx.stack_size" => {
                let size: usize = value.parse().map_err(|e| invalid(format!("{e}")))?;
                self.stack_size = Some(size);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.os_threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "hpyx.os_threads".into(),
                value: "0".into(),
                reason: "must be > 0".into(),
            });
        }

        if self.thread_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "hpyx.thread_name".into(),
                value: String::new(),
                reason: "must not be empty".into(),
            });
        }

        if self.stack_size == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "hpyx.stack_size".into(),
                value: "0".into(),
                reason: "must be > 0".into(),
            });
        }

        Ok(())
    }
}

fn available_threads() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn entries_override_defaults() {
        let cfg = RuntimeConfig::from_entries([
            "hpyx.os_threads=3",
            "hpyx.bind=compact",
            "hpyx.thread_name = pool",
            "hpyx.stack_size=1048576",
        ])
        .unwrap();

        assert_eq!(
            cfg,
            RuntimeConfig {
                os_threads: 3,
                bind: BindPolicy::Compact,
                thread_name: "pool".into(),
                stack_size: Some(1 << 20),
            }
        );
    }

    #[test]
    fn all_threads_uses_available_parallelism() {
        let cfg = RuntimeConfig::from_entries(["hpyx.os_threads=all"]).unwrap();
        assert_eq!(cfg.os_threads, available_threads());
    }

    #[test]
    fn empty_entries_yield_defaults() {
        let cfg = RuntimeConfig::from_entries(Vec::<String>::new()).unwrap();
        assert_eq!(cfg, RuntimeConfig::default());
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(matches!(
            RuntimeConfig::from_entries(["hpyx.os_threads"]),
            Err(ConfigError::InvalidEntry(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_entries(["=4"]),
            Err(ConfigError::InvalidEntry(_))
        ));
        assert!(matches!(
            RuntimeConfig::from_entries(["hpyx.colour=blue"]),
            Err(ConfigError::UnknownKey(k)) if k == "hpyx.colour"
        ));
        assert!(matches!(
            RuntimeConfig::from_entries(["hpyx.os_threads=many"]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            RuntimeConfig::from_entries(["hpyx.os_threads=0"]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            RuntimeConfig::from_entries(["hpyx.bind=scatter"]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn parses_toml() {
        let cfg = RuntimeConfig::from_toml_str(
            r#"
            os_threads = 2
            bind = "compact"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.os_threads, 2);
        assert_eq!(cfg.bind, BindPolicy::Compact);
        assert_eq!(cfg.thread_name, "hpyx-worker");
        assert_eq!(cfg.stack_size, None);
    }

    #[test]
    fn toml_rejects_unknown_fields() {
        assert!(matches!(
            RuntimeConfig::from_toml_str("workers = 2"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn empty_thread_name_is_rejected_by_both_sources() {
        assert!(matches!(
            RuntimeConfig::from_entries(["hpyx.thread_name="]),
            Err(ConfigError::InvalidValue { key, .. }) if key == "hpyx.thread_name"
        ));
        assert!(matches!(
            RuntimeConfig::from_toml_str("thread_name = \"\""),
            Err(ConfigError::InvalidValue { key, .. }) if key == "hpyx.thread_name"
        ));
    }
}
