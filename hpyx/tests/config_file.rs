use hpyx::{BindPolicy, ConfigError, RuntimeBuilder, RuntimeConfig};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hpyx.toml");

    fs::write(
        &path,
        r#"
os_threads = 3
bind = "compact"
thread_name = "crunch"
"#,
    )
    .unwrap();

    let config = RuntimeConfig::load(&path).unwrap();

    assert_eq!(config.os_threads, 3);
    assert_eq!(config.bind, BindPolicy::Compact);
    assert_eq!(config.thread_name, "crunch");
    assert_eq!(config.stack_size, None);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    match RuntimeConfig::load(&path) {
        Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an io error, got {other:?}"),
    }
}

#[test]
fn test_load_rejects_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hpyx.toml");
    fs::write(&path, "os_threads = 2\nworkers = 4\n").unwrap();

    assert!(matches!(RuntimeConfig::load(&path), Err(ConfigError::Toml(_))));
}

#[test]
fn test_loaded_config_builds_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hpyx.toml");
    fs::write(&path, "os_threads = 2\nthread_name = \"from-file\"\n").unwrap();

    let config = RuntimeConfig::load(&path).unwrap();
    let rt = RuntimeBuilder::new().config(config).build().unwrap();

    let name = rt
        .submit(|| std::thread::current().name().map(str::to_owned))
        .get()
        .unwrap();

    assert_eq!(rt.workers(), 2);
    assert!(name.unwrap().starts_with("from-file-"));
}
