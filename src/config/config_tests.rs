use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_defaults_when_file_absent() {
    let dir = tempdir().unwrap();
    let config = load_config_from(&dir.path().join(CONFIG_FILENAME)).unwrap();
    assert_eq!(config, AdminConfig::default());
}

#[test]
fn test_default_values() {
    let config = AdminConfig::default();
    assert_eq!(config.editor.default_language, "es");
    assert_eq!(config.editor.default_cycle_duration_seconds, 30);
    assert_eq!(
        config.folder_grace_period().unwrap(),
        Duration::from_secs(30 * 24 * 60 * 60)
    );
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
}

#[test]
fn test_empty_toml_is_default() {
    let config: AdminConfig = toml::from_str("").unwrap();
    assert_eq!(config, AdminConfig::default());
}

#[test]
fn test_partial_sections_keep_other_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILENAME);
    fs::write(
        &path,
        r#"
[store]
path = "/tmp/gamifier/gamifier.db"

[editor]
default_language = "en"

[folders]
deleted_grace_period = "12h"
"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.store_path(), PathBuf::from("/tmp/gamifier/gamifier.db"));
    assert_eq!(config.editor.default_language, "en");
    assert_eq!(config.editor.default_cycle_duration_seconds, 30);

    let defaults = config.content_defaults().unwrap();
    assert_eq!(defaults.folder_grace_period, Duration::from_secs(12 * 60 * 60));
    assert_eq!(defaults.language, "en");
}

#[test]
fn test_invalid_grace_period_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILENAME);
    fs::write(&path, "[folders]\ndeleted_grace_period = \"soon\"\n").unwrap();

    let err = load_config_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDuration { .. }));
}

#[test]
fn test_unknown_field_is_rejected() {
    let err = toml::from_str::<AdminConfig>("[editor]\ncolour = \"red\"\n").unwrap_err();
    assert!(err.to_string().contains("colour"));
}

#[test]
fn test_config_path_is_under_home() {
    assert!(config_path().ends_with(CONFIG_FILENAME));
}
