//! Coverage for config parsing, env overrides, and path resolution.

use std::fs;

use momentum::coaching::mode::SubstanceThreshold;
use momentum::coaching::CoachMode;
use momentum::config::{config_dir, Config};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn config_dir_resolves() {
    let path = match config_dir() {
        Ok(path) => path,
        Err(err) => panic!("config dir should resolve: {err}"),
    };
    assert!(path.ends_with(".momentum"));
}

#[test]
fn missing_file_yields_defaults() {
    let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
    let path = tmp.path().join("absent.toml");
    let config = Config::load_with(Some(&path), no_env)
        .unwrap_or_else(|e| panic!("missing config should load: {e}"));
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.coaching.threshold(), SubstanceThreshold::default());
    assert!(config.validator.extra_banned_words.is_empty());
}

#[test]
fn parse_full_config() {
    let toml_str = r#"
[logging]
level = "debug"
logs_dir = "/var/log/momentum"

[coaching]
substantive_min_words = 6
substantive_min_chars = 30

[validator]
extra_banned_words = ["blitz"]
extra_urgency_phrases = ["while supplies last"]

[daily]
reduced_load = true
"#;
    let config = Config::from_toml(toml_str).unwrap_or_else(|e| panic!("should parse: {e}"));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.logging.logs_dir.as_deref(),
        Some(std::path::Path::new("/var/log/momentum"))
    );
    assert_eq!(
        config.coaching.threshold(),
        SubstanceThreshold {
            min_words: 6,
            min_chars: 30
        }
    );
    assert!(config.daily.reduced_load);

    let validator = config.validator.build();
    assert!(!validator.validate("Blitz the list.", CoachMode::Direct).valid);
    assert!(!validator
        .validate("Call now, while supplies last.", CoachMode::Direct)
        .valid);
}

#[test]
fn partial_sections_keep_defaults() {
    let config = Config::from_toml("[coaching]\nsubstantive_min_words = 2\n")
        .unwrap_or_else(|e| panic!("should parse: {e}"));
    assert_eq!(config.coaching.substantive_min_words, 2);
    assert_eq!(config.coaching.substantive_min_chars, 20);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn malformed_toml_is_an_error() {
    let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
    let path = tmp.path().join("config.toml");
    fs::write(&path, "[logging\nlevel = ").unwrap_or_else(|e| panic!("write: {e}"));
    let err = match Config::load_with(Some(&path), no_env) {
        Ok(_) => panic!("malformed config should fail"),
        Err(err) => err,
    };
    assert!(format!("{err:#}").contains("failed to parse config"));
}

#[test]
fn env_path_and_overrides_apply() {
    let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
    let path = tmp.path().join("from-env.toml");
    fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap_or_else(|e| panic!("write: {e}"));
    let path_str = path.display().to_string();

    let env = |key: &str| match key {
        "MOMENTUM_CONFIG_PATH" => Some(path_str.clone()),
        "MOMENTUM_LOGS_DIR" => Some("/tmp/momentum-logs".to_owned()),
        _ => None,
    };
    let config = Config::load_with(None, env).unwrap_or_else(|e| panic!("should load: {e}"));
    assert_eq!(config.logging.level, "warn");
    assert_eq!(
        config.logging.logs_dir.as_deref(),
        Some(std::path::Path::new("/tmp/momentum-logs"))
    );

    let env = |key: &str| match key {
        "MOMENTUM_CONFIG_PATH" => Some(path_str.clone()),
        "MOMENTUM_LOG_LEVEL" => Some("trace".to_owned()),
        _ => None,
    };
    let config = Config::load_with(None, env).unwrap_or_else(|e| panic!("should load: {e}"));
    assert_eq!(config.logging.level, "trace");
}

#[test]
fn explicit_path_beats_env_path() {
    let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
    let explicit = tmp.path().join("explicit.toml");
    fs::write(&explicit, "[daily]\nreduced_load = true\n").unwrap_or_else(|e| panic!("write: {e}"));
    let env = |key: &str| {
        (key == "MOMENTUM_CONFIG_PATH").then(|| "/nonexistent/config.toml".to_owned())
    };
    let config =
        Config::load_with(Some(&explicit), env).unwrap_or_else(|e| panic!("should load: {e}"));
    assert!(config.daily.reduced_load);
}
