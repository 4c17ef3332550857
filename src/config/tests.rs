use std::io::Write;

use tempfile::NamedTempFile;

use super::*;

fn toml_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write tmp");
    file
}

#[test]
fn defaults_are_valid() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
    assert_eq!(settings.api.base_url.as_str(), "http://localhost:5000/api");
    assert_eq!(settings.api.timeout, Duration::from_secs(30));
    assert!(settings.api.token.is_none());
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.query_limit.get(), 256);
    assert_eq!(settings.logging.level, LevelFilter::WARN);
    assert_eq!(settings.logging.format, LogFormat::Compact);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.api.base_url = Some("https://file.example/api".to_string());
    raw.logging.level = Some("info".to_string());

    let overrides = ConfigOverrides {
        base_url: Some("https://cli.example/api".to_string()),
        log_level: Some("debug".to_string()),
        no_cache: true,
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.api.base_url.host_str(), Some("cli.example"));
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert!(!settings.cache.enabled);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    raw.apply_overrides(&ConfigOverrides {
        log_json: Some(true),
        ..Default::default()
    });
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.logging.format, LogFormat::Json);
}

#[test]
fn blank_token_is_treated_as_absent() {
    let mut raw = RawSettings::default();
    raw.api.token = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.api.token.is_none());
}

#[test]
fn zero_timeout_is_rejected() {
    let mut raw = RawSettings::default();
    raw.api.timeout_seconds = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero timeout");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "api.timeout_seconds",
            ..
        }
    ));
}

#[test]
fn zero_query_limit_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.query_limit = Some(0);
    let err = Settings::from_raw(raw).expect_err("zero limit");
    assert!(err.to_string().contains("cache.query_limit"));
}

#[test]
fn non_http_base_url_is_rejected() {
    let mut raw = RawSettings::default();
    raw.api.base_url = Some("ftp://learnhub.example".to_string());
    let err = Settings::from_raw(raw).expect_err("ftp scheme");
    assert!(matches!(err, LoadError::Invalid { key: "api.base_url", .. }));
}

#[test]
fn bad_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn explicit_file_is_loaded_and_overridden() {
    let file = toml_file(
        r#"
[api]
base_url = "https://file.example/api"
timeout_seconds = 5

[cache]
query_limit = 8
refetch_on_invalidate = false
"#,
    );

    let settings = load(
        Some(file.path()),
        &ConfigOverrides {
            timeout_seconds: Some(9),
            ..Default::default()
        },
    )
    .expect("load");

    assert_eq!(settings.api.base_url.host_str(), Some("file.example"));
    assert_eq!(settings.api.timeout, Duration::from_secs(9));
    assert_eq!(settings.cache.query_limit.get(), 8);
    assert!(!settings.cache.to_config().refetch_on_invalidate);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let err = load(
        Some(Path::new("/nonexistent/learnhub-test.toml")),
        &ConfigOverrides::default(),
    )
    .expect_err("missing file");
    assert!(matches!(err, LoadError::Build(_)));
}
