use super::*;

use std::collections::HashMap;

#[test]
fn missing_file_keeps_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join("absent.toml"));
    assert_eq!(settings, Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(
        &path,
        r#"
endpoint_url = "https://erp.example.com/production"
username = "alice"
request_timeout_secs = 5
"#,
    )
    .expect("write settings");

    let settings = load_settings_from(&path);
    assert_eq!(settings.endpoint_url, "https://erp.example.com/production");
    assert_eq!(settings.username(), Some("alice"));
    assert_eq!(settings.request_timeout_secs, 5);
    assert_eq!(settings.storage_path, Settings::default().storage_path);
}

#[test]
fn unreadable_file_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(&path, "endpoint_url = [").expect("write settings");
    assert_eq!(load_settings_from(&path), Settings::default());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("ENDPOINT_URL", "http://plain:1/api"),
        ("APP__ENDPOINT_URL", "http://prefixed:2/api"),
        ("APP__STORAGE_PATH", "/tmp/console.json"),
        ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
    ]);
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, |name| env.get(name).map(|v| v.to_string()));

    assert_eq!(settings.endpoint_url, "http://prefixed:2/api");
    assert_eq!(settings.storage_path, PathBuf::from("/tmp/console.json"));
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn validate_rejects_non_http_endpoints_and_zero_timeout() {
    let mut settings = Settings {
        endpoint_url: "ftp://files.example.com".into(),
        ..Settings::default()
    };
    assert!(settings.validate().is_err());

    settings.endpoint_url = "not a url".into();
    assert!(settings.validate().is_err());

    settings.endpoint_url = "http://127.0.0.1:8080/api".into();
    settings.request_timeout_secs = 0;
    assert!(settings.validate().is_err());

    settings.request_timeout_secs = 10;
    assert!(settings.validate().is_ok());
}

#[test]
fn blank_username_is_treated_as_absent() {
    let settings = Settings {
        username: Some("   ".into()),
        ..Settings::default()
    };
    assert_eq!(settings.username(), None);
}
