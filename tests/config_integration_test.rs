//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` so they don't
//! interfere with each other.

use glip_export::config::{load_config, Environment};
use glip_export::domain::GlipError;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ENV_VARS: [&str; 6] = [
    "GLIP_EXPORT_APPLICATION_LOG_LEVEL",
    "GLIP_EXPORT_APPLICATION_DRY_RUN",
    "GLIP_EXPORT_EXPORT_POLL_INTERVAL_SECONDS",
    "GLIP_EXPORT_PLATFORM_PASSWORD",
    "TEST_GLIP_CLIENT_SECRET",
    "TEST_GLIP_PASSWORD",
];

fn cleanup_env_vars() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

const MINIMAL: &str = r#"
[platform]
client_id = "client"
client_secret = "secret"
username = "+16505550100"
password = "password"

[export]
time_from = "2019-07-01T00:00:00.000Z"
time_to = "2019-07-29T23:59:59.999Z"
"#;

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let toml_content = r#"
environment = "staging"

[application]
log_level = "debug"
dry_run = true

[platform]
server_url = "https://platform.devtest.ringcentral.com"
client_id = "my-client"
client_secret = "my-secret"
username = "+16505550100"
extension = "101"
password = "p@ss"
timeout_seconds = 30

[export]
time_from = "2020-01-01T00:00:00Z"
time_to = "2020-02-01T00:00:00Z"
contacts = ["jane@example.com", "123456"]
chat_ids = ["987"]
output_dir = "/tmp/glip"
file_prefix = "glip"
poll_interval_seconds = 10
max_poll_attempts = 100
backoff_multiplier = 1.5
max_poll_interval_seconds = 60

[logging]
local_enabled = false
local_path = "/tmp/glip-logs"
local_rotation = "hourly"
"#;

    let temp_file = write_config(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);

    assert_eq!(
        config.platform.server_url,
        "https://platform.devtest.ringcentral.com"
    );
    assert_eq!(config.platform.extension(), Some("101"));
    assert_eq!(config.platform.password.expose_secret().as_str(), "p@ss");
    assert_eq!(config.platform.timeout_seconds, 30);

    assert_eq!(config.export.contacts.len(), 2);
    assert_eq!(config.export.chat_ids, vec!["987"]);
    assert_eq!(config.export.file_prefix, "glip");
    assert_eq!(config.export.max_poll_attempts, 100);
    assert_eq!(config.export.backoff_multiplier, 1.5);

    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_config_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(MINIMAL);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.platform.server_url, "https://platform.ringcentral.com");
    assert_eq!(config.platform.extension(), None);
    assert_eq!(config.export.poll_interval_seconds, 5);
    assert_eq!(config.export.max_poll_attempts, 0);
    assert_eq!(config.export.output_dir, ".");
    assert_eq!(config.export.file_prefix, "rc-export-reports");
    assert!(!config.application.dry_run);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_GLIP_CLIENT_SECRET", "from-env-secret");
    std::env::set_var("TEST_GLIP_PASSWORD", "from-env-password");

    let toml_content = MINIMAL
        .replace("\"secret\"", "\"${TEST_GLIP_CLIENT_SECRET}\"")
        .replace("\"password\"", "\"${TEST_GLIP_PASSWORD}\"");
    let temp_file = write_config(&toml_content);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(
        config.platform.client_secret.expose_secret().as_str(),
        "from-env-secret"
    );
    assert_eq!(
        config.platform.password.expose_secret().as_str(),
        "from-env-password"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_config_error() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let toml_content = MINIMAL.replace("\"password\"", "\"${TEST_GLIP_PASSWORD}\"");
    let temp_file = write_config(&toml_content);

    match load_config(temp_file.path()) {
        Err(GlipError::Configuration(msg)) => assert!(msg.contains("TEST_GLIP_PASSWORD")),
        other => panic!("Expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("GLIP_EXPORT_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("GLIP_EXPORT_APPLICATION_DRY_RUN", "true");
    std::env::set_var("GLIP_EXPORT_EXPORT_POLL_INTERVAL_SECONDS", "15");
    std::env::set_var("GLIP_EXPORT_PLATFORM_PASSWORD", "overridden");

    let temp_file = write_config(MINIMAL);
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "warn");
    assert!(config.application.dry_run);
    assert_eq!(config.export.poll_interval_seconds, 15);
    assert_eq!(config.platform.password.expose_secret().as_str(), "overridden");

    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override_value() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("GLIP_EXPORT_EXPORT_POLL_INTERVAL_SECONDS", "soon");

    let temp_file = write_config(MINIMAL);
    let result = load_config(temp_file.path());
    cleanup_env_vars();

    assert!(matches!(result, Err(GlipError::Configuration(_))));
}

#[test]
fn test_validation_errors() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        (
            MINIMAL.replace("2019-07-29T23:59:59.999Z", "2019-06-01T00:00:00Z"),
            "time range",
        ),
        (
            MINIMAL.replace("client_id = \"client\"", "client_id = \"\""),
            "client_id",
        ),
        (
            format!("{MINIMAL}poll_interval_seconds = 0\n"),
            "poll_interval_seconds",
        ),
        (
            format!("environment = \"production\"\n{}", MINIMAL.replace(
                "password = \"password\"",
                "password = \"password\"\ntls_verify = false",
            )),
            "TLS",
        ),
    ];

    for (toml_content, expected) in cases {
        let temp_file = write_config(&toml_content);
        match load_config(temp_file.path()) {
            Err(GlipError::Configuration(msg)) => {
                assert!(msg.contains(expected), "'{msg}' should mention '{expected}'")
            }
            other => panic!("Expected validation error for {expected}, got {other:?}"),
        }
    }
}
