//! Configuration loading and API key resolution

use anyhow::Result;
use promptdesk::config::Config;
use promptdesk::error::AppError;
use promptdesk::llm::factory;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_llm_defaults() -> Result<()> {
    let config = Config::default();

    assert_eq!(config.llm.model, "gemini-2.0-flash");
    assert_eq!(
        config.llm.base_url,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert_eq!(config.llm.timeout_secs, 30, "Remote calls use a fixed 30s timeout");

    Ok(())
}

#[test]
fn test_config_load_explicit_path() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("promptdesk.toml");
    fs::write(
        &path,
        r#"
[llm]
model = "gemini-1.5-flash"
api_key_env = "MY_GEMINI_KEY"

[cli]
feedback_file = "/var/lib/promptdesk/feedback.json"
"#,
    )?;

    let config = Config::load_with_path(Some(path.to_string_lossy().to_string()))?;
    assert_eq!(config.llm.model, "gemini-1.5-flash");
    assert_eq!(config.llm.api_key_env, "MY_GEMINI_KEY");
    assert_eq!(config.cli.feedback_file, "/var/lib/promptdesk/feedback.json");
    assert_eq!(config.server.bind, "127.0.0.1:8000");

    Ok(())
}

#[test]
fn test_config_load_explicit_missing_path_fails() {
    let result = Config::load_with_path(Some("/nonexistent/promptdesk.toml".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_config_load_invalid_toml_fails() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[llm\nmodel = ")?;
    assert!(Config::load_with_path(Some(path.to_string_lossy().to_string())).is_err());
    Ok(())
}

#[test]
#[serial]
fn test_api_key_from_env() {
    env::set_var("PROMPTDESK_TEST_API_KEY", "test_key_123");
    let mut config = Config::default();
    config.llm.api_key_env = "PROMPTDESK_TEST_API_KEY".to_string();

    let api_key = config.api_key().unwrap();
    assert_eq!(api_key.expose(), "test_key_123");
    assert_eq!(format!("{:?}", api_key), "***");

    env::remove_var("PROMPTDESK_TEST_API_KEY");
}

#[test]
#[serial]
fn test_blank_api_key_is_a_configuration_error() {
    env::set_var("PROMPTDESK_TEST_BLANK_KEY", "   ");
    let mut config = Config::default();
    config.llm.api_key_env = "PROMPTDESK_TEST_BLANK_KEY".to_string();

    assert!(matches!(config.api_key(), Err(AppError::Configuration(_))));
    assert!(matches!(
        factory::create_client(&config),
        Err(AppError::Configuration(_))
    ));

    env::remove_var("PROMPTDESK_TEST_BLANK_KEY");
}

#[test]
#[serial]
fn test_create_client_with_key() {
    env::set_var("PROMPTDESK_TEST_FACTORY_KEY", "test_key");
    let mut config = Config::default();
    config.llm.api_key_env = "PROMPTDESK_TEST_FACTORY_KEY".to_string();

    assert!(factory::create_client(&config).is_ok());

    env::remove_var("PROMPTDESK_TEST_FACTORY_KEY");
}

#[test]
#[serial]
fn test_zero_timeout_is_a_configuration_error() -> Result<()> {
    env::set_var("PROMPTDESK_TEST_TIMEOUT_KEY", "test_key");
    let dir = TempDir::new()?;
    let path = dir.path().join("promptdesk.toml");
    fs::write(
        &path,
        "[llm]\napi_key_env = \"PROMPTDESK_TEST_TIMEOUT_KEY\"\ntimeout_secs = 0\n",
    )?;

    let config = Config::load_with_path(Some(path.to_string_lossy().to_string()))?;
    assert_eq!(config.llm.timeout_secs, 0);
    assert!(matches!(
        factory::create_client(&config),
        Err(AppError::Configuration(_))
    ));

    env::remove_var("PROMPTDESK_TEST_TIMEOUT_KEY");
    Ok(())
}
