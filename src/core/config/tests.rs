use super::data::{validate_endpoint, Config, EndpointOverrides};
use super::io::ConfigError;
use crate::core::constants::{
    CHAT_ENDPOINT_ENV, DEFAULT_CHAT_ENDPOINT, DEFAULT_HEALTH_ENDPOINT, HEALTH_ENDPOINT_ENV,
};
use std::collections::HashMap;
use tempfile::TempDir;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        chat_endpoint: Some("https://admissions.example.edu/api/chat".to_string()),
        health_endpoint: None,
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    let mut config = loaded;
    config.chat_endpoint = None;
    config.health_endpoint = Some("https://admissions.example.edu/api/health".to_string());
    config
        .save_to_path(&config_path)
        .expect("Failed to save modified config");
    let reloaded = Config::load_from_path(&config_path).expect("Failed to reload config");
    assert_eq!(reloaded.chat_endpoint, None);
    assert_eq!(
        reloaded.health_endpoint.as_deref(),
        Some("https://admissions.example.edu/api/health")
    );
}

#[test]
fn test_parse_error_names_the_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "chat_endpoint = [").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("invalid TOML should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn defaults_apply_when_nothing_is_configured() {
    let endpoints =
        Config::default().resolve_endpoints(&EndpointOverrides::default(), env_from(&[]));
    assert_eq!(endpoints.chat, DEFAULT_CHAT_ENDPOINT);
    assert_eq!(endpoints.health, DEFAULT_HEALTH_ENDPOINT);
}

#[test]
fn precedence_is_cli_then_env_then_file() {
    let config = Config {
        chat_endpoint: Some("http://file/chat".to_string()),
        health_endpoint: Some("http://file/health".to_string()),
    };
    let env = env_from(&[
        (CHAT_ENDPOINT_ENV, "http://env/chat"),
        (HEALTH_ENDPOINT_ENV, "http://env/health"),
    ]);

    let from_env = config.resolve_endpoints(&EndpointOverrides::default(), &env);
    assert_eq!(from_env.chat, "http://env/chat");
    assert_eq!(from_env.health, "http://env/health");

    let overrides = EndpointOverrides {
        chat: Some("http://cli/chat".to_string()),
        health: None,
    };
    let mixed = config.resolve_endpoints(&overrides, &env);
    assert_eq!(mixed.chat, "http://cli/chat");
    assert_eq!(mixed.health, "http://env/health");

    let file_only = config.resolve_endpoints(&EndpointOverrides::default(), env_from(&[]));
    assert_eq!(file_only.chat, "http://file/chat");
}

#[test]
fn blank_values_fall_through() {
    let config = Config {
        chat_endpoint: Some("   ".to_string()),
        health_endpoint: None,
    };
    let overrides = EndpointOverrides {
        chat: Some(String::new()),
        health: None,
    };
    let endpoints = config.resolve_endpoints(&overrides, env_from(&[(CHAT_ENDPOINT_ENV, " ")]));
    assert_eq!(endpoints.chat, DEFAULT_CHAT_ENDPOINT);
}

#[test]
fn endpoint_validation_requires_http_urls() {
    assert_eq!(
        validate_endpoint(" https://example.edu/api/chat "),
        Ok("https://example.edu/api/chat".to_string())
    );
    assert!(validate_endpoint("localhost:5000/api/chat").is_err());
    assert!(validate_endpoint("ftp://example.edu/chat").is_err());
    assert!(validate_endpoint("not a url").is_err());
}
