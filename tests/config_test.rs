//! Tests for configuration loading and environment overrides

use beacon::config::Config;
use beacon::models::{GroupStyle, ProtocolKind};
use serial_test::serial;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const ENV_VARS: [&str; 4] = [
    "BEACON_DISCORD_TOKEN",
    "BEACON_CHANNEL_ID",
    "BEACON_RECORD_PATH",
    "BEACON_LOG_LEVEL",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn example_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.example.toml")
}

#[test]
#[serial]
fn test_example_config_parses() {
    clear_env();
    let config = Config::from_file(&example_path()).unwrap();

    assert_eq!(config.interval(), Duration::from_secs(60));
    assert_eq!(config.probe_timeout(), Duration::from_secs(10));
    assert_eq!(config.embed.color_value(), 0x8b00ff);
    assert_eq!(config.groups.len(), 2);
    assert_eq!(config.groups[0].name, "Main Servers");
    assert_eq!(config.groups[0].style, GroupStyle::Detailed);
    assert_eq!(config.groups[0].servers[1].kind, ProtocolKind::Bedrock);
    assert_eq!(config.groups[1].style, GroupStyle::Compact);
    assert_eq!(config.servers().count(), 3);
}

#[test]
#[serial]
fn test_example_config_needs_credentials() {
    clear_env();
    assert!(Config::load(&example_path()).is_err());
}

#[test]
#[serial]
fn test_env_supplies_credentials() {
    clear_env();
    std::env::set_var("BEACON_DISCORD_TOKEN", "env.token.value");
    std::env::set_var("BEACON_CHANNEL_ID", "987654321098765432");
    std::env::set_var("BEACON_RECORD_PATH", "/var/lib/beacon/embed.json");

    let result = Config::load(&example_path());
    clear_env();

    let config = result.unwrap();
    assert_eq!(config.discord.token, "env.token.value");
    assert_eq!(config.discord.channel_id, 987654321098765432);
    assert_eq!(
        config.storage.record_path,
        PathBuf::from("/var/lib/beacon/embed.json")
    );
}

#[test]
#[serial]
fn test_env_overrides_file_values() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[discord]
token = "file.token"
channel_id = 1

[logging]
level = "warn"
"#,
    )
    .unwrap();

    std::env::set_var("BEACON_CHANNEL_ID", "2");
    std::env::set_var("BEACON_LOG_LEVEL", "debug");

    let result = Config::load(&path);
    clear_env();

    let config = result.unwrap();
    assert_eq!(config.discord.token, "file.token");
    assert_eq!(config.discord.channel_id, 2);
    assert_eq!(config.logging.level, "debug");
    assert!(config.groups.is_empty());
}

#[test]
#[serial]
fn test_bad_channel_id_in_env() {
    clear_env();
    std::env::set_var("BEACON_DISCORD_TOKEN", "env.token.value");
    std::env::set_var("BEACON_CHANNEL_ID", "general");

    let result = Config::load(&example_path());
    clear_env();

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_missing_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    assert!(Config::load(&dir.path().join("nope.toml")).is_err());
}
