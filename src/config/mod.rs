//! Configuration management for beacon
//!
//! Configuration is read once at startup from a TOML file. Secrets and the
//! destination channel may be supplied through environment variables instead,
//! which take precedence over the file:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `BEACON_DISCORD_TOKEN` | `discord.token` |
//! | `BEACON_CHANNEL_ID` | `discord.channel_id` |
//! | `BEACON_RECORD_PATH` | `storage.record_path` |
//! | `BEACON_LOG_LEVEL` | `logging.level` |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{ServerGroup, ServerSpec};
use crate::probe::java::DEFAULT_API_BASE_URL;
use crate::render::{self, MAX_FIELDS};
use crate::utils::parse_hex_color;

/// Default config file path
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discord connection settings
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Polling settings
    #[serde(default)]
    pub status: StatusConfig,

    /// Artifact record location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Embed appearance
    #[serde(default)]
    pub embed: EmbedConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Server groups, one embed field each, in display order
    #[serde(default)]
    pub groups: Vec<ServerGroup>,
}

/// Discord connection settings
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token
    #[serde(default)]
    pub token: String,

    /// Destination channel id
    #[serde(default)]
    pub channel_id: u64,
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &if self.token.is_empty() { "<unset>" } else { "<redacted>" })
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

/// Polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Seconds between ticks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Per-server query timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Java status API root
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_probe_timeout_secs() -> u64 {
    10
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            api_base_url: default_api_base_url(),
        }
    }
}

/// Artifact record location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON record holding the status message id
    #[serde(default = "default_record_path")]
    pub record_path: PathBuf,
}

fn default_record_path() -> PathBuf {
    PathBuf::from("embed.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            record_path: default_record_path(),
        }
    }
}

/// Embed appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Embed title
    #[serde(default = "default_title")]
    pub title: String,

    /// Embed color as `#rrggbb`
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_title() -> String {
    render::DEFAULT_TITLE.to_string()
}

fn default_color() -> String {
    format!("#{:06x}", render::DEFAULT_COLOR)
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            color: default_color(),
        }
    }
}

impl EmbedConfig {
    /// Parsed embed color, falling back to the default on a bad value
    pub fn color_value(&self) -> u32 {
        parse_hex_color(&self.color).unwrap_or(render::DEFAULT_COLOR)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("text")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply `BEACON_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(token) = std::env::var("BEACON_DISCORD_TOKEN") {
            if !token.trim().is_empty() {
                self.discord.token = token.trim().to_string();
            }
        }

        if let Ok(channel_id) = std::env::var("BEACON_CHANNEL_ID") {
            self.discord.channel_id = channel_id
                .trim()
                .parse::<u64>()
                .with_context(|| format!("BEACON_CHANNEL_ID is not a channel id: {channel_id}"))?;
        }

        if let Ok(record_path) = std::env::var("BEACON_RECORD_PATH") {
            self.storage.record_path = PathBuf::from(record_path);
        }

        if let Ok(level) = std::env::var("BEACON_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.discord.token.trim().is_empty() {
            anyhow::bail!("discord.token must be set (or BEACON_DISCORD_TOKEN)");
        }

        if self.discord.channel_id == 0 {
            anyhow::bail!("discord.channel_id must be set (or BEACON_CHANNEL_ID)");
        }

        if self.status.interval_secs == 0 {
            anyhow::bail!("status.interval_secs must be greater than 0");
        }

        if self.status.probe_timeout_secs == 0 {
            anyhow::bail!("status.probe_timeout_secs must be greater than 0");
        }

        if self.status.probe_timeout_secs >= self.status.interval_secs {
            anyhow::bail!(
                "status.probe_timeout_secs ({}) must be shorter than status.interval_secs ({})",
                self.status.probe_timeout_secs,
                self.status.interval_secs
            );
        }

        if !self.status.api_base_url.starts_with("http://")
            && !self.status.api_base_url.starts_with("https://")
        {
            anyhow::bail!("status.api_base_url must start with http:// or https://");
        }

        if parse_hex_color(&self.embed.color).is_none() {
            anyhow::bail!("embed.color must be a #rrggbb value, got {}", self.embed.color);
        }

        if self.groups.len() > MAX_FIELDS {
            anyhow::bail!("at most {MAX_FIELDS} server groups fit in one embed");
        }

        for group in &self.groups {
            if group.name.trim().is_empty() {
                anyhow::bail!("every server group needs a name");
            }
            for server in &group.servers {
                validate_server(&group.name, server)?;
            }
        }

        Ok(())
    }

    /// Per-server query timeout as Duration
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.status.probe_timeout_secs)
    }

    /// Tick interval as Duration
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.status.interval_secs)
    }

    /// All configured servers in display order
    pub fn servers(&self) -> impl Iterator<Item = &ServerSpec> {
        self.groups.iter().flat_map(|g| g.servers.iter())
    }
}

fn validate_server(group: &str, server: &ServerSpec) -> Result<()> {
    if server.name.trim().is_empty() {
        anyhow::bail!("a server in group '{group}' has no name");
    }
    if server.address.trim().is_empty() {
        anyhow::bail!("server '{}' in group '{group}' has no address", server.name);
    }
    if server.port == 0 {
        anyhow::bail!("server '{}' in group '{group}' has port 0", server.name);
    }
    Ok(())
}
