//! Core data structures for beacon
//!
//! This module defines the configured servers, the per-tick status snapshots
//! produced by probing them, and the persisted artifact record.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Server Configuration Types
// ============================================================================

/// Query protocol family of a game server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolKind {
    /// Minecraft Java edition, queried through the HTTP status API
    #[default]
    Java,
    /// Minecraft Bedrock edition, queried with a RakNet unconnected ping
    Bedrock,
    /// Anything else; never queried
    #[serde(other)]
    Unknown,
}

impl ProtocolKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Bedrock => "bedrock",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single configured game server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSpec {
    /// Display name
    pub name: String,

    /// Host name or IP address
    pub address: String,

    /// Query port
    pub port: u16,

    /// Protocol family used to query the server
    #[serde(default)]
    pub kind: ProtocolKind,
}

impl ServerSpec {
    /// Create a new server descriptor
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        port: u16,
        kind: ProtocolKind,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            port,
            kind,
        }
    }

    /// `address:port` as used by both query transports
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// How a group of servers is laid out in its embed field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupStyle {
    /// Online marker plus player count and version per server
    #[default]
    Detailed,
    /// Bold server name and online marker only
    Compact,
}

/// A named, ordered set of servers rendered as one embed field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerGroup {
    /// Field title
    pub name: String,

    /// Field layout
    #[serde(default)]
    pub style: GroupStyle,

    /// Servers in display order
    #[serde(default)]
    pub servers: Vec<ServerSpec>,
}

impl ServerGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>, style: GroupStyle) -> Self {
        Self {
            name: name.into(),
            style,
            servers: Vec::new(),
        }
    }

    /// Append a server to the group
    pub fn with_server(mut self, server: ServerSpec) -> Self {
        self.servers.push(server);
        self
    }
}

// ============================================================================
// Status Types
// ============================================================================

/// Point-in-time result of probing one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Whether the server answered the query and reported itself online
    pub reachable: bool,

    /// `current/max`, or `N/A` when unknown
    pub player_summary: String,

    /// Reported version, or `Unknown`
    pub version_label: String,
}

impl StatusSnapshot {
    /// Placeholder player summary
    pub const NO_PLAYERS: &'static str = "N/A";

    /// Placeholder version label
    pub const NO_VERSION: &'static str = "Unknown";

    /// Snapshot reported for any server that could not be queried
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            player_summary: Self::NO_PLAYERS.to_string(),
            version_label: Self::NO_VERSION.to_string(),
        }
    }

    /// Snapshot for a server that answered
    pub fn online(player_summary: impl Into<String>, version_label: impl Into<String>) -> Self {
        Self {
            reachable: true,
            player_summary: player_summary.into(),
            version_label: version_label.into(),
        }
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::unreachable()
    }
}

/// A group paired with the snapshots of its servers, in configuration order
#[derive(Debug, Clone)]
pub struct ProbedGroup {
    /// Field title
    pub name: String,

    /// Field layout
    pub style: GroupStyle,

    /// Servers and their snapshots
    pub entries: Vec<(ServerSpec, StatusSnapshot)>,
}

impl ProbedGroup {
    /// Number of reachable servers in the group
    pub fn online_count(&self) -> usize {
        self.entries.iter().filter(|(_, s)| s.reachable).count()
    }
}

// ============================================================================
// Persisted State
// ============================================================================

/// Pointer to the status message currently maintained in the channel
///
/// Serialized as `{"embedId": "<id>" | null}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Platform identifier of the message, if one is known to exist
    #[serde(rename = "embedId", default)]
    pub embed_id: Option<String>,
}

impl ArtifactRecord {
    /// Record pointing at an existing message
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            embed_id: Some(id.into()),
        }
    }
}
