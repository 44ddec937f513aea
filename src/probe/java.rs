//! Java edition status via the mcsrvstat.us HTTP API
//!
//! The API answers `GET /2/{address}:{port}` with a JSON document of which only
//! three members are used:
//!
//! ```json
//! { "online": true, "players": { "online": 3, "max": 20 }, "version": "1.20.4" }
//! ```

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::error::{ProbeError, ProbeResult};
use crate::models::{ServerSpec, StatusSnapshot};

/// Public status API used when no override is configured
pub const DEFAULT_API_BASE_URL: &str = "https://api.mcsrvstat.us";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    online: bool,
    players: Option<ApiPlayers>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPlayers {
    online: u64,
    max: u64,
}

impl ApiResponse {
    fn into_snapshot(self) -> StatusSnapshot {
        let player_summary = self
            .players
            .map(|p| format!("{}/{}", p.online, p.max))
            .unwrap_or_else(|| StatusSnapshot::NO_PLAYERS.to_string());

        let version_label = self
            .version
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| StatusSnapshot::NO_VERSION.to_string());

        StatusSnapshot {
            reachable: self.online,
            player_summary,
            version_label,
        }
    }
}

/// HTTP status API client for Java edition servers
#[derive(Debug, Clone)]
pub struct JavaProbe {
    /// HTTP client with configured timeout
    client: Client,

    /// API root, without trailing slash
    base_url: String,

    /// Request timeout, reported in timeout errors
    timeout: Duration,
}

impl JavaProbe {
    /// Create a probe against the public status API
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Http` if the HTTP client cannot be created
    pub fn new(timeout: Duration) -> ProbeResult<Self> {
        Self::with_base_url(DEFAULT_API_BASE_URL, timeout)
    }

    /// Create a probe against a custom API root (used for mock servers)
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Http` if the HTTP client cannot be created
    pub fn with_base_url(base_url: &str, timeout: Duration) -> ProbeResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .user_agent(format!("beacon/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Build the query URL for a server
    pub fn status_url(&self, spec: &ServerSpec) -> String {
        format!("{}/2/{}", self.base_url, spec.endpoint())
    }

    /// Query the status API for one server
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Timeout` when the request exceeds the timeout,
    /// `ProbeError::Status` on a non-success response and `ProbeError::Decode`
    /// when the body is not the expected JSON document.
    pub async fn query(&self, spec: &ServerSpec) -> ProbeResult<StatusSnapshot> {
        let url = self.status_url(spec);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout(self.timeout.as_millis() as u64)
            } else {
                ProbeError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: ApiResponse = serde_json::from_str(&body)
            .map_err(|e| ProbeError::decode(format!("invalid status JSON: {e}")))?;

        Ok(parsed.into_snapshot())
    }
}
