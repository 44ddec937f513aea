//! Game server status probes
//!
//! Probing is a total function: whatever goes wrong on the wire, the caller
//! receives a [`StatusSnapshot`], falling back to
//! [`StatusSnapshot::unreachable`]. Failures are logged here and never
//! propagated.
//!
//! # Transports
//!
//! - [`java`] - HTTP JSON status API
//! - [`bedrock`] - RakNet unconnected ping over UDP
//!
//! Servers of [`ProtocolKind::Unknown`] are never contacted.

pub mod bedrock;
pub mod error;
pub mod java;

use async_trait::async_trait;
use futures::future::join_all;
use std::time::Duration;

pub use bedrock::BedrockProbe;
pub use error::{ProbeError, ProbeResult};
pub use java::JavaProbe;

use crate::models::{ProbedGroup, ProtocolKind, ServerGroup, ServerSpec, StatusSnapshot};

/// Source of status snapshots
///
/// Implementations must never fail: any error becomes an unreachable
/// snapshot.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    /// Query one server
    async fn probe(&self, spec: &ServerSpec) -> StatusSnapshot;
}

/// Probe that dispatches on the server's protocol kind
#[derive(Debug, Clone)]
pub struct Prober {
    java: JavaProbe,
    bedrock: BedrockProbe,
}

impl Prober {
    /// Create a prober using the public Java status API
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Http` if the HTTP client cannot be created
    pub fn new(timeout: Duration) -> ProbeResult<Self> {
        Ok(Self {
            java: JavaProbe::new(timeout)?,
            bedrock: BedrockProbe::new(timeout),
        })
    }

    /// Create a prober with a custom Java status API root
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Http` if the HTTP client cannot be created
    pub fn with_api_base_url(api_base_url: &str, timeout: Duration) -> ProbeResult<Self> {
        Ok(Self {
            java: JavaProbe::with_base_url(api_base_url, timeout)?,
            bedrock: BedrockProbe::new(timeout),
        })
    }

    async fn try_probe(&self, spec: &ServerSpec) -> ProbeResult<StatusSnapshot> {
        match spec.kind {
            ProtocolKind::Java => self.java.query(spec).await,
            ProtocolKind::Bedrock => self.bedrock.query(spec).await,
            ProtocolKind::Unknown => Err(ProbeError::UnsupportedKind),
        }
    }
}

#[async_trait]
impl StatusProbe for Prober {
    async fn probe(&self, spec: &ServerSpec) -> StatusSnapshot {
        match self.try_probe(spec).await {
            Ok(snapshot) => {
                tracing::debug!(
                    server = %spec.name,
                    endpoint = %spec.endpoint(),
                    reachable = snapshot.reachable,
                    players = %snapshot.player_summary,
                    "Server probed"
                );
                snapshot
            }
            Err(ProbeError::UnsupportedKind) => {
                tracing::debug!(
                    server = %spec.name,
                    kind = %spec.kind,
                    "Skipping server with unsupported protocol kind"
                );
                StatusSnapshot::unreachable()
            }
            Err(e) => {
                tracing::warn!(
                    server = %spec.name,
                    endpoint = %spec.endpoint(),
                    kind = %spec.kind,
                    transient = e.is_transient(),
                    error = %e,
                    "Server probe failed"
                );
                StatusSnapshot::unreachable()
            }
        }
    }
}

/// Probe every server of every group concurrently
///
/// All probes are issued at once and all are awaited. The result preserves
/// group order and server order regardless of completion order.
pub async fn probe_groups(probe: &dyn StatusProbe, groups: &[ServerGroup]) -> Vec<ProbedGroup> {
    let per_group = groups.iter().map(|group| async move {
        let snapshots = join_all(group.servers.iter().map(|spec| probe.probe(spec))).await;

        ProbedGroup {
            name: group.name.clone(),
            style: group.style,
            entries: group.servers.iter().cloned().zip(snapshots).collect(),
        }
    });

    join_all(per_group).await
}
