//! Status refresh reconciliation
//!
//! One tick brings the channel in line with the current server state:
//!
//! ```text
//!  resolve channel ──✗──▶ abort tick (record untouched)
//!        │
//!  load record, probe all servers (concurrently), render
//!        │
//!  embedId set? ──yes──▶ edit message ──ok──▶ done (Edited)
//!        │                    │
//!        no                 failed ──▶ clear embedId, save
//!        │                    │
//!        ▼                    ▼
//!  create message, store its id, save (Created / Recreated)
//! ```
//!
//! The stored id may point at a message that was deleted behind our back.
//! Instead of checking existence before every edit, a failed edit falls
//! through to creating a new message within the same tick.

use chrono::Local;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{ArtifactRecord, ServerGroup};
use crate::probe::{probe_groups, Prober, StatusProbe};
use crate::render::{RenderedDocument, Renderer};
use crate::sink::ChannelSink;
use crate::storage::ArtifactStore;

/// What a tick did to the status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Existing message edited in place
    Edited,
    /// New message posted; no message was known
    Created,
    /// Edit of the known message failed; a new one was posted
    Recreated,
    /// Another tick was still running; nothing was done
    Skipped,
}

impl TickOutcome {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Edited => "edited",
            Self::Created => "created",
            Self::Recreated => "recreated",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary of one tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub outcome: TickOutcome,
    /// Id of the message now holding the status, if any
    pub artifact_id: Option<String>,
    pub servers_online: usize,
    pub servers_total: usize,
    pub elapsed: Duration,
}

impl TickReport {
    fn skipped() -> Self {
        Self {
            outcome: TickOutcome::Skipped,
            artifact_id: None,
            servers_online: 0,
            servers_total: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Keeps exactly one status message in the destination channel up to date
pub struct Reconciler {
    groups: Vec<ServerGroup>,
    probe: Arc<dyn StatusProbe>,
    renderer: Renderer,
    sink: Arc<dyn ChannelSink>,
    store: ArtifactStore,
    tick_lock: Mutex<()>,
}

impl Reconciler {
    /// Create a reconciler with the default renderer
    pub fn new(
        groups: Vec<ServerGroup>,
        probe: Arc<dyn StatusProbe>,
        sink: Arc<dyn ChannelSink>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            groups,
            probe,
            renderer: Renderer::default(),
            sink,
            store,
            tick_lock: Mutex::new(()),
        }
    }

    /// Build a reconciler from configuration, posting through `sink`
    ///
    /// # Errors
    ///
    /// Returns `Error::Probe` if the HTTP client for the status API cannot be
    /// created.
    pub fn from_config(config: &Config, sink: Arc<dyn ChannelSink>) -> Result<Self> {
        let prober =
            Prober::with_api_base_url(&config.status.api_base_url, config.probe_timeout())?;
        let renderer = Renderer::new(config.embed.title.clone(), config.embed.color_value());

        Ok(Self::new(
            config.groups.clone(),
            Arc::new(prober),
            sink,
            ArtifactStore::new(config.storage.record_path.clone()),
        )
        .with_renderer(renderer))
    }

    /// Replace the renderer
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Artifact store used by this reconciler
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Run one tick
    ///
    /// Ticks are mutually exclusive: if another tick is in progress this
    /// returns immediately with [`TickOutcome::Skipped`].
    ///
    /// # Errors
    ///
    /// Returns `Error::ChannelUnavailable` when the destination channel cannot
    /// be resolved (the record is left untouched), `Error::Sink` when creating
    /// the message fails and `Error::Store` when the record cannot be saved.
    pub async fn tick(&self) -> Result<TickReport> {
        let Ok(_guard) = self.tick_lock.try_lock() else {
            tracing::warn!("Previous tick still running; skipping this one");
            return Ok(TickReport::skipped());
        };

        self.reconcile().await
    }

    async fn reconcile(&self) -> Result<TickReport> {
        let started = Instant::now();

        self.sink
            .resolve_channel()
            .await
            .map_err(Error::ChannelUnavailable)?;

        let mut record = self.store.load();

        let probed = probe_groups(self.probe.as_ref(), &self.groups).await;
        let servers_online = probed.iter().map(|g| g.online_count()).sum();
        let servers_total = probed.iter().map(|g| g.entries.len()).sum();

        let document = self.renderer.render(&probed, Local::now());
        let (outcome, artifact_id) = self.upsert(&mut record, &document).await?;

        Ok(TickReport {
            outcome,
            artifact_id: Some(artifact_id),
            servers_online,
            servers_total,
            elapsed: started.elapsed(),
        })
    }

    async fn upsert(
        &self,
        record: &mut ArtifactRecord,
        document: &RenderedDocument,
    ) -> Result<(TickOutcome, String)> {
        let mut outcome = TickOutcome::Created;

        if let Some(id) = record.embed_id.clone() {
            match self.sink.edit_artifact(&id, document).await {
                Ok(()) => return Ok((TickOutcome::Edited, id)),
                Err(e) => {
                    tracing::warn!(
                        sink = self.sink.name(),
                        embed_id = %id,
                        error = %e,
                        "Failed to edit status message; posting a new one"
                    );
                    record.embed_id = None;
                    self.store.save(record)?;
                    outcome = TickOutcome::Recreated;
                }
            }
        }

        let id = self.sink.create_artifact(document).await?;
        record.embed_id = Some(id.clone());
        self.store.save(record)?;

        tracing::info!(sink = self.sink.name(), embed_id = %id, "Posted new status message");
        Ok((outcome, id))
    }
}
