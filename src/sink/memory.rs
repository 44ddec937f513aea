//! In-memory channel sink
//!
//! Keeps messages in a map and counts every operation. Used to exercise the
//! reconciler without a chat platform; external deletion and channel outages
//! can be simulated.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ChannelSink, SinkError, SinkResult};
use crate::render::RenderedDocument;

/// Sink that stores messages in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<BTreeMap<String, RenderedDocument>>,
    next_id: AtomicU64,
    channel_available: AtomicBool,
    fail_edits: AtomicBool,
    resolves: AtomicUsize,
    creates: AtomicUsize,
    edits: AtomicUsize,
    edit_attempts: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink with an available channel
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            channel_available: AtomicBool::new(true),
            ..Default::default()
        }
    }

    /// Make the channel unresolvable (or available again)
    pub fn set_channel_available(&self, available: bool) {
        self.channel_available.store(available, Ordering::SeqCst);
    }

    /// Make every edit fail with a platform error (or succeed again)
    pub fn set_fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    /// Remove a message as if it had been deleted by a moderator
    pub fn delete(&self, id: &str) -> bool {
        self.lock_messages().remove(id).is_some()
    }

    /// Current content of a message
    pub fn message(&self, id: &str) -> Option<RenderedDocument> {
        self.lock_messages().get(id).cloned()
    }

    /// Number of messages currently in the channel
    pub fn message_count(&self) -> usize {
        self.lock_messages().len()
    }

    /// Number of channel resolutions
    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    /// Number of successful creates
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Number of successful edits
    pub fn edit_count(&self) -> usize {
        self.edits.load(Ordering::SeqCst)
    }

    /// Ids of every edit attempt, successful or not, in order
    pub fn edit_attempts(&self) -> Vec<String> {
        self.edit_attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_messages(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, RenderedDocument>> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ChannelSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn resolve_channel(&self) -> SinkResult<()> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        if self.channel_available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SinkError::ChannelNotFound("memory".to_string()))
        }
    }

    async fn create_artifact(&self, document: &RenderedDocument) -> SinkResult<String> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.lock_messages().insert(id.clone(), document.clone());
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn edit_artifact(&self, id: &str, document: &RenderedDocument) -> SinkResult<()> {
        self.edit_attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(id.to_string());

        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(SinkError::Platform("simulated edit failure".to_string()));
        }

        let mut messages = self.lock_messages();
        match messages.get_mut(id) {
            Some(existing) => {
                *existing = document.clone();
                drop(messages);
                self.edits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(SinkError::ArtifactNotFound(id.to_string())),
        }
    }
}
