//! Destination channel for the status document
//!
//! The reconciler only needs four things from the chat platform: check that
//! the destination channel exists and accepts messages, post a new message,
//! and replace the content of an existing one by id. [`ChannelSink`] captures
//! exactly that, so the reconciliation logic stays independent of Discord.

pub mod memory;

use async_trait::async_trait;

use crate::render::RenderedDocument;

pub use memory::MemorySink;

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Errors that can occur during sink operations
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Destination channel does not exist or is not visible
    #[error("Channel {0} not found")]
    ChannelNotFound(String),

    /// Destination channel exists but cannot hold messages
    #[error("Channel {0} is not a text channel")]
    NotTextChannel(String),

    /// Message with the given id is gone
    #[error("Message {0} not found")]
    ArtifactNotFound(String),

    /// Stored id is not a valid platform identifier
    #[error("Invalid message id: {0}")]
    InvalidArtifactId(String),

    /// Missing permission for the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Any other platform or transport error
    #[error("Platform error: {0}")]
    Platform(String),
}

/// Trait for status message destinations
///
/// Implementations are bound to one destination channel at construction.
#[async_trait]
pub trait ChannelSink: Send + Sync {
    /// Get the sink name (used in logs)
    fn name(&self) -> &str;

    /// Check that the destination channel exists and accepts messages
    async fn resolve_channel(&self) -> SinkResult<()>;

    /// Post a new message and return its id
    async fn create_artifact(&self, document: &RenderedDocument) -> SinkResult<String>;

    /// Locate the message with `id` and replace its content
    async fn edit_artifact(&self, id: &str, document: &RenderedDocument) -> SinkResult<()>;
}
