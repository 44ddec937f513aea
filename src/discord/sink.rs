//! Discord channel sink
//!
//! Posts and edits the status embed through the Discord REST API. The sink
//! owns its own [`Http`] client, so it keeps working while the gateway
//! connection is being re-established.

use async_trait::async_trait;
use serenity::all::{Channel, ChannelId, ChannelType, MessageId, Timestamp};
use serenity::builder::{CreateEmbed, CreateEmbedFooter, CreateMessage, EditMessage};
use serenity::http::Http;
use std::sync::Arc;

use crate::render::RenderedDocument;
use crate::sink::{ChannelSink, SinkError, SinkResult};

/// Sink bound to one Discord text channel
#[derive(Clone)]
pub struct DiscordSink {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordSink {
    /// Create a sink for `channel_id`
    ///
    /// # Panics
    ///
    /// Panics if `channel_id` is 0; configuration validation rejects that.
    pub fn new(http: Arc<Http>, channel_id: u64) -> Self {
        Self {
            http,
            channel_id: ChannelId::new(channel_id),
        }
    }

    /// Create a sink with a fresh REST client for `token`
    pub fn from_token(token: &str, channel_id: u64) -> Self {
        Self::new(Arc::new(Http::new(token)), channel_id)
    }

    fn channel_label(&self) -> String {
        self.channel_id.get().to_string()
    }
}

/// Channel types that can hold messages
fn accepts_messages(kind: ChannelType) -> bool {
    matches!(
        kind,
        ChannelType::Text
            | ChannelType::News
            | ChannelType::PublicThread
            | ChannelType::PrivateThread
            | ChannelType::NewsThread
            | ChannelType::Voice
            | ChannelType::Stage
    )
}

/// Parse a stored message id
fn parse_message_id(id: &str) -> SinkResult<MessageId> {
    match id.trim().parse::<u64>() {
        Ok(value) if value != 0 => Ok(MessageId::new(value)),
        _ => Err(SinkError::InvalidArtifactId(id.to_string())),
    }
}

/// Map a serenity error, turning 404 into `not_found` and 403 into a
/// permission error
fn classify(err: serenity::Error, not_found: SinkError) -> SinkError {
    if let serenity::Error::Http(http_err) = &err {
        match http_err.status_code().map(|s| s.as_u16()) {
            Some(404) => return not_found,
            Some(403) => return SinkError::PermissionDenied(err.to_string()),
            _ => {}
        }
    }
    SinkError::Platform(err.to_string())
}

/// Build the Discord embed for a document
pub fn build_embed(document: &RenderedDocument) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(document.title.clone())
        .colour(document.color)
        .footer(CreateEmbedFooter::new(document.footer.clone()));

    if let Ok(timestamp) = Timestamp::from_unix_timestamp(document.timestamp.timestamp()) {
        embed = embed.timestamp(timestamp);
    }

    for field in &document.fields {
        embed = embed.field(field.name.clone(), field.value.clone(), field.inline);
    }

    embed
}

#[async_trait]
impl ChannelSink for DiscordSink {
    fn name(&self) -> &str {
        "discord"
    }

    async fn resolve_channel(&self) -> SinkResult<()> {
        let channel = self
            .channel_id
            .to_channel(&self.http)
            .await
            .map_err(|e| classify(e, SinkError::ChannelNotFound(self.channel_label())))?;

        match channel {
            Channel::Guild(guild_channel) if accepts_messages(guild_channel.kind) => Ok(()),
            Channel::Private(_) => Ok(()),
            _ => Err(SinkError::NotTextChannel(self.channel_label())),
        }
    }

    async fn create_artifact(&self, document: &RenderedDocument) -> SinkResult<String> {
        let message = self
            .channel_id
            .send_message(&self.http, CreateMessage::new().embed(build_embed(document)))
            .await
            .map_err(|e| classify(e, SinkError::ChannelNotFound(self.channel_label())))?;

        Ok(message.id.get().to_string())
    }

    async fn edit_artifact(&self, id: &str, document: &RenderedDocument) -> SinkResult<()> {
        let message_id = parse_message_id(id)?;

        let mut message = self
            .channel_id
            .message(&self.http, message_id)
            .await
            .map_err(|e| classify(e, SinkError::ArtifactNotFound(id.to_string())))?;

        message
            .edit(&self.http, EditMessage::new().embed(build_embed(document)))
            .await
            .map_err(|e| classify(e, SinkError::ArtifactNotFound(id.to_string())))
    }
}
