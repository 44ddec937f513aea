//! beacon - Minecraft server status board for Discord
//!
//! Periodically probes a configured set of Minecraft servers and keeps a
//! single Discord embed up to date with their status, editing the same
//! message on every refresh.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration file and environment overrides
//! - [`models`] - Server descriptors, groups and status snapshots
//! - [`probe`] - Java (status API) and Bedrock (RakNet) probes
//! - [`render`] - Status document rendering
//! - [`storage`] - Persistent record of the status message id
//! - [`sink`] - Destination channel abstraction
//! - [`reconciler`] - One refresh tick: probe, render, edit or create
//! - [`scheduler`] - Fixed-interval tick loop
//! - [`discord`] - Gateway session, `/ping` and the Discord sink
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use beacon::config::Config;
//! use beacon::discord::DiscordSink;
//! use beacon::reconciler::Reconciler;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let sink = DiscordSink::from_token(&config.discord.token, config.discord.channel_id);
//!     let reconciler = Reconciler::from_config(&config, Arc::new(sink))?;
//!     let report = reconciler.tick().await?;
//!     println!("{}", report.outcome);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod discord;
pub mod error;
pub mod models;
pub mod probe;
pub mod reconciler;
pub mod render;
pub mod scheduler;
pub mod sink;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{BeaconErrorTrait, Error, ErrorCategory, Result};
    pub use crate::models::{
        ArtifactRecord, GroupStyle, ProtocolKind, ServerGroup, ServerSpec, StatusSnapshot,
    };
    pub use crate::probe::{Prober, StatusProbe};
    pub use crate::reconciler::{Reconciler, TickOutcome, TickReport};
    pub use crate::render::{RenderedDocument, Renderer};
    pub use crate::scheduler::Scheduler;
    pub use crate::sink::{ChannelSink, MemorySink};
    pub use crate::storage::ArtifactStore;
}

// Direct re-exports for convenience
pub use models::{ServerGroup, ServerSpec, StatusSnapshot};
