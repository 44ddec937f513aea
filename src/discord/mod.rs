//! Discord gateway integration
//!
//! [`DiscordBot`] keeps a gateway session alive, reconnecting with backoff
//! whenever the client exits with an error. On the first `ready` event it
//! registers `/ping` and starts the [`Scheduler`]; later `ready` events
//! (after a reconnect) only re-register the command.

pub mod commands;
pub mod sink;

pub use sink::DiscordSink;

use async_trait::async_trait;
use serenity::all::{
    Command, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    EventHandler, GatewayIntents, Interaction, Ready,
};
use serenity::gateway::ShardManager;
use serenity::prelude::TypeMapKey;
use serenity::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::scheduler::Scheduler;
use crate::utils::retry::{with_restart, RetryConfig};

struct ShardManagerKey;

impl TypeMapKey for ShardManagerKey {
    type Value = Arc<ShardManager>;
}

/// Gateway event handler
struct Handler {
    scheduler: Scheduler,
    scheduler_started: Arc<AtomicBool>,
}

impl Handler {
    fn start_scheduler_once(&self) {
        if self.scheduler_started.swap(true, Ordering::SeqCst) {
            debug!("Scheduler already running; ignoring repeated ready event");
            return;
        }

        let scheduler = self.scheduler.clone();
        tokio::spawn(async move {
            scheduler.start().await;
        });
    }
}

/// Heartbeat latency of the shard that delivered `ctx`
async fn shard_latency(ctx: &Context) -> Option<Duration> {
    let data = ctx.data.read().await;
    let manager = data.get::<ShardManagerKey>()?;
    let runners = manager.runners.lock().await;
    runners.get(&ctx.shard_id).and_then(|runner| runner.latency)
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.tag(), guilds = ready.guilds.len(), "Logged in to Discord");

        if let Err(e) = Command::create_global_command(&ctx.http, commands::register_ping()).await
        {
            warn!(error = %e, "Failed to register /ping command");
        }

        self.start_scheduler_once();
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        if command.data.name != commands::PING {
            debug!(command = %command.data.name, "Ignoring unknown command");
            return;
        }

        let reply = commands::ping_reply(shard_latency(&ctx).await);
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(reply),
        );

        if let Err(e) = command.create_response(&ctx.http, response).await {
            warn!(error = %e, "Failed to answer /ping");
        }
    }
}

/// Supervised Discord gateway session
pub struct DiscordBot {
    token: String,
    scheduler: Scheduler,
    scheduler_started: Arc<AtomicBool>,
    retry: RetryConfig,
    shard_manager: Mutex<Option<Arc<ShardManager>>>,
}

impl DiscordBot {
    /// Create a bot that will drive `scheduler` once connected
    pub fn new(token: impl Into<String>, scheduler: Scheduler) -> Self {
        Self {
            token: token.into(),
            scheduler,
            scheduler_started: Arc::new(AtomicBool::new(false)),
            retry: RetryConfig::with_delays(5_000, 300_000),
            shard_manager: Mutex::new(None),
        }
    }

    /// Connect and stay connected
    ///
    /// Returns only when the client shuts down cleanly, which happens after
    /// [`shutdown`](Self::shutdown).
    pub async fn run(&self) {
        with_restart(&self.retry, || self.connect()).await
    }

    async fn connect(&self) -> Result<(), serenity::Error> {
        let handler = Handler {
            scheduler: self.scheduler.clone(),
            scheduler_started: Arc::clone(&self.scheduler_started),
        };

        let mut client = Client::builder(&self.token, GatewayIntents::GUILDS)
            .event_handler(handler)
            .await?;

        {
            let mut data = client.data.write().await;
            data.insert::<ShardManagerKey>(Arc::clone(&client.shard_manager));
        }
        *self.shard_manager.lock().await = Some(Arc::clone(&client.shard_manager));

        info!("Connecting to Discord gateway");
        client.start().await
    }

    /// Close all gateway shards
    pub async fn shutdown(&self) {
        if let Some(manager) = self.shard_manager.lock().await.take() {
            manager.shutdown_all().await;
        }
    }
}
