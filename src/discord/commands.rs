//! Slash commands
//!
//! Only `/ping` exists. It is answered straight from gateway state and never
//! touches the reconciler.

use serenity::builder::CreateCommand;
use std::time::Duration;

/// Name of the latency command
pub const PING: &str = "ping";

/// Registration payload for `/ping`
pub fn register_ping() -> CreateCommand {
    CreateCommand::new(PING).description("Check the bot's gateway latency")
}

/// Reply text for `/ping`
///
/// `latency` is the last heartbeat round trip of the shard that received the
/// command; it is unknown until the first heartbeat is acknowledged.
pub fn ping_reply(latency: Option<Duration>) -> String {
    match latency {
        Some(latency) => format!("Pong! Latency: {}ms", latency.as_millis()),
        None => "Pong! Latency: unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_reply_with_latency() {
        assert_eq!(
            ping_reply(Some(Duration::from_millis(42))),
            "Pong! Latency: 42ms"
        );
    }

    #[test]
    fn test_ping_reply_before_first_heartbeat() {
        assert_eq!(ping_reply(None), "Pong! Latency: unknown");
    }
}
