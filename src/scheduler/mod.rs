//! Fixed-interval tick scheduler
//!
//! Fires the [`Reconciler`] once immediately, then once per interval until
//! stopped. Ticks run inline in the loop, so one tick always finishes before
//! the next can start; intervals missed while a slow tick was running are
//! skipped rather than replayed in a burst.
//!
//! # Example
//!
//! ```ignore
//! use beacon::scheduler::Scheduler;
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::new(reconciler, Duration::from_secs(60));
//! let handle = scheduler.clone();
//! tokio::spawn(async move { handle.start().await });
//!
//! // later, on shutdown
//! scheduler.stop();
//! ```

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::error::{BeaconErrorTrait, Error};
use crate::reconciler::{Reconciler, TickOutcome, TickReport};

/// Drives the reconciler on a fixed interval
#[derive(Clone)]
pub struct Scheduler {
    reconciler: Arc<Reconciler>,
    interval: Duration,
    stop_tx: Arc<watch::Sender<bool>>,
}

impl Scheduler {
    /// Create a new scheduler
    pub fn new(reconciler: Arc<Reconciler>, interval: Duration) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            reconciler,
            interval,
            stop_tx: Arc::new(stop_tx),
        }
    }

    /// Tick interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the tick loop until [`stop`](Self::stop) is called
    ///
    /// Returns the number of ticks that were run.
    pub async fn start(&self) -> u64 {
        let mut stop_rx = self.stop_tx.subscribe();
        if *stop_rx.borrow() {
            return 0;
        }

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Status scheduler started"
        );

        let mut ticks: u64 = 0;
        loop {
            tokio::select! {
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    ticks += 1;
                    self.run_once().await;
                }
            }
        }

        tracing::info!(ticks = ticks, "Status scheduler stopped");
        ticks
    }

    /// Stop the tick loop; an in-flight tick is allowed to finish
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Check if the scheduler has been asked to stop
    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Run one tick and log its result
    ///
    /// Errors never escape: the next tick starts from scratch.
    pub async fn run_once(&self) -> Option<TickReport> {
        match self.reconciler.tick().await {
            Ok(report) => {
                if report.outcome != TickOutcome::Skipped {
                    tracing::info!(
                        outcome = %report.outcome,
                        embed_id = ?report.artifact_id,
                        online = report.servers_online,
                        total = report.servers_total,
                        elapsed_ms = report.elapsed.as_millis() as u64,
                        "Status message refreshed"
                    );
                }
                Some(report)
            }
            Err(e) => {
                log_tick_error(&e);
                None
            }
        }
    }
}

fn log_tick_error(e: &Error) {
    match e {
        Error::ChannelUnavailable(_) => tracing::error!(
            category = %e.category(),
            error = %e,
            "Destination channel unavailable; tick aborted"
        ),
        _ => tracing::warn!(
            category = %e.category(),
            recoverable = e.is_recoverable(),
            error = %e,
            "Status refresh failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupStyle, ProtocolKind, ServerGroup, ServerSpec, StatusSnapshot};
    use crate::probe::StatusProbe;
    use crate::sink::MemorySink;
    use crate::storage::ArtifactStore;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct OnlineProbe;

    #[async_trait]
    impl StatusProbe for OnlineProbe {
        async fn probe(&self, _spec: &ServerSpec) -> StatusSnapshot {
            StatusSnapshot::online("2/8", "1.21")
        }
    }

    fn scheduler(dir: &TempDir, sink: Arc<MemorySink>, interval: Duration) -> Scheduler {
        let groups = vec![ServerGroup::new("Main Servers", GroupStyle::Detailed)
            .with_server(ServerSpec::new("Hub", "hub.example", 25565, ProtocolKind::Java))];
        let reconciler = Reconciler::new(
            groups,
            Arc::new(OnlineProbe),
            sink,
            ArtifactStore::new(dir.path().join("embed.json")),
        );
        Scheduler::new(Arc::new(reconciler), interval)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_immediately_then_every_interval() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(MemorySink::new());
        let scheduler = scheduler(&dir, sink.clone(), Duration::from_secs(60));

        let stopper = scheduler.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(125)).await;
            stopper.stop();
        });

        let ticks = scheduler.start().await;

        assert_eq!(ticks, 3);
        assert_eq!(sink.create_count(), 1);
        assert_eq!(sink.edit_count(), 2);
        assert!(scheduler.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_do_not_stop_the_loop() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(MemorySink::new());
        sink.set_channel_available(false);
        let scheduler = scheduler(&dir, sink.clone(), Duration::from_secs(60));

        let stopper = scheduler.clone();
        let toggler = sink.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(90)).await;
            toggler.set_channel_available(true);
            tokio::time::sleep(Duration::from_secs(60)).await;
            stopper.stop();
        });

        let ticks = scheduler.start().await;

        assert_eq!(ticks, 3);
        assert_eq!(sink.resolve_count(), 3);
        assert_eq!(sink.create_count(), 1);
    }

    #[tokio::test]
    async fn test_stopped_scheduler_does_not_tick() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(MemorySink::new());
        let scheduler = scheduler(&dir, sink.clone(), Duration::from_secs(60));

        scheduler.stop();
        assert_eq!(scheduler.start().await, 0);
        assert_eq!(sink.resolve_count(), 0);
    }

    #[tokio::test]
    async fn test_run_once_reports_outcome() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(MemorySink::new());
        let scheduler = scheduler(&dir, sink, Duration::from_secs(60));

        let report = scheduler.run_once().await.unwrap();
        assert_eq!(report.outcome, TickOutcome::Created);
        assert_eq!(report.servers_online, 1);
    }
}
