//! Scheduled refresh of the live dashboard panels.
//!
//! Each panel has its own interval. A tick refetches the panel and
//! publishes it through a `watch` channel, so readers always see the most
//! recent value and an older result can never overwrite a newer one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::PollingConfig;
use crate::error::Result;
use crate::models::{CalendarEvent, FamilyMemberStatus, SystemHealth};
use crate::source::Backend;

/// Latest published state of the live panels.
///
/// `None` means the panel has not loaded yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub family: Option<Vec<FamilyMemberStatus>>,
    pub upcoming: Option<Vec<CalendarEvent>>,
    pub health: Option<SystemHealth>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Which panel a tick refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Family,
    Events,
    Health,
}

/// Periodically refetches the family, events and health panels.
pub struct Poller {
    backend: Arc<dyn Backend>,
    intervals: PollingConfig,
    upcoming_limit: usize,
    tx: watch::Sender<DashboardSnapshot>,
    /// Atomic flag for stop signaling
    running: Arc<AtomicBool>,
}

impl Poller {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, intervals: PollingConfig, upcoming_limit: usize) -> Self {
        let (tx, _rx) = watch::channel(DashboardSnapshot::default());
        Self {
            backend,
            intervals,
            upcoming_limit,
            tx,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Receiver that observes every publication.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.tx.subscribe()
    }

    /// Copy of the current snapshot.
    #[must_use]
    pub fn latest(&self) -> DashboardSnapshot {
        self.tx.borrow().clone()
    }

    /// Refetch one panel and publish it.
    ///
    /// A failed fetch keeps the previous value, except health, which
    /// falls back to unhealthy.
    pub async fn refresh(&self, panel: Panel, now: DateTime<Utc>) {
        match panel {
            Panel::Family => match self.backend.family_dashboard().await {
                Ok(family) => {
                    debug!(members = family.len(), "Family refreshed");
                    self.publish(now, |snap| snap.family = Some(family));
                }
                Err(err) => warn!("Family refresh failed, keeping previous data: {err}"),
            },
            Panel::Events => match self.backend.upcoming_events(now, self.upcoming_limit).await {
                Ok(events) => {
                    debug!(events = events.len(), "Upcoming events refreshed");
                    self.publish(now, |snap| snap.upcoming = Some(events));
                }
                Err(err) => warn!("Events refresh failed, keeping previous data: {err}"),
            },
            Panel::Health => {
                let health = self.backend.health().await.unwrap_or_else(|err| {
                    warn!("Health check failed: {err}");
                    SystemHealth::unhealthy()
                });
                self.publish(now, |snap| snap.health = Some(health));
            }
        }
    }

    /// Refresh every panel once.
    pub async fn refresh_all(&self, now: DateTime<Utc>) {
        futures::join!(
            self.refresh(Panel::Family, now),
            self.refresh(Panel::Events, now),
            self.refresh(Panel::Health, now),
        );
    }

    fn publish(&self, now: DateTime<Utc>, apply: impl FnOnce(&mut DashboardSnapshot)) {
        self.tx.send_modify(|snap| {
            apply(snap);
            snap.refreshed_at = Some(now);
        });
    }

    /// Run the refresh loop until [`stop`](Self::stop) is called.
    ///
    /// Every panel refreshes immediately, then on its own interval.
    pub async fn run(&self) -> Result<()> {
        info!(
            "Polling family every {}, events every {}, health every {}",
            humantime::format_duration(self.intervals.family()),
            humantime::format_duration(self.intervals.events()),
            humantime::format_duration(self.intervals.health()),
        );

        let mut family = interval(self.intervals.family());
        let mut events = interval(self.intervals.events());
        let mut health = interval(self.intervals.health());
        for timer in [&mut family, &mut events, &mut health] {
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        loop {
            // Check if we should stop
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            tokio::select! {
                _ = family.tick() => self.refresh(Panel::Family, Utc::now()).await,
                _ = events.tick() => self.refresh(Panel::Events, Utc::now()).await,
                _ = health.tick() => self.refresh(Panel::Health, Utc::now()).await,
                () = tokio::time::sleep(Duration::from_secs(1)) => {
                    // Periodic stop check
                }
            }
        }

        info!("Poller stopped");
        Ok(())
    }

    /// Stop the poller.
    ///
    /// This method is synchronous as it only sets an atomic flag.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
