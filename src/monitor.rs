//! The fleet state monitor and its scheduler.
//!
//! Each tick pulls a snapshot from the provider, classifies every unit,
//! appends to the bounded history, evaluates alert deduplication, and fans
//! resulting alerts out to all current subscribers. One tick runs at a time;
//! state committed during a tick is never rolled back by delivery failures.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::data::alert::{AlertDeduplicator, DEFAULT_COOLDOWN_SECS};
use crate::data::history::{HistoryLog, HistoryRecord, DEFAULT_CAP, DEFAULT_EVICT_BATCH};
use crate::data::status::{classify, Limits};
use crate::notify::{Alert, Notifier, SubscriberSet};
use crate::source::SnapshotProvider;

/// Default evaluation interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
/// Default delay before the first tick.
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(10);

/// Current Unix time in seconds.
fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// The periodic monitor over one fleet feed.
///
/// Owns the history log and alert state outright; nothing else mutates them.
/// The subscriber set is shared so external subscribe actions can land while
/// the monitor runs.
pub struct FleetMonitor {
    provider: Box<dyn SnapshotProvider>,
    notifier: Arc<dyn Notifier>,
    subscribers: SubscriberSet,
    history: Arc<RwLock<HistoryLog>>,
    alerts: AlertDeduplicator,
    limits: Limits,
    cooldown_secs: u64,
    interval: Duration,
    warmup: Duration,
}

impl FleetMonitor {
    /// Create a builder around the two external collaborators.
    pub fn builder(
        provider: Box<dyn SnapshotProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> FleetMonitorBuilder {
        FleetMonitorBuilder::new(provider, notifier)
    }

    /// Shared handle to the subscriber set.
    ///
    /// `subscribe` on the returned set is visible to subsequent ticks.
    pub fn subscribers(&self) -> SubscriberSet {
        self.subscribers.clone()
    }

    /// Classification limits in effect, for report projections.
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Current history contents, oldest first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.history.read().snapshot()
    }

    /// Run one evaluation cycle at the given time.
    ///
    /// A failed or empty snapshot load skips the tick body without mutating
    /// history or alert state; the next scheduled tick retries naturally.
    pub async fn tick(&mut self, now: u64) {
        let snapshot = match self.provider.load() {
            Ok(snapshot) if !snapshot.is_empty() => snapshot,
            Ok(_) => {
                debug!(source = self.provider.description(), "empty snapshot, skipping tick");
                return;
            }
            Err(e) => {
                warn!(source = self.provider.description(), error = %e, "snapshot load failed, skipping tick");
                return;
            }
        };

        let mut records = Vec::with_capacity(snapshot.len());
        let mut fired = Vec::new();

        for (unit_id, unit) in &snapshot {
            let status = classify(unit, &self.limits);
            let qualifies = status.is_dwell_exceeded();

            records.push(HistoryRecord::new(
                now,
                unit_id.clone(),
                unit.speed(),
                status.clone(),
                &unit.reference,
            ));

            if self.alerts.should_alert(unit_id, qualifies, now, self.cooldown_secs) {
                let limit_minutes = unit.dwell_limit(self.limits.dwell_default_minutes);
                info!(unit = %unit_id, dwell = %unit.dwell_raw, limit_minutes, "dwell alert fired");
                fired.push(Alert {
                    unit_id: unit_id.clone(),
                    dwell_raw: unit.dwell_raw.clone(),
                    limit_minutes,
                    reference: unit.reference.clone(),
                });
            }
        }

        // Commit history before any delivery; eviction runs inside append
        {
            let mut history = self.history.write();
            for record in records {
                history.append(record);
            }
        }

        if fired.is_empty() {
            debug!(units = snapshot.len(), "tick complete, no alerts");
            return;
        }

        // Best-effort fan-out: each send is independent, failures are logged
        // and never retried for this occurrence
        let subscribers = self.subscribers.snapshot();
        for alert in &fired {
            for &subscriber in &subscribers {
                if let Err(e) = self.notifier.send(subscriber, alert).await {
                    warn!(%subscriber, unit = %alert.unit_id, error = %e, "alert delivery failed");
                }
            }
        }

        debug!(units = snapshot.len(), alerts = fired.len(), "tick complete");
    }

    /// Start background ticking.
    ///
    /// Spawns a task that waits out the warm-up delay, then ticks on a fixed
    /// interval. A tick that overruns its slot delays the next one instead of
    /// running concurrently with it. Returns a handle for subscription,
    /// history export, and clean shutdown.
    pub fn start(mut self) -> MonitorHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let history = self.history.clone();
        let subscribers = self.subscribers.clone();
        let interval = self.interval;
        let warmup = self.warmup;

        info!(
            source = self.provider.description(),
            interval_secs = interval.as_secs(),
            warmup_secs = warmup.as_secs(),
            "fleet monitor starting"
        );

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(warmup) => {}
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        return;
                    }
                }
            }

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // An in-flight tick always finishes; stop is only
                        // observed between ticks
                        self.tick(epoch_secs()).await;
                    }
                    _ = stop_rx.changed() => {
                        if *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("fleet monitor stopped");
        });

        MonitorHandle {
            stop_tx,
            task,
            history,
            subscribers,
        }
    }
}

impl std::fmt::Debug for FleetMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetMonitor")
            .field("provider", &self.provider)
            .field("limits", &self.limits)
            .field("cooldown_secs", &self.cooldown_secs)
            .field("interval", &self.interval)
            .finish()
    }
}

/// Builder for configuring a [`FleetMonitor`].
pub struct FleetMonitorBuilder {
    provider: Box<dyn SnapshotProvider>,
    notifier: Arc<dyn Notifier>,
    limits: Limits,
    cooldown_secs: u64,
    interval: Duration,
    warmup: Duration,
    history_cap: usize,
    evict_batch: usize,
}

impl FleetMonitorBuilder {
    pub fn new(provider: Box<dyn SnapshotProvider>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            provider,
            notifier,
            limits: Limits::default(),
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            interval: DEFAULT_INTERVAL,
            warmup: DEFAULT_WARMUP,
            history_cap: DEFAULT_CAP,
            evict_batch: DEFAULT_EVICT_BATCH,
        }
    }

    /// Set the classification limits.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the per-unit alert cooldown in seconds.
    pub fn cooldown_secs(mut self, cooldown_secs: u64) -> Self {
        self.cooldown_secs = cooldown_secs;
        self
    }

    /// Set the evaluation interval.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the delay before the first tick.
    pub fn warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }

    /// Set the history cap and eviction batch size.
    pub fn history(mut self, cap: usize, evict_batch: usize) -> Self {
        self.history_cap = cap;
        self.evict_batch = evict_batch;
        self
    }

    pub fn build(self) -> FleetMonitor {
        FleetMonitor {
            provider: self.provider,
            notifier: self.notifier,
            subscribers: SubscriberSet::new(),
            history: Arc::new(RwLock::new(HistoryLog::new(
                self.history_cap,
                self.evict_batch,
            ))),
            alerts: AlertDeduplicator::new(),
            limits: self.limits,
            cooldown_secs: self.cooldown_secs,
            interval: self.interval,
            warmup: self.warmup,
        }
    }
}

/// Handle to a running monitor.
///
/// Exposes the read-only collaborator interfaces while the tick task remains
/// the only writer.
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    history: Arc<RwLock<HistoryLog>>,
    subscribers: SubscriberSet,
}

impl MonitorHandle {
    /// Add an alert subscriber. Idempotent.
    pub fn subscribe(&self, subscriber: crate::notify::SubscriberId) -> bool {
        self.subscribers.subscribe(subscriber)
    }

    /// Current history contents, oldest first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.history.read().snapshot()
    }

    /// History as flat export rows.
    pub fn history_rows(&self) -> Vec<(u64, String, f64, &'static str, String)> {
        self.history.read().rows()
    }

    /// Stop ticking, letting any in-flight tick finish first.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }
}
