//! Alert delivery and subscription.
//!
//! Delivery is best-effort: a failure to one subscriber is logged and
//! swallowed, never retried for that occurrence, and never affects delivery
//! to other subscribers.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Opaque handle identifying an alert recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriberId(pub i64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload of a dwell alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub unit_id: String,
    pub dwell_raw: String,
    pub limit_minutes: u64,
    pub reference: String,
}

/// A delivery to one subscriber failed.
#[derive(Debug, Error)]
#[error("delivery to {subscriber} failed: {reason}")]
pub struct DeliveryError {
    pub subscriber: SubscriberId,
    pub reason: String,
}

/// Trait for the transport that delivers an alert to one subscriber.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subscriber: SubscriberId, alert: &Alert) -> Result<(), DeliveryError>;
}

/// Set of alert subscribers.
///
/// Append-only from the monitor's perspective: an external subscribe action
/// adds entries, the monitor only reads. Reads take a copy so a tick sees a
/// consistent list even if a subscribe races with it.
#[derive(Debug, Clone, Default)]
pub struct SubscriberSet {
    inner: Arc<RwLock<BTreeSet<SubscriberId>>>,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber. Idempotent; returns false if already present.
    pub fn subscribe(&self, subscriber: SubscriberId) -> bool {
        self.inner.write().insert(subscriber)
    }

    /// Copy of the current subscriber list, in id order.
    pub fn snapshot(&self) -> Vec<SubscriberId> {
        self.inner.read().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// A notifier that records alerts on the log instead of a real transport.
///
/// Default for the binary when no transport is wired up.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, subscriber: SubscriberId, alert: &Alert) -> Result<(), DeliveryError> {
        info!(
            %subscriber,
            unit = %alert.unit_id,
            dwell = %alert.dwell_raw,
            limit_minutes = alert.limit_minutes,
            reference = %alert.reference,
            "dwell alert"
        );
        Ok(())
    }
}

/// A notifier that forwards deliveries through a tokio mpsc channel.
///
/// Useful for integrations that drain alerts elsewhere, and for observing
/// fan-out in tests.
#[derive(Debug)]
pub struct ChannelNotifier {
    sender: tokio::sync::mpsc::Sender<(SubscriberId, Alert)>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    pub fn create(
        buffer: usize,
    ) -> (Self, tokio::sync::mpsc::Receiver<(SubscriberId, Alert)>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Self { sender: tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn send(&self, subscriber: SubscriberId, alert: &Alert) -> Result<(), DeliveryError> {
        self.sender
            .send((subscriber, alert.clone()))
            .await
            .map_err(|e| DeliveryError {
                subscriber,
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_is_idempotent() {
        let set = SubscriberSet::new();
        assert!(set.subscribe(SubscriberId(7)));
        assert!(!set.subscribe(SubscriberId(7)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_snapshot_is_ordered_copy() {
        let set = SubscriberSet::new();
        set.subscribe(SubscriberId(3));
        set.subscribe(SubscriberId(1));
        set.subscribe(SubscriberId(2));
        assert_eq!(
            set.snapshot(),
            vec![SubscriberId(1), SubscriberId(2), SubscriberId(3)]
        );
    }

    #[test]
    fn test_channel_notifier_forwards() {
        let (notifier, mut rx) = ChannelNotifier::create(4);
        let alert = Alert {
            unit_id: "U-1".to_string(),
            dwell_raw: "3h".to_string(),
            limit_minutes: 120,
            reference: "Km 42".to_string(),
        };

        tokio_test::block_on(async {
            notifier.send(SubscriberId(9), &alert).await.unwrap();
        });

        let (subscriber, received) = rx.try_recv().unwrap();
        assert_eq!(subscriber, SubscriberId(9));
        assert_eq!(received, alert);
    }

    #[test]
    fn test_channel_notifier_closed_is_delivery_failure() {
        let (notifier, rx) = ChannelNotifier::create(1);
        drop(rx);
        let alert = Alert {
            unit_id: "U-1".to_string(),
            dwell_raw: "3h".to_string(),
            limit_minutes: 120,
            reference: String::new(),
        };
        let result = tokio_test::block_on(notifier.send(SubscriberId(1), &alert));
        assert!(result.is_err());
    }
}
