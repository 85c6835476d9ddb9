//! Channel-based snapshot provider.
//!
//! Receives fleet snapshots via a tokio watch channel. Useful when snapshots
//! are pushed by an upstream integration rather than polled from a file, and
//! for driving the monitor in tests.

use tokio::sync::watch;

use super::{FleetSnapshot, SnapshotProvider, SourceError};

/// A provider that serves the most recently pushed snapshot.
#[derive(Debug)]
pub struct ChannelProvider {
    receiver: watch::Receiver<FleetSnapshot>,
    description: String,
}

impl ChannelProvider {
    /// Create a provider from the receiving end of a watch channel.
    pub fn new(receiver: watch::Receiver<FleetSnapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
        }
    }

    /// Create a channel pair.
    ///
    /// Returns (sender, provider) where the sender pushes snapshots and the
    /// provider can be handed to the monitor.
    pub fn create(source_description: &str) -> (watch::Sender<FleetSnapshot>, Self) {
        let (tx, rx) = watch::channel(FleetSnapshot::default());
        let provider = Self::new(rx, source_description);
        (tx, provider)
    }
}

impl SnapshotProvider for ChannelProvider {
    fn load(&mut self) -> Result<FleetSnapshot, SourceError> {
        if self.receiver.has_changed().is_err() {
            // Sender dropped: the feed is gone, not merely empty
            return Err(SourceError::Unavailable("channel closed".to_string()));
        }
        Ok(self.receiver.borrow_and_update().clone())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
