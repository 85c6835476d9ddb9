//! # fleetwatch
//!
//! A library and daemon for monitoring fleet-unit telemetry.
//!
//! fleetwatch periodically ingests a snapshot of per-unit telemetry
//! (position, speed, driver assignment, dwell duration, maintenance flag)
//! and turns it into an operational status per unit, a bounded activity
//! history, and deduplicated dwell alerts pushed to subscribers.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      FleetMonitor                         │
//! │  ┌─────────┐   ┌──────────┐   ┌─────────┐   ┌─────────┐  │
//! │  │ source  │──▶│   data   │──▶│ history │   │ notify  │  │
//! │  │ (feed)  │   │(classify)│   │ (ring)  │   │(fan-out)│  │
//! │  └─────────┘   └────┬─────┘   └─────────┘   └────▲────┘  │
//! │                     │          ┌─────────┐       │       │
//! │                     └─────────▶│  dedup  │───────┘       │
//! │                                └─────────┘               │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: snapshot provider abstraction ([`SnapshotProvider`])
//!   with file-polling and channel-push implementations
//! - **[`data`]**: dwell parsing, the status priority chain, the bounded
//!   history log, alert deduplication, and report projections
//! - **[`notify`]**: the [`Notifier`] delivery trait and subscriber set
//! - **[`monitor`]**: the fixed-interval scheduler tying it together
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use fleetwatch::{FleetMonitor, FileProvider, LogNotifier, SubscriberId};
//!
//! # tokio_test::block_on(async {
//! let provider = Box::new(FileProvider::new("unidades.json"));
//! let monitor = FleetMonitor::builder(provider, Arc::new(LogNotifier)).build();
//! let handle = monitor.start();
//! handle.subscribe(SubscriberId(42));
//! # });
//! ```

pub mod data;
pub mod monitor;
pub mod notify;
pub mod source;

// Re-export main types for convenience
pub use data::{
    classify, AlertDeduplicator, HistoryLog, HistoryRecord, Limits, UnitRow, UnitStatus,
};
pub use monitor::{FleetMonitor, FleetMonitorBuilder, MonitorHandle};
pub use notify::{Alert, ChannelNotifier, DeliveryError, LogNotifier, Notifier, SubscriberId, SubscriberSet};
pub use source::{ChannelProvider, FileProvider, FleetSnapshot, SnapshotProvider, SourceError, UnitSnapshot};
