//! Bounded activity history.
//!
//! Every tick appends one record per unit. The log is capped: once it grows
//! past its cap, the oldest batch is evicted in a single drain so eviction
//! cost stays amortized O(1) per append. Content is lost on restart.

use std::collections::VecDeque;

use super::status::UnitStatus;

/// Default maximum number of records retained.
pub const DEFAULT_CAP: usize = 1200;
/// Default number of records evicted in one batch when over cap.
pub const DEFAULT_EVICT_BATCH: usize = 150;

/// Stored reference text is truncated to this many characters.
const REFERENCE_MAX: usize = 60;

/// One classification event.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    /// Unix epoch seconds at classification time.
    pub timestamp: u64,
    pub unit_id: String,
    pub speed_kmh: f64,
    pub status: UnitStatus,
    /// Location description, truncated for storage.
    pub reference: String,
}

impl HistoryRecord {
    pub fn new(
        timestamp: u64,
        unit_id: impl Into<String>,
        speed_kmh: f64,
        status: UnitStatus,
        reference: &str,
    ) -> Self {
        Self {
            timestamp,
            unit_id: unit_id.into(),
            speed_kmh,
            status,
            reference: truncate(reference, REFERENCE_MAX),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Bounded, append-only log of classification events.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    records: VecDeque<HistoryRecord>,
    cap: usize,
    evict_batch: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAP, DEFAULT_EVICT_BATCH)
    }
}

impl HistoryLog {
    /// Create a log with the given cap and eviction batch size.
    ///
    /// The batch is clamped to the cap so one eviction never empties a
    /// non-trivial log entirely.
    pub fn new(cap: usize, evict_batch: usize) -> Self {
        let cap = cap.max(1);
        Self {
            records: VecDeque::with_capacity(cap + 1),
            cap,
            evict_batch: evict_batch.clamp(1, cap),
        }
    }

    /// Append one record, evicting the oldest batch if the log grew past cap.
    ///
    /// The just-appended record is never part of the evicted batch.
    pub fn append(&mut self, record: HistoryRecord) {
        self.records.push_back(record);
        if self.records.len() > self.cap {
            self.records.drain(..self.evict_batch);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current contents in insertion order, oldest first.
    pub fn snapshot(&self) -> Vec<HistoryRecord> {
        self.records.iter().cloned().collect()
    }

    /// Flat rows `(timestamp, unit_id, speed_kmh, status, reference)` for
    /// external formatting. The core produces no file format itself.
    pub fn rows(&self) -> Vec<(u64, String, f64, &'static str, String)> {
        self.records
            .iter()
            .map(|r| {
                (
                    r.timestamp,
                    r.unit_id.clone(),
                    r.speed_kmh,
                    r.status.symbol(),
                    r.reference.clone(),
                )
            })
            .collect()
    }
}
