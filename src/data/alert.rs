//! Alert deduplication.
//!
//! Tracks the last alert time per unit so a continuing violation alerts at
//! most once per cooldown window. The entry is removed the moment the unit
//! stops qualifying, so a fresh violation always alerts immediately instead
//! of inheriting a stale timer.

use std::collections::BTreeMap;

/// Default minimum interval between two alerts for the same unit, in seconds.
pub const DEFAULT_COOLDOWN_SECS: u64 = 14_400;

/// Per-unit last-alert-time table.
#[derive(Debug, Default)]
pub struct AlertDeduplicator {
    last_alert: BTreeMap<String, u64>,
}

impl AlertDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether an alert fires for this unit now.
    ///
    /// `qualifies` is whether the unit currently meets the alert condition.
    /// Returns true exactly when an alert should be delivered; recording the
    /// fire time is part of the same call.
    pub fn should_alert(
        &mut self,
        unit_id: &str,
        qualifies: bool,
        now: u64,
        cooldown_secs: u64,
    ) -> bool {
        if !qualifies {
            self.last_alert.remove(unit_id);
            return false;
        }

        match self.last_alert.get(unit_id) {
            Some(&last) if now.saturating_sub(last) <= cooldown_secs => false,
            _ => {
                self.last_alert.insert(unit_id.to_string(), now);
                true
            }
        }
    }

    /// Number of units currently inside a violation episode.
    pub fn active(&self) -> usize {
        self.last_alert.len()
    }
}
